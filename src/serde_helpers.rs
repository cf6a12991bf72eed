use crate::types::{GtfsTime, CURRENCY_CODES};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rgb::RGB8;
use serde::ser::Serializer;
use std::fmt::Display;

lazy_static! {
    // language[-script][-region]*(-variant), the shape of a BCP 47 tag
    static ref LANGUAGE_TAG: Regex = Regex::new(
        r"^(?i)[a-z]{2,3}(?:-[a-z]{4})?(?:-(?:[a-z]{2}|[0-9]{3}))?(?:-(?:[a-z0-9]{5,8}|[0-9][a-z0-9]{3}))*$"
    )
    .expect("language tag pattern is valid");
}

pub fn parse_date(s: &str) -> Result<NaiveDate, crate::Error> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(crate::Error::InvalidDate(s.to_owned()));
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|_| crate::Error::InvalidDate(s.to_owned()))
}

pub fn parse_time_impl(h: &str, m: &str, s: &str) -> Result<(u32, u32, u32), std::num::ParseIntError> {
    let hours: u32 = h.parse()?;
    let minutes: u32 = m.parse()?;
    let seconds: u32 = s.parse()?;
    Ok((hours, minutes, seconds))
}

/// Parses `H:MM:SS` or `HH:MM:SS`; hours may go past 24
pub fn parse_time(s: &str) -> Result<GtfsTime, crate::Error> {
    let len = s.len();
    let well_formed = (7..=8).contains(&len)
        && s.bytes()
            .enumerate()
            .all(|(i, b)| if i == len - 3 || i == len - 6 { b == b':' } else { b.is_ascii_digit() });
    if !well_formed {
        return Err(crate::Error::InvalidTime(s.to_owned()));
    }
    let sec = &s[len - 2..];
    let min = &s[len - 5..len - 3];
    let hour = &s[..len - 6];
    match parse_time_impl(hour, min, sec) {
        Ok((hours, minutes, seconds)) if minutes < 60 && seconds < 60 => {
            Ok(GtfsTime::from_hms(hours, minutes, seconds))
        }
        _ => Err(crate::Error::InvalidTime(s.to_owned())),
    }
}

/// Parses `RRGGBB`, without a leading `#`
pub fn parse_color(s: &str) -> Result<RGB8, crate::Error> {
    if s.len() != 6 || !s.is_ascii() {
        return Err(crate::Error::InvalidColor(s.to_owned()));
    }
    let r =
        u8::from_str_radix(&s[0..2], 16).map_err(|_| crate::Error::InvalidColor(s.to_owned()))?;
    let g =
        u8::from_str_radix(&s[2..4], 16).map_err(|_| crate::Error::InvalidColor(s.to_owned()))?;
    let b =
        u8::from_str_radix(&s[4..6], 16).map_err(|_| crate::Error::InvalidColor(s.to_owned()))?;
    Ok(RGB8::new(r, g, b))
}

/// ISO 4217 code, upper case
pub fn is_currency_code(s: &str) -> bool {
    CURRENCY_CODES.binary_search(&s).is_ok()
}

pub fn is_language_code(s: &str) -> bool {
    LANGUAGE_TAG.is_match(s)
}

pub fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format("%Y%m%d").to_string())
}

pub fn serialize_option_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        None => serializer.serialize_none(),
        Some(d) => serialize_date(d, serializer),
    }
}

pub fn serialize_option_color<S>(color: &Option<RGB8>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match color {
        None => serializer.serialize_none(),
        Some(c) => serializer
            .serialize_str(format!("{:02X}{:02X}{:02X}", c.r, c.g, c.b).as_str()),
    }
}

/// For values written back the way they are displayed (timezones, decimals)
pub fn serialize_option_display<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    match value {
        None => serializer.serialize_none(),
        Some(v) => serializer.collect_str(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn dates() {
        assert_eq!(
            NaiveDate::from_ymd_opt(2024, 2, 29),
            parse_date("20240229").ok()
        );
        assert!(parse_date("20230229").is_err());
        assert!(parse_date("2024-02-01").is_err());
        assert!(parse_date("2024021").is_err());
        assert!(parse_date("+2024021").is_err());
    }

    #[test]
    fn times() {
        assert_eq!(GtfsTime::from_hms(5, 30, 0), parse_time("5:30:00").unwrap());
        assert_eq!(GtfsTime::from_hms(25, 0, 1), parse_time("25:00:01").unwrap());
        assert!(parse_time("5:60:00").is_err());
        assert!(parse_time("05:30:61").is_err());
        assert!(parse_time("5:30").is_err());
        assert!(parse_time("05:30:00:00").is_err());
        assert!(parse_time("+5:30:00").is_err());
        assert!(parse_time("05h30m00").is_err());
    }

    #[test]
    fn colors() {
        assert_eq!(RGB8::new(255, 0, 17), parse_color("FF0011").unwrap());
        assert_eq!(RGB8::new(171, 205, 239), parse_color("abcdef").unwrap());
        assert!(parse_color("#FF001").is_err());
        assert!(parse_color("FF00GG").is_err());
        assert!(parse_color("é0000").is_err());
    }

    #[test]
    fn codes() {
        assert!(is_currency_code("EUR"));
        assert!(!is_currency_code("eur"));
        assert!(!is_currency_code("EURO"));
        assert!(is_language_code("fr"));
        assert!(is_language_code("en-US"));
        assert!(is_language_code("zh-Hant-TW"));
        assert!(is_language_code("es-419"));
        assert!(!is_language_code("french"));
        assert!(!is_language_code("e"));
        assert!(!is_language_code("en_US"));
    }

    #[test]
    fn serialize_values() {
        #[derive(Serialize)]
        struct Test {
            #[serde(serialize_with = "serialize_option_date")]
            date: Option<NaiveDate>,
            #[serde(serialize_with = "serialize_option_color")]
            color: Option<RGB8>,
            #[serde(serialize_with = "serialize_option_display")]
            timezone: Option<chrono_tz::Tz>,
            time: GtfsTime,
        }
        let value = Test {
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            color: Some(RGB8::new(0, 128, 255)),
            timezone: Some(chrono_tz::Europe::Paris),
            time: GtfsTime::from_hms(6, 5, 0),
        };
        assert_eq!(
            r#"{"date":"20240301","color":"0080FF","timezone":"Europe/Paris","time":"06:05:00"}"#,
            serde_json::to_string(&value).unwrap()
        );
    }
}
