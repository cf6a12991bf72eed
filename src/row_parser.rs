//! Typed access to the cells of a row, reporting every problem as a [Notice]
//!
//! Accessors never fail: they return `None` when no usable value can be read, and some
//! of them return the value along with a notice when it is usable but not well formed.
use crate::csv_header::CsvHeader;
use crate::csv_row::{is_whitespace, CsvRow};
use crate::enums::GtfsEnum;
use crate::field_validator::FieldValidator;
use crate::notice::{Notice, NoticeContainer, SeverityLevel};
use crate::schema::{ColumnDescriptor, FieldLevel};
use crate::serde_helpers::{is_currency_code, is_language_code, parse_color, parse_date, parse_time};
use crate::types::GtfsTime;
use chrono::NaiveDate;
use chrono_tz::Tz;
use rgb::RGB8;
use rust_decimal::Decimal;

macro_rules! field_notice {
    ($parser:expr, $variant:ident, $column:expr, $value:expr) => {{
        let notice = Notice::$variant {
            filename: $parser.file_name.to_owned(),
            csv_row_number: $parser.row.line_number(),
            field_name: $column.name.to_owned(),
            field_value: $value.to_owned(),
        };
        $parser.add_notice(notice);
    }};
}

/// True unless every word of two letters or more is written in a single case
fn is_mixed_case(value: &str) -> bool {
    let mut words = value
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.chars().count() > 1)
        .peekable();
    if words.peek().is_none() {
        return true;
    }
    let (mut all_lower, mut all_upper) = (true, true);
    for word in words {
        let has_lower = word.chars().any(char::is_lowercase);
        let has_upper = word.chars().any(char::is_uppercase);
        all_lower &= has_lower && !has_upper;
        all_upper &= has_upper && !has_lower;
    }
    !(all_lower || all_upper)
}

pub struct RowParser<'a> {
    file_name: &'a str,
    header: &'a CsvHeader,
    validator: &'a dyn FieldValidator,
    notices: &'a mut NoticeContainer,
    row: CsvRow,
    parse_errors_in_row: bool,
}

impl<'a> RowParser<'a> {
    pub fn new(
        file_name: &'a str,
        header: &'a CsvHeader,
        validator: &'a dyn FieldValidator,
        notices: &'a mut NoticeContainer,
    ) -> Self {
        RowParser {
            file_name,
            header,
            validator,
            notices,
            row: CsvRow::default(),
            parse_errors_in_row: false,
        }
    }

    /// Moves to the next row and forgets the errors of the previous one
    pub fn set_row(&mut self, row: CsvRow) {
        self.row = row;
        self.parse_errors_in_row = false;
    }

    pub fn row(&self) -> &CsvRow {
        &self.row
    }

    pub fn header(&self) -> &CsvHeader {
        self.header
    }

    pub fn file_name(&self) -> &str {
        self.file_name
    }

    pub fn csv_row_number(&self) -> u64 {
        self.row.line_number()
    }

    /// An error notice was added since the last [RowParser::set_row]
    pub fn has_parse_errors_in_row(&self) -> bool {
        self.parse_errors_in_row
    }

    pub fn add_notice(&mut self, notice: Notice) {
        if notice.severity() == SeverityLevel::Error {
            self.parse_errors_in_row = true;
        }
        self.notices.add_validation_notice(notice);
    }

    /// Checks that the row has one cell per column of the header
    pub fn check_row_length(&mut self) -> bool {
        let header_count = self.header.column_count();
        let row_length = self.row.column_count();
        if row_length == header_count {
            return true;
        }
        let notice = if self.row.is_blank() {
            Notice::EmptyRow {
                filename: self.file_name.to_owned(),
                csv_row_number: self.row.line_number(),
            }
        } else {
            Notice::InvalidRowLength {
                filename: self.file_name.to_owned(),
                csv_row_number: self.row.line_number(),
                row_length,
                header_count,
            }
        };
        self.add_notice(notice);
        false
    }

    fn report_missing(&mut self, column: &ColumnDescriptor) {
        let filename = self.file_name.to_owned();
        let csv_row_number = self.row.line_number();
        let field_name = column.name.to_owned();
        match column.field_level {
            FieldLevel::Required => self.add_notice(Notice::MissingRequiredField {
                filename,
                csv_row_number,
                field_name,
            }),
            FieldLevel::Recommended => self.add_notice(Notice::MissingRecommendedField {
                filename,
                csv_row_number,
                field_name,
            }),
            FieldLevel::Optional => {}
        }
    }

    /// The trimmed value of the cell, every other accessor starts from it
    pub fn as_string(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<String> {
        let raw = match self.row.cell(column_index) {
            Some(v) if !v.chars().all(is_whitespace) => v.to_owned(),
            _ => {
                self.report_missing(column);
                return None;
            }
        };
        let value = raw.trim_matches(is_whitespace);
        if value.len() != raw.len() {
            field_notice!(self, LeadingOrTrailingWhitespaces, column, raw);
        }
        if value.contains(|c: char| c == '\n' || c == '\r') {
            field_notice!(self, NewLineInValue, column, value);
        }
        Some(value.to_owned())
    }

    /// A free text value, checked for case when the column asks for it
    pub fn as_text(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<String> {
        let value = self.as_string(column_index, column)?;
        if column.mixed_case && !is_mixed_case(&value) {
            field_notice!(self, MixedCaseRecommendedField, column, value);
        }
        Some(value)
    }

    pub fn as_id(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<String> {
        let value = self.as_string(column_index, column)?;
        if !self.validator.validate_id(&value) {
            field_notice!(self, NonAsciiOrNonPrintableChar, column, value);
        }
        Some(value)
    }

    pub fn as_url(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<String> {
        let value = self.as_string(column_index, column)?;
        if !self.validator.validate_url(&value) {
            field_notice!(self, InvalidUrl, column, value);
        }
        Some(value)
    }

    pub fn as_email(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<String> {
        let value = self.as_string(column_index, column)?;
        if !self.validator.validate_email(&value) {
            field_notice!(self, InvalidEmail, column, value);
        }
        Some(value)
    }

    pub fn as_phone_number(
        &mut self,
        column_index: usize,
        column: &ColumnDescriptor,
    ) -> Option<String> {
        let value = self.as_string(column_index, column)?;
        if !self.validator.validate_phone_number(&value) {
            field_notice!(self, InvalidPhoneNumber, column, value);
        }
        Some(value)
    }

    pub fn as_language_code(
        &mut self,
        column_index: usize,
        column: &ColumnDescriptor,
    ) -> Option<String> {
        let value = self.as_string(column_index, column)?;
        if is_language_code(&value) {
            Some(value)
        } else {
            field_notice!(self, InvalidLanguageCode, column, value);
            None
        }
    }

    pub fn as_currency_code(
        &mut self,
        column_index: usize,
        column: &ColumnDescriptor,
    ) -> Option<String> {
        let value = self.as_string(column_index, column)?;
        if is_currency_code(&value) {
            Some(value)
        } else {
            field_notice!(self, InvalidCurrency, column, value);
            None
        }
    }

    pub fn as_timezone(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<Tz> {
        let value = self.as_string(column_index, column)?;
        match value.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                field_notice!(self, InvalidTimezone, column, value);
                None
            }
        }
    }

    fn report_out_of_range(
        &mut self,
        column: &ColumnDescriptor,
        field_type: &str,
        value: &str,
        bounds: &str,
    ) {
        let notice = Notice::NumberOutOfRange {
            filename: self.file_name.to_owned(),
            csv_row_number: self.row.line_number(),
            field_name: column.name.to_owned(),
            field_type: field_type.to_owned(),
            field_value: value.to_owned(),
            bounds: bounds.to_owned(),
        };
        self.add_notice(notice);
    }

    pub fn as_integer(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<i32> {
        let value = self.as_string(column_index, column)?;
        let parsed = match value.parse::<i32>() {
            Ok(i) => i,
            Err(_) => {
                field_notice!(self, InvalidInteger, column, value);
                return None;
            }
        };
        if let Some(bounds) = column.bounds {
            if !bounds.contains(f64::from(parsed)) {
                self.report_out_of_range(column, "integer", &value, bounds.description());
            }
        }
        Some(parsed)
    }

    fn parse_float(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<(f64, String)> {
        let value = self.as_string(column_index, column)?;
        match value.parse::<f64>() {
            Ok(f) if f.is_finite() => Some((f, value)),
            _ => {
                field_notice!(self, InvalidFloat, column, value);
                None
            }
        }
    }

    pub fn as_float(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<f64> {
        let (parsed, value) = self.parse_float(column_index, column)?;
        if let Some(bounds) = column.bounds {
            if !bounds.contains(parsed) {
                self.report_out_of_range(column, "float", &value, bounds.description());
            }
        }
        Some(parsed)
    }

    pub fn as_latitude(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<f64> {
        let (parsed, value) = self.parse_float(column_index, column)?;
        if !(-90.0..=90.0).contains(&parsed) {
            self.report_out_of_range(column, "latitude", &value, "[-90, 90]");
        }
        Some(parsed)
    }

    pub fn as_longitude(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<f64> {
        let (parsed, value) = self.parse_float(column_index, column)?;
        if !(-180.0..=180.0).contains(&parsed) {
            self.report_out_of_range(column, "longitude", &value, "[-180, 180]");
        }
        Some(parsed)
    }

    /// Exact decimal value, for prices
    pub fn as_decimal(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<Decimal> {
        let value = self.as_string(column_index, column)?;
        let parsed = match value.parse::<Decimal>() {
            Ok(d) => d,
            Err(_) => {
                field_notice!(self, InvalidFloat, column, value);
                return None;
            }
        };
        if let Some(bounds) = column.bounds {
            if !bounds.contains_decimal(&parsed) {
                self.report_out_of_range(column, "decimal", &value, bounds.description());
            }
        }
        Some(parsed)
    }

    pub fn as_color(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<RGB8> {
        let value = self.as_string(column_index, column)?;
        match parse_color(&value) {
            Ok(color) => Some(color),
            Err(_) => {
                field_notice!(self, InvalidColor, column, value);
                None
            }
        }
    }

    pub fn as_date(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<NaiveDate> {
        let value = self.as_string(column_index, column)?;
        match parse_date(&value) {
            Ok(date) => Some(date),
            Err(_) => {
                field_notice!(self, InvalidDate, column, value);
                None
            }
        }
    }

    pub fn as_time(&mut self, column_index: usize, column: &ColumnDescriptor) -> Option<GtfsTime> {
        let value = self.as_string(column_index, column)?;
        match parse_time(&value) {
            Ok(time) => Some(time),
            Err(_) => {
                field_notice!(self, InvalidTime, column, value);
                None
            }
        }
    }

    /// An integer code of an enumeration; unknown codes are kept
    pub fn as_enum<E: GtfsEnum>(
        &mut self,
        column_index: usize,
        column: &ColumnDescriptor,
    ) -> Option<E> {
        let value = self.as_string(column_index, column)?;
        let code = match value.parse::<i32>() {
            Ok(i) => i,
            Err(_) => {
                field_notice!(self, InvalidInteger, column, value);
                return None;
            }
        };
        let parsed = E::from_code(code);
        if parsed.is_unknown() {
            let notice = Notice::UnexpectedEnumValue {
                filename: self.file_name.to_owned(),
                csv_row_number: self.row.line_number(),
                field_name: column.name.to_owned(),
                field_value: code,
            };
            self.add_notice(notice);
        }
        Some(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::LocationType;
    use crate::field_validator::DefaultFieldValidator;
    use crate::schema::NumberBounds;

    fn row(line: &str) -> CsvRow {
        let cells = line
            .split(',')
            .map(|c| if c.is_empty() { None } else { Some(c.to_owned()) })
            .collect();
        CsvRow::new(2, cells)
    }

    /// Runs `f` on the single row `line` and returns its result, the row error flag and
    /// the notices
    fn parse<T>(
        header: &[&str],
        line: &str,
        f: impl FnOnce(&mut RowParser) -> T,
    ) -> (T, bool, NoticeContainer) {
        let header = CsvHeader::from_names(header.iter().copied());
        let mut notices = NoticeContainer::default();
        let validator = DefaultFieldValidator;
        let mut parser = RowParser::new("stops.txt", &header, &validator, &mut notices);
        parser.set_row(row(line));
        let result = f(&mut parser);
        let has_errors = parser.has_parse_errors_in_row();
        (result, has_errors, notices)
    }

    #[test]
    fn required_and_recommended_missing() {
        let (value, has_errors, notices) = parse(&["stop_id", "stop_name"], ",name", |p| {
            p.as_id(0, &ColumnDescriptor::required("stop_id"))
        });
        assert_eq!(None, value);
        assert!(has_errors);
        assert_eq!(1, notices.count_by_code("missing_required_field"));
        assert_eq!(1, notices.len());

        let (value, has_errors, notices) = parse(&["stop_id", "stop_desc"], "s1,", |p| {
            p.as_text(1, &ColumnDescriptor::recommended("stop_desc"))
        });
        assert_eq!(None, value);
        assert!(!has_errors);
        assert_eq!(1, notices.count_by_code("missing_recommended_field"));
        assert_eq!(1, notices.len());
    }

    #[test]
    fn blank_cell_is_missing() {
        let (value, has_errors, notices) = parse(&["stop_id"], " \t ", |p| {
            p.as_id(0, &ColumnDescriptor::optional("stop_id"))
        });
        assert_eq!(None, value);
        assert!(!has_errors);
        assert!(notices.is_empty());
    }

    #[test]
    fn whitespace_is_trimmed() {
        let (value, has_errors, notices) = parse(&["stop_id"], " s1 ", |p| {
            p.as_id(0, &ColumnDescriptor::required("stop_id"))
        });
        assert_eq!(Some("s1".to_owned()), value);
        assert!(!has_errors);
        assert_eq!(1, notices.count_by_code("leading_or_trailing_whitespaces"));
    }

    #[test]
    fn new_line_in_value() {
        let (value, has_errors, notices) = parse(&["stop_name"], "First\nstop", |p| {
            p.as_text(0, &ColumnDescriptor::required("stop_name"))
        });
        assert_eq!(Some("First\nstop".to_owned()), value);
        assert!(has_errors);
        assert_eq!(1, notices.count_by_code("new_line_in_value"));
    }

    #[test]
    fn latitude_out_of_range() {
        let (value, has_errors, notices) = parse(&["stop_lat"], "-91", |p| {
            p.as_latitude(0, &ColumnDescriptor::optional("stop_lat"))
        });
        assert_eq!(Some(-91.0), value);
        assert!(has_errors);
        assert_eq!(1, notices.count_by_code("number_out_of_range"));
        assert_eq!(1, notices.len());
        match &notices.validation_notices()[0] {
            Notice::NumberOutOfRange { bounds, field_value, .. } => {
                assert_eq!("[-90, 90]", bounds);
                assert_eq!("-91", field_value);
            }
            n => panic!("unexpected notice {:?}", n),
        }
    }

    #[test]
    fn numbers() {
        let column = ColumnDescriptor::optional("transfer_duration").bounds(NumberBounds::NonNegative);
        let (value, _, notices) = parse(&["transfer_duration"], "-5", |p| p.as_integer(0, &column));
        assert_eq!(Some(-5), value);
        assert_eq!(1, notices.count_by_code("number_out_of_range"));

        let (value, has_errors, notices) =
            parse(&["transfer_duration"], "5.5", |p| p.as_integer(0, &column));
        assert_eq!(None, value);
        assert!(has_errors);
        assert_eq!(1, notices.count_by_code("invalid_integer"));

        let (value, _, notices) = parse(&["stop_lon"], "NaN", |p| {
            p.as_longitude(0, &ColumnDescriptor::optional("stop_lon"))
        });
        assert_eq!(None, value);
        assert_eq!(1, notices.count_by_code("invalid_float"));

        let price = ColumnDescriptor::required("price").bounds(NumberBounds::NonNegative);
        let (value, has_errors, _) = parse(&["price"], "1.50", |p| p.as_decimal(0, &price));
        assert_eq!(Some(Decimal::new(150, 2)), value);
        assert!(!has_errors);
    }

    #[test]
    fn soft_format_errors_keep_the_value() {
        let (value, has_errors, notices) = parse(&["agency_url"], "www.bibus.fr", |p| {
            p.as_url(0, &ColumnDescriptor::required("agency_url"))
        });
        assert_eq!(Some("www.bibus.fr".to_owned()), value);
        assert!(has_errors);
        assert_eq!(1, notices.count_by_code("invalid_url"));

        let (value, has_errors, notices) = parse(&["stop_id"], "arrêt", |p| {
            p.as_id(0, &ColumnDescriptor::required("stop_id"))
        });
        assert_eq!(Some("arrêt".to_owned()), value);
        assert!(!has_errors);
        assert_eq!(1, notices.count_by_code("non_ascii_or_non_printable_char"));
    }

    #[test]
    fn hard_format_errors_drop_the_value() {
        let (value, _, notices) = parse(&["agency_timezone"], "Europe/Pariss", |p| {
            p.as_timezone(0, &ColumnDescriptor::required("agency_timezone"))
        });
        assert_eq!(None, value);
        assert_eq!(1, notices.count_by_code("invalid_timezone"));

        let (value, _, _) = parse(&["agency_timezone"], "America/Montreal", |p| {
            p.as_timezone(0, &ColumnDescriptor::required("agency_timezone"))
        });
        assert_eq!(Some(chrono_tz::America::Montreal), value);

        let (value, _, notices) = parse(&["currency_type"], "EURO", |p| {
            p.as_currency_code(0, &ColumnDescriptor::required("currency_type"))
        });
        assert_eq!(None, value);
        assert_eq!(1, notices.count_by_code("invalid_currency"));

        let (value, _, notices) = parse(&["start_date"], "2024-01-01", |p| {
            p.as_date(0, &ColumnDescriptor::required("start_date"))
        });
        assert_eq!(None, value);
        assert_eq!(1, notices.count_by_code("invalid_date"));

        let (value, _, notices) = parse(&["arrival_time"], "7:75:00", |p| {
            p.as_time(0, &ColumnDescriptor::optional("arrival_time"))
        });
        assert_eq!(None, value);
        assert_eq!(1, notices.count_by_code("invalid_time"));

        let (value, _, notices) = parse(&["route_color"], "red", |p| {
            p.as_color(0, &ColumnDescriptor::optional("route_color"))
        });
        assert_eq!(None, value);
        assert_eq!(1, notices.count_by_code("invalid_color"));
    }

    #[test]
    fn enums() {
        let column = ColumnDescriptor::optional("location_type");
        let (value, has_errors, notices) =
            parse(&["location_type"], "1", |p| p.as_enum::<LocationType>(0, &column));
        assert_eq!(Some(LocationType::StopArea), value);
        assert!(!has_errors);
        assert!(notices.is_empty());

        let (value, has_errors, notices) =
            parse(&["location_type"], "7", |p| p.as_enum::<LocationType>(0, &column));
        assert_eq!(Some(LocationType::Unknown(7)), value);
        assert!(!has_errors);
        assert_eq!(1, notices.count_by_code("unexpected_enum_value"));

        let (value, has_errors, notices) =
            parse(&["location_type"], "station", |p| p.as_enum::<LocationType>(0, &column));
        assert_eq!(None, value);
        assert!(has_errors);
        assert_eq!(1, notices.count_by_code("invalid_integer"));
    }

    #[test]
    fn mixed_case() {
        assert!(is_mixed_case("Gare Centrale"));
        assert!(is_mixed_case("Line 5"));
        assert!(is_mixed_case("42"));
        assert!(is_mixed_case("Place de la République"));
        assert!(!is_mixed_case("GARE CENTRALE"));
        assert!(!is_mixed_case("gare centrale"));

        let column = ColumnDescriptor::required("stop_name").mixed_case();
        let (_, has_errors, notices) = parse(&["stop_name"], "MAIN STREET", |p| p.as_text(0, &column));
        assert!(!has_errors);
        assert_eq!(1, notices.count_by_code("mixed_case_recommended_field"));
    }

    #[test]
    fn row_length() {
        let (ok, has_errors, notices) = parse(&["stop_id", "stop_name"], "s1", |p| p.check_row_length());
        assert!(!ok);
        assert!(has_errors);
        assert_eq!(1, notices.count_by_code("invalid_row_length"));
        match &notices.validation_notices()[0] {
            Notice::InvalidRowLength { row_length, header_count, csv_row_number, .. } => {
                assert_eq!(1, *row_length);
                assert_eq!(2, *header_count);
                assert_eq!(2, *csv_row_number);
            }
            n => panic!("unexpected notice {:?}", n),
        }

        let (ok, _, notices) = parse(&["stop_id", "stop_name"], "", |p| p.check_row_length());
        assert!(!ok);
        assert_eq!(1, notices.count_by_code("empty_row"));
        assert_eq!(0, notices.count_by_code("invalid_row_length"));

        let (ok, _, notices) = parse(&["stop_id", "stop_name"], "s1,First stop", |p| p.check_row_length());
        assert!(ok);
        assert!(notices.is_empty());
    }

    #[test]
    fn out_of_range_column_is_missing() {
        let (value, has_errors, notices) = parse(&["stop_id"], "s1", |p| {
            p.as_string(5, &ColumnDescriptor::required("stop_name"))
        });
        assert_eq!(None, value);
        assert!(has_errors);
        assert_eq!(1, notices.count_by_code("missing_required_field"));
    }

    #[test]
    fn set_row_resets_the_error_flag() {
        let header = CsvHeader::from_names(["stop_id"]);
        let mut notices = NoticeContainer::default();
        let validator = DefaultFieldValidator;
        let mut parser = RowParser::new("stops.txt", &header, &validator, &mut notices);
        let column = ColumnDescriptor::required("stop_id");
        parser.set_row(row(""));
        assert_eq!(None, parser.as_id(0, &column));
        assert!(parser.has_parse_errors_in_row());
        parser.set_row(row("s2"));
        assert!(!parser.has_parse_errors_in_row());
        assert_eq!(Some("s2".to_owned()), parser.as_id(0, &column));
    }
}
