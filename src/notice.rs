//! Diagnostics emitted while loading a feed
//!
//! A [Notice] describes one deviation from the schema. Every variant has a stable
//! snake_case code (used as the `code` tag when serialized) and a [SeverityLevel].
use rustc_hash::FxHashMap;
use serde::Serialize;

/// How serious a [Notice] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityLevel {
    /// Informative, nothing to fix
    Info,
    /// The data can be used but should be improved
    Warning,
    /// The data does not follow the schema
    Error,
}

/// A structured diagnostic about one file, row or value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Notice {
    /// A required file is absent from the feed
    MissingRequiredFile { filename: String },
    /// A recommended file is absent from the feed
    MissingRecommendedFile { filename: String },
    /// A file is present but has no content
    EmptyFile { filename: String },
    /// A file of the feed is not known to any schema
    UnknownFile { filename: String },
    /// The file could not be tokenized as CSV
    CsvParsingFailed {
        filename: String,
        csv_row_number: Option<u64>,
        message: String,
    },
    /// The stream of a file could not be read
    IoError { filename: String, message: String },
    /// A column of the header has no name
    EmptyColumnName { filename: String, index: usize },
    /// A column name appears twice in the header
    DuplicatedColumn {
        filename: String,
        field_name: String,
        first_index: usize,
        second_index: usize,
    },
    /// A column of the header is not part of the schema
    UnknownColumn {
        filename: String,
        field_name: String,
        index: usize,
    },
    /// A required column is absent from the header
    MissingRequiredColumn { filename: String, field_name: String },
    /// A recommended column is absent from the header
    MissingRecommendedColumn { filename: String, field_name: String },
    /// A row holds nothing but whitespace
    EmptyRow { filename: String, csv_row_number: u64 },
    /// A row does not have as many cells as the header has columns
    InvalidRowLength {
        filename: String,
        csv_row_number: u64,
        row_length: usize,
        header_count: usize,
    },
    /// A required value is empty
    MissingRequiredField {
        filename: String,
        csv_row_number: u64,
        field_name: String,
    },
    /// A recommended value is empty
    MissingRecommendedField {
        filename: String,
        csv_row_number: u64,
        field_name: String,
    },
    /// The value starts or ends with spaces or tabs
    LeadingOrTrailingWhitespaces {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    /// The value contains a line break
    NewLineInValue {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    /// An identifier contains characters outside printable ASCII
    NonAsciiOrNonPrintableChar {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    /// A text value is written all in upper or lower case
    MixedCaseRecommendedField {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    InvalidInteger {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    /// Used for both floating point and decimal values
    InvalidFloat {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    InvalidUrl {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    InvalidEmail {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    InvalidPhoneNumber {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    InvalidDate {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    InvalidTime {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    InvalidTimezone {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    InvalidColor {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    InvalidCurrency {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    InvalidLanguageCode {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: String,
    },
    /// A number is parsed but lies outside the bounds of its column
    NumberOutOfRange {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_type: String,
        field_value: String,
        bounds: String,
    },
    /// An integer is not one of the values of the enumeration
    UnexpectedEnumValue {
        filename: String,
        csv_row_number: u64,
        field_name: String,
        field_value: i32,
    },
    /// Two entities share the same primary key
    DuplicateKey {
        filename: String,
        old_csv_row_number: u64,
        new_csv_row_number: u64,
        field_names: Vec<String>,
        field_values: Vec<String>,
    },
}

impl Notice {
    /// Stable identifier of the kind of notice
    pub fn code(&self) -> &'static str {
        match self {
            Notice::MissingRequiredFile { .. } => "missing_required_file",
            Notice::MissingRecommendedFile { .. } => "missing_recommended_file",
            Notice::EmptyFile { .. } => "empty_file",
            Notice::UnknownFile { .. } => "unknown_file",
            Notice::CsvParsingFailed { .. } => "csv_parsing_failed",
            Notice::IoError { .. } => "io_error",
            Notice::EmptyColumnName { .. } => "empty_column_name",
            Notice::DuplicatedColumn { .. } => "duplicated_column",
            Notice::UnknownColumn { .. } => "unknown_column",
            Notice::MissingRequiredColumn { .. } => "missing_required_column",
            Notice::MissingRecommendedColumn { .. } => "missing_recommended_column",
            Notice::EmptyRow { .. } => "empty_row",
            Notice::InvalidRowLength { .. } => "invalid_row_length",
            Notice::MissingRequiredField { .. } => "missing_required_field",
            Notice::MissingRecommendedField { .. } => "missing_recommended_field",
            Notice::LeadingOrTrailingWhitespaces { .. } => "leading_or_trailing_whitespaces",
            Notice::NewLineInValue { .. } => "new_line_in_value",
            Notice::NonAsciiOrNonPrintableChar { .. } => "non_ascii_or_non_printable_char",
            Notice::MixedCaseRecommendedField { .. } => "mixed_case_recommended_field",
            Notice::InvalidInteger { .. } => "invalid_integer",
            Notice::InvalidFloat { .. } => "invalid_float",
            Notice::InvalidUrl { .. } => "invalid_url",
            Notice::InvalidEmail { .. } => "invalid_email",
            Notice::InvalidPhoneNumber { .. } => "invalid_phone_number",
            Notice::InvalidDate { .. } => "invalid_date",
            Notice::InvalidTime { .. } => "invalid_time",
            Notice::InvalidTimezone { .. } => "invalid_timezone",
            Notice::InvalidColor { .. } => "invalid_color",
            Notice::InvalidCurrency { .. } => "invalid_currency",
            Notice::InvalidLanguageCode { .. } => "invalid_language_code",
            Notice::NumberOutOfRange { .. } => "number_out_of_range",
            Notice::UnexpectedEnumValue { .. } => "unexpected_enum_value",
            Notice::DuplicateKey { .. } => "duplicate_key",
        }
    }

    pub fn severity(&self) -> SeverityLevel {
        match self {
            Notice::UnknownFile { .. } | Notice::UnknownColumn { .. } => SeverityLevel::Info,
            Notice::MissingRecommendedFile { .. }
            | Notice::MissingRecommendedColumn { .. }
            | Notice::MissingRecommendedField { .. }
            | Notice::EmptyRow { .. }
            | Notice::LeadingOrTrailingWhitespaces { .. }
            | Notice::NonAsciiOrNonPrintableChar { .. }
            | Notice::MixedCaseRecommendedField { .. }
            | Notice::UnexpectedEnumValue { .. } => SeverityLevel::Warning,
            _ => SeverityLevel::Error,
        }
    }

    /// Name of the file the notice is about
    pub fn filename(&self) -> &str {
        match self {
            Notice::MissingRequiredFile { filename }
            | Notice::MissingRecommendedFile { filename }
            | Notice::EmptyFile { filename }
            | Notice::UnknownFile { filename }
            | Notice::CsvParsingFailed { filename, .. }
            | Notice::IoError { filename, .. }
            | Notice::EmptyColumnName { filename, .. }
            | Notice::DuplicatedColumn { filename, .. }
            | Notice::UnknownColumn { filename, .. }
            | Notice::MissingRequiredColumn { filename, .. }
            | Notice::MissingRecommendedColumn { filename, .. }
            | Notice::EmptyRow { filename, .. }
            | Notice::InvalidRowLength { filename, .. }
            | Notice::MissingRequiredField { filename, .. }
            | Notice::MissingRecommendedField { filename, .. }
            | Notice::LeadingOrTrailingWhitespaces { filename, .. }
            | Notice::NewLineInValue { filename, .. }
            | Notice::NonAsciiOrNonPrintableChar { filename, .. }
            | Notice::MixedCaseRecommendedField { filename, .. }
            | Notice::InvalidInteger { filename, .. }
            | Notice::InvalidFloat { filename, .. }
            | Notice::InvalidUrl { filename, .. }
            | Notice::InvalidEmail { filename, .. }
            | Notice::InvalidPhoneNumber { filename, .. }
            | Notice::InvalidDate { filename, .. }
            | Notice::InvalidTime { filename, .. }
            | Notice::InvalidTimezone { filename, .. }
            | Notice::InvalidColor { filename, .. }
            | Notice::InvalidCurrency { filename, .. }
            | Notice::InvalidLanguageCode { filename, .. }
            | Notice::NumberOutOfRange { filename, .. }
            | Notice::UnexpectedEnumValue { filename, .. }
            | Notice::DuplicateKey { filename, .. } => filename,
        }
    }

    /// The structured fields of the notice as a JSON object, without the code
    pub fn context(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut fields)) => {
                fields.remove("code");
                fields
            }
            _ => serde_json::Map::new(),
        }
    }
}

/// Append-only collection of notices
///
/// Only the first `max_notices_per_code` notices of each code are kept, but all of them
/// are counted. A container must not be shared between concurrent loads: give each load
/// its own and merge them with [NoticeContainer::add_all].
#[derive(Derivative, Debug, Clone)]
#[derivative(Default)]
pub struct NoticeContainer {
    validation_notices: Vec<Notice>,
    system_errors: Vec<Notice>,
    counts: FxHashMap<&'static str, usize>,
    has_validation_errors: bool,
    #[derivative(Default(value = "100_000"))]
    max_notices_per_code: usize,
}

impl NoticeContainer {
    /// A container keeping at most `max_notices_per_code` notices of each code
    pub fn with_max_notices_per_code(max_notices_per_code: usize) -> Self {
        NoticeContainer {
            max_notices_per_code,
            ..Default::default()
        }
    }

    pub fn add_validation_notice(&mut self, notice: Notice) {
        if notice.severity() == SeverityLevel::Error {
            self.has_validation_errors = true;
        }
        let count = self.counts.entry(notice.code()).or_insert(0);
        *count += 1;
        if *count <= self.max_notices_per_code {
            self.validation_notices.push(notice);
        }
    }

    /// Records a failure of the loading itself rather than of the data
    pub fn add_system_error(&mut self, notice: Notice) {
        self.system_errors.push(notice);
    }

    /// Moves all the notices of `other` after the ones of `self`
    ///
    /// `other` has already applied its own cap, so its notices are kept as they are: merging
    /// the containers of several files keeps up to `max_notices_per_code` notices per file.
    pub fn add_all(&mut self, other: NoticeContainer) {
        self.validation_notices.extend(other.validation_notices);
        for (code, count) in other.counts {
            *self.counts.entry(code).or_insert(0) += count;
        }
        self.has_validation_errors |= other.has_validation_errors;
        self.system_errors.extend(other.system_errors);
    }

    pub fn validation_notices(&self) -> &[Notice] {
        &self.validation_notices
    }

    pub fn system_errors(&self) -> &[Notice] {
        &self.system_errors
    }

    /// True when at least one notice of severity [SeverityLevel::Error] was added
    pub fn has_validation_errors(&self) -> bool {
        self.has_validation_errors
    }

    /// Number of notices added with this code, including the ones not kept
    pub fn count_by_code(&self, code: &str) -> usize {
        self.counts.get(code).copied().unwrap_or(0)
    }

    /// Number of kept notices of this severity
    pub fn count_by_severity(&self, severity: SeverityLevel) -> usize {
        self.validation_notices
            .iter()
            .filter(|n| n.severity() == severity)
            .count()
    }

    /// Number of kept validation notices
    pub fn len(&self) -> usize {
        self.validation_notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validation_notices.is_empty() && self.system_errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(row: u64) -> Notice {
        Notice::MissingRequiredField {
            filename: "stops.txt".to_owned(),
            csv_row_number: row,
            field_name: "stop_id".to_owned(),
        }
    }

    #[test]
    fn code_and_context() {
        let notice = missing(3);
        assert_eq!("missing_required_field", notice.code());
        assert_eq!(SeverityLevel::Error, notice.severity());
        assert_eq!("stops.txt", notice.filename());

        let context = notice.context();
        assert_eq!(Some(&serde_json::json!(3)), context.get("csv_row_number"));
        assert_eq!(Some(&serde_json::json!("stop_id")), context.get("field_name"));
        assert!(!context.contains_key("code"));

        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(serde_json::json!("missing_required_field"), json["code"]);
    }

    #[test]
    fn caps_notices_per_code() {
        let mut notices = NoticeContainer::with_max_notices_per_code(2);
        for row in 2..6 {
            notices.add_validation_notice(missing(row));
        }
        notices.add_validation_notice(Notice::UnknownFile {
            filename: "extra.txt".to_owned(),
        });
        assert_eq!(3, notices.len());
        assert_eq!(4, notices.count_by_code("missing_required_field"));
        assert_eq!(1, notices.count_by_severity(SeverityLevel::Info));
        assert!(notices.has_validation_errors());
    }

    #[test]
    fn warnings_are_not_errors() {
        let mut notices = NoticeContainer::default();
        notices.add_validation_notice(Notice::EmptyRow {
            filename: "stops.txt".to_owned(),
            csv_row_number: 4,
        });
        assert!(!notices.has_validation_errors());
        assert_eq!(1, notices.count_by_severity(SeverityLevel::Warning));
    }

    #[test]
    fn merges_in_order() {
        let mut first = NoticeContainer::default();
        first.add_validation_notice(missing(2));
        let mut second = NoticeContainer::with_max_notices_per_code(1);
        second.add_validation_notice(missing(7));
        second.add_validation_notice(missing(8));
        second.add_system_error(Notice::IoError {
            filename: "stops.txt".to_owned(),
            message: "broken pipe".to_owned(),
        });

        first.add_all(second);
        assert_eq!(vec![missing(2), missing(7)], first.validation_notices());
        assert_eq!(3, first.count_by_code("missing_required_field"));
        assert_eq!(1, first.system_errors().len());
        assert!(first.has_validation_errors());
    }

    #[test]
    fn merge_keeps_the_cap_of_each_container() {
        let mut feed = NoticeContainer::with_max_notices_per_code(1);
        for first_row in [2, 10] {
            let mut file = NoticeContainer::with_max_notices_per_code(1);
            file.add_validation_notice(missing(first_row));
            file.add_validation_notice(missing(first_row + 1));
            feed.add_all(file);
        }
        assert_eq!(vec![missing(2), missing(10)], feed.validation_notices());
        assert_eq!(4, feed.count_by_code("missing_required_field"));
    }
}
