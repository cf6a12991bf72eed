//! Module for the error management
use thiserror::Error;

/// An error that can occur while tokenizing a GTFS file or parsing one of its values.
///
/// None of those errors escape [crate::load_table]: the loader turns them into notices.
#[derive(Error, Debug)]
pub enum Error {
    /// Generic Input/Output error while reading a file
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be read
        file_name: String,
        /// The inital error that caused the unability to read the file
        #[source]
        source: std::io::Error,
    },
    /// Impossible to read a CSV record
    #[error("impossible to read csv file '{file_name}'")]
    CSVError {
        /// File name that could not be parsed as CSV
        file_name: String,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
        /// Line of the record that could not be read, when known
        line: Option<u64>,
    },
    /// The header line opens a quoted field that is never closed
    #[error("the header of '{file_name}' contains an unterminated quote")]
    UnterminatedQuote {
        /// File name of the header
        file_name: String,
    },
    /// The header line is not valid UTF-8
    #[error("the header of '{file_name}' is not valid UTF-8")]
    InvalidHeaderEncoding {
        /// File name of the header
        file_name: String,
    },
    /// A value is longer than the configured limit
    #[error("'{file_name}' line {line}: a value has more than {limit} characters")]
    FieldTooLong {
        /// File name of the record
        file_name: String,
        /// Line of the record
        line: u64,
        /// The configured maximum number of characters per value
        limit: usize,
    },
    /// The time is not given in the H:MM:SS or HH:MM:SS format
    #[error("'{0}' is not a valid time; HH:MM:SS format is expected.")]
    InvalidTime(String),
    /// The color is not given in the RRGGBB format, without a leading `#`
    #[error("'{0}' is not a valid color; RRGGBB format is expected, without a leading `#`")]
    InvalidColor(String),
    /// The date is not given in the YYYYMMDD format or does not exist
    #[error("'{0}' is not a valid date; YYYYMMDD format is expected.")]
    InvalidDate(String),
}
