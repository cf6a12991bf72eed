use crate::csv_file::{CsvFile, CsvOptions};
use crate::csv_header::CsvHeader;
use crate::error::Error;
use crate::field_validator::FieldValidator;
use crate::notice::{Notice, NoticeContainer};
use crate::row_parser::RowParser;
use crate::schema::{ColumnDescriptor, EntityBuilder, FieldLoader, TableSchema};
use crate::table_container::{GtfsTableContainer, TableStatus};
use crate::value_cache::ValueCache;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::io::Read;
use std::sync::Arc;

fn error_message(e: &Error) -> String {
    match std::error::Error::source(e) {
        Some(source) => format!("{}: {}", e, source),
        None => e.to_string(),
    }
}

// a failure of the stream itself rather than of its content
fn io_error_notice(filename: &str, e: &Error) -> Option<Notice> {
    let is_io = match e {
        Error::NamedFileIO { .. } => true,
        Error::CSVError { source, .. } => source.is_io_error(),
        _ => false,
    };
    is_io.then(|| Notice::IoError {
        filename: filename.to_owned(),
        message: error_message(e),
    })
}

fn validate_header<B>(schema: &TableSchema<B>, header: &CsvHeader, notices: &mut NoticeContainer)
where
    B: EntityBuilder,
{
    let filename = schema.filename();
    let mut first_index: FxHashMap<&str, usize> = FxHashMap::default();
    for (index, name) in header.columns().iter().enumerate() {
        if name.is_empty() {
            notices.add_validation_notice(Notice::EmptyColumnName {
                filename: filename.to_owned(),
                index,
            });
            continue;
        }
        if let Some(&first) = first_index.get(name.as_str()) {
            notices.add_validation_notice(Notice::DuplicatedColumn {
                filename: filename.to_owned(),
                field_name: name.clone(),
                first_index: first,
                second_index: index,
            });
            continue;
        }
        first_index.insert(name, index);
        if schema.column_descriptor(name).is_none() {
            notices.add_validation_notice(Notice::UnknownColumn {
                filename: filename.to_owned(),
                field_name: name.clone(),
                index,
            });
        }
    }
    for column in schema.columns() {
        if header.has_column(column.name) {
            continue;
        }
        if column.header_required {
            notices.add_validation_notice(Notice::MissingRequiredColumn {
                filename: filename.to_owned(),
                field_name: column.name.to_owned(),
            });
        } else if column.header_recommended {
            notices.add_validation_notice(Notice::MissingRecommendedColumn {
                filename: filename.to_owned(),
                field_name: column.name.to_owned(),
            });
        }
    }
}

/// Loads one file into a container, reporting every problem in `notices`
///
/// `None` stands for a file absent from the feed. The load never fails: when the file
/// cannot be read at all, the container is empty and its status tells why.
///
/// ```
/// use gtfs_tables::{load_table, tables, DefaultFieldValidator, NoticeContainer, TableStatus};
///
/// let data = "stop_id,stop_name\ns1,First stop\n";
/// let mut notices = NoticeContainer::default();
/// let stops = load_table(
///     &tables::stops_schema(),
///     Some(data.as_bytes()),
///     &DefaultFieldValidator,
///     &mut notices,
/// );
/// assert_eq!(TableStatus::ParsableHeadersAndRows, stops.table_status());
/// assert_eq!(Some("First stop"), stops.by_id("s1").and_then(|s| s.stop_name.as_deref()));
/// ```
pub fn load_table<B, R>(
    schema: &TableSchema<B>,
    input: Option<R>,
    validator: &dyn FieldValidator,
    notices: &mut NoticeContainer,
) -> GtfsTableContainer<B::Entity>
where
    B: EntityBuilder,
    R: Read,
{
    let filename = schema.filename();
    let input = match input {
        Some(input) => input,
        None => {
            if schema.is_required() {
                notices.add_validation_notice(Notice::MissingRequiredFile {
                    filename: filename.to_owned(),
                });
            } else if schema.is_recommended() {
                notices.add_validation_notice(Notice::MissingRecommendedFile {
                    filename: filename.to_owned(),
                });
            }
            debug!("{}: missing file", filename);
            return GtfsTableContainer::for_status(schema, TableStatus::MissingFile);
        }
    };

    let options = CsvOptions {
        max_chars_per_column: schema.max_chars_per_column(),
    };
    let csv_file = match CsvFile::new(input, filename, options) {
        Ok(csv_file) => csv_file,
        Err(e) => {
            notices.add_validation_notice(Notice::CsvParsingFailed {
                filename: filename.to_owned(),
                csv_row_number: Some(1),
                message: error_message(&e),
            });
            if let Some(io_error) = io_error_notice(filename, &e) {
                notices.add_system_error(io_error);
            }
            debug!("{}: unparsable headers", filename);
            return GtfsTableContainer::for_status(schema, TableStatus::UnparsableHeaders);
        }
    };
    if csv_file.is_empty() {
        notices.add_validation_notice(Notice::EmptyFile {
            filename: filename.to_owned(),
        });
        debug!("{}: empty file", filename);
        return GtfsTableContainer::for_status(schema, TableStatus::EmptyFile);
    }

    let header = Arc::clone(csv_file.header());
    validate_header(schema, &header, notices);
    let loaders: Vec<(usize, &ColumnDescriptor, FieldLoader<B>)> = schema
        .columns()
        .iter()
        .filter_map(|column| {
            let index = header.column_index(column.name)?;
            let loader = schema.field_loader(column.name)?;
            Some((index, column, loader))
        })
        .collect();

    let mut cache: ValueCache<Arc<str>> = ValueCache::default();
    let mut builder = schema.new_builder();
    let mut entities = Vec::new();
    let mut io_error = None;
    {
        let mut parser = RowParser::new(filename, &header, validator, notices);
        for row in csv_file {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    // an oversized value only costs its row, anything else ends the stream
                    let (line, recoverable) = match &e {
                        Error::FieldTooLong { line, .. } => (Some(*line), true),
                        Error::CSVError { line, .. } => (*line, false),
                        _ => (None, false),
                    };
                    if !recoverable {
                        warn!("{}: stopped reading rows, {}", filename, error_message(&e));
                    }
                    parser.add_notice(Notice::CsvParsingFailed {
                        filename: filename.to_owned(),
                        csv_row_number: line,
                        message: error_message(&e),
                    });
                    if recoverable {
                        continue;
                    }
                    io_error = io_error_notice(filename, &e);
                    break;
                }
            };
            parser.set_row(row);
            if !parser.check_row_length() {
                continue;
            }
            builder.set_csv_row_number(parser.csv_row_number());
            for (index, column, loader) in &loaders {
                loader(&mut parser, *index, column, &mut cache, &mut builder);
            }
            if parser.has_parse_errors_in_row() {
                builder.clear();
            } else {
                entities.push(builder.build());
            }
        }
    }
    if let Some(io_error) = io_error {
        notices.add_system_error(io_error);
    }
    debug!(
        "{}: {} entities, {} cached values for {} lookups",
        filename,
        entities.len(),
        cache.size(),
        cache.call_count()
    );
    GtfsTableContainer::for_entities(schema, header, entities, notices)
}
