use crate::csv_header::CsvHeader;
use crate::csv_row::{is_whitespace, CsvRow};
use crate::Error;
use std::io::{BufRead, BufReader, Chain, Cursor, Read};
use std::sync::Arc;

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Tokenizer settings
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvOptions {
    /// Values longer than this are reported instead of being returned
    pub max_chars_per_column: Option<usize>,
}

type Source<R> = Chain<Cursor<Vec<u8>>, BufReader<R>>;

/// Where the tokenizer stands in a record, following the quoting rules of the `csv` crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// A quote seen inside a quoted field: either an escaped quote or the closing one
    QuoteInQuoted,
}

// A quote opens a quoted field only at the start of a field; anywhere else it is a plain character
fn scan_quotes(mut state: QuoteState, bytes: &[u8]) -> QuoteState {
    for b in bytes {
        state = match (state, *b) {
            (QuoteState::Quoted, b'"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::FieldStart, b'"') | (QuoteState::QuoteInQuoted, b'"') => QuoteState::Quoted,
            (_, b',') | (_, b'\n') => QuoteState::FieldStart,
            _ => QuoteState::Unquoted,
        };
    }
    state
}

/// A CSV file being read: its header and the rows that follow
///
/// Rows are read lazily through [Iterator]; the underlying stream is consumed once.
///
/// ```
/// use gtfs_tables::{CsvFile, CsvOptions};
///
/// let data = "\u{feff}stop_id,stop_name\r\ns1,First stop\r\n";
/// let mut file = CsvFile::new(data.as_bytes(), "stops.txt", CsvOptions::default())?;
/// assert_eq!(Some(1), file.header().column_index("stop_name"));
/// let row = file.next().unwrap()?;
/// assert_eq!(Some("First stop"), row.cell(1));
/// # Ok::<(), gtfs_tables::Error>(())
/// ```
pub struct CsvFile<R: Read> {
    file_name: String,
    header: Arc<CsvHeader>,
    reader: csv::Reader<Source<R>>,
    record: csv::ByteRecord,
    options: CsvOptions,
    done: bool,
}

impl<R: Read> CsvFile<R> {
    /// Reads the header of the file
    ///
    /// Fails when the header cannot be tokenized: unterminated quote, invalid UTF-8 or I/O error.
    pub fn new(input: R, file_name: &str, options: CsvOptions) -> Result<Self, Error> {
        let mut input = BufReader::new(input);
        // The header record is read apart to strip the BOM and to find unclosed quotes
        let mut header_bytes = Vec::new();
        let mut state = QuoteState::FieldStart;
        loop {
            let start = header_bytes.len();
            let read = input
                .read_until(b'\n', &mut header_bytes)
                .map_err(|e| Error::NamedFileIO {
                    file_name: file_name.to_owned(),
                    source: e,
                })?;
            if start == 0 && header_bytes.starts_with(&UTF8_BOM) {
                header_bytes.drain(..UTF8_BOM.len());
            }
            state = scan_quotes(state, &header_bytes[start..]);
            if read == 0 {
                if state == QuoteState::Quoted {
                    return Err(Error::UnterminatedQuote {
                        file_name: file_name.to_owned(),
                    });
                }
                break;
            }
            let only_line_breaks = header_bytes.iter().all(|b| *b == b'\r' || *b == b'\n');
            if state != QuoteState::Quoted && !only_line_breaks {
                break;
            }
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(Cursor::new(header_bytes).chain(input));
        let mut record = csv::ByteRecord::new();
        let has_header = reader
            .read_byte_record(&mut record)
            .map_err(|e| Error::CSVError {
                file_name: file_name.to_owned(),
                source: e,
                line: Some(1),
            })?;
        let header = if has_header {
            let names = record
                .iter()
                .map(|name| std::str::from_utf8(name).map(str::to_owned))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| Error::InvalidHeaderEncoding {
                    file_name: file_name.to_owned(),
                })?;
            CsvHeader::from_names(names)
        } else {
            CsvHeader::default()
        };

        Ok(CsvFile {
            file_name: file_name.to_owned(),
            header: Arc::new(header),
            reader,
            record,
            options,
            done: false,
        })
    }

    pub fn header(&self) -> &Arc<CsvHeader> {
        &self.header
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// True when the input has no header at all (zero bytes or only blank lines)
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    fn current_row(&self) -> Result<CsvRow, Error> {
        let line = self.record.position().map_or(0, |p| p.line());
        let mut cells: Vec<Option<String>> = self
            .record
            .iter()
            .map(|cell| (!cell.is_empty()).then(|| String::from_utf8_lossy(cell).into_owned()))
            .collect();
        if let Some(limit) = self.options.max_chars_per_column {
            if cells.iter().flatten().any(|c| c.chars().count() > limit) {
                return Err(Error::FieldTooLong {
                    file_name: self.file_name.clone(),
                    line,
                    limit,
                });
            }
        }
        // a line holding only spaces and tabs is a blank row
        if cells.len() == 1 && cells[0].as_deref().map_or(true, |c| c.chars().all(is_whitespace)) {
            cells[0] = None;
        }
        Ok(CsvRow::new(line, cells))
    }
}

impl<R: Read> Iterator for CsvFile<R> {
    type Item = Result<CsvRow, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_byte_record(&mut self.record) {
            Ok(true) => Some(self.current_row()),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(Error::CSVError {
                    file_name: self.file_name.clone(),
                    line: e.position().map(|p| p.line()),
                    source: e,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(data: &str) -> CsvFile<&[u8]> {
        CsvFile::new(data.as_bytes(), "stops.txt", CsvOptions::default())
            .expect("header should be parsable")
    }

    fn rows(file: &mut CsvFile<&[u8]>) -> Vec<CsvRow> {
        file.by_ref().map(|r| r.expect("row should be readable")).collect()
    }

    #[test]
    fn empty_input() {
        let mut file = open("");
        assert!(file.is_empty());
        assert_eq!(0, file.header().column_count());
        assert!(rows(&mut file).is_empty());
    }

    #[test]
    fn strips_bom() {
        let mut file = open("\u{feff}stop_id,stop_name\ns1,First stop\n");
        assert_eq!(
            &["stop_id".to_owned(), "stop_name".to_owned()],
            file.header().columns()
        );
        let rows = rows(&mut file);
        assert_eq!(Some("s1"), rows[0].cell(0));
        assert_eq!(2, rows[0].line_number());
    }

    #[test]
    fn short_input_without_bom() {
        let mut file = open("a");
        assert_eq!(Some(0), file.header().column_index("a"));
        assert!(rows(&mut file).is_empty());
    }

    #[test]
    fn header_only() {
        let mut file = open("stop_id,stop_name\n");
        assert!(!file.is_empty());
        assert!(rows(&mut file).is_empty());
    }

    #[test]
    fn reads_cells() {
        let mut file = open("stop_id,stop_name,stop_lat\r\ns1,First stop,3.21\r\ns2,,\r\n");
        let rows = rows(&mut file);
        assert_eq!(2, rows.len());
        assert_eq!(Some("s1"), rows[0].cell(0));
        assert_eq!(Some("3.21"), rows[0].cell(2));
        assert_eq!(None, rows[0].cell(3));
        assert_eq!(None, rows[1].cell(1));
        assert_eq!(3, rows[1].column_count());
    }

    #[test]
    fn quoted_values() {
        let mut file = open(
            "\"stop_id\",stop_desc\ns1,\"a, \"\"quoted\"\" value\"\ns2,\"two\nlines\"\ns3,x\n",
        );
        assert_eq!(Some(0), file.header().column_index("stop_id"));
        let rows = rows(&mut file);
        assert_eq!(Some("a, \"quoted\" value"), rows[0].cell(1));
        assert_eq!(Some("two\nlines"), rows[1].cell(1));
        assert_eq!(3, rows[1].line_number());
        assert_eq!(5, rows[2].line_number());
    }

    #[test]
    fn trailing_blank_line() {
        let mut file = open("stop_id,stop_name\ns1,First stop\n   ");
        let rows = rows(&mut file);
        assert_eq!(2, rows.len());
        assert!(rows[1].is_blank());
        assert_eq!(1, rows[1].column_count());
        assert_eq!(3, rows[1].line_number());
    }

    #[test]
    fn unterminated_quote_in_header() {
        let res = CsvFile::new(
            "stop_id,\"stop_name\ns1,First stop\n".as_bytes(),
            "stops.txt",
            CsvOptions::default(),
        );
        assert!(matches!(res, Err(Error::UnterminatedQuote { .. })));
    }

    #[test]
    fn quoted_header_spanning_lines() {
        let mut file = open("\"stop\nid\",stop_name\ns1,First\n");
        assert_eq!(Some(0), file.header().column_index("stop\nid"));
        let rows = rows(&mut file);
        assert_eq!(1, rows.len());
        assert_eq!(Some("First"), rows[0].cell(1));
        assert_eq!(3, rows[0].line_number());
    }

    #[test]
    fn quote_inside_header_name() {
        let mut file = open("stop_id,stop_name,note\"x\ns1,First,n\n");
        assert_eq!(Some(2), file.header().column_index("note\"x"));
        assert_eq!(1, rows(&mut file).len());

        let file = open("\"stop \"\"id\"\"\",stop_name\n");
        assert_eq!(Some(0), file.header().column_index("stop \"id\""));
    }

    #[test]
    fn unicode_spaces_are_not_blank() {
        let mut file = open("stop_id\n\u{a0}\n \t\n");
        let rows = rows(&mut file);
        assert!(!rows[0].is_blank());
        assert!(rows[1].is_blank());
    }

    #[test]
    fn invalid_utf8() {
        let res = CsvFile::new(
            &b"stop_\xffid\ns1\n"[..],
            "stops.txt",
            CsvOptions::default(),
        );
        assert!(matches!(res, Err(Error::InvalidHeaderEncoding { .. })));

        let mut file = CsvFile::new(&b"stop_id\ns\xff1\n"[..], "stops.txt", CsvOptions::default())
            .expect("header is valid");
        let row = file.next().unwrap().unwrap();
        assert_eq!(Some("s\u{fffd}1"), row.cell(0));
    }

    #[test]
    fn too_long_values() {
        let mut file = CsvFile::new(
            "stop_id\ns1\nstop_number_two\ns3\n".as_bytes(),
            "stops.txt",
            CsvOptions {
                max_chars_per_column: Some(4),
            },
        )
        .unwrap();
        assert!(file.next().unwrap().is_ok());
        assert!(matches!(
            file.next().unwrap(),
            Err(Error::FieldTooLong { line: 3, limit: 4, .. })
        ));
        assert_eq!(Some("s3"), file.next().unwrap().unwrap().cell(0));
        assert!(file.next().is_none());
    }
}
