/*! Loading and validation of the tables of a [General Transit Feed Specification](https://gtfs.org/) (GTFS) feed.

A GTFS feed is a collection of CSV files. Each file holds the objects of one type (stops, routes, trips…)
and objects reference each other through identifiers.

This crate reads one file at a time into a [GtfsTableContainer]: typed entities in row order, indexed by
their keys. Every deviation from the reference is reported as a [Notice] rather than as an error, so that
a feed with mistakes can still be inspected. To read a whole feed, see [GtfsFeedReader].

## Design decisions

### Schemas are data

Each file is described by a [TableSchema]: its columns, a loading function per column and the keys to
index. The same generic [load_table] reads every file. The schemas of the usual files are in [tables].

### Values are never lost silently

A value that cannot be parsed becomes `None` and produces a notice. A row whose parsing produced an error
notice is dropped; warnings keep the row. Unknown codes of enumerations are kept, like [LocationType::Unknown].

### Shared text

Identifiers repeated on many rows (a `trip_id` in `stop_times.txt`) are interned during the load and shared
as `Arc<str>`.

There are two references <https://gtfs.org/reference/static> and <https://developers.google.com/transit/gtfs/reference>.
They are mostly the same, even if google’s specification has some extensions.
*/

#[macro_use]
extern crate derivative;

mod csv_file;
mod csv_header;
mod csv_row;
mod enums;
pub mod error;
mod field_validator;
mod gtfs_reader;
mod notice;
pub(crate) mod objects;
mod raw_gtfs;
mod row_parser;
mod schema;
mod serde_helpers;
mod table_container;
mod table_loader;
pub mod tables;
mod types;
mod value_cache;


pub use csv_file::{CsvFile, CsvOptions};
pub use csv_header::CsvHeader;
pub use csv_row::CsvRow;
pub use enums::GtfsEnum;
pub use error::Error;
pub use field_validator::{DefaultFieldValidator, FieldValidator};
pub use gtfs_reader::GtfsFeedReader;
pub use notice::{Notice, NoticeContainer, SeverityLevel};
pub use objects::*;
pub use raw_gtfs::GtfsFeed;
pub use row_parser::RowParser;
pub use schema::{
    ColumnDescriptor, EntityBuilder, FieldLevel, FieldLoader, GtfsEntity, IndexDescriptor,
    NumberBounds, TableSchema, TranslationKey,
};
pub use table_container::{GtfsTableContainer, TableStatus};
pub use table_loader::load_table;
pub use types::{GtfsTime, KeyValue};
pub use value_cache::ValueCache;
