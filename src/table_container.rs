use crate::csv_header::CsvHeader;
use crate::notice::{Notice, NoticeContainer};
use crate::schema::{EntityBuilder, GtfsEntity, TableSchema};
use crate::types::KeyValue;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of the load of one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    MissingFile,
    EmptyFile,
    UnparsableHeaders,
    /// The only status for which the container can hold entities
    ParsableHeadersAndRows,
}

type Key = Vec<KeyValue>;

/// The entities of one file and their indices
///
/// Indices are built once, when the container is created, and only reference entities
/// whose key columns all have a value.
#[derive(Debug)]
pub struct GtfsTableContainer<E> {
    gtfs_filename: &'static str,
    status: TableStatus,
    header: Arc<CsvHeader>,
    entities: Vec<E>,
    key_column_names: Vec<&'static str>,
    by_primary_key: FxHashMap<Key, usize>,
    indices: FxHashMap<&'static str, FxHashMap<Key, Vec<usize>>>,
    by_translation_key: FxHashMap<(String, String), usize>,
}

fn key_of<E: GtfsEntity>(entity: &E, columns: &[&'static str]) -> Option<Key> {
    columns.iter().map(|c| entity.key_value(c)).collect()
}

impl<E: GtfsEntity> GtfsTableContainer<E> {
    /// An empty container, for files whose rows could not be read
    pub fn for_status<B>(schema: &TableSchema<B>, status: TableStatus) -> Self
    where
        B: EntityBuilder<Entity = E>,
    {
        GtfsTableContainer {
            gtfs_filename: schema.filename(),
            status,
            header: Arc::new(CsvHeader::default()),
            entities: Vec::new(),
            key_column_names: schema.primary_key_columns().to_vec(),
            by_primary_key: FxHashMap::default(),
            indices: FxHashMap::default(),
            by_translation_key: FxHashMap::default(),
        }
    }

    /// Indexes the entities read from a file, reporting duplicated primary keys
    pub fn for_entities<B>(
        schema: &TableSchema<B>,
        header: Arc<CsvHeader>,
        entities: Vec<E>,
        notices: &mut NoticeContainer,
    ) -> Self
    where
        B: EntityBuilder<Entity = E>,
    {
        let mut container = GtfsTableContainer {
            header,
            entities,
            ..Self::for_status(schema, TableStatus::ParsableHeadersAndRows)
        };
        container.index_primary_key(notices);
        for index in schema.indices() {
            let mut by_key: FxHashMap<Key, Vec<usize>> = FxHashMap::default();
            for (position, entity) in container.entities.iter().enumerate() {
                if let Some(key) = key_of(entity, &index.columns) {
                    by_key.entry(key).or_default().push(position);
                }
            }
            container.indices.insert(index.name, by_key);
        }
        if let Some(translation_key) = schema.translation_key_columns() {
            for (position, entity) in container.entities.iter().enumerate() {
                let record_id = match entity.key_value(translation_key.record_id) {
                    Some(id) => id.to_string(),
                    None => continue,
                };
                let record_sub_id = match translation_key.record_sub_id {
                    None => String::new(),
                    Some(column) => match entity.key_value(column) {
                        Some(sub_id) => sub_id.to_string(),
                        None => continue,
                    },
                };
                container
                    .by_translation_key
                    .entry((record_id, record_sub_id))
                    .or_insert(position);
            }
        }
        container
    }

    fn index_primary_key(&mut self, notices: &mut NoticeContainer) {
        if self.key_column_names.is_empty() {
            return;
        }
        for (position, entity) in self.entities.iter().enumerate() {
            let key = match key_of(entity, &self.key_column_names) {
                Some(key) => key,
                None => continue,
            };
            if let Some(&first) = self.by_primary_key.get(&key) {
                notices.add_validation_notice(Notice::DuplicateKey {
                    filename: self.gtfs_filename.to_owned(),
                    old_csv_row_number: self.entities[first].csv_row_number(),
                    new_csv_row_number: entity.csv_row_number(),
                    field_names: self.key_column_names.iter().map(|c| c.to_string()).collect(),
                    field_values: key.iter().map(ToString::to_string).collect(),
                });
            } else {
                self.by_primary_key.insert(key, position);
            }
        }
    }

    /// Entities in the order of the rows
    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn gtfs_filename(&self) -> &'static str {
        self.gtfs_filename
    }

    /// Columns of the primary key
    pub fn key_column_names(&self) -> &[&'static str] {
        &self.key_column_names
    }

    pub fn table_status(&self) -> TableStatus {
        self.status
    }

    /// Header of the file, empty unless the headers could be parsed
    pub fn header(&self) -> &CsvHeader {
        &self.header
    }

    pub fn by_primary_key(&self, key: &[KeyValue]) -> Option<&E> {
        self.by_primary_key
            .get(key)
            .map(|&position| &self.entities[position])
    }

    /// Lookup for tables whose primary key is a single text column
    pub fn by_id(&self, id: &str) -> Option<&E> {
        self.by_primary_key(&[KeyValue::from(id)])
    }

    /// Entities of a secondary index sharing the key, in the order of the rows
    pub fn by_index(&self, name: &str, key: &[KeyValue]) -> Vec<&E> {
        self.indices
            .get(name)
            .and_then(|index| index.get(key))
            .map(|positions| positions.iter().map(|&p| &self.entities[p]).collect())
            .unwrap_or_default()
    }

    /// `record_sub_id` is `""` for tables translated by a single column
    pub fn by_translation_key(&self, record_id: &str, record_sub_id: &str) -> Option<&E> {
        self.by_translation_key
            .get(&(record_id.to_owned(), record_sub_id.to_owned()))
            .map(|&position| &self.entities[position])
    }

    pub fn is_missing_file(&self) -> bool {
        self.status == TableStatus::MissingFile
    }

    pub fn is_parsed_successfully(&self) -> bool {
        self.status == TableStatus::ParsableHeadersAndRows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{CalendarDate, StopTime};
    use crate::tables::{calendar_dates_schema, stop_times_schema};
    use chrono::NaiveDate;

    fn stop_time(line: u64, trip_id: &str, stop_sequence: Option<i32>, stop_id: &str) -> StopTime {
        StopTime {
            csv_row_number: line,
            trip_id: Some(Arc::from(trip_id)),
            stop_sequence,
            stop_id: Some(Arc::from(stop_id)),
            ..Default::default()
        }
    }

    #[test]
    fn composite_keys() {
        let mut notices = NoticeContainer::default();
        let container = GtfsTableContainer::for_entities(
            &stop_times_schema(),
            Arc::new(CsvHeader::from_names(["trip_id", "stop_sequence", "stop_id"])),
            vec![
                stop_time(2, "t1", Some(1), "s1"),
                stop_time(3, "t1", Some(2), "s2"),
                stop_time(4, "t1", Some(1), "s3"),
                stop_time(5, "t2", None, "s1"),
            ],
            &mut notices,
        );
        assert_eq!(4, container.entity_count());
        let first = container
            .by_primary_key(&[KeyValue::from("t1"), KeyValue::from(1)])
            .unwrap();
        assert_eq!(2, first.csv_row_number);
        assert_eq!(1, notices.count_by_code("duplicate_key"));
        match &notices.validation_notices()[0] {
            Notice::DuplicateKey {
                old_csv_row_number,
                new_csv_row_number,
                field_names,
                field_values,
                ..
            } => {
                assert_eq!(2, *old_csv_row_number);
                assert_eq!(4, *new_csv_row_number);
                assert_eq!(&["trip_id", "stop_sequence"], field_names.as_slice());
                assert_eq!(&["t1", "1"], field_values.as_slice());
            }
            n => panic!("unexpected notice {:?}", n),
        }

        let at_s1 = container.by_index("stop_id", &[KeyValue::from("s1")]);
        assert_eq!(
            vec![2, 5],
            at_s1.iter().map(|s| s.csv_row_number).collect::<Vec<_>>()
        );
        assert!(container.by_index("stop_id", &[KeyValue::from("s9")]).is_empty());
        assert!(container.by_index("route_id", &[KeyValue::from("s1")]).is_empty());

        assert_eq!(3, container.by_translation_key("t1", "2").unwrap().csv_row_number);
        assert!(container.by_translation_key("t2", "").is_none());
    }

    #[test]
    fn date_keys() {
        let mut notices = NoticeContainer::default();
        let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let container = GtfsTableContainer::for_entities(
            &calendar_dates_schema(),
            Arc::new(CsvHeader::from_names(["service_id", "date", "exception_type"])),
            vec![CalendarDate {
                csv_row_number: 2,
                service_id: Some(Arc::from("weekdays")),
                date: Some(date),
                exception_type: None,
            }],
            &mut notices,
        );
        assert!(container
            .by_primary_key(&[KeyValue::from("weekdays"), KeyValue::from(date)])
            .is_some());
        assert!(container.by_id("weekdays").is_none());
        assert!(notices.is_empty());
    }

    #[test]
    fn empty_container() {
        let container: GtfsTableContainer<StopTime> =
            GtfsTableContainer::for_status(&stop_times_schema(), TableStatus::MissingFile);
        assert!(container.is_missing_file());
        assert!(!container.is_parsed_successfully());
        assert_eq!("stop_times.txt", container.gtfs_filename());
        assert_eq!(&["trip_id", "stop_sequence"], container.key_column_names());
        assert_eq!(0, container.header().column_count());
    }
}
