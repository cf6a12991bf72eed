use chrono::Utc;
use log::info;

use crate::field_validator::{DefaultFieldValidator, FieldValidator};
use crate::notice::{Notice, NoticeContainer};
use crate::schema::{EntityBuilder, TableSchema};
use crate::table_container::{GtfsTableContainer, TableStatus};
use crate::table_loader::load_table;
use crate::tables::*;
use crate::GtfsFeed;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::ScopedJoinHandle;

/// Allows to parameterize how the feed is loaded
///
/// The feed is given as its files, mapped by name. Reading them from a directory, an
/// archive or the network is up to the caller.
///
/// ```
/// use std::collections::HashMap;
///
/// let mut files = HashMap::new();
/// files.insert("stops.txt".to_owned(), b"stop_id,stop_name\ns1,First stop\n".to_vec());
/// let feed = gtfs_tables::GtfsFeedReader::default()
///     .read_stop_times(false) // Won’t read the stop times to save time and memory
///     .parallel(false)
///     .read_from_files(&files);
/// assert_eq!(1, feed.stops.entity_count());
/// assert!(feed.stop_times.is_missing_file());
/// ```
#[derive(Derivative)]
#[derivative(Default)]
pub struct GtfsFeedReader {
    /// [crate::objects::StopTime] are very large and not always needed. This allows to skip reading them
    #[derivative(Default(value = "true"))]
    pub read_stop_times: bool,
    /// Load every file on its own thread
    #[derivative(Default(value = "true"))]
    pub parallel: bool,
    /// Notices kept for each code, per file; the others are only counted
    #[derivative(Default(value = "100_000"))]
    pub max_notices_per_code: usize,
    /// Values longer than this are reported and their row is skipped
    pub max_chars_per_column: Option<usize>,
    #[derivative(Default(value = "Arc::new(DefaultFieldValidator)"))]
    validator: Arc<dyn FieldValidator>,
}

fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

type Loaded<E> = (GtfsTableContainer<E>, NoticeContainer);

impl GtfsFeedReader {
    /// Configures the reader to read or not the stop times (default: true)
    ///
    /// This can be useful to save time and memory with large datasets when the timetable are not needed
    /// Returns Self and can be chained
    pub fn read_stop_times(mut self, read_stop_times: bool) -> Self {
        self.read_stop_times = read_stop_times;
        self
    }

    /// Should the files be loaded concurrently (default: true)
    ///
    /// Notices are merged in the same order either way
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn max_notices_per_code(mut self, max_notices_per_code: usize) -> Self {
        self.max_notices_per_code = max_notices_per_code;
        self
    }

    pub fn max_chars_per_column(mut self, max_chars_per_column: Option<usize>) -> Self {
        self.max_chars_per_column = max_chars_per_column;
        self
    }

    /// Replaces the rules checking urls, emails, phone numbers and identifiers
    pub fn with_validator(mut self, validator: Arc<dyn FieldValidator>) -> Self {
        self.validator = validator;
        self
    }

    fn load<B>(&self, schema: TableSchema<B>, files: &HashMap<String, Vec<u8>>) -> Loaded<B::Entity>
    where
        B: EntityBuilder,
    {
        let schema = schema.with_max_chars_per_column(self.max_chars_per_column);
        let mut notices = NoticeContainer::with_max_notices_per_code(self.max_notices_per_code);
        let input = files.get(schema.filename()).map(Vec::as_slice);
        let container = load_table(&schema, input, self.validator.as_ref(), &mut notices);
        (container, notices)
    }

    fn load_stop_times(
        &self,
        files: &HashMap<String, Vec<u8>>,
    ) -> Loaded<crate::objects::StopTime> {
        if self.read_stop_times {
            self.load(stop_times_schema(), files)
        } else {
            (
                GtfsTableContainer::for_status(&stop_times_schema(), TableStatus::MissingFile),
                NoticeContainer::with_max_notices_per_code(self.max_notices_per_code),
            )
        }
    }

    /// Loads every known file of the feed
    pub fn read_from_files(&self, files: &HashMap<String, Vec<u8>>) -> GtfsFeed {
        let now = Utc::now();
        let mut notices = NoticeContainer::with_max_notices_per_code(self.max_notices_per_code);
        let mut file_names: Vec<String> = files.keys().cloned().collect();
        file_names.sort();
        for name in &file_names {
            if !KNOWN_FILES.contains(&name.as_str()) {
                notices.add_validation_notice(Notice::UnknownFile {
                    filename: name.clone(),
                });
            }
        }

        let (agencies, stops, routes, trips, stop_times, calendar, calendar_dates, fares, feed_info) =
            if self.parallel {
                std::thread::scope(|s| {
                    let agencies = s.spawn(|| self.load(agency_schema(), files));
                    let stops = s.spawn(|| self.load(stops_schema(), files));
                    let routes = s.spawn(|| self.load(routes_schema(), files));
                    let trips = s.spawn(|| self.load(trips_schema(), files));
                    let stop_times = s.spawn(|| self.load_stop_times(files));
                    let calendar = s.spawn(|| self.load(calendar_schema(), files));
                    let calendar_dates = s.spawn(|| self.load(calendar_dates_schema(), files));
                    let fares = s.spawn(|| self.load(fare_attributes_schema(), files));
                    let feed_info = s.spawn(|| self.load(feed_info_schema(), files));
                    (
                        join(agencies),
                        join(stops),
                        join(routes),
                        join(trips),
                        join(stop_times),
                        join(calendar),
                        join(calendar_dates),
                        join(fares),
                        join(feed_info),
                    )
                })
            } else {
                (
                    self.load(agency_schema(), files),
                    self.load(stops_schema(), files),
                    self.load(routes_schema(), files),
                    self.load(trips_schema(), files),
                    self.load_stop_times(files),
                    self.load(calendar_schema(), files),
                    self.load(calendar_dates_schema(), files),
                    self.load(fare_attributes_schema(), files),
                    self.load(feed_info_schema(), files),
                )
            };

        // same order as KNOWN_FILES, whatever the order the threads finished in
        for table_notices in [
            agencies.1,
            stops.1,
            routes.1,
            trips.1,
            stop_times.1,
            calendar.1,
            calendar_dates.1,
            fares.1,
            feed_info.1,
        ] {
            notices.add_all(table_notices);
        }

        let feed = GtfsFeed {
            read_duration: Utc::now().signed_duration_since(now).num_milliseconds(),
            agencies: agencies.0,
            stops: stops.0,
            routes: routes.0,
            trips: trips.0,
            stop_times: stop_times.0,
            calendar: calendar.0,
            calendar_dates: calendar_dates.0,
            fare_attributes: fares.0,
            feed_info: feed_info.0,
            stop_times_read: self.read_stop_times,
            notices,
            files: file_names,
        };
        info!(
            "feed of {} files read in {} ms: {} notices",
            feed.files.len(),
            feed.read_duration,
            feed.notices.len()
        );
        feed
    }
}
