use crate::notice::NoticeContainer;
use crate::objects::*;
use crate::schema::GtfsEntity;
use crate::table_container::{GtfsTableContainer, TableStatus};
use crate::tables::*;
use log::info;

/// The tables of a feed, as read by [crate::GtfsFeedReader]
///
/// Nothing is checked across tables: a trip can reference a route that does not exist.
#[derive(Debug)]
pub struct GtfsFeed {
    /// Time needed to load the feed in milliseconds
    pub read_duration: i64,
    /// All Agencies
    pub agencies: GtfsTableContainer<Agency>,
    /// All Stops
    pub stops: GtfsTableContainer<Stop>,
    /// All Routes
    pub routes: GtfsTableContainer<Route>,
    /// All Trips
    pub trips: GtfsTableContainer<Trip>,
    /// All StopTimes, missing when the reader was told to skip them
    pub stop_times: GtfsTableContainer<StopTime>,
    pub calendar: GtfsTableContainer<Calendar>,
    pub calendar_dates: GtfsTableContainer<CalendarDate>,
    pub fare_attributes: GtfsTableContainer<FareAttribute>,
    pub feed_info: GtfsTableContainer<FeedInfo>,
    /// False when the reader was told to skip `stop_times.txt`
    pub stop_times_read: bool,
    /// Notices of every file, in the order the files are listed in [crate::tables::KNOWN_FILES]
    pub notices: NoticeContainer,
    /// All files that are present in the feed, sorted
    pub files: Vec<String>,
}

impl GtfsFeed {
    /// Logs some basic statistics about the feed (numbers of elements for each table). Mostly to be sure that everything was read
    pub fn log_stats(&self) {
        info!("GTFS data:");
        info!("  Read in {} ms", self.read_duration);
        info!("  Agencies: {}", file_summary(&self.agencies));
        info!("  Stops: {}", file_summary(&self.stops));
        info!("  Routes: {}", file_summary(&self.routes));
        info!("  Trips: {}", file_summary(&self.trips));
        info!("  Stop times: {}", file_summary(&self.stop_times));
        info!("  Calendar: {}", file_summary(&self.calendar));
        info!("  Calendar dates: {}", file_summary(&self.calendar_dates));
        info!("  Fares: {}", file_summary(&self.fare_attributes));
        info!("  Feed info: {}", file_summary(&self.feed_info));
        info!("  Notices: {}", self.notices.len());
    }

    /// True when every required file could be read
    ///
    /// `stop_times.txt` is not considered when the reader skipped it.
    pub fn has_required_files(&self) -> bool {
        [
            (agency_schema().is_required(), self.agencies.table_status()),
            (stops_schema().is_required(), self.stops.table_status()),
            (routes_schema().is_required(), self.routes.table_status()),
            (trips_schema().is_required(), self.trips.table_status()),
            (
                self.stop_times_read && stop_times_schema().is_required(),
                self.stop_times.table_status(),
            ),
            (calendar_schema().is_required(), self.calendar.table_status()),
            (calendar_dates_schema().is_required(), self.calendar_dates.table_status()),
            (fare_attributes_schema().is_required(), self.fare_attributes.table_status()),
            (feed_info_schema().is_required(), self.feed_info.table_status()),
        ]
        .iter()
        .all(|(required, status)| !required || *status == TableStatus::ParsableHeadersAndRows)
    }
}

fn file_summary<E: GtfsEntity>(table: &GtfsTableContainer<E>) -> String {
    match table.table_status() {
        TableStatus::ParsableHeadersAndRows => format!("{} objects", table.entity_count()),
        TableStatus::MissingFile => "File not present".to_string(),
        status => format!("Could not read: {:?}", status),
    }
}
