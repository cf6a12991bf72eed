//! Schemas of the files read by [crate::GtfsFeedReader]
//!
//! Every schema is plain data: column descriptors, one loader per column and the keys to
//! index. Field levels follow <https://gtfs.org/reference/static>; conditionally required
//! fields are declared optional.
use crate::objects::*;
use crate::schema::{ColumnDescriptor as Column, NumberBounds, TableSchema};

pub const AGENCY_FILE: &str = "agency.txt";
pub const STOPS_FILE: &str = "stops.txt";
pub const ROUTES_FILE: &str = "routes.txt";
pub const TRIPS_FILE: &str = "trips.txt";
pub const STOP_TIMES_FILE: &str = "stop_times.txt";
pub const CALENDAR_FILE: &str = "calendar.txt";
pub const CALENDAR_DATES_FILE: &str = "calendar_dates.txt";
pub const FARE_ATTRIBUTES_FILE: &str = "fare_attributes.txt";
pub const FEED_INFO_FILE: &str = "feed_info.txt";

/// Every file with a schema, in loading order
pub const KNOWN_FILES: &[&str] = &[
    AGENCY_FILE,
    STOPS_FILE,
    ROUTES_FILE,
    TRIPS_FILE,
    STOP_TIMES_FILE,
    CALENDAR_FILE,
    CALENDAR_DATES_FILE,
    FARE_ATTRIBUTES_FILE,
    FEED_INFO_FILE,
];

pub fn agency_schema() -> TableSchema<Agency> {
    TableSchema::<Agency>::new(AGENCY_FILE)
        .required_file()
        .field(Column::optional("agency_id").cached(), |p, i, c, cache, e| {
            e.agency_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::required("agency_name").mixed_case(), |p, i, c, cache, e| {
            e.agency_name = cache.intern_text(c, p.as_text(i, c))
        })
        .field(Column::required("agency_url"), |p, i, c, cache, e| {
            e.agency_url = cache.intern_text(c, p.as_url(i, c))
        })
        .field(Column::required("agency_timezone"), |p, i, c, _, e| {
            e.agency_timezone = p.as_timezone(i, c)
        })
        .field(Column::optional("agency_lang").cached(), |p, i, c, cache, e| {
            e.agency_lang = cache.intern_text(c, p.as_language_code(i, c))
        })
        .field(Column::optional("agency_phone"), |p, i, c, cache, e| {
            e.agency_phone = cache.intern_text(c, p.as_phone_number(i, c))
        })
        .field(Column::optional("agency_fare_url"), |p, i, c, cache, e| {
            e.agency_fare_url = cache.intern_text(c, p.as_url(i, c))
        })
        .field(Column::optional("agency_email"), |p, i, c, cache, e| {
            e.agency_email = cache.intern_text(c, p.as_email(i, c))
        })
        .primary_key(&["agency_id"])
        .translation_key("agency_id", None)
}

pub fn stops_schema() -> TableSchema<Stop> {
    TableSchema::<Stop>::new(STOPS_FILE)
        .required_file()
        .field(Column::required("stop_id").cached(), |p, i, c, cache, e| {
            e.stop_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::optional("stop_code"), |p, i, c, cache, e| {
            e.stop_code = cache.intern_text(c, p.as_text(i, c))
        })
        .field(Column::optional("stop_name").mixed_case(), |p, i, c, cache, e| {
            e.stop_name = cache.intern_text(c, p.as_text(i, c))
        })
        .field(Column::optional("tts_stop_name"), |p, i, c, cache, e| {
            e.tts_stop_name = cache.intern_text(c, p.as_text(i, c))
        })
        .field(Column::optional("stop_desc"), |p, i, c, cache, e| {
            e.stop_desc = cache.intern_text(c, p.as_text(i, c))
        })
        .field(Column::optional("stop_lat"), |p, i, c, _, e| {
            e.stop_lat = p.as_latitude(i, c)
        })
        .field(Column::optional("stop_lon"), |p, i, c, _, e| {
            e.stop_lon = p.as_longitude(i, c)
        })
        .field(Column::optional("zone_id").cached(), |p, i, c, cache, e| {
            e.zone_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::optional("stop_url"), |p, i, c, cache, e| {
            e.stop_url = cache.intern_text(c, p.as_url(i, c))
        })
        .field(Column::optional("location_type"), |p, i, c, _, e| {
            e.location_type = p.as_enum(i, c)
        })
        .field(Column::optional("parent_station").cached(), |p, i, c, cache, e| {
            e.parent_station = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::optional("stop_timezone"), |p, i, c, _, e| {
            e.stop_timezone = p.as_timezone(i, c)
        })
        .field(Column::optional("wheelchair_boarding"), |p, i, c, _, e| {
            e.wheelchair_boarding = p.as_enum(i, c)
        })
        .field(Column::optional("level_id").cached(), |p, i, c, cache, e| {
            e.level_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::optional("platform_code"), |p, i, c, cache, e| {
            e.platform_code = cache.intern_text(c, p.as_text(i, c))
        })
        .primary_key(&["stop_id"])
        .index("zone_id", &["zone_id"])
        .index("parent_station", &["parent_station"])
        .translation_key("stop_id", None)
}

pub fn routes_schema() -> TableSchema<Route> {
    TableSchema::<Route>::new(ROUTES_FILE)
        .required_file()
        .field(Column::required("route_id").cached(), |p, i, c, cache, e| {
            e.route_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::optional("agency_id").cached(), |p, i, c, cache, e| {
            e.agency_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::optional("route_short_name"), |p, i, c, cache, e| {
            e.route_short_name = cache.intern_text(c, p.as_text(i, c))
        })
        .field(
            Column::optional("route_long_name").mixed_case(),
            |p, i, c, cache, e| e.route_long_name = cache.intern_text(c, p.as_text(i, c)),
        )
        .field(Column::optional("route_desc"), |p, i, c, cache, e| {
            e.route_desc = cache.intern_text(c, p.as_text(i, c))
        })
        .field(Column::required("route_type"), |p, i, c, _, e| {
            e.route_type = p.as_enum(i, c)
        })
        .field(Column::optional("route_url"), |p, i, c, cache, e| {
            e.route_url = cache.intern_text(c, p.as_url(i, c))
        })
        .field(Column::optional("route_color"), |p, i, c, _, e| {
            e.route_color = p.as_color(i, c)
        })
        .field(Column::optional("route_text_color"), |p, i, c, _, e| {
            e.route_text_color = p.as_color(i, c)
        })
        .field(
            Column::optional("route_sort_order").bounds(NumberBounds::NonNegative),
            |p, i, c, _, e| e.route_sort_order = p.as_integer(i, c),
        )
        .field(Column::optional("continuous_pickup"), |p, i, c, _, e| {
            e.continuous_pickup = p.as_enum(i, c)
        })
        .field(Column::optional("continuous_drop_off"), |p, i, c, _, e| {
            e.continuous_drop_off = p.as_enum(i, c)
        })
        .primary_key(&["route_id"])
        .index("agency_id", &["agency_id"])
        .translation_key("route_id", None)
}

pub fn trips_schema() -> TableSchema<Trip> {
    TableSchema::<Trip>::new(TRIPS_FILE)
        .required_file()
        .field(Column::required("route_id").cached(), |p, i, c, cache, e| {
            e.route_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::required("service_id").cached(), |p, i, c, cache, e| {
            e.service_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::required("trip_id"), |p, i, c, cache, e| {
            e.trip_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(
            Column::optional("trip_headsign").cached().mixed_case(),
            |p, i, c, cache, e| e.trip_headsign = cache.intern_text(c, p.as_text(i, c)),
        )
        .field(Column::optional("trip_short_name"), |p, i, c, cache, e| {
            e.trip_short_name = cache.intern_text(c, p.as_text(i, c))
        })
        .field(Column::optional("direction_id"), |p, i, c, _, e| {
            e.direction_id = p.as_enum(i, c)
        })
        .field(Column::optional("block_id").cached(), |p, i, c, cache, e| {
            e.block_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::optional("shape_id").cached(), |p, i, c, cache, e| {
            e.shape_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::optional("wheelchair_accessible"), |p, i, c, _, e| {
            e.wheelchair_accessible = p.as_enum(i, c)
        })
        .field(Column::optional("bikes_allowed"), |p, i, c, _, e| {
            e.bikes_allowed = p.as_enum(i, c)
        })
        .primary_key(&["trip_id"])
        .index("route_id", &["route_id"])
        .index("shape_id", &["shape_id"])
        .translation_key("trip_id", None)
}

pub fn stop_times_schema() -> TableSchema<StopTime> {
    TableSchema::<StopTime>::new(STOP_TIMES_FILE)
        .required_file()
        .field(Column::required("trip_id").cached(), |p, i, c, cache, e| {
            e.trip_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::optional("arrival_time"), |p, i, c, _, e| {
            e.arrival_time = p.as_time(i, c)
        })
        .field(Column::optional("departure_time"), |p, i, c, _, e| {
            e.departure_time = p.as_time(i, c)
        })
        .field(Column::required("stop_id").cached(), |p, i, c, cache, e| {
            e.stop_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(
            Column::required("stop_sequence").bounds(NumberBounds::NonNegative),
            |p, i, c, _, e| e.stop_sequence = p.as_integer(i, c),
        )
        .field(Column::optional("stop_headsign").cached(), |p, i, c, cache, e| {
            e.stop_headsign = cache.intern_text(c, p.as_text(i, c))
        })
        .field(Column::optional("pickup_type"), |p, i, c, _, e| {
            e.pickup_type = p.as_enum(i, c)
        })
        .field(Column::optional("drop_off_type"), |p, i, c, _, e| {
            e.drop_off_type = p.as_enum(i, c)
        })
        .field(Column::optional("continuous_pickup"), |p, i, c, _, e| {
            e.continuous_pickup = p.as_enum(i, c)
        })
        .field(Column::optional("continuous_drop_off"), |p, i, c, _, e| {
            e.continuous_drop_off = p.as_enum(i, c)
        })
        .field(
            Column::optional("shape_dist_traveled").bounds(NumberBounds::NonNegative),
            |p, i, c, _, e| e.shape_dist_traveled = p.as_float(i, c),
        )
        .field(Column::optional("timepoint"), |p, i, c, _, e| {
            e.timepoint = p.as_enum(i, c)
        })
        .primary_key(&["trip_id", "stop_sequence"])
        .index("stop_id", &["stop_id"])
        .translation_key("trip_id", Some("stop_sequence"))
}

pub fn calendar_schema() -> TableSchema<Calendar> {
    TableSchema::<Calendar>::new(CALENDAR_FILE)
        .field(Column::required("service_id").cached(), |p, i, c, cache, e| {
            e.service_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::required("monday"), |p, i, c, _, e| {
            e.monday = p.as_enum(i, c)
        })
        .field(Column::required("tuesday"), |p, i, c, _, e| {
            e.tuesday = p.as_enum(i, c)
        })
        .field(Column::required("wednesday"), |p, i, c, _, e| {
            e.wednesday = p.as_enum(i, c)
        })
        .field(Column::required("thursday"), |p, i, c, _, e| {
            e.thursday = p.as_enum(i, c)
        })
        .field(Column::required("friday"), |p, i, c, _, e| {
            e.friday = p.as_enum(i, c)
        })
        .field(Column::required("saturday"), |p, i, c, _, e| {
            e.saturday = p.as_enum(i, c)
        })
        .field(Column::required("sunday"), |p, i, c, _, e| {
            e.sunday = p.as_enum(i, c)
        })
        .field(Column::required("start_date"), |p, i, c, _, e| {
            e.start_date = p.as_date(i, c)
        })
        .field(Column::required("end_date"), |p, i, c, _, e| {
            e.end_date = p.as_date(i, c)
        })
        .primary_key(&["service_id"])
}

pub fn calendar_dates_schema() -> TableSchema<CalendarDate> {
    TableSchema::<CalendarDate>::new(CALENDAR_DATES_FILE)
        .field(Column::required("service_id").cached(), |p, i, c, cache, e| {
            e.service_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(Column::required("date"), |p, i, c, _, e| {
            e.date = p.as_date(i, c)
        })
        .field(Column::required("exception_type"), |p, i, c, _, e| {
            e.exception_type = p.as_enum(i, c)
        })
        .primary_key(&["service_id", "date"])
        .index("service_id", &["service_id"])
}

pub fn fare_attributes_schema() -> TableSchema<FareAttribute> {
    TableSchema::<FareAttribute>::new(FARE_ATTRIBUTES_FILE)
        .field(Column::required("fare_id"), |p, i, c, cache, e| {
            e.fare_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(
            Column::required("price").bounds(NumberBounds::NonNegative),
            |p, i, c, _, e| e.price = p.as_decimal(i, c),
        )
        .field(Column::required("currency_type").cached(), |p, i, c, cache, e| {
            e.currency_type = cache.intern_text(c, p.as_currency_code(i, c))
        })
        .field(Column::required("payment_method"), |p, i, c, _, e| {
            e.payment_method = p.as_enum(i, c)
        })
        // an empty value means unlimited transfers
        .field(
            Column::optional("transfers").header_required(),
            |p, i, c, _, e| e.transfers = p.as_enum(i, c),
        )
        .field(Column::optional("agency_id").cached(), |p, i, c, cache, e| {
            e.agency_id = cache.intern_text(c, p.as_id(i, c))
        })
        .field(
            Column::optional("transfer_duration").bounds(NumberBounds::NonNegative),
            |p, i, c, _, e| e.transfer_duration = p.as_integer(i, c),
        )
        .primary_key(&["fare_id"])
}

pub fn feed_info_schema() -> TableSchema<FeedInfo> {
    TableSchema::<FeedInfo>::new(FEED_INFO_FILE)
        .recommended_file()
        .field(
            Column::required("feed_publisher_name").mixed_case(),
            |p, i, c, cache, e| e.feed_publisher_name = cache.intern_text(c, p.as_text(i, c)),
        )
        .field(Column::required("feed_publisher_url"), |p, i, c, cache, e| {
            e.feed_publisher_url = cache.intern_text(c, p.as_url(i, c))
        })
        .field(Column::required("feed_lang"), |p, i, c, cache, e| {
            e.feed_lang = cache.intern_text(c, p.as_language_code(i, c))
        })
        .field(Column::optional("default_lang"), |p, i, c, cache, e| {
            e.default_lang = cache.intern_text(c, p.as_language_code(i, c))
        })
        .field(Column::recommended("feed_start_date"), |p, i, c, _, e| {
            e.feed_start_date = p.as_date(i, c)
        })
        .field(Column::recommended("feed_end_date"), |p, i, c, _, e| {
            e.feed_end_date = p.as_date(i, c)
        })
        .field(Column::recommended("feed_version"), |p, i, c, cache, e| {
            e.feed_version = cache.intern_text(c, p.as_text(i, c))
        })
        .field(Column::optional("feed_contact_email"), |p, i, c, cache, e| {
            e.feed_contact_email = cache.intern_text(c, p.as_email(i, c))
        })
        .field(Column::optional("feed_contact_url"), |p, i, c, cache, e| {
            e.feed_contact_url = cache.intern_text(c, p.as_url(i, c))
        })
}
