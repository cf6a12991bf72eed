pub use crate::enums::*;
use crate::schema::{EntityBuilder, GtfsEntity};
use crate::serde_helpers::*;
use crate::types::{GtfsTime, KeyValue};
use chrono::NaiveDate;
use chrono_tz::Tz;
use rgb::RGB8;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

// Entities are their own builders: loaders fill the fields of a default value, and
// `build` hands it over and leaves a fresh one behind.
macro_rules! entity_builder {
    ($($t:ty),*) => {
        $(
            impl EntityBuilder for $t {
                type Entity = $t;

                fn set_csv_row_number(&mut self, csv_row_number: u64) {
                    self.csv_row_number = csv_row_number;
                }

                fn build(&mut self) -> $t {
                    std::mem::take(self)
                }
            }
        )*
    };
}

entity_builder!(
    Agency,
    Stop,
    Route,
    Trip,
    StopTime,
    Calendar,
    CalendarDate,
    FareAttribute,
    FeedInfo
);

fn text_key(value: &Option<Arc<str>>) -> Option<KeyValue> {
    value.clone().map(KeyValue::Text)
}

/// General informations about the agency running the network. See <https://gtfs.org/reference/static/#agencytxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct Agency {
    #[serde(skip)]
    pub csv_row_number: u64,
    /// Unique technical (not for the traveller) identifier for the Agency
    pub agency_id: Option<Arc<str>>,
    ///Full name of the transit agency
    pub agency_name: Option<Arc<str>>,
    /// URL of the transit agency
    pub agency_url: Option<Arc<str>>,
    /// Timezone where the transit agency is located
    #[serde(serialize_with = "serialize_option_display")]
    pub agency_timezone: Option<Tz>,
    /// Primary language used by this transit agency
    pub agency_lang: Option<Arc<str>>,
    /// A voice telephone number for the specified agency
    pub agency_phone: Option<Arc<str>>,
    /// URL of a web page that allows a rider to purchase tickets or other fare instruments for that agency online
    pub agency_fare_url: Option<Arc<str>>,
    /// Email address actively monitored by the agency’s customer service department
    pub agency_email: Option<Arc<str>>,
}

impl GtfsEntity for Agency {
    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn key_value(&self, column: &str) -> Option<KeyValue> {
        match column {
            "agency_id" => text_key(&self.agency_id),
            _ => None,
        }
    }
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.agency_name.as_deref().unwrap_or_default())
    }
}

/// A physical stop, station or area. See <https://gtfs.org/reference/static/#stopstxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct Stop {
    #[serde(skip)]
    pub csv_row_number: u64,
    /// Unique technical identifier (not for the traveller) of the stop
    pub stop_id: Option<Arc<str>>,
    /// Short text or a number that identifies the location for riders
    pub stop_code: Option<Arc<str>>,
    ///Name of the location. Use a name that people will understand in the local and tourist vernacular
    pub stop_name: Option<Arc<str>>,
    /// Readable version of the name, for text-to-speech systems
    pub tts_stop_name: Option<Arc<str>>,
    /// Description of the location that provides useful, quality information
    pub stop_desc: Option<Arc<str>>,
    /// Latitude of the stop
    pub stop_lat: Option<f64>,
    /// Longitude of the stop
    pub stop_lon: Option<f64>,
    /// Identifies the fare zone for a stop
    pub zone_id: Option<Arc<str>>,
    /// URL of a web page about the location
    pub stop_url: Option<Arc<str>>,
    /// Type of the location
    pub location_type: Option<LocationType>,
    /// Defines hierarchy between the different locations
    pub parent_station: Option<Arc<str>>,
    /// Timezone of the location
    #[serde(serialize_with = "serialize_option_display")]
    pub stop_timezone: Option<Tz>,
    /// Indicates whether wheelchair boardings are possible from the location
    pub wheelchair_boarding: Option<Availability>,
    /// Level of the location. The same level can be used by multiple unlinked stations
    pub level_id: Option<Arc<str>>,
    /// Platform identifier for a platform stop (a stop belonging to a station)
    pub platform_code: Option<Arc<str>>,
}

impl GtfsEntity for Stop {
    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn key_value(&self, column: &str) -> Option<KeyValue> {
        match column {
            "stop_id" => text_key(&self.stop_id),
            "zone_id" => text_key(&self.zone_id),
            "parent_station" => text_key(&self.parent_station),
            _ => None,
        }
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.stop_name.as_deref().unwrap_or_default())
    }
}

/// A route is a commercial line (there can be various stop sequences for a same line). See <https://gtfs.org/reference/static/#routestxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct Route {
    #[serde(skip)]
    pub csv_row_number: u64,
    /// Unique technical (not for the traveller) identifier for the route
    pub route_id: Option<Arc<str>>,
    /// Agency for the specified route
    pub agency_id: Option<Arc<str>>,
    /// Short name of a route. This will often be a short, abstract identifier like "32", "100X", or "Green" that riders use to identify a route, but which doesn't give any indication of what places the route serves
    pub route_short_name: Option<Arc<str>>,
    /// Full name of a route. This name is generally more descriptive than the [Route::route_short_name]] and often includes the route's destination or stop
    pub route_long_name: Option<Arc<str>>,
    /// Description of a route that provides useful, quality information
    pub route_desc: Option<Arc<str>>,
    /// Indicates the type of transportation used on a route
    pub route_type: Option<RouteType>,
    /// URL of a web page about the particular route
    pub route_url: Option<Arc<str>>,
    /// Route color designation that matches public facing material
    #[serde(serialize_with = "serialize_option_color")]
    pub route_color: Option<RGB8>,
    /// Legible color to use for text drawn against a background of [Route::route_color]
    #[serde(serialize_with = "serialize_option_color")]
    pub route_text_color: Option<RGB8>,
    /// Orders the routes in a way which is ideal for presentation to customers. Routes with smaller route_sort_order values should be displayed first.
    pub route_sort_order: Option<i32>,
    /// Indicates whether a rider can board the transit vehicle anywhere along the vehicle’s travel path
    pub continuous_pickup: Option<ContinuousPickupDropOff>,
    /// Indicates whether a rider can alight from the transit vehicle at any point along the vehicle’s travel path
    pub continuous_drop_off: Option<ContinuousPickupDropOff>,
}

impl GtfsEntity for Route {
    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn key_value(&self, column: &str) -> Option<KeyValue> {
        match column {
            "route_id" => text_key(&self.route_id),
            "agency_id" => text_key(&self.agency_id),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.route_long_name, &self.route_short_name) {
            (Some(long_name), _) if !long_name.is_empty() => write!(f, "{}", long_name),
            (_, Some(short_name)) => write!(f, "{}", short_name),
            _ => Ok(()),
        }
    }
}

/// A Trip is a vehicle that follows a sequence of [StopTime] on certain days. See <https://gtfs.org/reference/static/#tripstxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct Trip {
    #[serde(skip)]
    pub csv_row_number: u64,
    /// References along which [Route] this trip runs
    pub route_id: Option<Arc<str>>,
    /// References the [Calendar] on which this trip runs
    pub service_id: Option<Arc<str>>,
    /// Unique technical identifier (not for the traveller) for the Trip
    pub trip_id: Option<Arc<str>>,
    /// Text that appears on signage identifying the trip's destination to riders
    pub trip_headsign: Option<Arc<str>>,
    /// Public facing text used to identify the trip to riders, for instance, to identify train numbers for commuter rail trips
    pub trip_short_name: Option<Arc<str>>,
    /// Indicates the direction of travel for a trip. This field is not used in routing; it provides a way to separate trips by direction when publishing time tables
    pub direction_id: Option<DirectionType>,
    /// Identifies the block to which the trip belongs. A block consists of a single trip or many sequential trips made using the same vehicle
    pub block_id: Option<Arc<str>>,
    /// Shape of the trip
    pub shape_id: Option<Arc<str>>,
    /// Indicates wheelchair accessibility
    pub wheelchair_accessible: Option<Availability>,
    /// Indicates whether bikes are allowed
    pub bikes_allowed: Option<BikesAllowedType>,
}

impl GtfsEntity for Trip {
    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn key_value(&self, column: &str) -> Option<KeyValue> {
        match column {
            "trip_id" => text_key(&self.trip_id),
            "route_id" => text_key(&self.route_id),
            "shape_id" => text_key(&self.shape_id),
            _ => None,
        }
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "route id: {}, service id: {}",
            self.route_id.as_deref().unwrap_or_default(),
            self.service_id.as_deref().unwrap_or_default()
        )
    }
}

/// The moment where a vehicle, running on [Trip] stops at a [Stop]. See <https://gtfs.org/reference/static/#stopstimestxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct StopTime {
    #[serde(skip)]
    pub csv_row_number: u64,
    /// [Trip] to which this stop time belongs to
    pub trip_id: Option<Arc<str>>,
    /// Arrival time of the stop time.
    /// It's an option since the intermediate stops can have have no arrival
    /// and this arrival needs to be interpolated
    pub arrival_time: Option<GtfsTime>,
    /// Departure time of the stop time.
    /// It's an option since the intermediate stops can have have no departure
    /// and this departure needs to be interpolated
    pub departure_time: Option<GtfsTime>,
    /// Identifier of the [Stop] where the vehicle stops
    pub stop_id: Option<Arc<str>>,
    /// Order of stops for a particular trip. The values must increase along the trip but do not need to be consecutive
    pub stop_sequence: Option<i32>,
    /// Text that appears on signage identifying the trip's destination to riders
    pub stop_headsign: Option<Arc<str>>,
    /// Indicates pickup method
    pub pickup_type: Option<PickupDropOffType>,
    /// Indicates drop off method
    pub drop_off_type: Option<PickupDropOffType>,
    /// Indicates whether a rider can board the transit vehicle anywhere along the vehicle’s travel path
    pub continuous_pickup: Option<ContinuousPickupDropOff>,
    /// Indicates whether a rider can alight from the transit vehicle at any point along the vehicle’s travel path
    pub continuous_drop_off: Option<ContinuousPickupDropOff>,
    /// Actual distance traveled along the shape from the first shape point to the point specified in this record
    pub shape_dist_traveled: Option<f64>,
    /// Indicates if arrival and departure times for a stop are strictly adhered to by the vehicle or if they are instead approximate and/or interpolated times
    pub timepoint: Option<TimepointType>,
}

impl GtfsEntity for StopTime {
    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn key_value(&self, column: &str) -> Option<KeyValue> {
        match column {
            "trip_id" => text_key(&self.trip_id),
            "stop_sequence" => self.stop_sequence.map(KeyValue::from),
            "stop_id" => text_key(&self.stop_id),
            _ => None,
        }
    }
}

/// A calender describes on which days the vehicle runs. See <https://gtfs.org/reference/static/#calendartxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct Calendar {
    #[serde(skip)]
    pub csv_row_number: u64,
    /// Unique technical identifier (not for the traveller) of this calendar
    pub service_id: Option<Arc<str>>,
    /// Does the service run on mondays
    pub monday: Option<ServiceAvailability>,
    /// Does the service run on tuesdays
    pub tuesday: Option<ServiceAvailability>,
    /// Does the service run on wednesdays
    pub wednesday: Option<ServiceAvailability>,
    /// Does the service run on thursdays
    pub thursday: Option<ServiceAvailability>,
    /// Does the service run on fridays
    pub friday: Option<ServiceAvailability>,
    /// Does the service run on saturdays
    pub saturday: Option<ServiceAvailability>,
    /// Does the service run on sundays
    pub sunday: Option<ServiceAvailability>,
    /// Start service day for the service interval
    #[serde(serialize_with = "serialize_option_date")]
    pub start_date: Option<NaiveDate>,
    /// End service day for the service interval. This service day is included in the interval
    #[serde(serialize_with = "serialize_option_date")]
    pub end_date: Option<NaiveDate>,
}

impl GtfsEntity for Calendar {
    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn key_value(&self, column: &str) -> Option<KeyValue> {
        match column {
            "service_id" => text_key(&self.service_id),
            _ => None,
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => write!(f, "{}—{}", start, end),
            _ => write!(f, "{}", self.service_id.as_deref().unwrap_or_default()),
        }
    }
}

/// Defines a specific date that can be added or removed from a [Calendar]. See <https://gtfs.org/reference/static/#calendar_datestxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct CalendarDate {
    #[serde(skip)]
    pub csv_row_number: u64,
    /// Identifier of the service that is modified at this date
    pub service_id: Option<Arc<str>>,
    /// Date where the service will be added or deleted
    #[serde(serialize_with = "serialize_option_date")]
    pub date: Option<NaiveDate>,
    /// Is the service added or deleted
    pub exception_type: Option<Exception>,
}

impl GtfsEntity for CalendarDate {
    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn key_value(&self, column: &str) -> Option<KeyValue> {
        match column {
            "service_id" => text_key(&self.service_id),
            "date" => self.date.map(KeyValue::Date),
            _ => None,
        }
    }
}

/// Defines one possible fare. See <https://gtfs.org/reference/static/#fare_attributestxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct FareAttribute {
    #[serde(skip)]
    pub csv_row_number: u64,
    /// Unique technical (not for the traveller) identifier for the FareAttribute
    pub fare_id: Option<Arc<str>>,
    /// Fare price, in the unit specified by [FareAttribute::currency_type]
    #[serde(serialize_with = "serialize_option_display")]
    pub price: Option<Decimal>,
    /// Currency used to pay the fare.
    pub currency_type: Option<Arc<str>>,
    ///Indicates when the fare must be paid
    pub payment_method: Option<PaymentMethod>,
    /// Indicates the number of transfers permitted on this fare, unlimited when empty
    pub transfers: Option<Transfers>,
    /// Identifies the relevant agency for a fare
    pub agency_id: Option<Arc<str>>,
    /// Length of time in seconds before a transfer expires
    pub transfer_duration: Option<i32>,
}

impl GtfsEntity for FareAttribute {
    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn key_value(&self, column: &str) -> Option<KeyValue> {
        match column {
            "fare_id" => text_key(&self.fare_id),
            _ => None,
        }
    }
}

/// Meta-data about the feed. See <https://gtfs.org/reference/static/#feed_infotxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct FeedInfo {
    #[serde(skip)]
    pub csv_row_number: u64,
    /// Full name of the organization that publishes the dataset.
    pub feed_publisher_name: Option<Arc<str>>,
    /// URL of the dataset publishing organization's website
    pub feed_publisher_url: Option<Arc<str>>,
    /// Default language used for the text in this dataset
    pub feed_lang: Option<Arc<str>>,
    /// Defines the language that should be used when the data consumer doesn’t know the language of the rider
    pub default_lang: Option<Arc<str>>,
    /// The dataset provides complete and reliable schedule information for service in the period from this date
    #[serde(serialize_with = "serialize_option_date")]
    pub feed_start_date: Option<NaiveDate>,
    ///The dataset provides complete and reliable schedule information for service in the period until this date
    #[serde(serialize_with = "serialize_option_date")]
    pub feed_end_date: Option<NaiveDate>,
    /// String that indicates the current version of their GTFS dataset
    pub feed_version: Option<Arc<str>>,
    /// Email address for communication regarding the GTFS dataset and data publishing practices
    pub feed_contact_email: Option<Arc<str>>,
    /// URL for contact information, a web-form, support desk, or other tools for communication regarding the GTFS dataset and data publishing practices
    pub feed_contact_url: Option<Arc<str>>,
}

impl GtfsEntity for FeedInfo {
    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn key_value(&self, _column: &str) -> Option<KeyValue> {
        None
    }
}

impl fmt::Display for FeedInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.feed_publisher_name.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_leaves_an_empty_builder() {
        let mut builder = Stop::default();
        builder.set_csv_row_number(4);
        builder.stop_id = Some(Arc::from("s1"));
        let stop = builder.build();
        assert_eq!(4, stop.csv_row_number());
        assert_eq!(Some(KeyValue::from("s1")), stop.key_value("stop_id"));
        assert_eq!(Stop::default(), builder);
    }

    #[test]
    fn serialize_entities() {
        let route = Route {
            csv_row_number: 2,
            route_id: Some(Arc::from("r1")),
            route_type: Some(RouteType::Bus),
            route_color: Some(RGB8::new(255, 0, 0)),
            ..Default::default()
        };
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!("r1", json["route_id"]);
        assert_eq!(3, json["route_type"]);
        assert_eq!("FF0000", json["route_color"]);
        assert!(json.get("csv_row_number").is_none());

        let fare = FareAttribute {
            price: Some(Decimal::new(150, 2)),
            ..Default::default()
        };
        assert_eq!("1.50", serde_json::to_value(&fare).unwrap()["price"]);
    }
}
