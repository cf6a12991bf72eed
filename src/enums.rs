use serde::ser::{Serialize, Serializer};

/// Enumerations stored as integers in the CSV files
///
/// Codes outside the enumeration are kept in an `Unknown` (or `Other`) variant so that
/// the value is not lost; the [crate::RowParser] reports them.
pub trait GtfsEnum: Sized {
    fn from_code(code: i32) -> Self;
    fn code(&self) -> i32;
    /// The code is not part of the enumeration
    fn is_unknown(&self) -> bool;
}

macro_rules! serialize_as_code {
    ($($t:ty),*) => {
        $(
            impl Serialize for $t {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.serialize_i32(self.code())
                }
            }
        )*
    };
}

serialize_as_code!(
    LocationType,
    RouteType,
    PickupDropOffType,
    ContinuousPickupDropOff,
    TimepointType,
    Availability,
    BikesAllowedType,
    DirectionType,
    Exception,
    ServiceAvailability,
    PaymentMethod,
    Transfers
);

/// Describes the kind of [crate::Stop]. See <https://gtfs.org/reference/static/#stopstxt> `location_type`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LocationType {
    /// Stop (or Platform). A location where passengers board or disembark from a transit vehicle. Is called a platform when defined within a parent_station
    StopPoint,
    /// Station. A physical structure or area that contains one or more platform
    StopArea,
    /// A location where passengers can enter or exit a station from the street
    StationEntrance,
    /// A location within a station, not matching any other location type, which can be used to link together pathways define in pathways.txt.
    GenericNode,
    /// A specific location on a platform, where passengers can board and/or alight vehicles
    BoardingArea,
    /// An unknown value
    Unknown(i32),
}

impl GtfsEnum for LocationType {
    fn from_code(code: i32) -> Self {
        match code {
            0 => LocationType::StopPoint,
            1 => LocationType::StopArea,
            2 => LocationType::StationEntrance,
            3 => LocationType::GenericNode,
            4 => LocationType::BoardingArea,
            i => LocationType::Unknown(i),
        }
    }

    fn code(&self) -> i32 {
        match self {
            LocationType::StopPoint => 0,
            LocationType::StopArea => 1,
            LocationType::StationEntrance => 2,
            LocationType::GenericNode => 3,
            LocationType::BoardingArea => 4,
            LocationType::Unknown(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, LocationType::Unknown(_))
    }
}

/// Describes the kind of [crate::Route]. See <https://gtfs.org/reference/static/#routestxt> `route_type`
///
/// Some route types are extended GTFS (<https://developers.google.com/transit/gtfs/reference/extended-route-types>)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RouteType {
    /// Tram, Streetcar, Light rail. Any light rail or street level system within a metropolitan area
    Tramway,
    /// Subway, Metro. Any underground rail system within a metropolitan area
    Subway,
    /// Used for intercity or long-distance travel
    Rail,
    /// Used for short- and long-distance bus routes
    Bus,
    /// Used for short- and long-distance boat service
    Ferry,
    /// Used for street-level rail cars where the cable runs beneath the vehicle, e.g., cable car in San Francisco
    CableCar,
    /// Aerial lift, suspended cable car (e.g., gondola lift, aerial tramway)
    Gondola,
    /// Any rail system designed for steep inclines
    Funicular,
    /// Electric buses that draw power from overhead wires using poles
    Trolleybus,
    /// Railway in which the track consists of a single rail or a beam
    Monorail,
    /// (extended) Used for intercity bus services
    Coach,
    /// (extended) Airplanes
    Air,
    /// (extended) Taxi, Cab
    Taxi,
    /// (extended) any other value
    Other(i32),
}

impl GtfsEnum for RouteType {
    fn from_code(i: i32) -> Self {
        let hundreds = i / 100;
        match (i, hundreds) {
            (0, _) | (_, 9) => RouteType::Tramway,
            (1, _) | (_, 4) => RouteType::Subway,
            (2, _) | (_, 1) => RouteType::Rail,
            (3, _) | (_, 7) | (_, 8) => RouteType::Bus,
            (4, _) | (_, 10) | (_, 12) => RouteType::Ferry,
            (5, _) => RouteType::CableCar,
            (6, _) | (_, 13) => RouteType::Gondola,
            (7, _) | (_, 14) => RouteType::Funicular,
            (11, _) => RouteType::Trolleybus,
            (12, _) => RouteType::Monorail,
            (_, 2) => RouteType::Coach,
            (_, 11) => RouteType::Air,
            (_, 15) => RouteType::Taxi,
            _ => RouteType::Other(i),
        }
    }

    // Note: for extended route type, we might loose the initial precise route type
    fn code(&self) -> i32 {
        match self {
            RouteType::Tramway => 0,
            RouteType::Subway => 1,
            RouteType::Rail => 2,
            RouteType::Bus => 3,
            RouteType::Ferry => 4,
            RouteType::CableCar => 5,
            RouteType::Gondola => 6,
            RouteType::Funicular => 7,
            RouteType::Trolleybus => 11,
            RouteType::Monorail => 12,
            RouteType::Coach => 200,
            RouteType::Air => 1100,
            RouteType::Taxi => 1500,
            RouteType::Other(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, RouteType::Other(_))
    }
}

/// Describes if and how a traveller can board or alight the vehicle. See <https://gtfs.org/reference/static/#stop_timestxt> `pickup_type` and `dropoff_type`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PickupDropOffType {
    /// Regularly scheduled pickup or drop off (default when empty).
    Regular,
    /// No pickup or drop off available.
    NotAvailable,
    /// Must phone agency to arrange pickup or drop off.
    ArrangeByPhone,
    /// Must coordinate with driver to arrange pickup or drop off.
    CoordinateWithDriver,
    /// A code not defined by the GTFS reference
    Unknown(i32),
}

impl GtfsEnum for PickupDropOffType {
    fn from_code(code: i32) -> Self {
        match code {
            0 => PickupDropOffType::Regular,
            1 => PickupDropOffType::NotAvailable,
            2 => PickupDropOffType::ArrangeByPhone,
            3 => PickupDropOffType::CoordinateWithDriver,
            i => PickupDropOffType::Unknown(i),
        }
    }

    fn code(&self) -> i32 {
        match self {
            PickupDropOffType::Regular => 0,
            PickupDropOffType::NotAvailable => 1,
            PickupDropOffType::ArrangeByPhone => 2,
            PickupDropOffType::CoordinateWithDriver => 3,
            PickupDropOffType::Unknown(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, PickupDropOffType::Unknown(_))
    }
}

/// Indicates whether a rider can board the transit vehicle anywhere along the vehicle’s travel path
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ContinuousPickupDropOff {
    /// Continuous stopping pickup or drop off.
    Continuous,
    /// No continuous stopping pickup or drop off (default when empty).
    NotAvailable,
    /// Must phone agency to arrange continuous stopping pickup or drop off.
    ArrangeByPhone,
    /// Must coordinate with driver to arrange continuous stopping pickup or drop off.
    CoordinateWithDriver,
    /// A code not defined by the GTFS reference
    Unknown(i32),
}

impl GtfsEnum for ContinuousPickupDropOff {
    fn from_code(code: i32) -> Self {
        match code {
            0 => ContinuousPickupDropOff::Continuous,
            1 => ContinuousPickupDropOff::NotAvailable,
            2 => ContinuousPickupDropOff::ArrangeByPhone,
            3 => ContinuousPickupDropOff::CoordinateWithDriver,
            i => ContinuousPickupDropOff::Unknown(i),
        }
    }

    fn code(&self) -> i32 {
        match self {
            ContinuousPickupDropOff::Continuous => 0,
            ContinuousPickupDropOff::NotAvailable => 1,
            ContinuousPickupDropOff::ArrangeByPhone => 2,
            ContinuousPickupDropOff::CoordinateWithDriver => 3,
            ContinuousPickupDropOff::Unknown(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, ContinuousPickupDropOff::Unknown(_))
    }
}

/// Describes if the stop time is exact or not. See <https://gtfs.org/reference/static/#stop_timestxt> `timepoint`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TimepointType {
    /// Times are considered approximate
    Approximate,
    /// Times are considered exact
    Exact,
    /// A code not defined by the GTFS reference
    Unknown(i32),
}

impl GtfsEnum for TimepointType {
    fn from_code(code: i32) -> Self {
        match code {
            0 => TimepointType::Approximate,
            1 => TimepointType::Exact,
            i => TimepointType::Unknown(i),
        }
    }

    fn code(&self) -> i32 {
        match self {
            TimepointType::Approximate => 0,
            TimepointType::Exact => 1,
            TimepointType::Unknown(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, TimepointType::Unknown(_))
    }
}

/// Generic enum to define if a service (like wheelchair boarding) is available
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Availability {
    /// No information if the service is available
    InformationNotAvailable,
    /// The service is available
    Available,
    /// The service is not available
    NotAvailable,
    /// A code not defined by the GTFS reference
    Unknown(i32),
}

impl GtfsEnum for Availability {
    fn from_code(code: i32) -> Self {
        match code {
            0 => Availability::InformationNotAvailable,
            1 => Availability::Available,
            2 => Availability::NotAvailable,
            i => Availability::Unknown(i),
        }
    }

    fn code(&self) -> i32 {
        match self {
            Availability::InformationNotAvailable => 0,
            Availability::Available => 1,
            Availability::NotAvailable => 2,
            Availability::Unknown(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, Availability::Unknown(_))
    }
}

/// Is the [crate::Trip] accessible with a bike. See <https://gtfs.org/reference/static/#tripstxt> `bikes_allowed`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BikesAllowedType {
    /// No bike information for the trip
    NoBikeInfo,
    /// Vehicle being used on this particular trip can accommodate at least one bicycle
    AtLeastOneBike,
    /// No bicycles are allowed on this trip
    NoBikesAllowed,
    /// A code not defined by the GTFS reference
    Unknown(i32),
}

impl GtfsEnum for BikesAllowedType {
    fn from_code(code: i32) -> Self {
        match code {
            0 => BikesAllowedType::NoBikeInfo,
            1 => BikesAllowedType::AtLeastOneBike,
            2 => BikesAllowedType::NoBikesAllowed,
            i => BikesAllowedType::Unknown(i),
        }
    }

    fn code(&self) -> i32 {
        match self {
            BikesAllowedType::NoBikeInfo => 0,
            BikesAllowedType::AtLeastOneBike => 1,
            BikesAllowedType::NoBikesAllowed => 2,
            BikesAllowedType::Unknown(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, BikesAllowedType::Unknown(_))
    }
}

/// Defines the direction of a [crate::Trip], only for display, not for routing. See <https://gtfs.org/reference/static/#tripstxt> `direction_id`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DirectionType {
    /// Travel in one direction (e.g. outbound travel).
    Outbound,
    /// Travel in the opposite direction (e.g. inbound travel).
    Inbound,
    /// A code not defined by the GTFS reference
    Unknown(i32),
}

impl GtfsEnum for DirectionType {
    fn from_code(code: i32) -> Self {
        match code {
            0 => DirectionType::Outbound,
            1 => DirectionType::Inbound,
            i => DirectionType::Unknown(i),
        }
    }

    fn code(&self) -> i32 {
        match self {
            DirectionType::Outbound => 0,
            DirectionType::Inbound => 1,
            DirectionType::Unknown(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, DirectionType::Unknown(_))
    }
}

/// Defines if a [crate::CalendarDate] is added or deleted from a [crate::Calendar]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Exception {
    /// There will be a service on that day
    Added,
    /// There won’t be a service on that day
    Deleted,
    /// A code not defined by the GTFS reference
    Unknown(i32),
}

impl GtfsEnum for Exception {
    fn from_code(code: i32) -> Self {
        match code {
            1 => Exception::Added,
            2 => Exception::Deleted,
            i => Exception::Unknown(i),
        }
    }

    fn code(&self) -> i32 {
        match self {
            Exception::Added => 1,
            Exception::Deleted => 2,
            Exception::Unknown(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, Exception::Unknown(_))
    }
}

/// Does a [crate::Calendar] run on a day of the week
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ServiceAvailability {
    NoService,
    Available,
    /// A code not defined by the GTFS reference
    Unknown(i32),
}

impl GtfsEnum for ServiceAvailability {
    fn from_code(code: i32) -> Self {
        match code {
            0 => ServiceAvailability::NoService,
            1 => ServiceAvailability::Available,
            i => ServiceAvailability::Unknown(i),
        }
    }

    fn code(&self) -> i32 {
        match self {
            ServiceAvailability::NoService => 0,
            ServiceAvailability::Available => 1,
            ServiceAvailability::Unknown(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, ServiceAvailability::Unknown(_))
    }
}

/// Defines where a [crate::FareAttribute] can be paid
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// Fare is paid on board
    Aboard,
    /// Fare must be paid before boarding
    PreBoarding,
    /// A code not defined by the GTFS reference
    Unknown(i32),
}

impl GtfsEnum for PaymentMethod {
    fn from_code(code: i32) -> Self {
        match code {
            0 => PaymentMethod::Aboard,
            1 => PaymentMethod::PreBoarding,
            i => PaymentMethod::Unknown(i),
        }
    }

    fn code(&self) -> i32 {
        match self {
            PaymentMethod::Aboard => 0,
            PaymentMethod::PreBoarding => 1,
            PaymentMethod::Unknown(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, PaymentMethod::Unknown(_))
    }
}

/// Defines how many transfers can be done with on [crate::FareAttribute]
///
/// An empty value means unlimited transfers, so there is no variant for it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Transfers {
    /// No transfers permitted on this fare
    NoTransfer,
    /// Riders may transfer once
    UniqueTransfer,
    ///Riders may transfer twice
    TwoTransfers,
    /// Other transfer values
    Other(i32),
}

impl GtfsEnum for Transfers {
    fn from_code(code: i32) -> Self {
        match code {
            0 => Transfers::NoTransfer,
            1 => Transfers::UniqueTransfer,
            2 => Transfers::TwoTransfers,
            i => Transfers::Other(i),
        }
    }

    fn code(&self) -> i32 {
        match self {
            Transfers::NoTransfer => 0,
            Transfers::UniqueTransfer => 1,
            Transfers::TwoTransfers => 2,
            Transfers::Other(i) => *i,
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, Transfers::Other(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_route_types() {
        assert_eq!(RouteType::Bus, RouteType::from_code(3));
        assert_eq!(RouteType::Bus, RouteType::from_code(700));
        assert_eq!(RouteType::Coach, RouteType::from_code(201));
        assert_eq!(RouteType::Trolleybus, RouteType::from_code(11));
        assert_eq!(RouteType::Other(42), RouteType::from_code(42));
        assert!(RouteType::from_code(42).is_unknown());
        assert_eq!(1100, RouteType::from_code(1100).code());
    }

    #[test]
    fn unknown_codes_are_kept() {
        let t = PickupDropOffType::from_code(-999);
        assert_eq!(PickupDropOffType::Unknown(-999), t);
        assert_eq!(-999, t.code());
        assert_eq!("-999", serde_json::to_string(&t).unwrap());
        assert_eq!(Exception::Deleted, Exception::from_code(2));
        assert!(Exception::from_code(0).is_unknown());
    }
}
