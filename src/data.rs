use std::sync::Arc;

use serde::Serialize;

use crate::geo::Coordinate;
use crate::time::ServiceTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub location: Coordinate,
}

impl From<crate::gtfs::Stop> for Stop {
    fn from(raw: crate::gtfs::Stop) -> Self {
        Self {
            id: raw.stop_id,
            name: raw.stop_name,
            location: Coordinate::new(raw.stop_lat, raw.stop_lon),
        }
    }
}

/// Vehicle kinds served by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VehicleType {
    Bus,
    Tram,
    Trolleybus,
}

impl VehicleType {
    /// Map a `route_type` code, including the extended codes this feed uses
    /// (900 tram, 700 bus, 800 trolleybus). Unknown codes are buses.
    pub fn from_route_type(code: i32) -> Self {
        match code {
            0 | 2 | 900 => VehicleType::Tram,
            3 | 700 => VehicleType::Bus,
            800 => VehicleType::Trolleybus,
            _ => VehicleType::Bus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: String,
    pub short_name: String,
    pub vehicle_type: VehicleType,
}

impl From<crate::gtfs::Route> for Route {
    fn from(raw: crate::gtfs::Route) -> Self {
        Self {
            vehicle_type: VehicleType::from_route_type(raw.route_type),
            id: raw.route_id,
            short_name: raw.route_short_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: String,
    pub route: Arc<Route>,
    pub headsign: String,
}

/// One timetable row: a trip calling at a stop, with route and trip
/// attributes reachable through `trip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopVisit {
    pub trip: Arc<Trip>,
    pub stop_id: String,
    pub sequence: u32,
    pub arrival: ServiceTime,
    pub departure: ServiceTime,
}

impl StopVisit {
    pub fn trip_id(&self) -> &str {
        &self.trip.id
    }
}

/// A single ride on one vehicle, as handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitLeg {
    pub vehicle_type: VehicleType,
    pub route_short_name: String,
    pub trip_headsign: String,
    pub start_stop_name: String,
    pub end_stop_name: String,
    /// `HH:MM`
    pub departure_time: String,
    /// `HH:MM`
    pub arrival_time: String,
    pub num_stops: u32,
}
