//! Direct transit journey planning over a static GTFS schedule.
//!
//! Load a schedule once, then ask for the best single-vehicle leg between
//! two points that arrives by a deadline:
//!
//! ```no_run
//! use std::sync::Arc;
//! use transit_planner::{Coordinate, DirectPlanner, ScheduleConfig, ScheduleIndex};
//!
//! let schedule = ScheduleIndex::load(&ScheduleConfig::from_env()).unwrap();
//! let planner = DirectPlanner::new(Arc::new(schedule));
//! let leg = planner.plan(
//!     Coordinate::new(56.947, 24.113),
//!     Coordinate::new(56.950, 24.105),
//!     "10:15",
//! );
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod gtfs;
pub mod planner;
pub mod poi;
pub mod time;
pub mod timetable;

pub use config::{PoiConfig, ScheduleConfig};
pub use data::{Route, Stop, StopVisit, TransitLeg, Trip, VehicleType};
pub use error::{PoiError, ScheduleError};
pub use geo::{haversine_km, Coordinate};
pub use planner::{plan_transit_journey, DirectPlanner};
pub use poi::{Poi, PoiCategory, PoiRetriever, PoiWithDistance};
pub use time::{ServiceTime, TimeError};
pub use timetable::{NearestStop, ScheduleIndex, SharedSchedule};
