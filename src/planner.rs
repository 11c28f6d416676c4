//! Direct (single vehicle) journey planning.
//!
//! A request resolves both coordinates to their nearest stops, joins the
//! timetable rows of the two stops on trip, keeps trips that visit the
//! origin before the destination and arrive by the deadline, and picks the
//! latest such arrival.

use std::{cmp::Ordering, sync::Arc};

use itertools::Itertools;
use tracing::{debug, info};

use crate::data::*;
use crate::error::ScheduleError;
use crate::geo::Coordinate;
use crate::time::{ServiceTime, TimeError};
use crate::timetable::{NearestStop, ScheduleIndex, SharedSchedule};

/// Why a request produced no leg. Only ever logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum NoRoute {
    #[error("no stop resolves for the requested point")]
    NoNearestStop,

    #[error("start and end resolve to the same stop {0:?}")]
    SameStop(String),

    #[error("stop {0:?} is not served by any trip")]
    StopNotServed(String),

    #[error("no trip serves both stops")]
    NoCommonTrip,

    #[error("every common trip runs in the opposite direction")]
    WrongDirection,

    #[error("invalid deadline {input:?}: {source}")]
    InvalidDeadline { input: String, source: TimeError },

    #[error("no trip arrives by {0}")]
    TooLate(ServiceTime),
}

/// A trip serving both stops: where the rider boards and where they alight.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    board: &'a StopVisit,
    alight: &'a StopVisit,
}

impl Candidate<'_> {
    fn is_forward(&self) -> bool {
        self.board.sequence < self.alight.sequence
    }

    /// Later arrival ranks higher; ties go to the lowest trip id, then to the
    /// later boarding point.
    fn rank(&self, other: &Self) -> Ordering {
        self.alight
            .arrival
            .cmp(&other.alight.arrival)
            .then_with(|| other.board.trip_id().cmp(self.board.trip_id()))
            .then_with(|| self.board.sequence.cmp(&other.board.sequence))
    }

    fn into_leg(self, start: &Stop, end: &Stop) -> TransitLeg {
        let route = &self.board.trip.route;
        TransitLeg {
            vehicle_type: route.vehicle_type,
            route_short_name: route.short_name.clone(),
            trip_headsign: self.board.trip.headsign.clone(),
            start_stop_name: start.name.clone(),
            end_stop_name: end.name.clone(),
            departure_time: self.board.departure.to_string(),
            arrival_time: self.alight.arrival.to_string(),
            num_stops: self.alight.sequence - self.board.sequence,
        }
    }
}

/// Pair every row at the start stop with every row at the end stop on the
/// same trip.
fn common_trips<'a>(starts: &'a [StopVisit], ends: &'a [StopVisit]) -> Vec<Candidate<'a>> {
    let ends_by_trip = ends
        .iter()
        .map(|visit| (visit.trip_id(), visit))
        .into_group_map();

    starts
        .iter()
        .flat_map(|board| {
            ends_by_trip
                .get(board.trip_id())
                .into_iter()
                .flatten()
                .map(move |&alight| Candidate { board, alight })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DirectPlanner {
    schedule: Arc<ScheduleIndex>,
}

impl DirectPlanner {
    pub fn new(schedule: Arc<ScheduleIndex>) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &ScheduleIndex {
        &self.schedule
    }

    pub fn nearest_stop(&self, point: Coordinate) -> Option<NearestStop> {
        self.schedule.nearest_stop(point)
    }

    /// Plan one direct leg from `start` to `end` arriving by `deadline`
    /// (`HH:MM`). Any reason for not finding one is logged and yields `None`.
    pub fn plan(&self, start: Coordinate, end: Coordinate, deadline: &str) -> Option<TransitLeg> {
        match self.try_plan(start, end, deadline) {
            Ok(leg) => {
                info!(
                    route = %leg.route_short_name,
                    from = %leg.start_stop_name,
                    to = %leg.end_stop_name,
                    departure = %leg.departure_time,
                    arrival = %leg.arrival_time,
                    "Found direct journey"
                );
                Some(leg)
            }
            Err(reason) => {
                info!(%reason, deadline, "No direct route found");
                None
            }
        }
    }

    fn try_plan(
        &self,
        start: Coordinate,
        end: Coordinate,
        deadline: &str,
    ) -> Result<TransitLeg, NoRoute> {
        let from = self.schedule.nearest_stop(start).ok_or(NoRoute::NoNearestStop)?;
        let to = self.schedule.nearest_stop(end).ok_or(NoRoute::NoNearestStop)?;
        debug!(
            from = %from.stop.name,
            from_km = from.distance_km,
            to = %to.stop.name,
            to_km = to.distance_km,
            "Resolved nearest stops"
        );

        if from.stop.id == to.stop.id {
            return Err(NoRoute::SameStop(from.stop.id.clone()));
        }

        let starts = self.schedule.visits_at(&from.stop.id);
        if starts.is_empty() {
            return Err(NoRoute::StopNotServed(from.stop.id.clone()));
        }
        let ends = self.schedule.visits_at(&to.stop.id);
        if ends.is_empty() {
            return Err(NoRoute::StopNotServed(to.stop.id.clone()));
        }

        let common = common_trips(starts, ends);
        if common.is_empty() {
            return Err(NoRoute::NoCommonTrip);
        }

        let forward: Vec<Candidate> = common
            .into_iter()
            .filter(|candidate| candidate.is_forward())
            .collect();
        if forward.is_empty() {
            return Err(NoRoute::WrongDirection);
        }

        let deadline_time =
            ServiceTime::parse_hhmm(deadline).map_err(|source| NoRoute::InvalidDeadline {
                input: deadline.to_owned(),
                source,
            })?;

        forward
            .into_iter()
            .filter(|candidate| candidate.alight.arrival <= deadline_time)
            .max_by(|a, b| a.rank(b))
            .map(|best| best.into_leg(&from.stop, &to.stop))
            .ok_or(NoRoute::TooLate(deadline_time))
    }
}

/// Plan against a lazily loaded schedule, loading it on first use.
///
/// Only a failure to load the schedule is an error; an unplannable request
/// is `Ok(None)`.
pub fn plan_transit_journey(
    schedule: &SharedSchedule,
    start_latitude: f64,
    start_longitude: f64,
    end_latitude: f64,
    end_longitude: f64,
    arrival_time: &str,
) -> Result<Option<TransitLeg>, ScheduleError> {
    let planner = DirectPlanner::new(schedule.get_or_load()?);
    Ok(planner.plan(
        Coordinate::new(start_latitude, start_longitude),
        Coordinate::new(end_latitude, end_longitude),
        arrival_time,
    ))
}
