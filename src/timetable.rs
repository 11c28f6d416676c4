use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::ScheduleConfig;
use crate::data::*;
use crate::error::ScheduleError;
use crate::geo::{haversine_km, Coordinate};
use crate::gtfs;
use crate::time::ServiceTime;

/// The loaded, denormalised schedule. Read-only once built.
#[derive(Debug, Default)]
pub struct ScheduleIndex {
    stops: Vec<Arc<Stop>>,
    stop_positions: HashMap<String, usize>,
    route_count: usize,
    trip_count: usize,
    visits_by_stop: HashMap<String, Vec<StopVisit>>,
    row_count: usize,
}

/// The stop closest to a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestStop {
    pub stop: Arc<Stop>,
    pub distance_km: f64,
}

impl ScheduleIndex {
    pub fn load(config: &ScheduleConfig) -> Result<Self, ScheduleError> {
        gtfs::Feed::load(&config.gtfs_dir).map(Self::from)
    }

    /// Stops in feed order.
    pub fn stops(&self) -> &[Arc<Stop>] {
        &self.stops
    }

    pub fn stop(&self, id: &str) -> Option<&Arc<Stop>> {
        self.stop_positions.get(id).map(|&i| &self.stops[i])
    }

    pub fn route_count(&self) -> usize {
        self.route_count
    }

    /// Trips whose route resolved.
    pub fn trip_count(&self) -> usize {
        self.trip_count
    }

    /// Timetable rows kept after joining stop times to trips and routes.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Every timetable row at a stop, in feed order.
    pub fn visits_at(&self, stop_id: &str) -> &[StopVisit] {
        self.visits_by_stop
            .get(stop_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Closest stop to `point`. Equally distant stops resolve to the one
    /// listed first in the feed. `None` when no stops are loaded or `point`
    /// is not a finite coordinate.
    pub fn nearest_stop(&self, point: Coordinate) -> Option<NearestStop> {
        self.stops
            .iter()
            .map(|stop| (stop, haversine_km(point, stop.location)))
            .filter(|(_, distance)| distance.is_finite())
            .fold(None::<(&Arc<Stop>, f64)>, |best, (stop, distance)| match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((stop, distance)),
            })
            .map(|(stop, distance_km)| NearestStop {
                stop: Arc::clone(stop),
                distance_km,
            })
    }
}

impl From<gtfs::Feed> for ScheduleIndex {
    fn from(feed: gtfs::Feed) -> Self {
        let mut stops: Vec<Arc<Stop>> = Vec::with_capacity(feed.stops.len());
        let mut stop_positions: HashMap<String, usize> = HashMap::with_capacity(feed.stops.len());
        for raw in feed.stops {
            if stop_positions.contains_key(&raw.stop_id) {
                warn!(stop_id = %raw.stop_id, "Ignoring duplicate stop");
                continue;
            }
            if !raw.stop_lat.is_finite() || !raw.stop_lon.is_finite() {
                warn!(stop_id = %raw.stop_id, "Ignoring stop without usable coordinates");
                continue;
            }
            stop_positions.insert(raw.stop_id.clone(), stops.len());
            stops.push(Arc::new(Stop::from(raw)));
        }

        let routes: HashMap<String, Arc<Route>> = feed
            .routes
            .into_iter()
            .map(|raw| {
                let route = Route::from(raw);
                (route.id.clone(), Arc::new(route))
            })
            .collect();

        let mut orphan_trips = 0usize;
        let trips: HashMap<String, Arc<Trip>> = feed
            .trips
            .into_iter()
            .filter_map(|raw| match routes.get(&raw.route_id) {
                Some(route) => Some((
                    raw.trip_id.clone(),
                    Arc::new(Trip {
                        id: raw.trip_id,
                        route: Arc::clone(route),
                        headsign: raw.trip_headsign,
                    }),
                )),
                None => {
                    orphan_trips += 1;
                    debug!(trip_id = %raw.trip_id, route_id = %raw.route_id, "Trip references unknown route");
                    None
                }
            })
            .collect();

        let mut unjoined = 0usize;
        let mut bad_times = 0usize;
        let visits_by_stop: HashMap<String, Vec<StopVisit>> = feed
            .stop_times
            .into_iter()
            .filter_map(|raw| {
                let Some(trip) = trips.get(&raw.trip_id) else {
                    unjoined += 1;
                    return None;
                };
                // Arrival drives planning; a bad departure falls back to it.
                let times = ServiceTime::parse_gtfs(&raw.arrival_time).map(|arrival| {
                    let departure = ServiceTime::parse_gtfs(&raw.departure_time).unwrap_or_else(|e| {
                        debug!(trip_id = %raw.trip_id, stop_id = %raw.stop_id, error = %e, "Using arrival as departure time");
                        arrival
                    });
                    (arrival, departure)
                });
                match times {
                    Ok((arrival, departure)) => Some((
                        raw.stop_id.clone(),
                        StopVisit {
                            trip: Arc::clone(trip),
                            stop_id: raw.stop_id,
                            sequence: raw.stop_sequence,
                            arrival,
                            departure,
                        },
                    )),
                    Err(e) => {
                        bad_times += 1;
                        warn!(trip_id = %raw.trip_id, stop_id = %raw.stop_id, error = %e, "Skipping stop time with unparseable arrival");
                        None
                    }
                }
            })
            .into_group_map();

        if orphan_trips > 0 {
            warn!(orphan_trips, "Dropped trips whose route is not in routes.txt");
        }
        if unjoined > 0 {
            warn!(unjoined, "Dropped stop times whose trip or route could not be resolved");
        }
        if bad_times > 0 {
            warn!(bad_times, "Dropped stop times with unparseable arrival times");
        }

        let row_count: usize = visits_by_stop.values().map(Vec::len).sum();
        info!(
            routes = routes.len(),
            stops = stops.len(),
            trips = trips.len(),
            rows = row_count,
            "Loaded GTFS schedule"
        );

        Self {
            stops,
            stop_positions,
            route_count: routes.len(),
            trip_count: trips.len(),
            visits_by_stop,
            row_count,
        }
    }
}

/// A schedule loaded on first use and shared afterwards.
///
/// Concurrent first calls load once; a failed load leaves the cell empty so
/// the next call tries again.
#[derive(Debug)]
pub struct SharedSchedule {
    config: ScheduleConfig,
    cell: OnceCell<Arc<ScheduleIndex>>,
}

impl SharedSchedule {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            cell: OnceCell::new(),
        }
    }

    pub fn preloaded(index: ScheduleIndex) -> Self {
        Self {
            config: ScheduleConfig::default(),
            cell: OnceCell::with_value(Arc::new(index)),
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get_or_load(&self) -> Result<Arc<ScheduleIndex>, ScheduleError> {
        self.cell
            .get_or_try_init(|| ScheduleIndex::load(&self.config).map(Arc::new))
            .map(Arc::clone)
    }
}
