//! Raw GTFS tables as they appear on disk.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ScheduleError;

pub const STOPS_FILE: &str = "stops.txt";
pub const ROUTES_FILE: &str = "routes.txt";
pub const TRIPS_FILE: &str = "trips.txt";
pub const STOP_TIMES_FILE: &str = "stop_times.txt";

#[derive(Deserialize, Debug, Clone)]
pub struct Stop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Route {
    pub route_id: String,
    #[serde(default)]
    pub route_short_name: String,
    pub route_type: i32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Trip {
    pub route_id: String,
    pub trip_id: String,
    #[serde(default)]
    pub trip_headsign: String,
}

/// Times are kept as text here; the feed allows hours past 23.
#[derive(Deserialize, Debug, Clone)]
pub struct StopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: u32,
}

#[derive(Debug, Default, Clone)]
pub struct Feed {
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
}

impl Feed {
    /// Read the four tables from a GTFS directory.
    pub fn load(dir: &Path) -> Result<Self, ScheduleError> {
        if !dir.is_dir() {
            return Err(ScheduleError::MissingDirectory(dir.to_path_buf()));
        }
        info!(dir = %dir.display(), "Loading GTFS feed");

        Ok(Self {
            stops: read_file(dir, STOPS_FILE, &["stop_id", "stop_name", "stop_lat", "stop_lon"])?,
            routes: read_file(dir, ROUTES_FILE, &["route_id", "route_type"])?,
            trips: read_file(dir, TRIPS_FILE, &["route_id", "trip_id"])?,
            stop_times: read_file(
                dir,
                STOP_TIMES_FILE,
                &["trip_id", "arrival_time", "departure_time", "stop_id", "stop_sequence"],
            )?,
        })
    }

    /// Read the four tables from arbitrary readers, in stops, routes, trips,
    /// stop_times order.
    pub fn from_readers<S, R, T, ST>(
        stops: S,
        routes: R,
        trips: T,
        stop_times: ST,
    ) -> Result<Self, ScheduleError>
    where
        S: io::Read,
        R: io::Read,
        T: io::Read,
        ST: io::Read,
    {
        Ok(Self {
            stops: deserialize_into(
                STOPS_FILE,
                Path::new(STOPS_FILE),
                stops,
                &["stop_id", "stop_name", "stop_lat", "stop_lon"],
            )?,
            routes: deserialize_into(
                ROUTES_FILE,
                Path::new(ROUTES_FILE),
                routes,
                &["route_id", "route_type"],
            )?,
            trips: deserialize_into(
                TRIPS_FILE,
                Path::new(TRIPS_FILE),
                trips,
                &["route_id", "trip_id"],
            )?,
            stop_times: deserialize_into(
                STOP_TIMES_FILE,
                Path::new(STOP_TIMES_FILE),
                stop_times,
                &["trip_id", "arrival_time", "departure_time", "stop_id", "stop_sequence"],
            )?,
        })
    }
}

fn read_file<T: DeserializeOwned>(
    dir: &Path,
    name: &str,
    required: &[&'static str],
) -> Result<Vec<T>, ScheduleError> {
    let path = dir.join(name);
    if !path.is_file() {
        return Err(ScheduleError::MissingFile(path));
    }
    let file = File::open(&path).map_err(|source| ScheduleError::Io {
        path: path.clone(),
        source,
    })?;
    deserialize_into(name, &path, file, required)
}

/// Deserialize every row of a table, skipping rows that fail to parse.
///
/// Only a missing header or a missing required column is fatal. `path` is
/// where the table came from, for error reports.
fn deserialize_into<T: DeserializeOwned, R: io::Read>(
    name: &str,
    path: &Path,
    reader: R,
    required: &[&'static str],
) -> Result<Vec<T>, ScheduleError> {
    info!(file = name, "Parsing GTFS table");
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| ScheduleError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    if let Some(column) = required
        .iter()
        .copied()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(ScheduleError::MissingColumn {
            file: name.to_owned(),
            column,
        });
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for parse_result in rdr.deserialize::<T>() {
        match parse_result {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                let line = e.position().map(|p| p.line());
                warn!(file = name, line, error = %e, "Skipping malformed GTFS record");
            }
        }
    }
    if skipped > 0 {
        warn!(file = name, skipped, "Skipped malformed GTFS records");
    }
    info!(file = name, count = rows.len(), "Parsed GTFS table");

    Ok(rows)
}
