//! Data locations and search defaults.

use std::path::PathBuf;

/// Environment variable overriding the GTFS directory.
pub const GTFS_DIR_ENV: &str = "TRANSIT_GTFS_DIR";

/// Environment variable overriding the POI directory.
pub const POI_DIR_ENV: &str = "TRANSIT_POI_DIR";

/// Where the static schedule lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Directory holding stops.txt, routes.txt, trips.txt and stop_times.txt.
    pub gtfs_dir: PathBuf,
}

impl ScheduleConfig {
    pub fn new(gtfs_dir: impl Into<PathBuf>) -> Self {
        Self {
            gtfs_dir: gtfs_dir.into(),
        }
    }

    /// Read `TRANSIT_GTFS_DIR`, falling back to the default directory.
    pub fn from_env() -> Self {
        std::env::var_os(GTFS_DIR_ENV)
            .map(Self::new)
            .unwrap_or_default()
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::new("data/gtfs")
    }
}

/// Where POI files live and how nearby searches behave by default.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiConfig {
    /// Directory scanned for `poi-*.json` files.
    pub poi_dir: PathBuf,

    /// Search radius used when the caller does not give one.
    pub default_radius_km: f64,

    /// Result cap used when the caller does not give one.
    pub default_max_results: usize,
}

impl PoiConfig {
    pub fn new(poi_dir: impl Into<PathBuf>) -> Self {
        Self {
            poi_dir: poi_dir.into(),
            ..Self::default()
        }
    }

    /// Read `TRANSIT_POI_DIR`, falling back to the default directory.
    pub fn from_env() -> Self {
        std::env::var_os(POI_DIR_ENV)
            .map(Self::new)
            .unwrap_or_default()
    }
}

impl Default for PoiConfig {
    fn default() -> Self {
        Self {
            poi_dir: PathBuf::from("data/pois"),
            default_radius_km: 2.0,
            default_max_results: 10,
        }
    }
}
