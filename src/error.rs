use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while loading the static schedule.
///
/// Once a schedule is loaded nothing in the planner returns these; planning
/// failures surface as `None`.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("GTFS directory {0:?} does not exist")]
    MissingDirectory(PathBuf),

    #[error("GTFS file {0:?} does not exist")]
    MissingFile(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse header of {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{file} is missing required column {column:?}")]
    MissingColumn { file: String, column: &'static str },
}

#[derive(Error, Debug)]
pub enum PoiError {
    #[error("POI directory {0:?} does not exist")]
    MissingDirectory(PathBuf),

    #[error("Failed to list POI directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read POI file {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse POI file {path:?}: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
