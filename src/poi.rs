//! Points of interest loaded from curated JSON files.
//!
//! Each `poi-*.json` file holds a `pois` array. Distances use the same
//! haversine primitive as stop resolution.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PoiConfig;
use crate::error::PoiError;
use crate::geo::{haversine_km, Coordinate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeHooks {
    #[serde(default)]
    pub history: Option<String>,
    #[serde(default)]
    pub fun_fact: Option<String>,
    #[serde(default)]
    pub architectural_detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub attribution_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoiCategory {
    Art,
    History,
    Architecture,
    Nature,
    #[serde(rename = "Food & Drink")]
    FoodDrink,
    #[serde(rename = "Hidden Gem")]
    HiddenGem,
}

impl PoiCategory {
    pub const ALL: [PoiCategory; 6] = [
        PoiCategory::Art,
        PoiCategory::History,
        PoiCategory::Architecture,
        PoiCategory::Nature,
        PoiCategory::FoodDrink,
        PoiCategory::HiddenGem,
    ];

    /// The category as written in POI files.
    pub fn label(self) -> &'static str {
        match self {
            PoiCategory::Art => "Art",
            PoiCategory::History => "History",
            PoiCategory::Architecture => "Architecture",
            PoiCategory::Nature => "Nature",
            PoiCategory::FoodDrink => "Food & Drink",
            PoiCategory::HiddenGem => "Hidden Gem",
        }
    }

    pub fn matches(self, query: &str) -> bool {
        self.label().eq_ignore_ascii_case(query)
    }
}

impl fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoiType {
    Outdoor,
    Indoor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticalInfo {
    #[serde(rename = "type")]
    pub kind: PoiType,
    pub cost: String,
    pub operating_hours: String,
    pub estimated_duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub poi_id: String,
    pub title: String,
    pub coordinates: Coordinate,
    pub address: String,
    pub category: PoiCategory,
    pub description: String,
    pub narrative_hooks: NarrativeHooks,
    pub media: Media,
    pub practical_info: PracticalInfo,
}

/// A search hit with its distance from the query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiWithDistance {
    #[serde(flatten)]
    pub poi: Poi,
    /// Rounded to two decimals.
    pub distance_km: f64,
}

#[derive(Debug, Deserialize)]
struct PoiFile {
    #[serde(default)]
    pois: Vec<serde_json::Value>,
}

fn read_poi_file(path: &Path) -> Result<PoiFile, PoiError> {
    let text = fs::read_to_string(path).map_err(|source| PoiError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| PoiError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, Default)]
pub struct PoiRetriever {
    pois: Vec<Poi>,
}

impl PoiRetriever {
    pub fn new(pois: Vec<Poi>) -> Self {
        Self { pois }
    }

    pub fn load(config: &PoiConfig) -> Result<Self, PoiError> {
        Self::load_dir(&config.poi_dir)
    }

    /// Load every `poi-*.json` file in `dir`, in file name order.
    ///
    /// Unreadable files and invalid records are skipped with a warning; only a
    /// missing directory is an error.
    pub fn load_dir(dir: &Path) -> Result<Self, PoiError> {
        if !dir.is_dir() {
            return Err(PoiError::MissingDirectory(dir.to_path_buf()));
        }

        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("poi-") && name.ends_with(".json"))
            })
            .collect();
        paths.sort();

        let mut pois = Vec::new();
        for path in paths {
            let file = match read_poi_file(&path) {
                Ok(file) => file,
                Err(error) => {
                    warn!(%error, "Skipping POI file");
                    continue;
                }
            };
            for value in file.pois {
                match serde_json::from_value::<Poi>(value) {
                    Ok(poi) => pois.push(poi),
                    Err(error) => {
                        warn!(file = %path.display(), %error, "Failed to parse POI");
                    }
                }
            }
        }

        info!(count = pois.len(), dir = %dir.display(), "Loaded POIs");
        Ok(Self { pois })
    }

    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    /// POIs within `radius_km` of `location`, optionally of one category
    /// (case-insensitive), closest first, at most `max_results`.
    pub fn find_nearby(
        &self,
        location: Coordinate,
        radius_km: f64,
        max_results: usize,
        category: Option<&str>,
    ) -> Vec<PoiWithDistance> {
        let mut results: Vec<PoiWithDistance> = self
            .pois
            .iter()
            .filter(|poi| category.map_or(true, |c| poi.category.matches(c)))
            .filter_map(|poi| {
                let distance = haversine_km(location, poi.coordinates);
                (distance <= radius_km).then(|| PoiWithDistance {
                    poi: poi.clone(),
                    distance_km: (distance * 100.0).round() / 100.0,
                })
            })
            .collect();

        results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        results.truncate(max_results);
        results
    }

    pub fn get_by_id(&self, poi_id: &str) -> Option<&Poi> {
        self.pois.iter().find(|poi| poi.poi_id == poi_id)
    }

    /// POIs of a category (case-insensitive) in load order.
    pub fn by_category(&self, category: &str, max_results: usize) -> Vec<&Poi> {
        self.pois
            .iter()
            .filter(|poi| poi.category.matches(category))
            .take(max_results)
            .collect()
    }
}
