//! Configuration for the map scene and the suggest input.
//!
//! Every section has working defaults; [`Config::from_env`] overrides the
//! handful of values that differ between deployments.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geo::{DEFAULT_CENTER, GeoPoint};
use crate::places::PlacesConfig;
use crate::stops::StopKind;
use crate::trip::TripClientConfig;
use crate::viewport::FitOptions;

/// Marker and line colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub route: String,
    pub current: String,
    pub pickup: String,
    pub dropoff: String,
    pub fuel_stop: String,
    pub rest_break: String,
    /// Used for stop kinds without a dedicated color.
    pub other: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            route: "#2563eb".to_string(),
            current: "#2563eb".to_string(),
            pickup: "#16a34a".to_string(),
            dropoff: "#dc2626".to_string(),
            fuel_stop: "#f59e0b".to_string(),
            rest_break: "#8b5cf6".to_string(),
            other: "#6b7280".to_string(),
        }
    }
}

impl Palette {
    pub fn stop_color(&self, kind: StopKind) -> &str {
        match kind {
            StopKind::Pickup => &self.pickup,
            StopKind::Dropoff => &self.dropoff,
            StopKind::FuelStop => &self.fuel_stop,
            StopKind::Break => &self.rest_break,
            StopKind::Other => &self.other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Camera center when there is nothing to frame.
    pub default_center: GeoPoint,
    pub initial_zoom: f64,
    /// Raster tile URL template, passed through to the map widget.
    pub tile_url: String,
    pub tile_attribution: String,
    pub fit: FitOptions,
    pub route_weight: f64,
    pub palette: Palette,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            initial_zoom: 4.0,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_attribution: "&copy; OpenStreetMap contributors".to_string(),
            fit: FitOptions::default(),
            route_weight: 4.0,
            palette: Palette::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Queries shorter than this (after trimming) never hit the service.
    pub min_query_chars: usize,
    pub debounce_ms: u64,
    /// Vertical gap between the input and the floating panel.
    pub dropdown_gap_px: f64,
    pub empty_message: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_chars: 3,
            debounce_ms: 300,
            dropdown_gap_px: 4.0,
            empty_message: "No results found".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub map: MapConfig,
    pub search: SearchConfig,
    pub places: PlacesConfig,
    pub trips: TripClientConfig,
}

impl Config {
    /// Defaults overridden by `TRIP_MAP_API_BASE_URL`, `TRIP_MAP_TILE_URL`
    /// and `TRIP_MAP_SEARCH_DEBOUNCE_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("TRIP_MAP_API_BASE_URL") {
            config.places.base_url = base_url.clone();
            config.trips.base_url = base_url;
        }
        if let Some(tile_url) = lookup("TRIP_MAP_TILE_URL") {
            config.map.tile_url = tile_url;
        }
        if let Some(raw) = lookup("TRIP_MAP_SEARCH_DEBOUNCE_MS") {
            match raw.trim().parse() {
                Ok(ms) => config.search.debounce_ms = ms,
                Err(err) => {
                    tracing::warn!(value = %raw, error = %err, "ignoring invalid TRIP_MAP_SEARCH_DEBOUNCE_MS");
                }
            }
        }

        config
    }
}
