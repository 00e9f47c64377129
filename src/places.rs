//! Places search HTTP adapter.
//!
//! Talks to the backend's places proxy, which forwards a GeoJSON
//! FeatureCollection from the geocoder. Missing fields fall back to
//! defaults instead of failing the whole response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SearchError;
use crate::geo::GeoPoint;
use crate::traits::PlacesSearch;

/// One selectable search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub label: String,
    pub position: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub base_url: String,
    pub path: String,
    pub timeout_secs: u64,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            path: "/places-search/".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlacesClient {
    config: PlacesConfig,
    client: reqwest::blocking::Client,
}

impl PlacesClient {
    pub fn new(config: PlacesConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.path.trim_start_matches('/')
        )
    }
}

impl PlacesSearch for PlacesClient {
    fn search(&self, query: &str) -> Result<Vec<Suggestion>, SearchError> {
        let response = self
            .client
            .get(self.url())
            .query(&[("q", query)])
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(service_error(&body).unwrap_or(SearchError::Status(status.as_u16())));
        }

        parse_suggestions(&body, query)
    }
}

/// Maps a places response body to suggestions.
///
/// Fallbacks per feature: label = `query`, id = feature index,
/// position = (0, 0). An `{"error": ...}` body is a service error.
pub fn parse_suggestions(body: &str, query: &str) -> Result<Vec<Suggestion>, SearchError> {
    if let Some(err) = service_error(body) {
        return Err(err);
    }

    let collection: FeatureCollection = serde_json::from_str(body)?;
    Ok(collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| feature.into_suggestion(index, query))
        .collect())
}

fn service_error(body: &str) -> Option<SearchError> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(Value::as_str)
        .map(|message| SearchError::Service(message.to_string()))
}

#[derive(Debug, Default, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Feature {
    geometry: Option<Geometry>,
    properties: Option<Properties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Geometry {
    coordinates: Option<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Properties {
    id: Option<Value>,
    label: Option<String>,
    name: Option<String>,
}

impl Feature {
    fn into_suggestion(self, index: usize, query: &str) -> Suggestion {
        let properties = self.properties.unwrap_or_default();

        let id = match properties.id {
            Some(Value::String(id)) if !id.is_empty() => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => index.to_string(),
        };

        let label = properties
            .label
            .or(properties.name)
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| query.to_string());

        let position = match self.geometry.and_then(|geometry| geometry.coordinates) {
            Some(coords) if coords.len() >= 2 => GeoPoint::new(coords[1], coords[0]),
            _ => GeoPoint::new(0.0, 0.0),
        };

        Suggestion {
            id,
            label,
            position,
        }
    }
}
