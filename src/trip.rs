//! Trip-planning HTTP adapter.
//!
//! The planner backend does routing and hours-of-service scheduling; this
//! side only ships the request and maps the JSON plan into typed values.
//! Every plan is saved server side as a trip log, which can be listed and
//! fetched back later.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TripError;
use crate::geo::GeoPoint;
use crate::polyline::EncodedPath;
use crate::stops::Stop;
use crate::traits::TripPlanner;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub current_location: GeoPoint,
    pub pickup_location: GeoPoint,
    pub dropoff_location: GeoPoint,
    /// Hours already used in the current 70-hour / 8-day cycle.
    pub current_cycle_used: f64,
    /// Optional intermediate waypoints between pickup and dropoff.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stops: Vec<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInstruction {
    pub sequence: u32,
    pub instruction: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EldLogEntry {
    pub day_index: u32,
    pub status: String,
    pub status_label: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub description: String,
}

/// A planned trip as returned by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub route_polyline: Option<EncodedPath>,
    #[serde(default)]
    pub total_distance_miles: f64,
    #[serde(default)]
    pub total_duration_hours: f64,
    #[serde(default)]
    pub stops: Vec<Stop>,
    /// Rendered log-sheet image URLs, one per day.
    #[serde(default)]
    pub daily_logs: Vec<String>,
    #[serde(default)]
    pub route_instructions: Vec<RouteInstruction>,
    #[serde(default)]
    pub eld_log_entries: Vec<EldLogEntry>,
    #[serde(default)]
    pub trip_start: Option<String>,
    #[serde(default)]
    pub trip_log_id: Option<u64>,
}

/// One row of the saved trip log listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripLogSummary {
    pub id: u64,
    pub trip_id: String,
    #[serde(default)]
    pub total_distance_miles: Option<f64>,
    #[serde(default)]
    pub total_duration_hours: Option<f64>,
    #[serde(default)]
    pub trip_start: Option<String>,
    pub created_at: String,
}

/// Full ELD data of one saved trip log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripLogDetail {
    #[serde(default)]
    pub route_instructions: Vec<RouteInstruction>,
    #[serde(default)]
    pub eld_log_entries: Vec<EldLogEntry>,
    #[serde(default)]
    pub daily_logs: Vec<String>,
    #[serde(default)]
    pub total_distance_miles: Option<f64>,
    #[serde(default)]
    pub total_duration_hours: Option<f64>,
    #[serde(default)]
    pub trip_start: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripClientConfig {
    pub base_url: String,
    pub path: String,
    /// Trip log collection; a single log lives at `{logs_path}{id}/`.
    pub logs_path: String,
    pub timeout_secs: u64,
}

impl Default for TripClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            path: "/plan-trip/".to_string(),
            logs_path: "/trip-logs/".to_string(),
            // Routing plus log rendering can take a while upstream.
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TripClient {
    config: TripClientConfig,
    client: reqwest::blocking::Client,
}

impl TripClient {
    pub fn new(config: TripClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn log_url(&self, id: u64) -> String {
        format!(
            "{}/{id}/",
            self.url(&self.config.logs_path).trim_end_matches('/')
        )
    }
}

impl TripPlanner for TripClient {
    fn plan(&self, request: &TripRequest) -> Result<TripPlan, TripError> {
        let response = self
            .client
            .post(self.url(&self.config.path))
            .json(request)
            .send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body));
        }

        let plan = serde_json::from_str(&body)?;
        Ok(plan)
    }

    fn list_logs(&self) -> Result<Vec<TripLogSummary>, TripError> {
        let response = self.client.get(self.url(&self.config.logs_path)).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body));
        }

        let logs = serde_json::from_str(&body)?;
        Ok(logs)
    }

    fn log(&self, id: u64) -> Result<TripLogDetail, TripError> {
        let response = self.client.get(self.log_url(id)).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        log_detail(id, status, &body)
    }
}

fn log_detail(id: u64, status: u16, body: &str) -> Result<TripLogDetail, TripError> {
    match status {
        200..=299 => Ok(serde_json::from_str(body)?),
        404 => {
            tracing::debug!(id, "trip log not found");
            Err(TripError::LogNotFound(id))
        }
        _ => Err(rejection(status, body)),
    }
}

fn rejection(status: u16, body: &str) -> TripError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"));
    TripError::Rejected { status, message }
}
