//! Stop events and their placement along a route.
//!
//! Stops from the trip service carry no coordinates. They are spread evenly
//! across the interior of the decoded path, snapped to a vertex.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::polyline::Path;

/// Kind of stop event. Unrecognized kinds deserialize as [`StopKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    Pickup,
    Dropoff,
    FuelStop,
    Break,
    #[serde(other)]
    Other,
}

impl StopKind {
    /// Wire name, as used in the trip service payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Dropoff => "dropoff",
            Self::FuelStop => "fuel_stop",
            Self::Break => "break",
            Self::Other => "other",
        }
    }

    /// Human label for legends and popups.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pickup => "Pickup",
            Self::Dropoff => "Dropoff",
            Self::FuelStop => "Fuel Stop",
            Self::Break => "Rest Break",
            Self::Other => "Stop",
        }
    }
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stop event on the trip, without a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(rename = "type")]
    pub kind: StopKind,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub description: String,
}

impl Stop {
    pub fn new(kind: StopKind, duration_minutes: u32, description: impl Into<String>) -> Self {
        Self {
            kind,
            duration_minutes,
            description: description.into(),
        }
    }

    /// Popup text built from the kind label, the description and the
    /// duration in minutes.
    ///
    /// The description is left out when empty or when it only repeats the
    /// label.
    pub fn summary(&self) -> String {
        let label = self.kind.label();
        let description = self.description.trim();
        if description.is_empty() || description.eq_ignore_ascii_case(label) {
            format!("{label} ({} min)", self.duration_minutes)
        } else {
            format!("{label} — {description} ({} min)", self.duration_minutes)
        }
    }
}

/// A stop snapped onto a vertex of the route.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedStop {
    pub stop: Stop,
    /// Position of the stop in the input list.
    pub index: usize,
    /// Index of the path vertex the stop sits on.
    pub path_index: usize,
    pub position: GeoPoint,
}

impl PlacedStop {
    /// Stable key that tells coincident markers apart.
    pub fn key(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.stop.kind, self.index, self.position.lat, self.position.lng
        )
    }
}

/// Spreads `stops` across the interior of `path`.
///
/// The i-th of N stops sits at fraction `(i + 1) / (N + 1)` of the vertex
/// range, floored to a vertex index. Several stops may share a vertex when N
/// is large relative to the path. Returns nothing for paths shorter than two
/// points.
pub fn place(stops: &[Stop], path: &Path) -> Vec<PlacedStop> {
    let points = path.points();
    if stops.is_empty() || points.len() < 2 {
        return Vec::new();
    }

    let last = points.len() - 1;
    let slots = (stops.len() + 1) as f64;

    stops
        .iter()
        .enumerate()
        .map(|(index, stop)| {
            let t = (index + 1) as f64 / slots;
            let path_index = ((t * last as f64).floor() as usize).min(last);
            PlacedStop {
                stop: stop.clone(),
                index,
                path_index,
                position: points[path_index],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path(len: usize) -> Path {
        Path::new(
            (0..len)
                .map(|i| GeoPoint::new(i as f64, -(i as f64)))
                .collect(),
        )
    }

    fn fuel(n: usize) -> Vec<Stop> {
        (0..n).map(|_| Stop::new(StopKind::FuelStop, 30, "fuel")).collect()
    }

    #[test]
    fn test_short_path_places_nothing() {
        assert!(place(&fuel(3), &Path::default()).is_empty());
        assert!(place(&fuel(3), &straight_path(1)).is_empty());
    }

    #[test]
    fn test_no_stops_places_nothing() {
        assert!(place(&[], &straight_path(10)).is_empty());
    }

    #[test]
    fn test_quarters_on_nine_points() {
        let placed = place(&fuel(3), &straight_path(9));
        let indices: Vec<_> = placed.iter().map(|p| p.path_index).collect();
        assert_eq!(indices, vec![2, 4, 6]);
        assert_eq!(placed[1].position, GeoPoint::new(4.0, -4.0));
    }

    #[test]
    fn test_two_point_path_uses_start_vertex() {
        // floor(0.5 * 1) == 0
        let placed = place(&fuel(1), &straight_path(2));
        assert_eq!(placed[0].path_index, 0);
    }

    #[test]
    fn test_crowded_stops_share_vertices() {
        let placed = place(&fuel(10), &straight_path(3));
        assert_eq!(placed.len(), 10);
        assert!(placed.iter().all(|p| p.path_index <= 2));
        assert!(placed.windows(2).all(|w| w[0].path_index <= w[1].path_index));

        let mut keys: Vec<_> = placed.iter().map(PlacedStop::key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 10, "keys must stay unique for coincident stops");
    }

    #[test]
    fn test_unknown_kind_deserializes_as_other() {
        let stop: Stop =
            serde_json::from_str(r#"{"type": "sleeper_berth", "duration_minutes": 600}"#).unwrap();
        assert_eq!(stop.kind, StopKind::Other);
        assert_eq!(stop.description, "");
    }

    #[test]
    fn test_kind_wire_names() {
        let stop: Stop = serde_json::from_str(
            r#"{"type": "fuel_stop", "duration_minutes": 30, "description": "fuel stop (30 min)"}"#,
        )
        .unwrap();
        assert_eq!(stop.kind, StopKind::FuelStop);
        assert_eq!(stop.kind.to_string(), "fuel_stop");
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            Stop::new(StopKind::Break, 30, "30 min break after 8 hr driving").summary(),
            "Rest Break — 30 min break after 8 hr driving (30 min)"
        );
        assert_eq!(Stop::new(StopKind::Pickup, 60, "pickup").summary(), "Pickup (60 min)");
        assert_eq!(Stop::new(StopKind::Other, 5, "").summary(), "Stop (5 min)");
    }
}
