//! Geographic points and bounding envelopes.
//!
//! Points come from trusted upstream services, so latitude/longitude ranges
//! are not validated.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fallback map center used when there is nothing to frame
/// (geographic center of the contiguous United States).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(39.8283, -98.5795);

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

/// Axis-aligned envelope around a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Degenerate envelope containing only `point`.
    pub const fn around(point: GeoPoint) -> Self {
        Self {
            min_lat: point.lat,
            max_lat: point.lat,
            min_lng: point.lng,
            max_lng: point.lng,
        }
    }

    /// Computes the envelope in a single pass. Returns `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self::around(first);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: GeoPoint) {
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lat = self.max_lat.max(point.lat);
        self.min_lng = self.min_lng.min(point.lng);
        self.max_lng = self.max_lng.max(point.lng);
    }

    /// Midpoint of the envelope. This is not the centroid of the points.
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.min_lat + self.max_lat) / 2.0,
            lng: (self.min_lng + self.max_lng) / 2.0,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}

/// Envelope of `points`, or the degenerate envelope at [`DEFAULT_CENTER`].
pub fn bounds<I>(points: I) -> Bounds
where
    I: IntoIterator<Item = GeoPoint>,
{
    Bounds::from_points(points).unwrap_or(Bounds::around(DEFAULT_CENTER))
}

/// Envelope midpoint of `points`, or [`DEFAULT_CENTER`] when empty.
pub fn center<I>(points: I) -> GeoPoint
where
    I: IntoIterator<Item = GeoPoint>,
{
    center_or(points, DEFAULT_CENTER)
}

/// Envelope midpoint of `points`, or `fallback` when empty.
pub fn center_or<I>(points: I, fallback: GeoPoint) -> GeoPoint
where
    I: IntoIterator<Item = GeoPoint>,
{
    Bounds::from_points(points).map_or(fallback, |bounds| bounds.center())
}
