//! Reference geometries.
//!
//! Coordinates along the Las Vegas Strip and out to Henderson, sourced from
//! OpenStreetMap.

use trip_map::geo::GeoPoint;

/// Reference polyline from the format documentation.
pub const REFERENCE_POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

pub fn reference_points() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(38.5, -120.2),
        GeoPoint::new(40.7, -120.95),
        GeoPoint::new(43.252, -126.453),
    ]
}

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// North to south down the Strip, then east to Henderson.
pub const STRIP_TO_HENDERSON: &[Location] = &[
    Location::new("Encore at Wynn", 36.1289345, -115.1653620),
    Location::new("Wynn Las Vegas", 36.1263781, -115.1658180),
    Location::new("Caesars Palace", 36.1162, -115.1745),
    Location::new("Bellagio", 36.1126, -115.1767),
    Location::new("MGM Grand", 36.1023654, -115.1688720),
    Location::new("Tropicana Ave & Koval Ln", 36.1000, -115.1580),
    Location::new("Longhorn Casino", 36.1070664, -115.0591256),
    Location::new("Sunset Station", 36.0640, -115.0470),
    Location::new("Henderson Civic Center", 36.0310, -114.9820),
];

pub fn strip_points() -> Vec<GeoPoint> {
    STRIP_TO_HENDERSON.iter().map(Location::point).collect()
}

/// The route as `[lng, lat]` pairs, as the trip service sends it.
pub fn strip_coordinates() -> Vec<[f64; 2]> {
    STRIP_TO_HENDERSON
        .iter()
        .map(|location| [location.lng, location.lat])
        .collect()
}

pub fn assert_points_close(actual: &[GeoPoint], expected: &[GeoPoint]) {
    assert_eq!(actual.len(), expected.len(), "point counts differ");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a.lat - e.lat).abs() < 1e-5 && (a.lng - e.lng).abs() < 1e-5,
            "point {i}: {a:?} != {e:?}"
        );
    }
}
