//! Route geometries: encoded polylines and their decoded paths.
//!
//! Routes arrive either as an encoded polyline string (precision 1e5) or as
//! a literal list of `[lng, lat]` pairs. Both normalize to a [`Path`].
//! Decoding never fails outward: malformed input yields an empty path so the
//! map renders without a route line instead of erroring.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::geo::GeoPoint;

/// Fixed scale factor of the polyline format.
const PRECISION: f64 = 1e5;

/// Offset added to every 5-bit chunk to land in printable ASCII.
const CHAR_OFFSET: u8 = 63;

const CONTINUATION: u64 = 0x20;

/// A route geometry as received from the trip service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncodedPath {
    /// Encoded polyline string.
    Encoded(String),
    /// `[lng, lat]` pairs in traversal order.
    Coordinates(Vec<[f64; 2]>),
}

impl From<&str> for EncodedPath {
    fn from(value: &str) -> Self {
        Self::Encoded(value.to_string())
    }
}

impl From<Vec<[f64; 2]>> for EncodedPath {
    fn from(value: Vec<[f64; 2]>) -> Self {
        Self::Coordinates(value)
    }
}

/// A decoded route geometry in traversal order.
///
/// Consumers must not reorder the points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<GeoPoint>,
}

impl Path {
    /// Creates a new Path from decoded coordinate points.
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Consumes the path and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total great-circle length along the path in kilometers.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_km(&pair[1]))
            .sum()
    }
}

/// Normalizes any route geometry into a [`Path`].
///
/// `None`, an empty string and malformed strings all yield an empty path.
pub fn decode(input: Option<&EncodedPath>) -> Path {
    match input {
        None => Path::default(),
        Some(EncodedPath::Coordinates(pairs)) => Path::new(
            pairs
                .iter()
                .map(|&[lng, lat]| GeoPoint { lat, lng })
                .collect(),
        ),
        Some(EncodedPath::Encoded(encoded)) => match try_decode(encoded) {
            Ok(path) => path,
            Err(err) => {
                tracing::debug!(error = %err, "discarding malformed polyline");
                Path::default()
            }
        },
    }
}

/// Decodes an encoded polyline string, reporting why it is malformed.
pub fn try_decode(encoded: &str) -> Result<Path, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        let start = index;
        let dlat = next_value(bytes, &mut index)?;
        if index >= bytes.len() {
            return Err(DecodeError::MissingLongitude);
        }
        let dlng = next_value(bytes, &mut index)?;

        lat = lat.checked_add(dlat).ok_or(DecodeError::Overflow(start))?;
        lng = lng.checked_add(dlng).ok_or(DecodeError::Overflow(start))?;

        let point = GeoPoint {
            lat: lat as f64 / PRECISION,
            lng: lng as f64 / PRECISION,
        };
        if !point.lat.is_finite() || !point.lng.is_finite() {
            return Err(DecodeError::NonFinite);
        }
        points.push(point);
    }

    Ok(Path::new(points))
}

/// Reads one zig-zag varint starting at `index`, advancing past it.
fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, DecodeError> {
    let start = *index;
    let mut result: u64 = 0;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(DecodeError::Truncated);
        };
        if !(CHAR_OFFSET..=126).contains(&byte) {
            return Err(DecodeError::InvalidChar(char::from(byte), *index));
        }
        if shift > 55 {
            return Err(DecodeError::Overflow(start));
        }

        let chunk = u64::from(byte - CHAR_OFFSET);
        *index += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < CONTINUATION {
            break;
        }
    }

    Ok(((result >> 1) as i64) ^ -((result & 1) as i64))
}

/// Encodes points with the same format [`decode`] reads.
///
/// Coordinates are rounded to 1e-5 degrees. Deltas too large for an `i64`
/// saturate, so absurd coordinates encode without panicking but do not
/// round-trip.
pub fn encode(points: &[GeoPoint]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let dlat = ((point.lat * PRECISION).round() as i64).saturating_sub(prev_lat);
        let dlng = ((point.lng * PRECISION).round() as i64).saturating_sub(prev_lng);
        encode_value(dlat, &mut out);
        encode_value(dlng, &mut out);
        // Tracks what a decoder will reconstruct; always between the old
        // value and the target, so it cannot overflow.
        prev_lat += dlat;
        prev_lng += dlng;
    }

    out
}

fn encode_value(value: i64, out: &mut String) {
    let mut rest = ((value << 1) ^ (value >> 63)) as u64;
    while rest >= CONTINUATION {
        out.push(char::from((CONTINUATION | (rest & 0x1f)) as u8 + CHAR_OFFSET));
        rest >>= 5;
    }
    out.push(char::from(rest as u8 + CHAR_OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn reference_points() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(38.5, -120.2),
            GeoPoint::new(40.7, -120.95),
            GeoPoint::new(43.252, -126.453),
        ]
    }

    fn assert_close(actual: &[GeoPoint], expected: &[GeoPoint]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a.lat - e.lat).abs() < 1e-5, "lat {} != {}", a.lat, e.lat);
            assert!((a.lng - e.lng).abs() < 1e-5, "lng {} != {}", a.lng, e.lng);
        }
    }

    #[test]
    fn test_decode_reference() {
        let path = decode(Some(&EncodedPath::from(REFERENCE)));
        assert_close(path.points(), &reference_points());
    }

    #[test]
    fn test_encode_reference() {
        assert_eq!(encode(&reference_points()), REFERENCE);
    }

    #[test]
    fn test_coordinates_swap_order() {
        let input = EncodedPath::from(vec![[-120.2, 38.5], [-120.95, 40.7]]);
        let path = decode(Some(&input));
        assert_eq!(
            path.points(),
            &[GeoPoint::new(38.5, -120.2), GeoPoint::new(40.7, -120.95)]
        );
    }

    #[test]
    fn test_none_and_empty() {
        assert!(decode(None).is_empty());
        assert!(decode(Some(&EncodedPath::from(""))).is_empty());
        assert!(decode(Some(&EncodedPath::Coordinates(vec![]))).is_empty());
    }

    #[test]
    fn test_truncated_is_empty() {
        // Drop the final character: the last longitude never terminates.
        let truncated = &REFERENCE[..REFERENCE.len() - 1];
        assert_eq!(try_decode(truncated), Err(DecodeError::Truncated));
        assert!(decode(Some(&EncodedPath::from(truncated))).is_empty());
    }

    #[test]
    fn test_lone_latitude_is_empty() {
        assert_eq!(try_decode("_p~iF"), Err(DecodeError::MissingLongitude));
    }

    #[test]
    fn test_invalid_char() {
        assert_eq!(try_decode("_p~i F"), Err(DecodeError::InvalidChar(' ', 4)));
        assert!(decode(Some(&EncodedPath::from("héllo"))).is_empty());
    }

    #[test]
    fn test_overflow() {
        let endless = "~".repeat(20);
        assert!(matches!(try_decode(&endless), Err(DecodeError::Overflow(0))));
    }

    #[test]
    fn test_negative_and_zero_values() {
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(-0.00001, 0.00001),
            GeoPoint::new(-89.99999, 179.99999),
        ];
        assert_close(try_decode(&encode(&points)).unwrap().points(), &points);
    }

    #[test]
    fn test_encode_extreme_coordinates() {
        let points = [
            GeoPoint::new(-9.0e13, 0.0),
            GeoPoint::new(9.0e13, 0.0),
            GeoPoint::new(f64::NAN, f64::INFINITY),
        ];
        let encoded = encode(&points);
        assert!(!encoded.is_empty());
        assert!(encoded.bytes().all(|b| (CHAR_OFFSET..=126).contains(&b)));
    }

    #[test]
    fn test_length_km() {
        let path = Path::new(vec![
            GeoPoint::new(36.17, -115.14),
            GeoPoint::new(34.05, -118.24),
        ]);
        let km = path.length_km();
        assert!(km > 350.0 && km < 400.0);
        assert_eq!(Path::default().length_km(), 0.0);
    }

    #[test]
    fn test_into_points() {
        let points = reference_points();
        let path = Path::new(points.clone());
        assert_eq!(path.into_points(), points);
    }

    #[test]
    fn test_encoded_path_untagged_serde() {
        let encoded: EncodedPath = serde_json::from_str(r#""_p~iF~ps|U""#).unwrap();
        assert_eq!(encoded, EncodedPath::from("_p~iF~ps|U"));

        let coords: EncodedPath = serde_json::from_str("[[-120.2, 38.5]]").unwrap();
        assert_eq!(coords, EncodedPath::Coordinates(vec![[-120.2, 38.5]]));
    }
}
