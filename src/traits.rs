//! Seams to the host environment.
//!
//! These are intentionally minimal. The map widget, the DOM-like anchor and
//! the two HTTP services are all supplied by the embedding application; the
//! crate ships reference implementations for the services and for a Web
//! Mercator camera.

use crate::error::{SearchError, TripError};
use crate::geo::{Bounds, GeoPoint};
use crate::overlay::Rect;
use crate::places::Suggestion;
use crate::trip::{TripLogDetail, TripLogSummary, TripPlan, TripRequest};
use crate::viewport::FitOptions;

/// A live map view whose camera can be moved.
pub trait MapView {
    /// Moves the camera to `center` at `zoom`.
    fn set_view(&mut self, center: GeoPoint, zoom: f64);

    /// Frames `bounds` using the padding and zoom ceiling in `options`.
    fn fit_bounds(&mut self, bounds: &Bounds, options: &FitOptions);
}

/// Free-text places lookup.
///
/// Callers never pass queries shorter than the configured minimum.
pub trait PlacesSearch {
    fn search(&self, query: &str) -> Result<Vec<Suggestion>, SearchError>;
}

/// Trip planning: route geometry plus stop events for three points.
pub trait TripPlanner {
    fn plan(&self, request: &TripRequest) -> Result<TripPlan, TripError>;

    /// Saved trip logs, newest first.
    fn list_logs(&self) -> Result<Vec<TripLogSummary>, TripError>;

    /// The saved log behind a plan's `trip_log_id`.
    fn log(&self, id: u64) -> Result<TripLogDetail, TripError>;
}

/// The element a floating panel is positioned against.
pub trait Anchor {
    /// Current screen rectangle, or `None` when the element is not mounted.
    fn screen_rect(&self) -> Option<Rect>;
}
