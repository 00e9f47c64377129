//! Camera framing.
//!
//! [`ViewportFitter`] frames the route and its endpoints whenever they
//! change. [`WebMercatorView`] is a headless [`MapView`] that does the same
//! zoom arithmetic a slippy-map widget does, so the framing can be checked
//! without a browser.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geo::{Bounds, DEFAULT_CENTER, GeoPoint};
use crate::polyline::Path;
use crate::traits::MapView;

/// Tile edge in pixels.
const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator projection.
const MAX_LATITUDE: f64 = 85.051_128_78;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Padding kept free on every side of the framed envelope.
    pub padding_px: f64,
    /// Zoom ceiling, so a single point does not zoom to street level.
    pub max_zoom: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding_px: 24.0,
            max_zoom: 14.0,
        }
    }
}

/// The three named points drawn as endpoint markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    pub current: Option<GeoPoint>,
    pub pickup: Option<GeoPoint>,
    pub dropoff: Option<GeoPoint>,
}

impl Endpoints {
    pub fn iter(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        [self.current, self.pickup, self.dropoff].into_iter().flatten()
    }
}

/// Re-frames a map view when the route or endpoints change.
#[derive(Debug, Clone, Default)]
pub struct ViewportFitter {
    options: FitOptions,
    last: Option<(Vec<GeoPoint>, Endpoints)>,
}

impl ViewportFitter {
    pub fn new(options: FitOptions) -> Self {
        Self {
            options,
            last: None,
        }
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Fits `view` to the envelope of `path` and `endpoints`.
    ///
    /// Returns `true` when the camera was moved. Unchanged inputs and empty
    /// inputs leave the view alone.
    pub fn fit<V>(&mut self, view: &mut V, path: &Path, endpoints: &Endpoints) -> bool
    where
        V: MapView + ?Sized,
    {
        if let Some((last_path, last_endpoints)) = &self.last {
            if last_path.as_slice() == path.points() && last_endpoints == endpoints {
                return false;
            }
        }
        self.last = Some((path.points().to_vec(), *endpoints));

        let points = path.points().iter().copied().chain(endpoints.iter());
        let Some(bounds) = Bounds::from_points(points) else {
            return false;
        };

        tracing::debug!(?bounds, "fitting viewport");
        view.fit_bounds(&bounds, &self.options);
        true
    }

    /// Forgets the last fitted inputs so the next call always fits.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Headless Web Mercator camera.
#[derive(Debug, Clone, PartialEq)]
pub struct WebMercatorView {
    pub width_px: f64,
    pub height_px: f64,
    pub center: GeoPoint,
    pub zoom: f64,
}

impl WebMercatorView {
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self {
            width_px,
            height_px,
            center: DEFAULT_CENTER,
            zoom: 0.0,
        }
    }

    /// Screen position of `point` relative to the view's top-left corner.
    pub fn to_screen(&self, point: GeoPoint) -> (f64, f64) {
        let scale = world_size(self.zoom);
        let (px, py) = project(point);
        let (cx, cy) = project(self.center);
        (
            (px - cx) * scale + self.width_px / 2.0,
            (py - cy) * scale + self.height_px / 2.0,
        )
    }
}

impl MapView for WebMercatorView {
    fn set_view(&mut self, center: GeoPoint, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    fn fit_bounds(&mut self, bounds: &Bounds, options: &FitOptions) {
        let (west, north) = project(GeoPoint::new(bounds.max_lat, bounds.min_lng));
        let (east, south) = project(GeoPoint::new(bounds.min_lat, bounds.max_lng));

        let avail_w = (self.width_px - 2.0 * options.padding_px).max(1.0);
        let avail_h = (self.height_px - 2.0 * options.padding_px).max(1.0);

        let zoom_x = zoom_to_fit(avail_w, east - west);
        let zoom_y = zoom_to_fit(avail_h, south - north);
        let zoom = zoom_x.min(zoom_y).floor().clamp(0.0, options.max_zoom);

        self.center = unproject(((west + east) / 2.0, (north + south) / 2.0));
        self.zoom = zoom;
    }
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Largest zoom at which `span` (in unit world coordinates) fits in `pixels`.
fn zoom_to_fit(pixels: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return f64::INFINITY;
    }
    (pixels / (span * TILE_SIZE)).log2()
}

/// Projects to unit world coordinates, x east and y south, both in [0, 1].
fn project(point: GeoPoint) -> (f64, f64) {
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (point.lng + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    (x, y)
}

fn unproject((x, y): (f64, f64)) -> GeoPoint {
    let lng = x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    GeoPoint { lat, lng }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingView {
        fits: Vec<(Bounds, FitOptions)>,
    }

    impl MapView for RecordingView {
        fn set_view(&mut self, _center: GeoPoint, _zoom: f64) {}

        fn fit_bounds(&mut self, bounds: &Bounds, options: &FitOptions) {
            self.fits.push((*bounds, *options));
        }
    }

    fn path() -> Path {
        Path::new(vec![GeoPoint::new(36.0, -115.0), GeoPoint::new(34.0, -118.0)])
    }

    #[test]
    fn test_empty_inputs_are_noop() {
        let mut view = RecordingView::default();
        let mut fitter = ViewportFitter::default();
        assert!(!fitter.fit(&mut view, &Path::default(), &Endpoints::default()));
        assert!(view.fits.is_empty());
    }

    #[test]
    fn test_envelope_includes_endpoints() {
        let mut view = RecordingView::default();
        let mut fitter = ViewportFitter::default();
        let endpoints = Endpoints {
            current: Some(GeoPoint::new(40.0, -120.0)),
            pickup: None,
            dropoff: Some(GeoPoint::new(33.0, -112.0)),
        };
        assert!(fitter.fit(&mut view, &path(), &endpoints));

        let (bounds, options) = view.fits[0];
        assert_eq!(bounds.max_lat, 40.0);
        assert_eq!(bounds.min_lat, 33.0);
        assert_eq!(bounds.min_lng, -120.0);
        assert_eq!(bounds.max_lng, -112.0);
        assert_eq!(options, FitOptions::default());
    }

    #[test]
    fn test_unchanged_inputs_do_not_refit() {
        let mut view = RecordingView::default();
        let mut fitter = ViewportFitter::default();
        let endpoints = Endpoints::default();
        assert!(fitter.fit(&mut view, &path(), &endpoints));
        assert!(!fitter.fit(&mut view, &path(), &endpoints));
        assert_eq!(view.fits.len(), 1);

        let moved = Endpoints {
            pickup: Some(GeoPoint::new(35.0, -116.0)),
            ..endpoints
        };
        assert!(fitter.fit(&mut view, &path(), &moved));
        assert_eq!(view.fits.len(), 2);

        fitter.reset();
        assert!(fitter.fit(&mut view, &path(), &moved));
        assert_eq!(view.fits.len(), 3);
    }

    #[test]
    fn test_mercator_fit_keeps_points_inside_padding() {
        let mut view = WebMercatorView::new(800.0, 600.0);
        let points = [GeoPoint::new(38.5, -120.2), GeoPoint::new(43.252, -126.453)];
        let bounds = Bounds::from_points(points).unwrap();
        let options = FitOptions::default();
        view.fit_bounds(&bounds, &options);

        assert!(view.zoom >= 0.0 && view.zoom <= options.max_zoom);
        for point in points {
            let (x, y) = view.to_screen(point);
            assert!(x >= options.padding_px - 1e-6 && x <= 800.0 - options.padding_px + 1e-6);
            assert!(y >= options.padding_px - 1e-6 && y <= 600.0 - options.padding_px + 1e-6);
        }
        assert!(bounds.min_lat <= view.center.lat && view.center.lat <= bounds.max_lat);
    }

    #[test]
    fn test_mercator_single_point_hits_zoom_ceiling() {
        let mut view = WebMercatorView::new(800.0, 600.0);
        let point = GeoPoint::new(36.1147, -115.1728);
        view.fit_bounds(&Bounds::around(point), &FitOptions::default());
        assert_eq!(view.zoom, 14.0);
        assert!((view.center.lat - point.lat).abs() < 1e-9);
        assert!((view.center.lng - point.lng).abs() < 1e-9);
    }

    #[test]
    fn test_project_roundtrip() {
        let point = GeoPoint::new(-33.8688, 151.2093);
        let back = unproject(project(point));
        assert!((back.lat - point.lat).abs() < 1e-9);
        assert!((back.lng - point.lng).abs() < 1e-9);
    }
}
