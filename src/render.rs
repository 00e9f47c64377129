//! Route map scene composition.
//!
//! A [`RouteScene`] is everything a map widget needs to draw a planned trip:
//! tile layer, route line, endpoint markers, stop markers and legend. It is
//! a pure function of the route input; [`RouteMap`] adds the memoized decode
//! and drives the live camera.

use serde::Serialize;

use crate::config::MapConfig;
use crate::geo::{GeoPoint, center_or};
use crate::polyline::{EncodedPath, Path, decode};
use crate::stops::{Stop, StopKind, place};
use crate::traits::MapView;
use crate::trip::{TripPlan, TripRequest};
use crate::viewport::{Endpoints, ViewportFitter};

/// Inputs of one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteInput {
    pub encoded_polyline: Option<EncodedPath>,
    pub endpoints: Endpoints,
    pub stops: Vec<Stop>,
}

impl RouteInput {
    /// Route input for a plan returned for `request`.
    pub fn from_plan(plan: &TripPlan, request: &TripRequest) -> Self {
        Self {
            encoded_polyline: plan.route_polyline.clone(),
            endpoints: Endpoints {
                current: Some(request.current_location),
                pickup: Some(request.pickup_location),
                dropoff: Some(request.dropoff_location),
            },
            stops: plan.stops.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointRole {
    Current,
    Pickup,
    Dropoff,
}

impl EndpointRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Current => "Current location",
            Self::Pickup => "Pickup",
            Self::Dropoff => "Dropoff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub center: GeoPoint,
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLine {
    pub points: Vec<GeoPoint>,
    pub color: String,
    pub weight: f64,
    pub length_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointMarker {
    pub role: EndpointRole,
    pub position: GeoPoint,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopMarker {
    pub key: String,
    pub kind: StopKind,
    pub position: GeoPoint,
    pub path_index: usize,
    pub color: String,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteScene {
    pub tiles: TileLayer,
    /// Camera the map starts from before the first fit.
    pub initial_camera: Camera,
    pub route: Option<RouteLine>,
    pub endpoints: Vec<EndpointMarker>,
    pub stops: Vec<StopMarker>,
    pub legend: Vec<LegendEntry>,
}

/// Builds the scene for an already decoded path.
pub fn scene(config: &MapConfig, path: &Path, endpoints: &Endpoints, stops: &[Stop]) -> RouteScene {
    let palette = &config.palette;

    let initial_camera = Camera {
        center: center_or(
            path.points().iter().copied().chain(endpoints.iter()),
            config.default_center,
        ),
        zoom: config.initial_zoom,
    };

    let route = (path.len() >= 2).then(|| RouteLine {
        points: path.points().to_vec(),
        color: palette.route.clone(),
        weight: config.route_weight,
        length_km: path.length_km(),
    });

    let endpoint_markers = [
        (EndpointRole::Current, endpoints.current, &palette.current),
        (EndpointRole::Pickup, endpoints.pickup, &palette.pickup),
        (EndpointRole::Dropoff, endpoints.dropoff, &palette.dropoff),
    ]
    .into_iter()
    .filter_map(|(role, position, color)| {
        position.map(|position| EndpointMarker {
            role,
            position,
            color: color.clone(),
        })
    })
    .collect();

    let stop_markers = place(stops, path)
        .into_iter()
        .map(|placed| StopMarker {
            key: placed.key(),
            kind: placed.stop.kind,
            position: placed.position,
            path_index: placed.path_index,
            color: palette.stop_color(placed.stop.kind).to_string(),
            popup: placed.stop.summary(),
        })
        .collect();

    RouteScene {
        tiles: TileLayer {
            url_template: config.tile_url.clone(),
            attribution: config.tile_attribution.clone(),
        },
        initial_camera,
        route,
        endpoints: endpoint_markers,
        stops: stop_markers,
        legend: legend(config),
    }
}

fn legend(config: &MapConfig) -> Vec<LegendEntry> {
    let palette = &config.palette;
    [
        (EndpointRole::Current.label(), &palette.current),
        (EndpointRole::Pickup.label(), &palette.pickup),
        (EndpointRole::Dropoff.label(), &palette.dropoff),
        (StopKind::FuelStop.label(), &palette.fuel_stop),
        (StopKind::Break.label(), &palette.rest_break),
        (StopKind::Other.label(), &palette.other),
    ]
    .into_iter()
    .map(|(label, color)| LegendEntry {
        label: label.to_string(),
        color: color.clone(),
    })
    .collect()
}

struct Decoded {
    source: Option<EncodedPath>,
    path: Path,
}

/// Renders route scenes onto a live map view.
pub struct RouteMap<V> {
    config: MapConfig,
    view: V,
    fitter: ViewportFitter,
    decoded: Decoded,
    mounted: bool,
}

impl<V: MapView> RouteMap<V> {
    pub fn new(view: V, config: MapConfig) -> Self {
        let fitter = ViewportFitter::new(config.fit);
        Self {
            config,
            view,
            fitter,
            decoded: Decoded {
                source: None,
                path: Path::default(),
            },
            mounted: false,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Decoded path of the last render.
    pub fn path(&self) -> &Path {
        &self.decoded.path
    }

    /// Renders `input`, re-decoding only when the encoded route changed and
    /// re-framing the camera only when the route or endpoints changed.
    pub fn render(&mut self, input: &RouteInput) -> RouteScene {
        if self.decoded.source != input.encoded_polyline {
            self.decoded = Decoded {
                source: input.encoded_polyline.clone(),
                path: decode(input.encoded_polyline.as_ref()),
            };
        }
        let path = &self.decoded.path;

        let scene = scene(&self.config, path, &input.endpoints, &input.stops);

        if !self.mounted {
            self.view
                .set_view(scene.initial_camera.center, scene.initial_camera.zoom);
            self.mounted = true;
        }
        self.fitter.fit(&mut self.view, path, &input.endpoints);

        scene
    }
}
