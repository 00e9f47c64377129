//! trip-map core
//!
//! Route visualization and geo-point placement for a trip planner: decode a
//! route, place its stop events, frame it on a map, and drive a debounced
//! address search whose floating panel follows its input.

pub mod config;
pub mod error;
pub mod geo;
pub mod overlay;
pub mod places;
pub mod polyline;
pub mod render;
pub mod stops;
pub mod suggest;
pub mod traits;
pub mod trip;
pub mod viewport;
