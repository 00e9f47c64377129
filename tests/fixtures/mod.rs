//! Test fixtures for trip-map.
//!
//! Provides:
//! - Reference polylines with their known decodings
//! - Real Las Vegas / Henderson locations strung into a drivable route
//! - Mock places services

#![allow(dead_code)]

pub mod places;
pub mod routes;

pub use places::*;
pub use routes::*;
