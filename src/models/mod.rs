//! Data models for the Geoapify gateway
//!
//! This module contains the domain models organized by concern:
//! - Coordinate: validated points and waypoint sequences
//! - Routing: request options and reshaped routing results
//! - Autocomplete: address suggestions
//! - Geoapify: provider response structures

pub mod autocomplete;
pub mod coordinate;
pub mod geoapify;
pub mod routing;

// Re-export all public types for convenient access
pub use autocomplete::Suggestion;
pub use coordinate::{Coordinate, WaypointSequence};
pub use routing::{
    DistanceArgs, DistanceResult, ResponseFormat, RouteArgs, RouteGeometry, RouteOptions,
    RouteSummary, RoutingParams, TrafficModel, Units,
};
