//! `geoapify-gateway` - Heavy-truck routing and address autocomplete
//!
//! This library normalizes loosely formatted waypoint input, calls the
//! Geoapify Routing and Geocoding APIs, and reshapes their answers for
//! host applications. [`rpc::Endpoints`] exposes the operations by name and
//! [`web`] serves them over HTTP.

pub mod autocomplete;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routing;
pub mod rpc;
pub mod transport;
pub mod waypoints;
pub mod web;

#[cfg(test)]
mod test_support;

// Re-export core types for public API
pub use autocomplete::AutocompleteGateway;
pub use config::{ConfigProvider, GeoapifyConfig};
pub use error::{Axis, ErrorCode, GeoapifyError};
pub use models::{
    Coordinate, DistanceArgs, DistanceResult, RouteArgs, RouteGeometry, RouteOptions,
    Suggestion, WaypointSequence,
};
pub use routing::{RoutingGateway, resolve_api_key};
pub use rpc::{Endpoints, Method};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use waypoints::{WaypointInput, normalize_waypoints, parse_float};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GeoapifyError>;
