//! Routing request options and reshaped routing results

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Travel mode sent with every routing request
pub const TRAVEL_MODE: &str = "heavy_truck";

/// Distance units requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traffic model used by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficModel {
    #[default]
    FreeFlow,
    Approximated,
}

impl TrafficModel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TrafficModel::FreeFlow => "free_flow",
            TrafficModel::Approximated => "approximated",
        }
    }
}

impl fmt::Display for TrafficModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response format of the routing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Plain JSON with a `results` array
    Json,
    /// GeoJSON feature collection with geometry
    GeoJson,
}

impl ResponseFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::GeoJson => "geojson",
        }
    }
}

/// Options shared by both routing endpoints, as received from the caller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteOptions {
    #[serde(default)]
    pub units: Units,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub traffic: TrafficModel,
    /// Raw value; parsed into an integer by the gateway
    #[serde(default)]
    pub max_speed: Option<Value>,
}

/// Arguments of the two-point distance endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceArgs {
    pub origin_lat: Value,
    pub origin_lon: Value,
    pub dest_lat: Value,
    pub dest_lon: Value,
    #[serde(flatten)]
    pub options: RouteOptions,
}

/// Arguments of the multi-point geometry endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RouteArgs {
    #[serde(default)]
    pub waypoints: Value,
    #[serde(flatten)]
    pub options: RouteOptions,
}

/// Fully resolved parameters of one routing request
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingParams {
    pub waypoints: String,
    pub format: ResponseFormat,
    pub units: Units,
    pub traffic: TrafficModel,
    pub max_speed: Option<i64>,
    pub api_key: String,
}

impl RoutingParams {
    /// Query parameters in the order the provider documents them
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("waypoints", self.waypoints.clone()),
            ("mode", TRAVEL_MODE.to_string()),
            ("format", self.format.as_str().to_string()),
            ("units", self.units.as_str().to_string()),
            ("traffic", self.traffic.as_str().to_string()),
            ("apiKey", self.api_key.clone()),
        ];
        if let Some(max_speed) = self.max_speed {
            params.push(("max_speed", max_speed.to_string()));
        }
        params
    }
}

/// Selected fields of the first route, echoed back for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RouteFields {
    pub distance: Option<f64>,
    pub distance_units: Option<String>,
    pub time: Option<f64>,
    pub toll: Option<bool>,
    pub ferry: Option<bool>,
}

/// Trimmed provider payload attached to a distance result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRouting {
    pub properties: Option<Value>,
    pub route: RouteFields,
}

/// Result of the two-point distance endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceResult {
    pub distance: Option<f64>,
    pub distance_units: Option<String>,
    pub time_seconds: Option<f64>,
    pub mode: String,
    pub raw: RawRouting,
}

impl From<(Option<Value>, RouteFields)> for DistanceResult {
    fn from((properties, route): (Option<Value>, RouteFields)) -> Self {
        Self {
            distance: route.distance,
            distance_units: route.distance_units.clone(),
            time_seconds: route.time,
            mode: TRAVEL_MODE.to_string(),
            raw: RawRouting { properties, route },
        }
    }
}

/// Summary of a geometry route, copied from the first feature
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct RouteSummary {
    pub distance: Option<Value>,
    pub distance_units: Option<Value>,
    pub time_seconds: Option<Value>,
    pub mode: Option<Value>,
    pub units: Option<Value>,
    pub toll: Option<Value>,
}

/// Result of the multi-point geometry endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteGeometry {
    pub summary: RouteSummary,
    /// Provider feature collection, unmodified
    pub geojson: Value,
}
