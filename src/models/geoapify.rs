//! Geoapify API response structures
//!
//! Only the fields the gateway reads are modelled; everything else is
//! ignored on deserialization.

use serde::Deserialize;
use serde_json::Value;

use super::autocomplete::Suggestion;
use super::routing::{RouteFields, RouteSummary};

/// Routing response in `json` format
#[derive(Debug, Deserialize)]
pub struct PlainRoutingResponse {
    #[serde(default)]
    pub properties: Option<Value>,
    #[serde(default)]
    pub results: Option<Vec<RouteFields>>,
}

/// Properties of a routing feature in `geojson` format
///
/// Values are kept as the provider sent them.
#[derive(Debug, Deserialize, Default)]
pub struct RouteFeatureProperties {
    pub distance: Option<Value>,
    pub distance_units: Option<Value>,
    pub time: Option<Value>,
    pub mode: Option<Value>,
    pub units: Option<Value>,
    pub toll: Option<Value>,
}

impl From<RouteFeatureProperties> for RouteSummary {
    fn from(properties: RouteFeatureProperties) -> Self {
        Self {
            distance: properties.distance,
            distance_units: properties.distance_units,
            time_seconds: properties.time,
            mode: properties.mode,
            units: properties.units,
            toll: properties.toll,
        }
    }
}

/// Autocomplete feature
#[derive(Debug, Deserialize)]
pub struct AutocompleteFeature {
    pub properties: AutocompleteProperties,
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteProperties {
    pub formatted: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub place_id: Option<String>,
}

impl From<AutocompleteFeature> for Suggestion {
    fn from(feature: AutocompleteFeature) -> Self {
        let properties = feature.properties;
        Self {
            label: properties.formatted,
            lat: properties.lat,
            lon: properties.lon,
            place_id: properties.place_id,
        }
    }
}
