//! Heavy-truck routing through the Geoapify Routing API
//!
//! Two operations share one request path: a two-point distance summary in
//! the plain `json` format, and a multi-point route in `geojson` format whose
//! feature collection is handed back untouched for map display.

use std::time::{Duration, Instant};

use serde_json::{Value, json};
use tracing::{debug, error, info, instrument, warn};

use crate::Result;
use crate::config::{ConfigProvider, ROUTING_KEY_SETTING};
use crate::error::GeoapifyError;
use crate::models::geoapify::{PlainRoutingResponse, RouteFeatureProperties};
use crate::models::{
    Coordinate, DistanceArgs, DistanceResult, ResponseFormat, RouteArgs, RouteGeometry,
    RouteOptions, RoutingParams, WaypointSequence,
};
use crate::transport::{HttpTransport, build_url};
use crate::waypoints::{WaypointInput, parse_float};

/// Timeout of the two-point distance request
pub const DISTANCE_TIMEOUT: Duration = Duration::from_secs(20);
/// Timeout of the multi-point geometry request
pub const GEOMETRY_TIMEOUT: Duration = Duration::from_secs(25);

/// Resolve the API key: a non-blank explicit key wins over the setting
pub fn resolve_api_key<C: ConfigProvider + ?Sized>(
    explicit: Option<&str>,
    config: &C,
    setting: &str,
) -> Result<String> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    config
        .get_value(setting)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| GeoapifyError::MissingCredential {
            setting: setting.to_string(),
        })
}

/// Parse the optional speed cap into an integer
///
/// Floats are truncated toward zero; strings must hold an integer. A blank
/// string means no cap.
pub fn parse_max_speed(value: Option<&Value>) -> Result<Option<i64>> {
    let invalid = |v: &Value| GeoapifyError::number("max_speed", v.to_string());
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| invalid(v)),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(v @ Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| invalid(v)),
        Some(v) => Err(invalid(v)),
    }
}

/// Gateway to the routing endpoint
pub struct RoutingGateway<C, T> {
    config: C,
    transport: T,
}

impl<C: ConfigProvider, T: HttpTransport> RoutingGateway<C, T> {
    pub fn new(config: C, transport: T) -> Self {
        Self { config, transport }
    }

    /// Distance and travel time between two points
    #[instrument(skip_all)]
    pub fn heavy_truck_distance(&self, args: &DistanceArgs) -> Result<DistanceResult> {
        let origin_lat = parse_float("origin_lat", Some(&args.origin_lat))?;
        let origin_lon = parse_float("origin_lon", Some(&args.origin_lon))?;
        let dest_lat = parse_float("dest_lat", Some(&args.dest_lat))?;
        let dest_lon = parse_float("dest_lon", Some(&args.dest_lon))?;

        let waypoints = WaypointSequence::new(vec![
            Coordinate::new(origin_lat, origin_lon)?,
            Coordinate::new(dest_lat, dest_lon)?,
        ]);

        let api_key = self.api_key(&args.options)?;
        let params =
            Self::build_params(&args.options, api_key, &waypoints, ResponseFormat::Json)?;
        let data = self.fetch(&params, DISTANCE_TIMEOUT)?;

        let response: PlainRoutingResponse = serde_json::from_value(data)
            .map_err(|e| GeoapifyError::InvalidResponse(e.to_string()))?;

        let route = response
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                GeoapifyError::EmptyResult(
                    "Geoapify returned no routes (results array empty).".to_string(),
                )
            })?;

        info!(
            "Heavy-truck distance {:?} {} in {:?}s",
            route.distance,
            route.distance_units.as_deref().unwrap_or("?"),
            route.time
        );

        Ok(DistanceResult::from((response.properties, route)))
    }

    /// Road-following route geometry through two or more waypoints
    #[instrument(skip_all)]
    pub fn heavy_truck_route_geojson(&self, args: &RouteArgs) -> Result<RouteGeometry> {
        // Key first: a missing key is reported before any input problem.
        let api_key = self.api_key(&args.options)?;

        let waypoints = WaypointInput::from_value(args.waypoints.clone())?.normalize()?;
        if waypoints.len() < 2 {
            return Err(GeoapifyError::InsufficientWaypoints {
                found: waypoints.len(),
            });
        }

        let params =
            Self::build_params(&args.options, api_key, &waypoints, ResponseFormat::GeoJson)?;
        let feature_collection = self.fetch(&params, GEOMETRY_TIMEOUT)?;

        let properties = {
            let features = feature_collection
                .get("features")
                .and_then(Value::as_array)
                .filter(|features| !features.is_empty())
                .ok_or_else(|| {
                    GeoapifyError::EmptyResult(
                        "Geoapify returned no features (empty FeatureCollection).".to_string(),
                    )
                })?;

            match features[0].get("properties") {
                Some(props @ Value::Object(_)) => {
                    serde_json::from_value::<RouteFeatureProperties>(props.clone())
                        .map_err(|e| GeoapifyError::InvalidResponse(e.to_string()))?
                }
                _ => RouteFeatureProperties::default(),
            }
        };

        info!(
            "Heavy-truck route through {} waypoints: {:?} {:?}",
            waypoints.len(),
            properties.distance,
            properties.distance_units
        );

        Ok(RouteGeometry {
            summary: properties.into(),
            geojson: feature_collection,
        })
    }

    fn api_key(&self, options: &RouteOptions) -> Result<String> {
        resolve_api_key(
            options.api_key.as_deref(),
            &self.config,
            ROUTING_KEY_SETTING,
        )
    }

    fn build_params(
        options: &RouteOptions,
        api_key: String,
        waypoints: &WaypointSequence,
        format: ResponseFormat,
    ) -> Result<RoutingParams> {
        Ok(RoutingParams {
            waypoints: waypoints.encode(),
            format,
            units: options.units,
            traffic: options.traffic,
            max_speed: parse_max_speed(options.max_speed.as_ref())?,
            api_key,
        })
    }

    /// One GET to the routing endpoint; returns the decoded success body
    fn fetch(&self, params: &RoutingParams, timeout: Duration) -> Result<Value> {
        let url = build_url(
            &format!("{}/routing", self.config.base_url()),
            &params.to_query(),
        );

        debug!(
            "Routing request: waypoints={} format={} units={} traffic={} max_speed={:?}",
            params.waypoints,
            params.format.as_str(),
            params.units,
            params.traffic,
            params.max_speed
        );
        let start = Instant::now();

        let response = self.transport.get(&url, timeout).map_err(|e| {
            error!("Geoapify routing request failed: {}", e);
            GeoapifyError::UpstreamUnavailable(e)
        })?;

        if !response.is_success() {
            let body = serde_json::from_str::<Value>(&response.body)
                .unwrap_or_else(|_| json!({ "message": response.body }));
            warn!(
                "Geoapify routing returned HTTP {}: {}",
                response.status, body
            );
            return Err(GeoapifyError::UpstreamError {
                status: response.status,
                body,
            });
        }

        let elapsed = start.elapsed();
        if elapsed > Duration::from_secs(5) {
            warn!("Slow routing response: {:.3}s", elapsed.as_secs_f64());
        }

        serde_json::from_str(&response.body).map_err(|e| {
            error!("Failed to parse routing response: {}", e);
            GeoapifyError::InvalidResponse(e.to_string())
        })
    }
}
