//! Waypoint normalization
//!
//! Callers hand waypoints over in whatever shape their form produced: a
//! `lat,lon|lat,lon` string, the same data JSON-encoded into a string, a
//! single `{lat, lon}` object, or a list of objects or pairs. Input is first
//! classified into a [`WaypointInput`] and then turned into a validated
//! [`WaypointSequence`].

use serde_json::{Map, Value};
use tracing::debug;

use crate::Result;
use crate::error::GeoapifyError;
use crate::models::{Coordinate, WaypointSequence};

/// A `{lat, lon}` mapping; either key may be missing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabeledPoint {
    pub lat: Option<Value>,
    pub lon: Option<Value>,
}

impl From<Map<String, Value>> for LabeledPoint {
    fn from(mut map: Map<String, Value>) -> Self {
        Self {
            lat: map.remove("lat"),
            lon: map.remove("lon"),
        }
    }
}

/// Accepted waypoint shapes
#[derive(Debug, Clone, PartialEq)]
pub enum WaypointInput {
    /// Absent or blank input
    Empty,
    /// `lat,lon|lat,lon|...`
    Delimited(String),
    /// JSON text holding one of the structured shapes
    Structured(String),
    /// A single `{lat, lon}` object
    Labeled(LabeledPoint),
    /// A list of `{lat, lon}` objects
    LabeledList(Vec<LabeledPoint>),
    /// A list of `[lat, lon]` pairs
    PairList(Vec<Vec<Value>>),
}

impl WaypointInput {
    /// Classify text input without parsing it
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let raw = text.trim();
        if raw.is_empty() {
            WaypointInput::Empty
        } else if raw.starts_with('[') || raw.starts_with('{') {
            WaypointInput::Structured(raw.to_string())
        } else {
            WaypointInput::Delimited(raw.to_string())
        }
    }

    /// Classify an arbitrary JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(WaypointInput::Empty),
            Value::String(text) => Ok(Self::from_text(&text)),
            Value::Object(map) => Ok(WaypointInput::Labeled(map.into())),
            Value::Array(items) => Self::from_list(items),
            other => Err(GeoapifyError::format(format!(
                "Invalid waypoints: {other}. Expected a string or a list of waypoints."
            ))),
        }
    }

    fn from_list(items: Vec<Value>) -> Result<Self> {
        if items.is_empty() {
            return Ok(WaypointInput::Empty);
        }

        if items.iter().all(Value::is_object) {
            let points = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(LabeledPoint::from(map)),
                    _ => None,
                })
                .collect();
            return Ok(WaypointInput::LabeledList(points));
        }

        if items.iter().all(Value::is_array) {
            let pairs = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Array(pair) => Some(pair),
                    _ => None,
                })
                .collect();
            return Ok(WaypointInput::PairList(pairs));
        }

        Err(GeoapifyError::format(
            "Invalid waypoints list. Use only {\"lat\", \"lon\"} objects or only [lat, lon] pairs.",
        ))
    }

    /// Validate every waypoint, failing on the first bad one
    pub fn normalize(self) -> Result<WaypointSequence> {
        let points = match self {
            WaypointInput::Empty => Vec::new(),
            WaypointInput::Delimited(text) => parse_delimited(&text)?,
            WaypointInput::Structured(text) => {
                let value: Value = serde_json::from_str(&text)
                    .map_err(|_| GeoapifyError::format("Invalid waypoints JSON string."))?;
                return Self::from_value(value)?.normalize();
            }
            WaypointInput::Labeled(point) => vec![labeled_coordinate(&point)?],
            WaypointInput::LabeledList(points) => points
                .iter()
                .map(labeled_coordinate)
                .collect::<Result<Vec<_>>>()?,
            WaypointInput::PairList(pairs) => pairs
                .iter()
                .map(|pair| pair_coordinate(pair))
                .collect::<Result<Vec<_>>>()?,
        };

        debug!("Normalized {} waypoints", points.len());
        Ok(WaypointSequence::new(points))
    }
}

/// Normalize any accepted waypoint shape
pub fn normalize_waypoints(value: &Value) -> Result<WaypointSequence> {
    WaypointInput::from_value(value.clone())?.normalize()
}

/// Convert one raw field to `f64`
///
/// Numbers pass through; strings are trimmed and parsed. Anything else,
/// including a missing field, is rejected with the raw value in the message.
pub fn parse_float(field: &str, value: Option<&Value>) -> Result<f64> {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        let raw = value.map_or_else(|| "null".to_string(), Value::to_string);
        GeoapifyError::number(field, raw)
    })
}

fn parse_delimited(text: &str) -> Result<Vec<Coordinate>> {
    text.split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let pieces: Vec<&str> = segment.split(',').map(str::trim).collect();
            let [lat, lon] = pieces.as_slice() else {
                return Err(GeoapifyError::format(format!(
                    "Invalid waypoint '{segment}'. Expected 'lat,lon'."
                )));
            };
            let lat = parse_text("lat", lat)?;
            let lon = parse_text("lon", lon)?;
            Coordinate::new(lat, lon)
        })
        .collect()
}

fn parse_text(field: &str, text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| GeoapifyError::number(field, format!("'{text}'")))
}

fn labeled_coordinate(point: &LabeledPoint) -> Result<Coordinate> {
    let lat = parse_float("lat", point.lat.as_ref())?;
    let lon = parse_float("lon", point.lon.as_ref())?;
    Coordinate::new(lat, lon)
}

fn pair_coordinate(pair: &[Value]) -> Result<Coordinate> {
    let [lat, lon] = pair else {
        return Err(GeoapifyError::format(format!(
            "Invalid waypoint {}. Expected [lat, lon].",
            Value::Array(pair.to_vec())
        )));
    };
    let lat = parse_float("lat", Some(lat))?;
    let lon = parse_float("lon", Some(lon))?;
    Coordinate::new(lat, lon)
}
