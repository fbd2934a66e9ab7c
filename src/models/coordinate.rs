//! Coordinate model for validated geographic points

use std::fmt;

use serde::Serialize;

use crate::Result;
use crate::error::{Axis, GeoapifyError};

/// A validated latitude/longitude pair
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, checking latitude then longitude bounds
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoapifyError::OutOfRange {
                axis: Axis::Latitude,
                value: latitude,
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoapifyError::OutOfRange {
                axis: Axis::Longitude,
                value: longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Renders as `lat,lon` with no rounding
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Ordered list of waypoints, in traversal order
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct WaypointSequence(Vec<Coordinate>);

impl WaypointSequence {
    #[must_use]
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self(points)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.0.iter()
    }

    #[must_use]
    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    /// Wire form expected by the routing API: `lat,lon|lat,lon|...`
    #[must_use]
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(Coordinate::to_string)
            .collect::<Vec<_>>()
            .join("|")
    }
}
