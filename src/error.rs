//! Error types and handling for the Geoapify gateway

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;

/// Coordinate axis named by range errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Inclusive bound for this axis
    #[must_use]
    pub fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("Latitude"),
            Axis::Longitude => f.write_str("Longitude"),
        }
    }
}

/// Main error type for the gateway
///
/// Every variant renders as a message fit to show the user who invoked the
/// endpoint.
#[derive(Error, Debug)]
pub enum GeoapifyError {
    /// No API key could be resolved
    #[error(
        "Geoapify API key missing. Set {setting} in the site configuration or pass api_key explicitly."
    )]
    MissingCredential { setting: String },

    /// A coordinate field is not numeric
    #[error("Invalid {field}: {value}. Must be a number.")]
    InvalidNumber { field: String, value: String },

    /// Latitude or longitude outside valid bounds
    #[error("{axis} must be between -{limit} and {limit}.", limit = .axis.limit())]
    OutOfRange { axis: Axis, value: f64 },

    /// Malformed waypoint string or structure
    #[error("{0}")]
    InvalidFormat(String),

    /// Fewer than two waypoints for a multi-point route
    #[error("At least 2 waypoints are required.")]
    InsufficientWaypoints { found: usize },

    /// The provider could not be reached
    #[error("Geoapify routing request failed: {0}")]
    UpstreamUnavailable(#[source] TransportError),

    /// The provider answered with a non-success status
    #[error("Geoapify routing error ({status}): {body}")]
    UpstreamError { status: u16, body: Value },

    /// The provider succeeded but returned nothing usable
    #[error("{0}")]
    EmptyResult(String),

    /// A success response that could not be decoded
    #[error("Invalid response from Geoapify: {0}")]
    InvalidResponse(String),

    /// Transport failure surfaced as-is
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Endpoint arguments could not be decoded
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The method is not whitelisted
    #[error("Method not found: {0}")]
    UnknownMethod(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stable machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MissingCredential,
    InvalidNumber,
    OutOfRange,
    InvalidFormat,
    InsufficientWaypoints,
    UpstreamUnavailable,
    UpstreamError,
    EmptyResult,
    InvalidResponse,
    Transport,
    InvalidArguments,
    UnknownMethod,
    Config,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingCredential => "MissingCredential",
            ErrorCode::InvalidNumber => "InvalidNumber",
            ErrorCode::OutOfRange => "OutOfRange",
            ErrorCode::InvalidFormat => "InvalidFormat",
            ErrorCode::InsufficientWaypoints => "InsufficientWaypoints",
            ErrorCode::UpstreamUnavailable => "UpstreamUnavailable",
            ErrorCode::UpstreamError => "UpstreamError",
            ErrorCode::EmptyResult => "EmptyResult",
            ErrorCode::InvalidResponse => "InvalidResponse",
            ErrorCode::Transport => "Transport",
            ErrorCode::InvalidArguments => "InvalidArguments",
            ErrorCode::UnknownMethod => "UnknownMethod",
            ErrorCode::Config => "Config",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GeoapifyError {
    /// Create a new format error
    pub fn format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat(message.into())
    }

    /// Create a new numeric parsing error
    pub fn number<F: Into<String>, V: Into<String>>(field: F, value: V) -> Self {
        Self::InvalidNumber {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Get the error code for this error
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            GeoapifyError::MissingCredential { .. } => ErrorCode::MissingCredential,
            GeoapifyError::InvalidNumber { .. } => ErrorCode::InvalidNumber,
            GeoapifyError::OutOfRange { .. } => ErrorCode::OutOfRange,
            GeoapifyError::InvalidFormat(_) => ErrorCode::InvalidFormat,
            GeoapifyError::InsufficientWaypoints { .. } => ErrorCode::InsufficientWaypoints,
            GeoapifyError::UpstreamUnavailable(_) => ErrorCode::UpstreamUnavailable,
            GeoapifyError::UpstreamError { .. } => ErrorCode::UpstreamError,
            GeoapifyError::EmptyResult(_) => ErrorCode::EmptyResult,
            GeoapifyError::InvalidResponse(_) => ErrorCode::InvalidResponse,
            GeoapifyError::Transport(_) => ErrorCode::Transport,
            GeoapifyError::InvalidArguments(_) => ErrorCode::InvalidArguments,
            GeoapifyError::UnknownMethod(_) => ErrorCode::UnknownMethod,
            GeoapifyError::Config(_) => ErrorCode::Config,
        }
    }

    /// True for errors caused by the caller's input
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            GeoapifyError::InvalidNumber { .. }
                | GeoapifyError::OutOfRange { .. }
                | GeoapifyError::InvalidFormat(_)
                | GeoapifyError::InsufficientWaypoints { .. }
                | GeoapifyError::InvalidArguments(_)
        )
    }
}
