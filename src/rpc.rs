//! Whitelisted RPC endpoints
//!
//! Hosts forward endpoint calls as a method name plus a flat object of
//! keyword arguments. This module decodes those arguments and routes the
//! call to the right gateway.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::Result;
use crate::autocomplete::AutocompleteGateway;
use crate::config::ConfigProvider;
use crate::error::GeoapifyError;
use crate::models::{DistanceArgs, RouteArgs};
use crate::routing::RoutingGateway;
use crate::transport::HttpTransport;

/// Whitelisted methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    HeavyTruckDistance,
    HeavyTruckRouteGeojson,
    Autocomplete,
}

impl Method {
    pub const ALL: [Method; 3] = [
        Method::HeavyTruckDistance,
        Method::HeavyTruckRouteGeojson,
        Method::Autocomplete,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Method::HeavyTruckDistance => "heavy_truck_distance",
            Method::HeavyTruckRouteGeojson => "heavy_truck_route_geojson",
            Method::Autocomplete => "autocomplete",
        }
    }

    /// Fully qualified dotted path of the method
    #[must_use]
    pub fn qualified_name(self) -> &'static str {
        match self {
            Method::HeavyTruckDistance => "geoapify.api.routing.heavy_truck_distance",
            Method::HeavyTruckRouteGeojson => "geoapify.api.routing.heavy_truck_route_geojson",
            Method::Autocomplete => "geoapify.geoapify.autocomplete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}

impl FromStr for Method {
    type Err = GeoapifyError;

    fn from_str(name: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == name || m.qualified_name() == name)
            .ok_or_else(|| GeoapifyError::UnknownMethod(name.to_string()))
    }
}

/// Arguments of the autocomplete endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutocompleteArgs {
    #[serde(default)]
    pub text: Option<String>,
}

/// All endpoints, wired to one configuration and transport
pub struct Endpoints<C, T> {
    routing: RoutingGateway<C, T>,
    autocomplete: AutocompleteGateway<C, T>,
}

impl<C, T> Endpoints<C, T>
where
    C: ConfigProvider + Clone,
    T: HttpTransport + Clone,
{
    pub fn new(config: C, transport: T) -> Self {
        Self {
            routing: RoutingGateway::new(config.clone(), transport.clone()),
            autocomplete: AutocompleteGateway::new(config, transport),
        }
    }
}

impl<C: ConfigProvider, T: HttpTransport> Endpoints<C, T> {
    /// Call a whitelisted method with keyword arguments
    #[instrument(skip(self, args))]
    pub fn dispatch(&self, method: &str, args: Value) -> Result<Value> {
        let method: Method = method.parse()?;
        debug!("Dispatching {}", method);

        let args = match args {
            Value::Null => Value::Object(Default::default()),
            args => args,
        };

        match method {
            Method::HeavyTruckDistance => {
                let args: DistanceArgs = decode_args(args)?;
                to_message(&self.routing.heavy_truck_distance(&args)?)
            }
            Method::HeavyTruckRouteGeojson => {
                let args: RouteArgs = decode_args(args)?;
                to_message(&self.routing.heavy_truck_route_geojson(&args)?)
            }
            Method::Autocomplete => {
                let args: AutocompleteArgs = decode_args(args)?;
                to_message(&self.autocomplete.autocomplete(args.text.as_deref())?)
            }
        }
    }
}

fn decode_args<A: DeserializeOwned>(args: Value) -> Result<A> {
    serde_json::from_value(args).map_err(|e| GeoapifyError::InvalidArguments(e.to_string()))
}

fn to_message<R: serde::Serialize>(result: &R) -> Result<Value> {
    serde_json::to_value(result).map_err(|e| GeoapifyError::InvalidResponse(e.to_string()))
}
