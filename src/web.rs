//! HTTP host exposing the endpoints under `/api/method/{method}`

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde_json::{Map, Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ConfigProvider;
use crate::rpc::Endpoints;
use crate::transport::HttpTransport;
use crate::{GeoapifyError, Result};

/// Shared endpoints handed to every request
pub type SharedEndpoints<C, T> = Arc<Endpoints<C, T>>;

pub fn router<C, T>(endpoints: SharedEndpoints<C, T>) -> Router
where
    C: ConfigProvider + Send + Sync + 'static,
    T: HttpTransport + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/method/{method}", get(call::<C, T>).post(call::<C, T>))
        .with_state(endpoints)
}

pub async fn run(app: Router, host: &str, port: u16) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = app.layer(cors).layer(TraceLayer::new_for_http());

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GeoapifyError::config(format!("Failed to bind {addr}: {e}")))?;
    info!("Geoapify gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| GeoapifyError::config(format!("Server error: {e}")))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "version": crate::VERSION}))
}

async fn call<C, T>(
    State(endpoints): State<SharedEndpoints<C, T>>,
    Path(method): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response
where
    C: ConfigProvider + Send + Sync + 'static,
    T: HttpTransport + Send + Sync + 'static,
{
    let args = match merge_args(query, &body) {
        Ok(args) => args,
        Err(e) => return error_response(&e),
    };

    // Gateways block on the provider call
    let outcome =
        tokio::task::spawn_blocking(move || endpoints.dispatch(&method, Value::Object(args))).await;

    match outcome {
        Ok(Ok(message)) => Json(json!({"message": message})).into_response(),
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            error!("Endpoint task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"exc_type": "InternalError", "message": e.to_string()})),
            )
                .into_response()
        }
    }
}

/// Query string arguments overlaid with the JSON body; body keys win
fn merge_args(query: HashMap<String, String>, body: &[u8]) -> Result<Map<String, Value>> {
    let mut args: Map<String, Value> = query
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(args);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => {
            args.extend(fields);
            Ok(args)
        }
        Ok(_) => Err(GeoapifyError::InvalidArguments(
            "request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(GeoapifyError::InvalidArguments(e.to_string())),
    }
}

/// HTTP status for an endpoint failure
#[must_use]
pub fn status_for(err: &GeoapifyError) -> StatusCode {
    match err {
        e if e.is_user_error() => StatusCode::EXPECTATION_FAILED,
        GeoapifyError::UnknownMethod(_) => StatusCode::NOT_FOUND,
        GeoapifyError::MissingCredential { .. } | GeoapifyError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(err: &GeoapifyError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        warn!("Endpoint failed: {}", err);
    }
    (
        status,
        Json(json!({"exc_type": err.code().as_str(), "message": err.to_string()})),
    )
        .into_response()
}
