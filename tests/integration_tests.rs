//! Integration tests for the Geoapify gateway

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use geoapify_gateway::{
    Coordinate, Endpoints, ErrorCode, GeoapifyError, HttpResponse, HttpTransport,
    ReqwestTransport, TransportError, normalize_waypoints, web,
};

/// Transport replaying one response and counting calls
struct StubTransport {
    response: HttpResponse,
    urls: Mutex<Vec<String>>,
}

impl StubTransport {
    fn new(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            response: HttpResponse::new(status, body.to_string()),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl HttpTransport for StubTransport {
    fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, TransportError> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(self.response.clone())
    }
}

type TestEndpoints = Endpoints<Arc<HashMap<String, String>>, Arc<StubTransport>>;

fn endpoints(transport: &Arc<StubTransport>) -> TestEndpoints {
    let settings = HashMap::from([
        ("geoapify_api_key".to_string(), "routing-key".to_string()),
        ("geoapify_key".to_string(), "suggest-key".to_string()),
    ]);
    Endpoints::new(Arc::new(settings), Arc::clone(transport))
}

fn distance_body() -> Value {
    json!({
        "properties": {"mode": "heavy_truck"},
        "results": [{"distance": 15234, "distance_units": "meters", "time": 1820.5, "toll": false}]
    })
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Read one request head from a local socket
fn read_request_head(stream: &mut std::net::TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// Serve a single canned response; the handle yields the request head
fn serve_once(status_line: &str, body: Value) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/v1", listener.local_addr().unwrap());
    let body = body.to_string();
    let response = format!(
        "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let head = read_request_head(&mut stream);
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        head
    });
    (base_url, handle)
}

#[test]
fn test_reqwest_transport_forwards_upstream_rejection() {
    let (base_url, server) = serve_once(
        "403 Forbidden",
        json!({"error": "Forbidden", "message": "Invalid apiKey"}),
    );
    let settings = HashMap::from([
        ("geoapify_api_key".to_string(), "live-key".to_string()),
        ("geoapify_base_url".to_string(), base_url),
    ]);
    let transport = Arc::new(ReqwestTransport::new().unwrap());
    let endpoints = Endpoints::new(Arc::new(settings), transport);

    let err = endpoints
        .dispatch(
            "heavy_truck_distance",
            json!({"origin_lat": 12.9, "origin_lon": 77.5, "dest_lat": 13.0, "dest_lon": 77.6}),
        )
        .unwrap_err();

    match err {
        GeoapifyError::UpstreamError { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body["message"], json!("Invalid apiKey"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }

    let head = server.join().unwrap();
    assert!(head.starts_with("GET /v1/routing?waypoints=12.9%2C77.5%7C13%2C77.6&mode=heavy_truck"));
    assert!(head.contains("apiKey=live-key"));
}

#[test]
fn test_reqwest_transport_honours_timeout_and_hides_key() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!(
        "http://{}/v1/routing?waypoints=1%2C2%7C3%2C4&apiKey=secret-key",
        listener.local_addr().unwrap()
    );
    // Accept, then hold the connection open without answering
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_request_head(&mut stream);
        thread::sleep(Duration::from_secs(5));
        drop(stream);
    });

    let transport = ReqwestTransport::new().unwrap();
    let start = Instant::now();
    let err = transport.get(&url, Duration::from_millis(300)).unwrap_err();

    assert!(start.elapsed() < Duration::from_secs(3));
    assert!(matches!(err, TransportError::Request(ref e) if e.is_timeout()));
    assert!(!err.to_string().contains("secret-key"));
    assert!(!format!("{err:?}").contains("secret-key"));
}

/// Every accepted waypoint shape normalizes to the same sequence
#[test]
fn test_waypoint_shapes_are_equivalent() {
    let expected = vec![
        Coordinate::new(12.9, 77.5).unwrap(),
        Coordinate::new(13.0, 77.6).unwrap(),
    ];
    let shapes = [
        json!("12.9,77.5|13.0,77.6"),
        json!(" 12.9 , 77.5 | 13.0,77.6 "),
        json!("[[12.9,77.5],[13.0,77.6]]"),
        json!([[12.9, 77.5], ["13.0", "77.6"]]),
        json!([{"lat": 12.9, "lon": 77.5}, {"lat": "13.0", "lon": 77.6}]),
        json!("[{\"lat\": 12.9, \"lon\": 77.5}, {\"lat\": 13.0, \"lon\": 77.6}]"),
    ];

    for shape in shapes {
        let sequence = normalize_waypoints(&shape).unwrap();
        assert_eq!(sequence.points(), expected.as_slice(), "shape {shape}");
        assert_eq!(sequence.encode(), "12.9,77.5|13,77.6");
    }
}

#[test]
fn test_waypoint_edge_cases() {
    assert!(normalize_waypoints(&Value::Null).unwrap().is_empty());
    assert!(normalize_waypoints(&json!("   ")).unwrap().is_empty());
    assert_eq!(normalize_waypoints(&json!({"lat": 1, "lon": 2})).unwrap().len(), 1);

    let err = normalize_waypoints(&json!("12.9,77.5|13.0")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidFormat);
    assert_eq!(err.to_string(), "Invalid waypoint '13.0'. Expected 'lat,lon'.");

    let err = normalize_waypoints(&json!("[12.9,")).unwrap_err();
    assert_eq!(err.to_string(), "Invalid waypoints JSON string.");

    let err = normalize_waypoints(&json!([[91, 0], [0, 0]])).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OutOfRange);
}

#[test]
fn test_dispatch_distance_through_endpoints() {
    let transport = StubTransport::new(200, distance_body());
    let message = endpoints(&transport)
        .dispatch(
            "geoapify.api.routing.heavy_truck_distance",
            json!({
                "origin_lat": 12.9, "origin_lon": 77.5,
                "dest_lat": "13.0", "dest_lon": "77.6",
                "units": "imperial", "traffic": "approximated"
            }),
        )
        .unwrap();

    assert_eq!(message["distance"], json!(15234.0));
    assert_eq!(message["time_seconds"], json!(1820.5));
    assert_eq!(message["mode"], json!("heavy_truck"));
    assert_eq!(message["raw"]["properties"]["mode"], json!("heavy_truck"));
    assert_eq!(message["raw"]["route"]["toll"], json!(false));

    let urls = transport.urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].starts_with("https://api.geoapify.com/v1/routing?"));
    assert!(urls[0].contains("mode=heavy_truck"));
    assert!(urls[0].contains("format=json"));
    assert!(urls[0].contains("units=imperial"));
    assert!(urls[0].contains("traffic=approximated"));
    assert!(urls[0].contains("apiKey=routing-key"));
}

#[test]
fn test_dispatch_upstream_rejection() {
    let transport = StubTransport::new(403, json!({"error": "Forbidden", "statusCode": 403}));
    let err = endpoints(&transport)
        .dispatch(
            "heavy_truck_route_geojson",
            json!({"waypoints": "12.9,77.5|13.0,77.6"}),
        )
        .unwrap_err();

    match err {
        GeoapifyError::UpstreamError { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body["error"], json!("Forbidden"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[test]
fn test_dispatch_short_autocomplete_makes_no_call() {
    let transport = StubTransport::new(200, json!({"features": []}));
    let message = endpoints(&transport)
        .dispatch("geoapify.geoapify.autocomplete", json!({"text": "ab"}))
        .unwrap();
    assert_eq!(message, json!([]));
    assert!(transport.urls().is_empty());
}

#[tokio::test]
async fn test_http_distance_envelope() {
    let transport = StubTransport::new(200, distance_body());
    let app = web::router(Arc::new(endpoints(&transport)));

    let request = Request::builder()
        .method("POST")
        .uri("/api/method/heavy_truck_distance?origin_lat=12.9&origin_lon=77.5")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"dest_lat": 13.0, "dest_lon": 77.6, "max_speed": 80}).to_string(),
        ))
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["distance"], json!(15234.0));
    assert!(transport.urls()[0].ends_with("max_speed=80"));
}

#[tokio::test]
async fn test_http_validation_error() {
    let transport = StubTransport::new(200, distance_body());
    let app = web::router(Arc::new(endpoints(&transport)));

    let request = Request::builder()
        .uri("/api/method/heavy_truck_distance?origin_lat=95&origin_lon=0&dest_lat=0&dest_lon=0")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::EXPECTATION_FAILED);
    assert_eq!(body["exc_type"], json!("OutOfRange"));
    assert_eq!(body["message"], json!("Latitude must be between -90 and 90."));
    assert!(transport.urls().is_empty());
}

#[tokio::test]
async fn test_http_unknown_method() {
    let transport = StubTransport::new(200, json!({}));
    let app = web::router(Arc::new(endpoints(&transport)));

    let request = Request::builder()
        .uri("/api/method/frappe.client.get_list")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["exc_type"], json!("UnknownMethod"));
}

#[tokio::test]
async fn test_http_autocomplete() {
    let transport = StubTransport::new(
        200,
        json!({"features": [{"properties": {
            "formatted": "Main Street 1, Berlin", "lat": 52.5, "lon": 13.4, "place_id": "abc"
        }}]}),
    );
    let app = web::router(Arc::new(endpoints(&transport)));

    let request = Request::builder()
        .uri("/api/method/autocomplete?text=Main")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        json!([{"label": "Main Street 1, Berlin", "lat": 52.5, "lon": 13.4, "place_id": "abc"}])
    );
    assert!(transport.urls()[0].contains("apiKey=suggest-key"));
}

#[tokio::test]
async fn test_health() {
    let transport = StubTransport::new(200, json!({}));
    let app = web::router(Arc::new(endpoints(&transport)));

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
}
