use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tracker::{
    Coordinate, OsrmClient, RouteKind, RouteProvider, TrackerConfig, error::RoutingError,
    geo::haversine_km, resolve_route,
};

const START: Coordinate = Coordinate::new(3.4516, -76.5320);
const END: Coordinate = Coordinate::new(3.46, -76.54);

#[derive(Clone, Copy)]
enum Behaviour {
    Route,
    Empty,
    ServerError,
    Garbage,
}

async fn spawn_osrm(behaviour: Behaviour) -> SocketAddr {
    let handler = move |Path((profile, coords)): Path<(String, String)>,
                        Query(query): Query<HashMap<String, String>>| async move {
        assert_eq!(profile, "driving");
        assert_eq!(coords, "-76.532,3.4516;-76.54,3.46");
        assert_eq!(query.get("overview").map(String::as_str), Some("full"));
        assert_eq!(query.get("geometries").map(String::as_str), Some("geojson"));

        let response: Response = match behaviour {
            Behaviour::Route => Json(json!({
                "code": "Ok",
                "routes": [{
                    "distance": 5000,
                    "duration": 600,
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[-76.53, 3.45], [-76.50, 3.40]]
                    }
                }]
            }))
            .into_response(),
            Behaviour::Empty => Json(json!({"code": "NoRoute", "routes": []})).into_response(),
            Behaviour::ServerError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            Behaviour::Garbage => "<html>bad gateway</html>".into_response(),
        };
        response
    };

    let app = Router::new().route("/route/v1/:profile/:coords", get(handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> OsrmClient {
    let config = TrackerConfig::default().with_routing_url(&format!("http://{addr}"));
    OsrmClient::new(&config.routing)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn routed_path_from_service() {
    init_tracing();
    let client = client_for(spawn_osrm(Behaviour::Route).await);

    let route = resolve_route(&client, START, END).await;
    assert_eq!(route.kind, RouteKind::Routed);
    assert_eq!(route.metrics.distance_km, 5.0);
    assert_eq!(route.metrics.time_minutes, 15);
    assert_eq!(route.metrics.calories_kcal, 350);
    assert_eq!(
        route.path,
        vec![Coordinate::new(3.45, -76.53), Coordinate::new(3.40, -76.50)]
    );
}

#[tokio::test]
async fn empty_result_falls_back_to_direct_route() {
    init_tracing();
    let client = client_for(spawn_osrm(Behaviour::Empty).await);

    assert!(matches!(
        client.fetch_route(START, END).await,
        Err(RoutingError::NoRoute(_))
    ));

    let route = resolve_route(&client, START, END).await;
    assert_eq!(route.kind, RouteKind::Direct);
    assert_eq!(route.path, vec![START, END]);
}

#[tokio::test]
async fn server_error_falls_back_to_direct_route() {
    init_tracing();
    let client = client_for(spawn_osrm(Behaviour::ServerError).await);

    assert!(matches!(
        client.fetch_route(START, END).await,
        Err(RoutingError::Status(500))
    ));

    let route = resolve_route(&client, START, END).await;
    assert_eq!(route.path, vec![START, END]);
    assert!((route.metrics.distance_km - haversine_km(START, END)).abs() < 1e-12);
}

#[tokio::test]
async fn malformed_body_falls_back_to_direct_route() {
    init_tracing();
    let client = client_for(spawn_osrm(Behaviour::Garbage).await);

    assert!(matches!(
        client.fetch_route(START, END).await,
        Err(RoutingError::Decode(_))
    ));
    assert_eq!(resolve_route(&client, START, END).await.kind, RouteKind::Direct);
}

#[tokio::test]
async fn unreachable_service_falls_back_to_direct_route() {
    init_tracing();
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr);
    assert!(matches!(
        client.fetch_route(START, END).await,
        Err(RoutingError::Http(_))
    ));
    assert_eq!(resolve_route(&client, START, END).await.kind, RouteKind::Direct);
}
