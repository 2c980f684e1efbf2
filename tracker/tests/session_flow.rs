use tracker::{
    Coordinate, LocationProvider, LocationSource, Metrics, Phase, RouteKind, RouteProvider,
    Session, Status, TrackerConfig, acquire_location,
    config::{DEFAULT_LOCATION, GeolocationOptions},
    error::{LocationError, RoutingError, SessionError},
    location::FixedLocation,
    osrm::{RoutedPath, parse_route_response},
    resolve_route,
    surface::{MarkerStyle, PathStyle, RecordingSurface},
};

struct DeniedLocation;

impl LocationProvider for DeniedLocation {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<Coordinate, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}

struct OfflineRouter;

impl RouteProvider for OfflineRouter {
    async fn fetch_route(
        &self,
        _start: Coordinate,
        _end: Coordinate,
    ) -> Result<RoutedPath, RoutingError> {
        Err(RoutingError::Status(503))
    }
}

struct CannedRouter(&'static str);

impl RouteProvider for CannedRouter {
    async fn fetch_route(
        &self,
        _start: Coordinate,
        _end: Coordinate,
    ) -> Result<RoutedPath, RoutingError> {
        parse_route_response(self.0)
    }
}

const CANNED: &str = r#"{"routes":[{"distance":5000,"duration":600,
    "geometry":{"coordinates":[[-76.53,3.45],[-76.515,3.43],[-76.50,3.40]]}}]}"#;

#[tokio::test]
async fn denied_location_still_reaches_location_known() {
    let config = TrackerConfig::default();
    let mut session = Session::new(&config);
    let mut surface = RecordingSurface::new();

    let request = session.begin_location_request();
    let fix = acquire_location(&DeniedLocation, &config.geolocation, config.default_location).await;
    assert_eq!(fix.coordinate, DEFAULT_LOCATION);
    assert_eq!(fix.source, LocationSource::Fallback);

    session.update_location(request, fix, &mut surface);
    assert_eq!(session.phase(), Phase::LocationKnown);
    assert_eq!(session.status(), Status::ReadyToPick);
    assert_eq!(surface.markers_with(MarkerStyle::User), vec![DEFAULT_LOCATION]);
}

#[tokio::test]
async fn pick_destination_with_routing_service() {
    let config = TrackerConfig::default();
    let mut session = Session::new(&config);
    let mut surface = RecordingSurface::new();
    let home = Coordinate::new(3.452, -76.531);

    let request = session.begin_location_request();
    let fix = acquire_location(
        &FixedLocation(home),
        &config.geolocation,
        config.default_location,
    )
    .await;
    session.update_location(request, fix, &mut surface);
    session.request_selection().unwrap();

    let destination = Coordinate::new(3.40, -76.50);
    let ticket = session.on_map_click(destination, &mut surface).unwrap();
    let route = resolve_route(&CannedRouter(CANNED), ticket.start, ticket.end).await;
    assert!(session.complete_route(ticket, route, &mut surface));

    assert_eq!(session.status(), Status::RouteShown);
    assert_eq!(
        session.metrics(),
        Metrics {
            distance_km: 5.0,
            time_minutes: 15,
            calories_kcal: 350,
        }
    );
    assert_eq!(session.route().unwrap().kind, RouteKind::Routed);
    assert_eq!(session.route().unwrap().path.len(), 3);
    assert_eq!(session.instructions().len(), 6);
    assert_eq!(surface.paths[0].style, PathStyle::Solid);
    assert_eq!(session.daily_progress_percent(config.daily_goal_km), 100.0);
}

#[tokio::test]
async fn offline_refresh_keeps_a_direct_route() {
    let config = TrackerConfig::default();
    let mut session = Session::new(&config);
    let mut surface = RecordingSurface::new();
    let start = Coordinate::new(3.4516, -76.5320);
    let end = Coordinate::new(3.46, -76.54);

    let request = session.begin_location_request();
    session.update_location(
        request,
        acquire_location(&FixedLocation(start), &config.geolocation, config.default_location).await,
        &mut surface,
    );
    session.request_selection().unwrap();
    let ticket = session.on_map_click(end, &mut surface).unwrap();
    let route = resolve_route(&OfflineRouter, ticket.start, ticket.end).await;
    session.complete_route(ticket, route, &mut surface);
    assert_eq!(session.route().unwrap().path, vec![start, end]);

    // Refresh: a new fix with a destination on screen recomputes the route.
    let moved = Coordinate::new(3.455, -76.535);
    let request = session.begin_location_request();
    let ticket = session
        .update_location(
            request,
            acquire_location(&FixedLocation(moved), &config.geolocation, config.default_location)
                .await,
            &mut surface,
        )
        .unwrap();
    let route = resolve_route(&OfflineRouter, ticket.start, ticket.end).await;
    assert!(session.complete_route(ticket, route, &mut surface));

    assert_eq!(session.route().unwrap().path, vec![moved, end]);
    assert_eq!(surface.paths.len(), 1);
    assert_eq!(surface.paths[0].style, PathStyle::Dashed);
    assert_eq!(surface.markers_with(MarkerStyle::Destination), vec![end]);
}

#[tokio::test]
async fn slow_fallback_fix_cannot_replace_a_newer_device_fix() {
    let config = TrackerConfig::default();
    let mut session = Session::new(&config);
    let mut surface = RecordingSurface::new();
    let home = Coordinate::new(3.452, -76.531);
    let end = Coordinate::new(3.46, -76.54);

    let request = session.begin_location_request();
    let fix = acquire_location(&FixedLocation(home), &config.geolocation, DEFAULT_LOCATION).await;
    session.update_location(request, fix, &mut surface);
    session.request_selection().unwrap();
    let ticket = session.on_map_click(end, &mut surface).unwrap();
    let route = resolve_route(&OfflineRouter, ticket.start, ticket.end).await;
    assert!(session.complete_route(ticket, route, &mut surface));

    // Two refreshes in flight: the first times out slowly, the second answers.
    let slow = session.begin_location_request();
    let fast = session.begin_location_request();
    let moved = Coordinate::new(3.455, -76.535);
    let fresh =
        acquire_location(&FixedLocation(moved), &config.geolocation, DEFAULT_LOCATION).await;
    let ticket = session.update_location(fast, fresh, &mut surface).unwrap();

    let stale = acquire_location(&DeniedLocation, &config.geolocation, DEFAULT_LOCATION).await;
    assert_eq!(stale.source, LocationSource::Fallback);
    assert!(session.update_location(slow, stale, &mut surface).is_none());

    let route = resolve_route(&OfflineRouter, ticket.start, ticket.end).await;
    assert!(session.complete_route(ticket, route, &mut surface));
    assert_eq!(session.location().unwrap().coordinate, moved);
    assert_eq!(session.route().unwrap().path, vec![moved, end]);
    assert_eq!(surface.markers_with(MarkerStyle::User), vec![moved]);
}

#[test]
fn selection_before_location_is_refused() {
    let mut session = Session::new(&TrackerConfig::default());
    let mut surface = RecordingSurface::new();

    assert_eq!(session.request_selection(), Err(SessionError::LocationUnknown));
    assert!(session.on_map_click(Coordinate::new(3.46, -76.54), &mut surface).is_none());
    assert!(!session.is_selecting());
}
