mod map_bridge;

use seed::{prelude::*, *};
use shared::Coordinate;
use tracker::{
    LocationFix, LocationTicket, MapSurface, OsrmClient, ResolvedRoute, RouteKind, RouteTicket,
    Session, Status, TrackerConfig, acquire_location, gpx_export::encode_route_as_gpx,
    resolve_route,
};
use wasm_bindgen::{JsCast, prelude::wasm_bindgen};

use crate::map_bridge::{BrowserGeolocation, LeafletSurface, download_base64, init_map};

const INSTRUCTION_PREVIEW: usize = 3;

fn app_config() -> TrackerConfig {
    let config = match option_env!("TRACKER_ROUTING_URL") {
        Some(url) => TrackerConfig::default().with_routing_url(url),
        None => TrackerConfig::default(),
    };
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            web_sys::console::error_1(&format!("[frontend] {err}, using defaults").into());
            TrackerConfig::default()
        }
    }
}

pub struct Model {
    config: TrackerConfig,
    session: Session,
    surface: LeafletSurface,
    router: OsrmClient,
}

pub enum Msg {
    MapReady,
    RefreshLocation,
    LocationResolved {
        ticket: LocationTicket,
        fix: LocationFix,
    },
    SelectDestination,
    MapClicked(Coordinate),
    RouteResolved {
        ticket: RouteTicket,
        route: ResolvedRoute,
    },
    ClearRoute,
    ExportGpx,
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("map-click"), |event| {
        let event = event.dyn_into::<web_sys::CustomEvent>().ok()?;
        let coord: Coordinate = serde_wasm_bindgen::from_value(event.detail()).ok()?;
        Some(Msg::MapClicked(coord))
    }));

    let config = app_config();
    init_map(config.default_location, config.zoom);
    orders.after_next_render(|_| Msg::MapReady);
    let mut session = Session::new(&config);
    request_location(&config, &mut session, orders);

    Model {
        session,
        surface: LeafletSurface,
        router: OsrmClient::new(&config.routing),
        config,
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::MapReady => model.surface.invalidate_size(),
        Msg::RefreshLocation => request_location(&model.config, &mut model.session, orders),
        Msg::LocationResolved { ticket, fix } => {
            web_sys::console::debug_1(
                &format!(
                    "[frontend] location #{} lat={:.5} lon={:.5} source={:?}",
                    ticket.seq, fix.coordinate.lat, fix.coordinate.lon, fix.source
                )
                .into(),
            );
            let ticket = model.session.update_location(ticket, fix, &mut model.surface);
            request_route(ticket, &model.router, orders);
        }
        Msg::SelectDestination => {
            if let Err(err) = model.session.request_selection() {
                let _ = window().alert_with_message(&err.to_string());
                request_location(&model.config, &mut model.session, orders);
            }
        }
        Msg::MapClicked(coord) => {
            web_sys::console::debug_1(
                &format!(
                    "[frontend] map click selecting={} lat={:.5} lon={:.5}",
                    model.session.is_selecting(),
                    coord.lat,
                    coord.lon
                )
                .into(),
            );
            let ticket = model.session.on_map_click(coord, &mut model.surface);
            request_route(ticket, &model.router, orders);
        }
        Msg::RouteResolved { ticket, route } => {
            if !model.session.complete_route(ticket, route, &mut model.surface) {
                web_sys::console::debug_1(
                    &format!("[frontend] dropped stale route #{}", ticket.seq).into(),
                );
            }
        }
        Msg::ClearRoute => model.session.reset(&mut model.surface),
        Msg::ExportGpx => {
            let Some(route) = model.session.route() else {
                return;
            };
            match encode_route_as_gpx(route) {
                Ok(payload) => {
                    download_base64("running-route.gpx", "application/gpx+xml", &payload)
                }
                Err(err) => web_sys::console::error_1(
                    &format!("[frontend] GPX export failed: {err}").into(),
                ),
            }
        }
    }
}

/// Starts a lookup; a slower earlier lookup answering later is dropped by the
/// session.
fn request_location(config: &TrackerConfig, session: &mut Session, orders: &mut impl Orders<Msg>) {
    let ticket = session.begin_location_request();
    let options = config.geolocation;
    let fallback = config.default_location;
    orders.perform_cmd(async move {
        let fix = acquire_location(&BrowserGeolocation, &options, fallback).await;
        Msg::LocationResolved { ticket, fix }
    });
}

fn request_route(ticket: Option<RouteTicket>, router: &OsrmClient, orders: &mut impl Orders<Msg>) {
    let Some(ticket) = ticket else {
        return;
    };
    let router = router.clone();
    orders.perform_cmd(async move {
        let route = resolve_route(&router, ticket.start, ticket.end).await;
        Msg::RouteResolved { ticket, route }
    });
}

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["tracker-panel"],
        view_header(model),
        view_status(model.session.status()),
        view_route_overlay(model),
        view_today(model),
        model
            .session
            .route()
            .map(view_route_details)
            .unwrap_or_else(|| empty![]),
    ]
}

fn view_header(model: &Model) -> Node<Msg> {
    let selecting = model.session.is_selecting();
    div![
        C!["header"],
        div![
            h3!["Running Tracker"],
            p![goal_label(model.config.daily_goal_km)],
        ],
        div![
            C!["actions"],
            button![
                C!["refresh-btn"],
                attrs! { At::Title => "Refresh my location" },
                "⌖",
                ev(Ev::Click, |_| Msg::RefreshLocation),
            ],
            button![
                C!["select-btn", IF!(selecting => "selecting")],
                attrs! { At::Title => "Choose destination" },
                "📍",
                ev(Ev::Click, |_| Msg::SelectDestination),
            ],
            button![
                C!["clear-btn"],
                attrs! { At::Title => "Clear route" },
                "✕",
                ev(Ev::Click, |_| Msg::ClearRoute),
            ],
            IF!(model.session.route().is_some() => button![
                C!["export-btn"],
                attrs! { At::Title => "Download GPX" },
                "💾",
                ev(Ev::Click, |_| Msg::ExportGpx),
            ]),
        ],
    ]
}

fn view_status(status: Status) -> Node<Msg> {
    if status == Status::RouteShown {
        return empty![];
    }
    div![C!["status", status_class(status)], p![status.message()]]
}

fn view_route_overlay(model: &Model) -> Node<Msg> {
    let metrics = model.session.metrics();
    let instructions = model.session.instructions();
    let (shown, hidden) = instruction_preview(instructions, INSTRUCTION_PREVIEW);

    div![
        C!["map-overlay"],
        IF!(metrics.distance_km > 0.0 => div![
            C!["distance-badge"],
            format_km(metrics.distance_km),
            span![" Km"],
        ]),
        IF!(!instructions.is_empty() => div![
            C!["instructions"],
            h4!["Route instructions:"],
            shown.iter().map(|line| div![C!["instruction"], span!["•"], span![line]]),
            IF!(hidden > 0 => div![C!["more"], format!("+{hidden} more instructions")]),
        ]),
    ]
}

fn view_today(model: &Model) -> Node<Msg> {
    let metrics = model.session.metrics();
    let progress = model.session.daily_progress_percent(model.config.daily_goal_km);
    let card = |value: String, unit: &str| {
        div![
            C!["stat-card"],
            p![C!["value"], value],
            p![C!["unit"], unit],
        ]
    };

    div![
        C!["today"],
        h2!["Today"],
        div![
            C!["stats-grid"],
            card(format_km(metrics.distance_km), "Kilometer"),
            card(metrics.time_minutes.to_string(), "minutes"),
            card(metrics.calories_kcal.to_string(), "Calories"),
        ],
        div![
            C!["progress-track"],
            div![
                C!["progress-fill"],
                style! { St::Width => format!("{progress}%") },
            ],
        ],
        small![progress_label(progress)],
    ]
}

fn view_route_details(route: &ResolvedRoute) -> Node<Msg> {
    let card = |label: &str, content: String| {
        div![
            C!["metadata-card"],
            span![C!["label"], label],
            strong![content],
        ]
    };

    div![
        C!["metadata-grid"],
        card("Points", route.path.len().to_string()),
        card("Route", route_kind_label(route.kind).to_string()),
        route
            .bounds()
            .map(|b| {
                card(
                    "BBox",
                    format!(
                        "[{:.3}↔{:.3}] lat / [{:.3}↔{:.3}] lon",
                        b.min_lat, b.max_lat, b.min_lon, b.max_lon
                    ),
                )
            })
            .unwrap_or_else(|| empty![]),
    ]
}

#[wasm_bindgen(start)]
pub fn start() {
    App::start("app", init, update, view);
}

fn format_km(distance_km: f64) -> String {
    format!("{distance_km:.2}")
}

fn goal_label(goal_km: f64) -> String {
    format!("{:.0} meters per day", goal_km * 1000.0)
}

fn progress_label(percent: f64) -> String {
    format!("Daily progress: {percent:.1}%")
}

fn route_kind_label(kind: RouteKind) -> &'static str {
    match kind {
        RouteKind::Routed => "Road route",
        RouteKind::Direct => "Direct line (routing unavailable)",
    }
}

fn status_class(status: Status) -> &'static str {
    match status {
        Status::Locating => "status-locating",
        Status::ReadyToPick => "status-ready",
        Status::Selecting => "status-selecting",
        Status::Resolving => "status-resolving",
        Status::RouteShown => "status-shown",
    }
}

/// First `limit` lines and how many were left out.
fn instruction_preview(lines: &[String], limit: usize) -> (&[String], usize) {
    let shown = &lines[..lines.len().min(limit)];
    (shown, lines.len() - shown.len())
}
