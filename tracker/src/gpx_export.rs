//! GPX download of the route on screen.
//!
//! The document carries the run summary alongside the geometry: metadata
//! description and keywords hold the metrics and how the path was obtained,
//! the track is typed `running` and its `src` names the routing source.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_types::{Point, Rect};
use gpx::{Gpx, GpxVersion, Metadata, Track, TrackSegment, Waypoint};
use shared::{Metrics, RouteBounds, RouteKind};

use crate::error::ExportError;
use crate::resolver::ResolvedRoute;

const TRACK_NAME: &str = "Today's run";
const TRACK_TYPE: &str = "running";

/// One-line summary, e.g. `5.00 km, 15 min, 350 kcal`.
pub fn run_summary(metrics: &Metrics) -> String {
    format!(
        "{:.2} km, {} min, {} kcal",
        metrics.distance_km, metrics.time_minutes, metrics.calories_kcal
    )
}

fn source_label(kind: RouteKind) -> &'static str {
    match kind {
        RouteKind::Routed => "osrm",
        RouteKind::Direct => "direct-line",
    }
}

fn bounds_rect(bounds: RouteBounds) -> Rect<f64> {
    Rect::new(
        (bounds.min_lon, bounds.min_lat),
        (bounds.max_lon, bounds.max_lat),
    )
}

/// GPX 1.1 document for `route`, base64 encoded for a `data:` URL.
pub fn encode_route_as_gpx(route: &ResolvedRoute) -> Result<String, ExportError> {
    let bounds = route.bounds().ok_or(ExportError::EmptyRoute)?;
    let source = source_label(route.kind);

    let metadata = Metadata {
        name: Some(TRACK_NAME.into()),
        description: Some(run_summary(&route.metrics)),
        keywords: Some(format!("{TRACK_TYPE},{source}")),
        bounds: Some(bounds_rect(bounds)),
        ..Default::default()
    };

    let segment = TrackSegment {
        points: route
            .path
            .iter()
            .map(|c| Waypoint::new(Point::new(c.lon, c.lat)))
            .collect(),
    };
    let track = Track {
        name: Some(TRACK_NAME.into()),
        source: Some(source.into()),
        type_: Some(TRACK_TYPE.into()),
        segments: vec![segment],
        ..Default::default()
    };

    let document = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some("running_tracker".into()),
        metadata: Some(metadata),
        tracks: vec![track],
        ..Default::default()
    };

    let mut xml = Vec::new();
    gpx::write(&document, &mut xml)?;
    Ok(BASE64.encode(xml))
}
