use serde::{Deserialize, Serialize};
use shared::{Coordinate, Metrics, RouteBounds, RouteKind};

use crate::geo::haversine_km;
use crate::metrics::{direct_metrics, routed_metrics};
use crate::osrm::{RouteProvider, RoutedPath};

/// A displayable path together with the metrics measured on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    pub path: Vec<Coordinate>,
    pub metrics: Metrics,
    pub kind: RouteKind,
}

impl ResolvedRoute {
    pub fn routed(routed: RoutedPath) -> Self {
        Self {
            metrics: routed_metrics(routed.distance_m, routed.duration_s),
            path: routed.path,
            kind: RouteKind::Routed,
        }
    }

    /// Straight line from `start` to `end`.
    pub fn direct(start: Coordinate, end: Coordinate) -> Self {
        Self {
            path: vec![start, end],
            metrics: direct_metrics(haversine_km(start, end)),
            kind: RouteKind::Direct,
        }
    }

    pub fn bounds(&self) -> Option<RouteBounds> {
        RouteBounds::from_path(&self.path)
    }
}

/// Asks `provider` for a road path and falls back to a direct line on any
/// failure. Never fails.
pub async fn resolve_route<P>(provider: &P, start: Coordinate, end: Coordinate) -> ResolvedRoute
where
    P: RouteProvider + ?Sized,
{
    match provider.fetch_route(start, end).await {
        Ok(routed) => {
            let route = ResolvedRoute::routed(routed);
            tracing::info!(
                points = route.path.len(),
                distance_km = route.metrics.distance_km,
                "resolved routed path"
            );
            route
        }
        Err(err) => {
            tracing::warn!(error = %err, "routing unavailable, using direct route");
            ResolvedRoute::direct(start, end)
        }
    }
}
