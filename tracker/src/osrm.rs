//! Client for the OSRM `route` service.

use serde::Deserialize;
use shared::Coordinate;

use crate::config::RoutingConfig;
use crate::error::RoutingError;

/// A path measured by a routing service, before any pace adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    pub path: Vec<Coordinate>,
    pub distance_m: f64,
    pub duration_s: f64,
}

/// Source of road-following paths between two points.
///
/// Futures are not required to be `Send`: in the browser everything runs on
/// one thread.
#[allow(async_fn_in_trait)]
pub trait RouteProvider {
    /// Returns the first candidate route, or an error when none is usable.
    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RoutedPath, RoutingError>;
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmClient {
    pub fn new(config: &RoutingConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: &RoutingConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
        }
    }

    /// OSRM expects `lon,lat` pairs separated by `;`.
    pub fn route_url(&self, start: Coordinate, end: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, self.profile, start.lon, start.lat, end.lon, end.lat
        )
    }
}

impl RouteProvider for OsrmClient {
    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RoutedPath, RoutingError> {
        let url = self.route_url(start, end);
        tracing::debug!(%url, "requesting route");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        parse_route_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON order: `[lon, lat]`.
    coordinates: Vec<[f64; 2]>,
}

/// Decodes an OSRM `route` body into the first candidate path.
///
/// A body without routes is a [`RoutingError::NoRoute`], not a decode error.
/// One out-of-range point rejects the whole geometry.
pub fn parse_route_response(body: &str) -> Result<RoutedPath, RoutingError> {
    let response: OsrmResponse = serde_json::from_str(body)?;
    let route = response.routes.into_iter().next().ok_or_else(|| {
        RoutingError::NoRoute(response.code.unwrap_or_else(|| "missing".to_string()))
    })?;

    let valid = |v: f64| v.is_finite() && v >= 0.0;
    if !valid(route.distance) || !valid(route.duration) {
        return Err(RoutingError::InvalidMetrics);
    }

    let path = route
        .geometry
        .coordinates
        .iter()
        .enumerate()
        .map(|(index, [lon, lat])| {
            let coordinate = Coordinate::new(*lat, *lon);
            if coordinate.is_valid() {
                Ok(coordinate)
            } else {
                Err(RoutingError::InvalidPoint {
                    index,
                    lat: *lat,
                    lon: *lon,
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    if path.len() < 2 {
        return Err(RoutingError::DegenerateGeometry(path.len()));
    }

    Ok(RoutedPath {
        path,
        distance_m: route.distance,
        duration_s: route.duration,
    })
}
