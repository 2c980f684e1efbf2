use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite, with latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Brings a coordinate reported on a wrapped world map back into range.
    pub fn wrapped(self) -> Self {
        let lon = if (-180.0..=180.0).contains(&self.lon) {
            self.lon
        } else {
            (self.lon + 180.0).rem_euclid(360.0) - 180.0
        };
        Self {
            lat: self.lat.clamp(-90.0, 90.0),
            lon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Road geometry returned by the routing service.
    Routed,
    /// Straight two-point line used when routing is unavailable.
    Direct,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub distance_km: f64,
    pub time_minutes: u32,
    pub calories_kcal: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RouteBounds {
    pub fn from_path(path: &[Coordinate]) -> Option<Self> {
        let first = path.first()?;
        let init = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        Some(path.iter().skip(1).fold(init, |b, c| Self {
            min_lat: b.min_lat.min(c.lat),
            max_lat: b.max_lat.max(c.lat),
            min_lon: b.min_lon.min(c.lon),
            max_lon: b.max_lon.max(c.lon),
        }))
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.lat)
            && (self.min_lon..=self.max_lon).contains(&coord.lon)
    }
}
