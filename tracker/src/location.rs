use serde::{Deserialize, Serialize};
use shared::Coordinate;

use crate::config::GeolocationOptions;
use crate::error::LocationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Device,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub source: LocationSource,
}

/// Device location capability (browser Geolocation API, GPS, ...).
#[allow(async_fn_in_trait)]
pub trait LocationProvider {
    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<Coordinate, LocationError>;
}

/// Provider that always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// Single attempt at a device fix; any failure yields `fallback` instead.
pub async fn acquire_location<P>(
    provider: &P,
    options: &GeolocationOptions,
    fallback: Coordinate,
) -> LocationFix
where
    P: LocationProvider + ?Sized,
{
    let result = provider
        .current_position(options)
        .await
        .and_then(|coord| {
            if coord.is_valid() {
                Ok(coord)
            } else {
                Err(LocationError::InvalidCoordinate {
                    lat: coord.lat,
                    lon: coord.lon,
                })
            }
        });

    match result {
        Ok(coordinate) => {
            tracing::debug!(lat = coordinate.lat, lon = coordinate.lon, "device location");
            LocationFix {
                coordinate,
                source: LocationSource::Device,
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "location unavailable, using default location");
            LocationFix {
                coordinate: fallback,
                source: LocationSource::Fallback,
            }
        }
    }
}
