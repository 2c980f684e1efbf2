use serde::{Deserialize, Serialize};
use shared::Coordinate;

use crate::error::ConfigError;
use crate::metrics::DEFAULT_DAILY_GOAL_KM;

/// Cali city center, used until (or instead of) a device fix.
pub const DEFAULT_LOCATION: Coordinate = Coordinate::new(3.4516, -76.5320);
pub const DEFAULT_ROUTING_URL: &str = "https://router.project-osrm.org";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub default_location: Coordinate,
    pub zoom: u8,
    pub fit_padding_px: u32,
    pub daily_goal_km: f64,
    pub geolocation: GeolocationOptions,
    pub routing: RoutingConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_location: DEFAULT_LOCATION,
            zoom: 15,
            fit_padding_px: 20,
            daily_goal_km: DEFAULT_DAILY_GOAL_KM,
            geolocation: GeolocationOptions::default(),
            routing: RoutingConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Parses a (possibly partial) JSON document over the defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_location.is_valid() {
            return Err(ConfigError::Invalid("default_location is out of range"));
        }
        if !(self.daily_goal_km.is_finite() && self.daily_goal_km > 0.0) {
            return Err(ConfigError::Invalid("daily_goal_km must be positive"));
        }
        if self.routing.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("routing.base_url is empty"));
        }
        if self.routing.profile.trim().is_empty() {
            return Err(ConfigError::Invalid("routing.profile is empty"));
        }
        Ok(())
    }

    /// Replaces the routing service root, keeping every other setting.
    pub fn with_routing_url(mut self, url: &str) -> Self {
        self.routing.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

/// Options handed to the device location capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u32,
    pub maximum_age_ms: u32,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub base_url: String,
    pub profile: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ROUTING_URL.to_string(),
            profile: "driving".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.default_location, Coordinate::new(3.4516, -76.5320));
        assert_eq!(config.zoom, 15);
        assert_eq!(config.fit_padding_px, 20);
        assert_eq!(config.daily_goal_km, 3.0);
        assert_eq!(config.geolocation.timeout_ms, 10_000);
        assert_eq!(config.geolocation.maximum_age_ms, 60_000);
        assert!(config.geolocation.high_accuracy);
        assert_eq!(config.routing.profile, "driving");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            TrackerConfig::from_json(r#"{"daily_goal_km": 5.0, "routing": {"profile": "foot"}}"#)
                .unwrap();
        assert_eq!(config.daily_goal_km, 5.0);
        assert_eq!(config.routing.profile, "foot");
        assert_eq!(config.routing.base_url, DEFAULT_ROUTING_URL);
        assert_eq!(config.zoom, 15);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            TrackerConfig::from_json(r#"{"daily_goal_km": 0.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TrackerConfig::from_json(r#"{"default_location": {"lat": 120.0, "lon": 0.0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TrackerConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_with_routing_url_trims_slash() {
        let config = TrackerConfig::default().with_routing_url("http://localhost:5000/");
        assert_eq!(config.routing.base_url, "http://localhost:5000");
    }
}
