//! Distance to time and calorie estimates.
//!
//! Routed paths carry a driving duration from the routing service which is
//! stretched toward a running pace; direct lines only have a distance and use
//! a flat pace of 12 minutes per kilometer (about 5 km/h).

use shared::Metrics;

/// Multiplier turning a driving-time estimate into a running-time estimate.
pub const RUNNING_PACE_FACTOR: f64 = 1.5;
pub const DIRECT_MINUTES_PER_KM: f64 = 12.0;
pub const KCAL_PER_KM: f64 = 70.0;
pub const DEFAULT_DAILY_GOAL_KM: f64 = 3.0;

/// Metrics for a path measured by the routing service.
pub fn routed_metrics(distance_m: f64, duration_s: f64) -> Metrics {
    let distance_km = (distance_m / 1000.0).max(0.0);
    Metrics {
        distance_km,
        time_minutes: round_non_negative(duration_s / 60.0 * RUNNING_PACE_FACTOR),
        calories_kcal: calories_for(distance_km),
    }
}

/// Metrics for a straight-line fallback of `distance_km`.
pub fn direct_metrics(distance_km: f64) -> Metrics {
    let distance_km = distance_km.max(0.0);
    Metrics {
        distance_km,
        time_minutes: round_non_negative(distance_km * DIRECT_MINUTES_PER_KM),
        calories_kcal: calories_for(distance_km),
    }
}

/// Share of the daily goal covered, capped at 100.
pub fn daily_progress_percent(distance_km: f64, goal_km: f64) -> f64 {
    if goal_km <= 0.0 || !distance_km.is_finite() {
        return 0.0;
    }
    (distance_km / goal_km * 100.0).clamp(0.0, 100.0)
}

fn calories_for(distance_km: f64) -> u32 {
    round_non_negative(distance_km * KCAL_PER_KM)
}

fn round_non_negative(value: f64) -> u32 {
    if value.is_finite() {
        value.round().clamp(0.0, u32::MAX as f64) as u32
    } else {
        0
    }
}
