use shared::Metrics;

/// Display lines shown next to a route.
///
/// The numbers come from the same `Metrics` shown in the statistics panel, so
/// the two never disagree.
pub fn derive_instructions(metrics: &Metrics) -> Vec<String> {
    vec![
        "📍 Start from your current location".to_string(),
        "🧭 Follow the route highlighted in yellow".to_string(),
        format!("📏 Total distance: {:.2} km", metrics.distance_km),
        format!("⏱️ Estimated time: {} minutes", metrics.time_minutes),
        format!("🔥 Estimated calories: {} kcal", metrics.calories_kcal),
        "🏁 You will reach the destination marked in red".to_string(),
    ]
}
