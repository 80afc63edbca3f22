//! Derived display values: duration labels, status colors and icons.

use crate::normalizer::DEFAULT_TRAFFIC_COLOR;
use crate::types::{ConditionsSnapshot, Weather};
use serde::Serialize;

pub const COLOR_GREEN: &str = "#28a745";
pub const COLOR_AMBER: &str = "#ffc107";
pub const COLOR_RED: &str = "#dc3545";
pub const COLOR_BLUE: &str = "#007bff";
pub const COLOR_GRAY: &str = "#6c757d";

pub const UNAVAILABLE: &str = "Tidak tersedia";

const RAIN_KEYWORDS: [&str; 2] = ["hujan", "rain"];
const CLOUD_KEYWORDS: [&str; 2] = ["berawan", "cloud"];
const SUN_KEYWORDS: [&str; 3] = ["cerah", "sun", "clear"];

/// Formats a duration given in hours, e.g. `45 menit`, `2 jam`, `1 jam 12 menit`.
///
/// Negative and non-finite inputs render as `0 menit`. Minutes are never carried,
/// so `0.999` is `60 menit` and `1.999` is `1 jam 60 menit`.
pub fn format_duration(hours: f64) -> String {
    let hours = if hours.is_finite() { hours.max(0.0) } else { 0.0 };

    if hours < 1.0 {
        return format!("{} menit", (hours * 60.0).round() as u64);
    }

    let whole = hours.floor() as u64;
    let minutes = ((hours - hours.floor()) * 60.0).round() as u64;

    if minutes == 0 {
        format!("{whole} jam")
    } else {
        format!("{whole} jam {minutes} menit")
    }
}

/// Traffic color for a destination, from the traffic lookup table.
pub fn traffic_color<'a>(conditions: &'a ConditionsSnapshot, name: &str) -> &'a str {
    conditions
        .traffic
        .get(name)
        .map_or(DEFAULT_TRAFFIC_COLOR, |info| info.color.as_str())
}

/// Weather tint for a destination: blue for rain, gray for clouds, yellow otherwise.
pub fn weather_color(conditions: &ConditionsSnapshot, name: &str) -> &'static str {
    conditions
        .weather
        .get(name)
        .map_or(WeatherKind::Sunny, |info| WeatherKind::classify(&info.condition))
        .color()
}

/// Green from 80 %, amber from 60 %, red below.
pub fn utilization_color(percent: f64) -> &'static str {
    if percent >= 80.0 {
        COLOR_GREEN
    } else if percent >= 60.0 {
        COLOR_AMBER
    } else {
        COLOR_RED
    }
}

pub fn traffic_icon(level: &str) -> &'static str {
    match level {
        "light" => "🟢",
        "heavy" => "🔴",
        _ => "🟡",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    Rain,
    Cloudy,
    Sunny,
    Unknown,
}

impl WeatherKind {
    pub fn classify(description: &str) -> Self {
        let description = description.to_lowercase();
        if contains_any(&description, &RAIN_KEYWORDS) {
            Self::Rain
        } else if contains_any(&description, &CLOUD_KEYWORDS) {
            Self::Cloudy
        } else if contains_any(&description, &SUN_KEYWORDS) {
            Self::Sunny
        } else {
            Self::Unknown
        }
    }

    pub fn of(weather: &Weather) -> Self {
        weather
            .description
            .as_deref()
            .map_or(Self::Unknown, Self::classify)
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Rain => "🌧️",
            Self::Cloudy => "☁️",
            Self::Sunny => "☀️",
            Self::Unknown => "🌤️",
        }
    }

    /// Marker tint. Unclassified conditions share the sunny color.
    pub fn color(self) -> &'static str {
        match self {
            Self::Rain => COLOR_BLUE,
            Self::Cloudy => COLOR_GRAY,
            Self::Sunny | Self::Unknown => COLOR_AMBER,
        }
    }

    /// Map overlays have no "unknown" class; they show it as sunny.
    pub fn overlay(self) -> Self {
        match self {
            Self::Unknown => Self::Sunny,
            other => other,
        }
    }
}

pub fn weather_description(weather: &Weather) -> &str {
    weather.description.as_deref().unwrap_or(UNAVAILABLE)
}

/// One decimal place, ties rounded away from zero (`76.25` → `76.3`).
pub fn one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::sample_conditions;

    // === format_duration ===

    #[test]
    fn test_format_duration_hours_and_minutes() {
        assert_eq!(format_duration(1.2), "1 jam 12 menit");
    }

    #[test]
    fn test_format_duration_under_an_hour() {
        assert_eq!(format_duration(0.5), "30 menit");
        assert_eq!(format_duration(0.8), "48 menit");
    }

    #[test]
    fn test_format_duration_whole_hours() {
        assert_eq!(format_duration(1.0), "1 jam");
        assert_eq!(format_duration(3.0), "3 jam");
    }

    #[test]
    fn test_format_duration_remainder_rounding_to_zero() {
        assert_eq!(format_duration(2.004), "2 jam");
    }

    #[test]
    fn test_format_duration_under_an_hour_rounds_to_sixty_minutes() {
        assert_eq!(format_duration(0.999), "60 menit");
    }

    #[test]
    fn test_format_duration_remainder_is_not_carried() {
        assert_eq!(format_duration(1.999), "1 jam 60 menit");
        assert_eq!(format_duration(2.9999), "2 jam 60 menit");
    }

    #[test]
    fn test_format_duration_zero_and_invalid() {
        assert_eq!(format_duration(0.0), "0 menit");
        assert_eq!(format_duration(-2.0), "0 menit");
        assert_eq!(format_duration(f64::NAN), "0 menit");
    }

    // === utilization_color ===

    #[test]
    fn test_utilization_color_boundaries() {
        assert_eq!(utilization_color(80.0), COLOR_GREEN);
        assert_eq!(utilization_color(79.999), COLOR_AMBER);
        assert_eq!(utilization_color(60.0), COLOR_AMBER);
        assert_eq!(utilization_color(59.999), COLOR_RED);
    }

    #[test]
    fn test_utilization_color_extremes() {
        assert_eq!(utilization_color(100.0), COLOR_GREEN);
        assert_eq!(utilization_color(0.0), COLOR_RED);
    }

    // === traffic_color / weather_color ===

    #[test]
    fn test_traffic_color_lookup() {
        let conditions = sample_conditions();
        assert_eq!(traffic_color(&conditions, "Bekasi"), "#44ff44");
        assert_eq!(traffic_color(&conditions, "Jakarta"), "#ff4444");
    }

    #[test]
    fn test_traffic_color_default_when_missing() {
        assert_eq!(traffic_color(&sample_conditions(), "Depok"), "#ffaa00");
        assert_eq!(traffic_color(&ConditionsSnapshot::default(), "Bogor"), "#ffaa00");
    }

    #[test]
    fn test_weather_color_by_condition() {
        let conditions = sample_conditions();
        assert_eq!(weather_color(&conditions, "Tangerang"), COLOR_BLUE);
        assert_eq!(weather_color(&conditions, "Bogor"), COLOR_GRAY);
        assert_eq!(weather_color(&conditions, "Jakarta"), COLOR_AMBER);
    }

    #[test]
    fn test_weather_color_unknown_destination_is_sunny() {
        assert_eq!(weather_color(&ConditionsSnapshot::default(), "Bogor"), COLOR_AMBER);
    }

    #[test]
    fn test_weather_color_english_keywords() {
        let mut conditions = ConditionsSnapshot::default();
        conditions.weather.insert(
            "Depok".to_string(),
            crate::types::WeatherInfo {
                condition: "Light RAIN".to_string(),
                temp: 25.0,
                humidity: 90.0,
            },
        );
        assert_eq!(weather_color(&conditions, "Depok"), COLOR_BLUE);
    }

    // === icons ===

    #[test]
    fn test_traffic_icon() {
        assert_eq!(traffic_icon("light"), "🟢");
        assert_eq!(traffic_icon("moderate"), "🟡");
        assert_eq!(traffic_icon("heavy"), "🔴");
        assert_eq!(traffic_icon("very_heavy"), "🟡");
    }

    #[test]
    fn test_weather_kind_classify() {
        assert_eq!(WeatherKind::classify("Hujan Ringan"), WeatherKind::Rain);
        assert_eq!(WeatherKind::classify("scattered clouds"), WeatherKind::Cloudy);
        assert_eq!(WeatherKind::classify("Cerah Berawan"), WeatherKind::Cloudy);
        assert_eq!(WeatherKind::classify("Cerah"), WeatherKind::Sunny);
        assert_eq!(WeatherKind::classify("haze"), WeatherKind::Unknown);
    }

    #[test]
    fn test_weather_kind_overlay_and_icon() {
        assert_eq!(WeatherKind::Unknown.overlay(), WeatherKind::Sunny);
        assert_eq!(WeatherKind::Rain.overlay(), WeatherKind::Rain);
        assert_eq!(WeatherKind::Unknown.icon(), "🌤️");
    }

    #[test]
    fn test_weather_description_fallback() {
        assert_eq!(weather_description(&Weather::default()), "Tidak tersedia");
    }

    #[test]
    fn test_one_decimal_rounds_ties_up() {
        assert_eq!(one_decimal(76.25), "76.3");
        assert_eq!(one_decimal(142.0), "142.0");
    }
}
