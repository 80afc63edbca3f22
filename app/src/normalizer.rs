//! Route-data normalization.
//!
//! Every output field is resolved from an ordered alias list: the first alias
//! present in the payload wins, otherwise the field's default (if it has one)
//! applies. The rules are plain data so the precedence can be inspected and
//! tested in one place.

use crate::reference;
use crate::types::{
    LatLng, NormalizedDataset, NormalizedRoute, RawDataset, RoadSegment, RoadSegmentPayload,
    RoutePayload, VehicleProjection, Weather,
};
use serde::Serialize;

type Accessor<T> = fn(&RoutePayload) -> Option<T>;

/// Field with alias precedence and no default.
struct AliasRule<T: 'static> {
    field: &'static str,
    aliases: &'static [(&'static str, Accessor<T>)],
}

impl<T: 'static> AliasRule<T> {
    fn resolve(&self, payload: &RoutePayload) -> Option<T> {
        self.aliases.iter().find_map(|(_, get)| get(payload))
    }

    fn summary(&self) -> RuleSummary {
        RuleSummary {
            field: self.field,
            aliases: self.aliases.iter().map(|(name, _)| *name).collect(),
            has_default: false,
        }
    }
}

/// Field with alias precedence and a default computed from the payload.
struct DefaultedRule<T: 'static> {
    field: &'static str,
    aliases: &'static [(&'static str, Accessor<T>)],
    default: fn(&RoutePayload) -> T,
}

impl<T: 'static> DefaultedRule<T> {
    fn resolve(&self, payload: &RoutePayload) -> T {
        self.aliases
            .iter()
            .find_map(|(_, get)| get(payload))
            .unwrap_or_else(|| (self.default)(payload))
    }

    fn summary(&self) -> RuleSummary {
        RuleSummary {
            field: self.field,
            aliases: self.aliases.iter().map(|(name, _)| *name).collect(),
            has_default: true,
        }
    }
}

pub const DEFAULT_TRAFFIC_LEVEL: &str = "moderate";
pub const DEFAULT_TRAFFIC_COLOR: &str = "#ffaa00";
pub const DEFAULT_VEHICLE_TYPE: &str = "Truck";
pub const DEFAULT_ESTIMATED_TIME_MIN: f64 = 60.0;
pub const DEFAULT_SEGMENT_LENGTH_KM: f64 = 10.0;

pub fn default_weather() -> Weather {
    Weather {
        description: Some("Cerah Berawan".to_string()),
        temperature: Some(28.0),
        humidity: Some(75.0),
    }
}

/// The single synthetic segment used when a route lists no road segments.
/// Its length follows the payload's own `distance_km`, not the `distance` alias.
fn default_road_segments(payload: &RoutePayload) -> Vec<RoadSegment> {
    vec![RoadSegment {
        road_name: Some("Jalan Utama".to_string()),
        length_km: Some(payload.distance_km.unwrap_or(DEFAULT_SEGMENT_LENGTH_KM)),
        traffic_level: Some("Sedang".to_string()),
    }]
}

static LOCATION: AliasRule<LatLng> = AliasRule {
    field: "location",
    aliases: &[("location", |p| p.location), ("end_location", |p| p.end_location)],
};

static DISTANCE_KM: AliasRule<f64> = AliasRule {
    field: "distance_km",
    aliases: &[("distance_km", |p| p.distance_km), ("distance", |p| p.distance)],
};

static ETA: AliasRule<f64> = AliasRule {
    field: "eta",
    aliases: &[("eta", |p| p.eta), ("estimated_arrival", |p| p.estimated_arrival)],
};

static ESTIMATED_ARRIVAL: AliasRule<f64> = AliasRule {
    field: "estimated_arrival",
    aliases: &[("estimated_arrival", |p| p.estimated_arrival), ("eta", |p| p.eta)],
};

static TRAFFIC_LEVEL: DefaultedRule<String> = DefaultedRule {
    field: "traffic_level",
    aliases: &[("traffic_level", |p| p.traffic_level.clone())],
    default: |_| DEFAULT_TRAFFIC_LEVEL.to_string(),
};

static TRAFFIC_COLOR: DefaultedRule<String> = DefaultedRule {
    field: "traffic_color",
    aliases: &[("traffic_color", |p| p.traffic_color.clone())],
    default: |_| DEFAULT_TRAFFIC_COLOR.to_string(),
};

static VEHICLE_TYPE: DefaultedRule<String> = DefaultedRule {
    field: "vehicle_type",
    aliases: &[("vehicle_type", |p| p.vehicle_type.clone())],
    default: |_| DEFAULT_VEHICLE_TYPE.to_string(),
};

static CAPACITY_KG: AliasRule<f64> = AliasRule {
    field: "capacity_kg",
    aliases: &[("capacity_kg", |p| p.capacity_kg), ("capacity", |p| p.capacity)],
};

static UTILIZATION: DefaultedRule<f64> = DefaultedRule {
    field: "utilization",
    aliases: &[
        ("utilization", |p| p.utilization),
        ("utilization_percent", |p| p.utilization_percent),
    ],
    default: |_| 0.0,
};

static CURRENT_LOAD: AliasRule<f64> = AliasRule {
    field: "current_load",
    aliases: &[("current_load", |p| p.current_load), ("load", |p| p.load)],
};

static ESTIMATED_TIME: DefaultedRule<f64> = DefaultedRule {
    field: "estimated_time",
    aliases: &[("estimated_time", |p| p.estimated_time)],
    default: |_| DEFAULT_ESTIMATED_TIME_MIN,
};

static UTILIZATION_PERCENT: AliasRule<f64> = AliasRule {
    field: "utilization_percent",
    aliases: &[
        ("utilization_percent", |p| p.utilization_percent),
        ("utilization", |p| p.utilization),
    ],
};

static WEATHER: DefaultedRule<Weather> = DefaultedRule {
    field: "weather",
    aliases: &[("weather", |p| p.weather.clone())],
    default: |_| default_weather(),
};

static ROAD_SEGMENTS: DefaultedRule<Vec<RoadSegment>> = DefaultedRule {
    field: "road_segments",
    aliases: &[("road_segments", |p| {
        p.road_segments
            .as_ref()
            .map(|segments| segments.iter().map(normalize_segment).collect())
    })],
    default: default_road_segments,
};

/// One row of the normalization table, for inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSummary {
    pub field: &'static str,
    pub aliases: Vec<&'static str>,
    pub has_default: bool,
}

/// The normalization table in output field order.
pub fn rule_summaries() -> Vec<RuleSummary> {
    vec![
        LOCATION.summary(),
        DISTANCE_KM.summary(),
        ETA.summary(),
        ESTIMATED_ARRIVAL.summary(),
        TRAFFIC_LEVEL.summary(),
        TRAFFIC_COLOR.summary(),
        VEHICLE_TYPE.summary(),
        CAPACITY_KG.summary(),
        UTILIZATION.summary(),
        CURRENT_LOAD.summary(),
        ESTIMATED_TIME.summary(),
        UTILIZATION_PERCENT.summary(),
        WEATHER.summary(),
        ROAD_SEGMENTS.summary(),
    ]
}

fn normalize_segment(segment: &RoadSegmentPayload) -> RoadSegment {
    RoadSegment {
        road_name: segment.road_name.clone(),
        length_km: segment.length_km.or(segment.length),
        traffic_level: segment.traffic_level.clone(),
    }
}

pub fn normalize_route(payload: &RoutePayload) -> NormalizedRoute {
    NormalizedRoute {
        destination: payload.destination.clone(),
        location: LOCATION.resolve(payload),
        distance_km: DISTANCE_KM.resolve(payload),
        eta: ETA.resolve(payload),
        estimated_arrival: ESTIMATED_ARRIVAL.resolve(payload),
        traffic_level: TRAFFIC_LEVEL.resolve(payload),
        traffic_color: TRAFFIC_COLOR.resolve(payload),
        vehicle_type: VEHICLE_TYPE.resolve(payload),
        capacity_kg: CAPACITY_KG.resolve(payload),
        utilization: UTILIZATION.resolve(payload),
        current_load: CURRENT_LOAD.resolve(payload),
        estimated_time: ESTIMATED_TIME.resolve(payload),
        utilization_percent: UTILIZATION_PERCENT.resolve(payload),
        weather: WEATHER.resolve(payload),
        road_segments: ROAD_SEGMENTS.resolve(payload),
        extra: payload.extra.clone(),
    }
}

/// Normalizes a dataset. An absent dataset, or one without routes, yields the
/// fallback dataset unchanged.
pub fn normalize(dataset: Option<&RawDataset>) -> NormalizedDataset {
    let Some(dataset) = dataset.filter(|d| d.has_routes()) else {
        return reference::fallback_dataset();
    };

    NormalizedDataset {
        success: dataset.success,
        message: dataset.message.clone(),
        routes: dataset
            .routes
            .iter()
            .flatten()
            .map(normalize_route)
            .collect(),
        statistics: dataset.statistics.clone(),
        extra: dataset.extra.clone(),
    }
}

/// One vehicle per route, in route order, numbered from 1.
pub fn project_vehicles(routes: &[NormalizedRoute]) -> Vec<VehicleProjection> {
    routes
        .iter()
        .enumerate()
        .map(|(index, route)| VehicleProjection {
            id: format!("vehicle-{}", index + 1),
            position: route.location,
            route: route.destination.clone(),
            vehicle_type: route.vehicle_type.clone(),
            load: route.current_load,
            capacity: route.capacity_kg,
        })
        .collect()
}
