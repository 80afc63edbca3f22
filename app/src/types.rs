use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Deserializes an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// A zero or non-finite component cannot be placed on the map.
    pub fn is_renderable(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && self.lat != 0.0 && self.lng != 0.0
    }

    pub fn to_pair(self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "temp",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadSegmentPayload {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub road_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub length_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub traffic_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_level: Option<String>,
}

/// A route record as delivered by the data source. Any field may be missing,
/// several fields have alias spellings, and unknown fields are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePayload {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub end_location: Option<LatLng>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub eta: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub traffic_level: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub traffic_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub capacity_kg: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub utilization: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub utilization_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub current_load: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub load: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub road_segments: Option<Vec<RoadSegmentPayload>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Display-ready route. Fields with a fallback default are plain values;
/// fields without one stay optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRoute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<f64>,
    pub traffic_level: String,
    pub traffic_color: String,
    pub vehicle_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_kg: Option<f64>,
    pub utilization: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_load: Option<f64>,
    pub estimated_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization_percent: Option<f64>,
    pub weather: Weather,
    pub road_segments: Vec<RoadSegment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&RoadSegment> for RoadSegmentPayload {
    fn from(segment: &RoadSegment) -> Self {
        Self {
            road_name: segment.road_name.clone(),
            length_km: segment.length_km,
            length: None,
            traffic_level: segment.traffic_level.clone(),
        }
    }
}

impl From<&NormalizedRoute> for RoutePayload {
    fn from(route: &NormalizedRoute) -> Self {
        Self {
            destination: route.destination.clone(),
            location: route.location,
            distance_km: route.distance_km,
            eta: route.eta,
            estimated_arrival: route.estimated_arrival,
            traffic_level: Some(route.traffic_level.clone()),
            traffic_color: Some(route.traffic_color.clone()),
            vehicle_type: Some(route.vehicle_type.clone()),
            capacity_kg: route.capacity_kg,
            utilization: Some(route.utilization),
            utilization_percent: route.utilization_percent,
            current_load: route.current_load,
            estimated_time: Some(route.estimated_time),
            weather: Some(route.weather.clone()),
            road_segments: Some(route.road_segments.iter().map(RoadSegmentPayload::from).collect()),
            extra: route.extra.clone(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub total_routes: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub total_distance_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub average_utilization: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub active_vehicles: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response shape of the route data endpoint: `{success, routes, statistics?}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<RoutePayload>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawDataset {
    pub fn has_routes(&self) -> bool {
        self.routes.as_ref().is_some_and(|routes| !routes.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub routes: Vec<NormalizedRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleProjection {
    pub id: String,
    pub position: Option<LatLng>,
    pub route: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub load: Option<f64>,
    pub capacity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Destination {
    pub id: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub coordinates: LatLng,
    pub distance_km: f64,
    pub capacity_kg: f64,
    pub load_kg: f64,
    pub utilization: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Depot {
    pub name: &'static str,
    pub area: &'static str,
    pub address: &'static str,
    pub coordinates: LatLng,
    pub capacity_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficInfo {
    pub level: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    pub condition: String,
    pub temp: f64,
    pub humidity: f64,
}

/// Per-destination traffic and weather lookup tables, keyed by destination name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionsSnapshot {
    #[serde(default)]
    pub traffic: BTreeMap<String, TrafficInfo>,
    #[serde(default)]
    pub weather: BTreeMap<String, WeatherInfo>,
}
