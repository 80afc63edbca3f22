//! Dashboard view model: everything the map page renders, computed from the
//! latest route snapshot and the traffic/weather tables.

use crate::display::{
    COLOR_AMBER, COLOR_GREEN, COLOR_RED, WeatherKind, format_duration, one_decimal,
    traffic_color, traffic_icon, utilization_color, weather_color, weather_description,
};
use crate::reference::{DEPOT, DESTINATIONS};
use crate::scheduler::RouteSnapshot;
use crate::types::{ConditionsSnapshot, NormalizedRoute, RoadSegment, Statistics};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const POLYLINE_WEIGHT: u32 = 4;
pub const POLYLINE_OPACITY: f64 = 0.8;
pub const POLYLINE_DASH: &str = "10, 5";

const MISSING: &str = "-";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub depot: DepotMarker,
    pub route_markers: Vec<RouteMarker>,
    pub polylines: Vec<RoutePolyline>,
    pub vehicle_markers: Vec<VehicleMarker>,
    pub traffic_markers: Vec<TrafficMarker>,
    pub weather_markers: Vec<WeatherMarker>,
    pub stats: Vec<StatCard>,
    pub routes: Vec<RouteDetail>,
    pub legend: Vec<LegendEntry>,
    pub error: Option<String>,
    pub is_fallback: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepotConnection {
    pub id: &'static str,
    pub name: &'static str,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepotMarker {
    pub name: &'static str,
    pub area: &'static str,
    pub address: &'static str,
    pub position: [f64; 2],
    pub capacity_kg: f64,
    pub connections: Vec<DepotConnection>,
    pub active_vehicles: usize,
    pub total_distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMarker {
    pub number: usize,
    pub destination: String,
    pub position: [f64; 2],
}

/// Popup and detail-panel content for one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDetail {
    pub number: usize,
    pub destination: String,
    pub on_map: bool,
    pub distance_km: Option<f64>,
    pub eta: Option<String>,
    pub vehicle_type: String,
    pub capacity_kg: Option<f64>,
    pub current_load: Option<f64>,
    pub utilization: f64,
    pub utilization_color: &'static str,
    pub traffic_level: String,
    pub traffic_icon: &'static str,
    pub weather: String,
    pub weather_icon: &'static str,
    pub road_segments: Vec<RoadSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePolyline {
    pub destination: String,
    pub positions: [[f64; 2]; 2],
    pub color: String,
    pub weight: u32,
    pub opacity: f64,
    pub dash_array: &'static str,
    pub distance_km: Option<f64>,
    pub eta: Option<String>,
    pub traffic_level: String,
    pub vehicle_type: String,
    pub current_load: Option<f64>,
    pub capacity_kg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleMarker {
    pub id: String,
    pub label: String,
    pub position: [f64; 2],
    pub route: Option<String>,
    pub vehicle_type: String,
    pub load: Option<f64>,
    pub capacity: Option<f64>,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficMarker {
    pub destination: String,
    pub position: [f64; 2],
    pub level: String,
    pub icon: &'static str,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherMarker {
    pub destination: String,
    pub position: [f64; 2],
    pub kind: WeatherKind,
    pub icon: &'static str,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub icon: &'static str,
    pub label: &'static str,
    pub color: Option<&'static str>,
}

pub fn build_dashboard(snapshot: &RouteSnapshot, conditions: &ConditionsSnapshot) -> DashboardView {
    let routes = &snapshot.dataset.routes;

    let mut route_markers = Vec::new();
    let mut polylines = Vec::new();
    let mut traffic_markers = Vec::new();
    let mut weather_markers = Vec::new();

    for (index, route) in routes.iter().enumerate() {
        let Some(position) = route.location.filter(|p| p.is_renderable()) else {
            continue;
        };
        let position = position.to_pair();
        let destination = destination_label(route);

        route_markers.push(RouteMarker {
            number: index + 1,
            destination: destination.clone(),
            position,
        });
        polylines.push(build_polyline(route, &destination, position, conditions));
        traffic_markers.push(TrafficMarker {
            destination: destination.clone(),
            position,
            level: route.traffic_level.clone(),
            icon: traffic_icon(&route.traffic_level),
            color: traffic_color(conditions, &destination).to_string(),
        });

        let kind = WeatherKind::of(&route.weather).overlay();
        weather_markers.push(WeatherMarker {
            destination,
            position,
            kind,
            icon: kind.icon(),
            description: weather_description(&route.weather).to_string(),
        });
    }

    let vehicle_markers = snapshot
        .vehicles
        .iter()
        .enumerate()
        .filter_map(|(index, vehicle)| {
            let position = vehicle.position.filter(|p| p.is_renderable())?;
            Some(VehicleMarker {
                id: vehicle.id.clone(),
                label: format!("Kendaraan {}", index + 1),
                position: position.to_pair(),
                route: vehicle.route.clone(),
                vehicle_type: vehicle.vehicle_type.clone(),
                load: vehicle.load,
                capacity: vehicle.capacity,
                color: weather_color(conditions, vehicle.route.as_deref().unwrap_or_default()),
            })
        })
        .collect();

    DashboardView {
        depot: build_depot(routes, snapshot.vehicles.len()),
        route_markers,
        polylines,
        vehicle_markers,
        traffic_markers,
        weather_markers,
        stats: snapshot
            .dataset
            .statistics
            .as_ref()
            .map(stat_cards)
            .unwrap_or_default(),
        routes: routes
            .iter()
            .enumerate()
            .map(|(index, route)| route_detail(index + 1, route))
            .collect(),
        legend: legend(),
        error: snapshot.error.clone(),
        is_fallback: snapshot.is_fallback,
        updated_at: snapshot.updated_at,
    }
}

fn destination_label(route: &NormalizedRoute) -> String {
    route
        .destination
        .clone()
        .unwrap_or_else(|| MISSING.to_string())
}

fn eta_label(route: &NormalizedRoute) -> Option<String> {
    route.estimated_arrival.or(route.eta).map(format_duration)
}

fn build_depot(routes: &[NormalizedRoute], active_vehicles: usize) -> DepotMarker {
    DepotMarker {
        name: DEPOT.name,
        area: DEPOT.area,
        address: DEPOT.address,
        position: DEPOT.coordinates.to_pair(),
        capacity_kg: DEPOT.capacity_kg,
        connections: DESTINATIONS
            .iter()
            .map(|d| DepotConnection {
                id: d.id,
                name: d.name,
                distance_km: d.distance_km,
            })
            .collect(),
        active_vehicles,
        total_distance_km: routes.iter().filter_map(|r| r.distance_km).sum(),
    }
}

fn build_polyline(
    route: &NormalizedRoute,
    destination: &str,
    position: [f64; 2],
    conditions: &ConditionsSnapshot,
) -> RoutePolyline {
    RoutePolyline {
        destination: destination.to_string(),
        positions: [DEPOT.coordinates.to_pair(), position],
        color: traffic_color(conditions, destination).to_string(),
        weight: POLYLINE_WEIGHT,
        opacity: POLYLINE_OPACITY,
        dash_array: POLYLINE_DASH,
        distance_km: route.distance_km,
        eta: eta_label(route),
        traffic_level: route.traffic_level.clone(),
        vehicle_type: route.vehicle_type.clone(),
        current_load: route.current_load,
        capacity_kg: route.capacity_kg,
    }
}

fn route_detail(number: usize, route: &NormalizedRoute) -> RouteDetail {
    let utilization = route.utilization_percent.unwrap_or(route.utilization);

    RouteDetail {
        number,
        destination: destination_label(route),
        on_map: route.location.is_some_and(|p| p.is_renderable()),
        distance_km: route.distance_km,
        eta: eta_label(route),
        vehicle_type: route.vehicle_type.clone(),
        capacity_kg: route.capacity_kg,
        current_load: route.current_load,
        utilization,
        utilization_color: utilization_color(utilization),
        traffic_level: route.traffic_level.clone(),
        traffic_icon: traffic_icon(&route.traffic_level),
        weather: weather_description(&route.weather).to_string(),
        weather_icon: WeatherKind::of(&route.weather).icon(),
        road_segments: route.road_segments.clone(),
    }
}

fn stat_cards(stats: &Statistics) -> Vec<StatCard> {
    let or_missing = |value: Option<String>| value.unwrap_or_else(|| MISSING.to_string());

    vec![
        StatCard {
            label: "Total Rute",
            value: or_missing(stats.total_routes.as_ref().map(ToString::to_string)),
        },
        StatCard {
            label: "Total Jarak",
            value: or_missing(stats.total_distance_km.map(|km| format!("{} km", one_decimal(km)))),
        },
        StatCard {
            label: "Utilisasi Rata-rata",
            value: or_missing(stats.average_utilization.map(|u| format!("{}%", one_decimal(u)))),
        },
        StatCard {
            label: "Kendaraan Aktif",
            value: or_missing(stats.active_vehicles.as_ref().map(ToString::to_string)),
        },
    ]
}

pub fn legend() -> Vec<LegendEntry> {
    let entry = |icon: &'static str, label: &'static str, color: Option<&'static str>| {
        LegendEntry { icon, label, color }
    };

    vec![
        entry("🏢", "Depot", None),
        entry("📍", "Destinasi", None),
        entry("🚚", "Kendaraan", None),
        entry("🚦", "Traffic", None),
        entry("🌤️", "Cuaca", None),
        entry("🟢", "Lancar", Some(COLOR_GREEN)),
        entry("🟡", "Sedang", Some(COLOR_AMBER)),
        entry("🔴", "Macet", Some(COLOR_RED)),
        // Same tints as the vehicle markers.
        entry(WeatherKind::Sunny.icon(), "Cerah", Some(WeatherKind::Sunny.color())),
        entry(WeatherKind::Cloudy.icon(), "Berawan", Some(WeatherKind::Cloudy.color())),
        entry(WeatherKind::Rain.icon(), "Hujan", Some(WeatherKind::Rain.color())),
    ]
}
