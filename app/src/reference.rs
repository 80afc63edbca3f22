//! Fixed reference data for the Sanghiang Perkasa deployment: the depot, the
//! four known destinations, the fallback route dataset and the sample
//! traffic/weather tables.

use crate::types::{
    ConditionsSnapshot, Depot, Destination, LatLng, NormalizedDataset, NormalizedRoute,
    RoadSegment, Statistics, TrafficInfo, Weather, WeatherInfo,
};
use serde_json::Map;
use std::sync::LazyLock;

pub const DEPOT: Depot = Depot {
    name: "PT. Sanghiang Perkasa",
    area: "Pulogadung, Jakarta Timur",
    address: "Kw. Industri Pulogadung, Jl. Pulo Lentut No.10, RW.3, Rw. Terate, Kec. Cakung, Kota Jakarta Timur",
    coordinates: LatLng::new(-6.1857, 106.9367),
    capacity_kg: 10_000.0,
};

pub const DESTINATIONS: [Destination; 4] = [
    Destination {
        id: "C25",
        name: "Bogor",
        address: "Jl. Wangun no. 216 Sindangsari Bogor Timur 16720",
        coordinates: LatLng::new(-6.5971, 106.8060),
        distance_km: 60.0,
        capacity_kg: 2000.0,
        load_kg: 2000.0,
        utilization: 100.0,
    },
    Destination {
        id: "C26",
        name: "Tangerang",
        address: "JL. PAJAJARAN, RT 001/003 KEL GANDASARI, KEC JATIUWUNG, TANGERANG 15137",
        coordinates: LatLng::new(-6.1783, 106.6319),
        distance_km: 55.0,
        capacity_kg: 1000.0,
        load_kg: 700.0,
        utilization: 70.0,
    },
    Destination {
        id: "C27",
        name: "Jakarta",
        address: "Jl. Srengseng Raya No.8, RT.2/RW.8, Srengseng, Kec. Kembangan, Kota Jakarta Barat",
        coordinates: LatLng::new(-6.1778, 106.7378),
        distance_km: 17.0,
        capacity_kg: 2000.0,
        load_kg: 1700.0,
        utilization: 85.0,
    },
    Destination {
        id: "C28",
        name: "Bekasi",
        address: "Jl. Jakasetia no. 27 B, Kp. Poncol, Kel. Jakasetia, Bekasi Selatan 17423",
        coordinates: LatLng::new(-6.2346, 106.9896),
        distance_km: 10.0,
        capacity_kg: 1000.0,
        load_kg: 500.0,
        utilization: 50.0,
    },
];

pub fn destination_by_name(name: &str) -> Option<&'static Destination> {
    DESTINATIONS.iter().find(|d| d.name == name)
}

struct FallbackRow {
    destination: &'static str,
    location: LatLng,
    distance_km: f64,
    eta: f64,
    traffic_level: &'static str,
    traffic_color: &'static str,
    vehicle_type: &'static str,
    capacity_kg: f64,
    utilization: f64,
    current_load: f64,
    estimated_time: f64,
    weather: (&'static str, f64, f64),
    segments: [(&'static str, f64, &'static str); 2],
}

impl FallbackRow {
    fn to_route(&self) -> NormalizedRoute {
        let (description, temperature, humidity) = self.weather;
        NormalizedRoute {
            destination: Some(self.destination.to_string()),
            location: Some(self.location),
            distance_km: Some(self.distance_km),
            eta: Some(self.eta),
            estimated_arrival: Some(self.eta),
            traffic_level: self.traffic_level.to_string(),
            traffic_color: self.traffic_color.to_string(),
            vehicle_type: self.vehicle_type.to_string(),
            capacity_kg: Some(self.capacity_kg),
            utilization: self.utilization,
            current_load: Some(self.current_load),
            estimated_time: self.estimated_time,
            utilization_percent: Some(self.utilization),
            weather: Weather {
                description: Some(description.to_string()),
                temperature: Some(temperature),
                humidity: Some(humidity),
            },
            road_segments: self
                .segments
                .iter()
                .map(|&(road_name, length_km, traffic_level)| RoadSegment {
                    road_name: Some(road_name.to_string()),
                    length_km: Some(length_km),
                    traffic_level: Some(traffic_level.to_string()),
                })
                .collect(),
            extra: Map::new(),
        }
    }
}

const FALLBACK_ROWS: [FallbackRow; 4] = [
    FallbackRow {
        destination: "Bogor",
        location: LatLng::new(-6.5950, 106.8167),
        distance_km: 60.0,
        eta: 1.2,
        traffic_level: "moderate",
        traffic_color: "#ffaa00",
        vehicle_type: "Truck Sedang",
        capacity_kg: 2000.0,
        utilization: 100.0,
        current_load: 2000.0,
        estimated_time: 100.0,
        weather: ("Cerah Berawan", 28.0, 75.0),
        segments: [
            ("Tol Jagorawi", 45.0, "Lancar"),
            ("Jalan Raya Bogor", 15.0, "Sedang"),
        ],
    },
    FallbackRow {
        destination: "Tangerang",
        location: LatLng::new(-6.1783, 106.6319),
        distance_km: 55.0,
        eta: 1.1,
        traffic_level: "heavy",
        traffic_color: "#ff4444",
        vehicle_type: "Truck Kecil",
        capacity_kg: 1000.0,
        utilization: 70.0,
        current_load: 700.0,
        estimated_time: 90.0,
        weather: ("Hujan Ringan", 26.0, 85.0),
        segments: [
            ("Tol Jakarta-Tangerang", 40.0, "Macet"),
            ("Jalan Raya Tangerang", 15.0, "Sedang"),
        ],
    },
    FallbackRow {
        destination: "Jakarta",
        location: LatLng::new(-6.2088, 106.8456),
        distance_km: 17.0,
        eta: 0.8,
        traffic_level: "heavy",
        traffic_color: "#ff4444",
        vehicle_type: "Truck Sedang",
        capacity_kg: 2000.0,
        utilization: 85.0,
        current_load: 1700.0,
        estimated_time: 60.0,
        weather: ("Cerah", 30.0, 70.0),
        segments: [
            ("Tol Dalam Kota", 12.0, "Macet"),
            ("Jalan Arteri Jakarta", 5.0, "Sedang"),
        ],
    },
    FallbackRow {
        destination: "Bekasi",
        location: LatLng::new(-6.2349, 106.9896),
        distance_km: 10.0,
        eta: 0.5,
        traffic_level: "light",
        traffic_color: "#44ff44",
        vehicle_type: "Truck Kecil",
        capacity_kg: 1000.0,
        utilization: 50.0,
        current_load: 500.0,
        estimated_time: 30.0,
        weather: ("Cerah Berawan", 29.0, 72.0),
        segments: [
            ("Tol Jakarta-Cikampek", 8.0, "Lancar"),
            ("Jalan Raya Bekasi", 2.0, "Lancar"),
        ],
    },
];

static FALLBACK_DATASET: LazyLock<NormalizedDataset> = LazyLock::new(|| NormalizedDataset {
    success: Some(true),
    message: None,
    routes: FALLBACK_ROWS.iter().map(FallbackRow::to_route).collect(),
    statistics: Some(Statistics {
        total_routes: Some(4),
        total_distance_km: Some(142.0),
        average_utilization: Some(76.25),
        active_vehicles: Some(4),
        extra: Map::new(),
    }),
    extra: Map::new(),
});

/// The complete sample dataset used whenever live data is unavailable.
pub fn fallback_dataset() -> NormalizedDataset {
    FALLBACK_DATASET.clone()
}

const SAMPLE_TRAFFIC: [(&str, &str, &str); 4] = [
    ("Bogor", "moderate", "#ffaa00"),
    ("Tangerang", "heavy", "#ff4444"),
    ("Jakarta", "heavy", "#ff4444"),
    ("Bekasi", "light", "#44ff44"),
];

const SAMPLE_WEATHER: [(&str, &str, f64, f64); 4] = [
    ("Bogor", "Cerah Berawan", 28.0, 75.0),
    ("Tangerang", "Hujan Ringan", 26.0, 85.0),
    ("Jakarta", "Cerah", 30.0, 70.0),
    ("Bekasi", "Cerah Berawan", 29.0, 72.0),
];

/// Traffic and weather tables served when no conditions source is configured.
pub fn sample_conditions() -> ConditionsSnapshot {
    ConditionsSnapshot {
        traffic: SAMPLE_TRAFFIC
            .iter()
            .map(|&(name, level, color)| {
                (
                    name.to_string(),
                    TrafficInfo {
                        level: level.to_string(),
                        color: color.to_string(),
                    },
                )
            })
            .collect(),
        weather: SAMPLE_WEATHER
            .iter()
            .map(|&(name, condition, temp, humidity)| {
                (
                    name.to_string(),
                    WeatherInfo {
                        condition: condition.to_string(),
                        temp,
                        humidity,
                    },
                )
            })
            .collect(),
    }
}
