use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use dashboard::{
    normalizer::{normalize, project_vehicles, rule_summaries},
    scheduler::Snapshots,
    types::{NormalizedDataset, RawDataset, VehicleProjection},
    view::build_dashboard,
};
use serde::Serialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

#[derive(Clone)]
pub struct AppState {
    pub snapshots: Snapshots,
}

impl AppState {
    pub fn new(snapshots: Snapshots) -> Self {
        Self { snapshots }
    }
}

#[derive(Serialize)]
struct NormalizeResponse {
    dataset: NormalizedDataset,
    vehicles: Vec<VehicleProjection>,
    is_fallback: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/routes", get(get_routes))
        .route("/api/conditions", get(get_conditions))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/refresh", post(refresh))
        .route("/api/normalize", post(normalize_payload))
        .route("/api/normalization-rules", get(normalization_rules))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn loading() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "status": "loading" })),
    )
        .into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_routes(State(state): State<AppState>) -> Response {
    match state.snapshots.routes() {
        Some(snapshot) => Json(&*snapshot).into_response(),
        None => loading(),
    }
}

async fn get_conditions(State(state): State<AppState>) -> Response {
    Json(&*state.snapshots.conditions()).into_response()
}

async fn get_dashboard(State(state): State<AppState>) -> Response {
    let Some(snapshot) = state.snapshots.routes() else {
        return loading();
    };
    let conditions = state.snapshots.conditions();

    Json(build_dashboard(&snapshot, &conditions.conditions)).into_response()
}

async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    info!("Manual refresh requested via API");
    state.snapshots.request_refresh();

    (
        StatusCode::ACCEPTED,
        Json(json!({ "status": "refresh requested" })),
    )
}

async fn normalize_payload(payload: Result<Json<RawDataset>, JsonRejection>) -> Response {
    let raw = match payload {
        Ok(Json(raw)) => raw,
        Err(rejection) => {
            debug!("Rejected normalize payload: {}", rejection);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    let dataset = normalize(Some(&raw));
    let vehicles = project_vehicles(&dataset.routes);

    Json(NormalizeResponse {
        dataset,
        vehicles,
        is_fallback: !raw.has_routes(),
    })
    .into_response()
}

async fn normalization_rules() -> impl IntoResponse {
    Json(rule_summaries())
}
