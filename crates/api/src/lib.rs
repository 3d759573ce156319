mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Json, Path, Query, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use wayfarer_core::{
    known_destinations, FlowKind, PlanError, PlanningStep, TripParameters, UserPreferences,
};
use wayfarer_currency::{CurrencyError, CurrencyRequest, CurrencyService, HttpRateProvider};
use wayfarer_observability::{AppMetrics, MetricsSnapshot};
use wayfarer_planner::{PlannerError, TripPlanner};
use wayfarer_storage::Store;

pub use config::ApiConfig;

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct ApiState {
    pub planner: TripPlanner<Store>,
    pub metrics: Arc<AppMetrics>,
    pub api_key: String,
    pub storage_backend: &'static str,
    pub allowed_origins: Arc<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    storage: &'static str,
    currency_upstream: bool,
    known_destinations: Vec<&'static str>,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Serialize)]
struct FlowStepsResponse {
    flow: FlowKind,
    steps: &'static [PlanningStep],
}

#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    flow: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct GotoRequest {
    index: usize,
}

#[derive(Debug, Deserialize)]
struct PlansQuery {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct BudgetQuery {
    currency: String,
}

#[derive(Debug, Deserialize)]
struct SynthesizeRequest {
    #[serde(flatten)]
    params: TripParameters,
    seed: Option<u64>,
}

pub async fn build_app(config: &ApiConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();

    let store = match config.database_url.as_deref() {
        Some(database_url) => Store::sqlite(database_url).await?,
        None => Store::memory(),
    };
    let storage_backend = store.backend();

    let currency = match config.currency_api_url.as_deref() {
        Some(url) => CurrencyService::new(
            HttpRateProvider::new(url, config.currency_timeout)
                .context("failed to build currency client")?,
        ),
        None => CurrencyService::offline(),
    };

    let planner = TripPlanner::new(
        Arc::new(store),
        currency,
        metrics.clone(),
        config.generation,
    )
    .with_session_ttl(config.session_ttl);

    let state = ApiState {
        planner,
        metrics,
        api_key: config.api_key.clone(),
        storage_backend,
        allowed_origins: Arc::new(config.allowed_origins.clone()),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/flows/{flow}/steps", get(flow_steps))
        .route("/v1/sessions", post(create_session))
        .route(
            "/v1/sessions/{id}",
            get(get_session).delete(delete_session),
        )
        .route("/v1/sessions/{id}/actions", post(session_action))
        .route("/v1/sessions/{id}/next", post(session_next))
        .route("/v1/sessions/{id}/prev", post(session_prev))
        .route("/v1/sessions/{id}/goto", post(session_goto))
        .route("/v1/sessions/{id}/preferences", post(session_preferences))
        .route("/v1/sessions/{id}/generate", post(generate_start))
        .route("/v1/sessions/{id}/generate/cancel", post(generate_cancel))
        .route("/v1/sessions/{id}/draft", post(save_draft))
        .route("/v1/sessions/{id}/confirm", post(confirm_plan))
        .route("/v1/sessions/{id}/budget", get(session_budget))
        .route("/v1/plans", get(list_plans))
        .route("/v1/synthesize", post(synthesize))
        .route("/v1/currency", post(currency_exchange))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        storage: state.storage_backend,
        currency_upstream: state.planner.has_currency_upstream(),
        known_destinations: known_destinations(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn flow_steps(Path(flow): Path<String>) -> Response {
    let Some(kind) = FlowKind::parse(&flow) else {
        return error_response(
            StatusCode::NOT_FOUND,
            "unknown_flow",
            format!("flow `{}` does not exist", flow),
        );
    };

    (
        StatusCode::OK,
        Json(FlowStepsResponse {
            flow: kind,
            steps: kind.steps(),
        }),
    )
        .into_response()
}

async fn create_session(
    State(state): State<ApiState>,
    Json(input): Json<CreateSessionRequest>,
) -> Response {
    let Some(kind) = FlowKind::parse(&input.flow) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "unknown_flow",
            format!("flow `{}` does not exist", input.flow),
        );
    };
    if input.user_id.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_user",
            "user_id must not be empty".to_string(),
        );
    }

    let session = state.planner.open_session(kind, &input.user_id);
    (StatusCode::CREATED, Json(session.view())).into_response()
}

async fn get_session(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    match state.planner.session(&id) {
        Ok(session) => (StatusCode::OK, Json(session.view())).into_response(),
        Err(err) => planner_error_response(err),
    }
}

async fn delete_session(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    match state.planner.close_session(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => planner_error_response(err),
    }
}

async fn session_action(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(action): Json<serde_json::Value>,
) -> Response {
    let result = state
        .planner
        .session(&id)
        .and_then(|session| session.edit(action));
    match result {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => planner_error_response(err),
    }
}

async fn session_next(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    match state.planner.session(&id) {
        Ok(session) => (StatusCode::OK, Json(session.next())).into_response(),
        Err(err) => planner_error_response(err),
    }
}

async fn session_prev(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    match state.planner.session(&id) {
        Ok(session) => (StatusCode::OK, Json(session.prev())).into_response(),
        Err(err) => planner_error_response(err),
    }
}

async fn session_goto(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(input): Json<GotoRequest>,
) -> Response {
    match state.planner.session(&id) {
        Ok(session) => (StatusCode::OK, Json(session.goto(input.index))).into_response(),
        Err(err) => planner_error_response(err),
    }
}

async fn session_preferences(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(prefs): Json<UserPreferences>,
) -> Response {
    let result = state
        .planner
        .session(&id)
        .and_then(|session| session.apply_preferences(&prefs));
    match result {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => planner_error_response(err),
    }
}

async fn generate_start(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let session = match state.planner.session(&id) {
        Ok(session) => session,
        Err(err) => return planner_error_response(err),
    };

    match session.start_generation() {
        Ok(handle) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({
                "session_id": session.id(),
                "generation": handle.status(),
                "message": handle.status().message(),
            })),
        )
            .into_response(),
        Err(err) => planner_error_response(err.into()),
    }
}

async fn generate_cancel(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let result = state
        .planner
        .session(&id)
        .and_then(|session| session.cancel_generation().map_err(PlannerError::from));
    match result {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => planner_error_response(err),
    }
}

async fn save_draft(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let session = match state.planner.session(&id) {
        Ok(session) => session,
        Err(err) => return planner_error_response(err),
    };

    match session.save_draft().await {
        Ok(persisted) => (StatusCode::OK, Json(persisted)).into_response(),
        Err(err) => planner_error_response(err.into()),
    }
}

async fn confirm_plan(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let session = match state.planner.session(&id) {
        Ok(session) => session,
        Err(err) => return planner_error_response(err),
    };

    match session.confirm_plan().await {
        Ok(persisted) => (StatusCode::OK, Json(persisted)).into_response(),
        Err(err) => planner_error_response(err.into()),
    }
}

async fn session_budget(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Query(query): Query<BudgetQuery>,
) -> Response {
    match state.planner.session_budget(&id, &query.currency).await {
        Ok(Some(display)) => (StatusCode::OK, Json(display)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "no_itinerary",
            "generate an itinerary before asking for its budget".to_string(),
        ),
        Err(err) => planner_error_response(err),
    }
}

async fn list_plans(State(state): State<ApiState>, Query(query): Query<PlansQuery>) -> Response {
    match state.planner.list_plans(&query.user_id).await {
        Ok(plans) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "user_id": query.user_id,
                "plans": plans,
            })),
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "listing plans failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "plans_unavailable",
                err.to_string(),
            )
        }
    }
}

async fn synthesize(
    State(state): State<ApiState>,
    Json(input): Json<SynthesizeRequest>,
) -> impl IntoResponse {
    let content = state.planner.synthesize(&input.params, input.seed);
    (StatusCode::OK, Json(content))
}

async fn currency_exchange(
    State(state): State<ApiState>,
    Json(request): Json<CurrencyRequest>,
) -> Response {
    match state.planner.exchange(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => planner_error_response(err),
    }
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if header_key != state.api_key {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid x-api-key".to_string(),
        );
    }

    next.run(request).await
}

fn is_public_endpoint(path: &str) -> bool {
    path == "/health"
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-api-key"),
        ])
}

fn planner_error_response(err: PlannerError) -> Response {
    let status = match &err {
        PlannerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        PlannerError::InvalidAction { .. } => StatusCode::BAD_REQUEST,
        PlannerError::Currency(CurrencyError::Upstream(_)) => StatusCode::BAD_GATEWAY,
        PlannerError::Currency(_) => StatusCode::BAD_REQUEST,
        PlannerError::Plan(PlanError::ValidationFailed { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        PlannerError::Plan(
            PlanError::GenerationInProgress
            | PlanError::NotGenerating
            | PlanError::InvalidTransition { .. },
        ) => StatusCode::CONFLICT,
        PlannerError::Plan(PlanError::PersistenceFailed(_) | PlanError::GenerationFailed(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    error_response(status, err.code(), err.to_string())
}

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(serde_json::json!({
            "success": false,
            "error": code,
            "message": message,
        })),
    )
        .into_response()
}
