use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use kalk_domain::CatalogMatch;
use kalk_service::{
	EstimateRequest, HealthReport, HealthStatus, ProjectEstimate, SavedEstimate, ServiceError,
	WorkItemQuery,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/estimations/search", post(search))
		.route("/v1/estimations/from-elements", post(from_elements))
		.route("/v1/estimations/projects/{project_id}", get(project_history))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/v1/admin/clear_cache", post(clear_cache)).with_state(state)
}

#[derive(Debug, Serialize)]
struct SearchResponse {
	matches: Vec<CatalogMatch>,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
	estimates: Vec<ProjectEstimate>,
}

#[derive(Debug, Serialize)]
struct ClearCacheResponse {
	removed: usize,
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
	let report = state.service.health().await;
	let status = match report.status {
		HealthStatus::Ok => StatusCode::OK,
		HealthStatus::Degraded | HealthStatus::Error => StatusCode::SERVICE_UNAVAILABLE,
	};

	(status, Json(report))
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<WorkItemQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
	let matches = state.service.search_work_items(&payload).await?;

	Ok(Json(SearchResponse { matches }))
}

async fn from_elements(
	State(state): State<AppState>,
	Json(payload): Json<EstimateRequest>,
) -> Result<Json<SavedEstimate>, ApiError> {
	let saved = state.service.estimate_from_elements(&payload).await?;

	Ok(Json(saved))
}

async fn project_history(
	State(state): State<AppState>,
	Path(project_id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
	let estimates = state.service.project_history(&project_id).await?;

	Ok(Json(HistoryResponse { estimates }))
}

async fn clear_cache(State(state): State<AppState>) -> Result<Json<ClearCacheResponse>, ApiError> {
	let removed = state.service.clear_cache().await?;

	Ok(Json(ClearCacheResponse { removed }))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, error_code) = match &err {
			ServiceError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
			ServiceError::Embedding { .. } => (StatusCode::BAD_GATEWAY, "embedding_unavailable"),
			ServiceError::Retrieval { .. } => (StatusCode::BAD_GATEWAY, "retrieval_unavailable"),
			ServiceError::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
		};

		Self { status, error_code: error_code.to_string(), message: err.to_string() }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
