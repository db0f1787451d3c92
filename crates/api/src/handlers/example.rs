//! Handlers for the `/examples` resource.
//!
//! Each handler delegates to [`ExampleService`] and wraps the result in the
//! standard envelope. Domain failures propagate as [`AppError`](crate::error::AppError).
//!
//! Path and body extractors run before the handler body, so malformed input
//! is rejected before a storage session is opened.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use stencil_core::types::DbId;

use crate::error::AppResult;
use crate::extract::{ApiPath, ValidatedJson};
use crate::response::{ApiListResponse, ApiResponse};
use crate::schemas::example::{ExampleCreateRequest, ExampleResponse, ExampleUpdateRequest};
use crate::services::ExampleService;
use crate::state::AppState;

/// Open a service on a session scoped to the current request.
///
/// The session is released when the service is dropped at the end of the
/// handler, whatever the outcome.
async fn open_service(state: &AppState) -> AppResult<ExampleService> {
    Ok(ExampleService::open(state.data_source.as_ref()).await?)
}

/// GET /api/v1/examples
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<ApiListResponse<ExampleResponse>>> {
    let mut service = open_service(&state).await?;
    let examples = service.get_all().await?;
    let data = examples.into_iter().map(ExampleResponse::from).collect();
    Ok(Json(ApiListResponse::success(data, "get list success")))
}

/// GET /api/v1/examples/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<ExampleResponse>>> {
    let mut service = open_service(&state).await?;
    let example = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(
        Some(ExampleResponse::from(example)),
        "get example success",
    )))
}

/// POST /api/v1/examples
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ExampleCreateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ExampleResponse>>)> {
    let mut service = open_service(&state).await?;
    let example = service.create(input).await?;
    let body = ApiResponse::success(Some(ExampleResponse::from(example)), "create success")
        .with_status(StatusCode::CREATED.as_str());
    Ok((StatusCode::CREATED, Json(body)))
}

/// PUT /api/v1/examples/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ValidatedJson(input): ValidatedJson<ExampleUpdateRequest>,
) -> AppResult<Json<ApiResponse<ExampleResponse>>> {
    let mut service = open_service(&state).await?;
    let example = service.update(id, input).await?;
    Ok(Json(ApiResponse::success(
        Some(ExampleResponse::from(example)),
        "update success",
    )))
}

/// DELETE /api/v1/examples/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut service = open_service(&state).await?;
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(None, "delete success")))
}
