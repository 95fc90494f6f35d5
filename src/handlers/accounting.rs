use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::accounting::{CreateAccountingEntryRequest, UpdateAccountingEntryRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tracing::info;
use uuid::Uuid;

pub async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountingEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let entry = state
        .services
        .accounting
        .create_entry(payload)
        .await
        .map_err(map_service_error)?;

    info!("Accounting entry recorded: {}", entry.id);
    Ok(created_response(entry))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .services
        .accounting
        .get_entry(entry_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Accounting entry with ID {} not found", entry_id))
        })?;

    Ok(success_response(entry))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (entries, total) = state
        .services
        .accounting
        .list_entries(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        entries,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<UpdateAccountingEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let entry = state
        .services
        .accounting
        .update_entry(entry_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Accounting entry updated: {}", entry_id);
    Ok(success_response(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .accounting
        .delete_entry(entry_id)
        .await
        .map_err(map_service_error)?;

    info!("Accounting entry deleted: {}", entry_id);
    Ok(no_content_response())
}

/// Income/expense totals and net profit across the whole ledger
#[utoipa::path(
    get,
    path = "/api/v1/accounting/summary",
    responses(
        (status = 200, description = "Ledger summary", body = crate::services::accounting::AccountingSummary)
    ),
    tag = "accounting"
)]
pub async fn summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .services
        .accounting
        .summary()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(summary))
}

/// Creates the router for accounting endpoints
pub fn accounting_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_entry))
        .route("/", get(list_entries))
        .route("/summary", get(summary))
        .route("/:id", get(get_entry))
        .route("/:id", put(update_entry))
        .route("/:id", delete(delete_entry))
}
