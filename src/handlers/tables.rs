use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::tables::{CreateTableRequest, UpdateTableRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tracing::info;
use uuid::Uuid;

pub async fn create_table(
    State(state): State<AppState>,
    Json(payload): Json<CreateTableRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let table = state
        .services
        .tables
        .create_table(payload)
        .await
        .map_err(map_service_error)?;

    info!("Table created: {}", table.id);
    Ok(created_response(table))
}

pub async fn get_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let table = state
        .services
        .tables
        .get_table(table_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Table with ID {} not found", table_id)))?;

    Ok(success_response(table))
}

pub async fn list_tables(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (tables, total) = state
        .services
        .tables
        .list_tables(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        tables,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

pub async fn update_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    Json(payload): Json<UpdateTableRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let table = state
        .services
        .tables
        .update_table(table_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Table updated: {}", table_id);
    Ok(success_response(table))
}

pub async fn delete_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .tables
        .delete_table(table_id)
        .await
        .map_err(map_service_error)?;

    info!("Table deleted: {}", table_id);
    Ok(no_content_response())
}

/// Creates the router for table endpoints
pub fn table_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_table))
        .route("/", get(list_tables))
        .route("/:id", get(get_table))
        .route("/:id", put(update_table))
        .route("/:id", delete(delete_table))
}
