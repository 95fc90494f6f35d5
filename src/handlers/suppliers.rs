use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::suppliers::{CreateSupplierRequest, UpdateSupplierRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tracing::info;
use uuid::Uuid;

/// Create a new supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .create_supplier(payload)
        .await
        .map_err(map_service_error)?;

    info!("Supplier created: {}", supplier.id);
    Ok(created_response(supplier))
}

/// Get a supplier by ID
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .get_supplier(supplier_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Supplier with ID {} not found", supplier_id))
        })?;

    Ok(success_response(supplier))
}

/// List suppliers with pagination
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (suppliers, total) = state
        .services
        .suppliers
        .list_suppliers(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        suppliers,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .update_supplier(supplier_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Supplier updated: {}", supplier_id);
    Ok(success_response(supplier))
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .suppliers
        .delete_supplier(supplier_id)
        .await
        .map_err(map_service_error)?;

    info!("Supplier deleted: {}", supplier_id);
    Ok(no_content_response())
}

/// Creates the router for supplier endpoints
pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_supplier))
        .route("/", get(list_suppliers))
        .route("/:id", get(get_supplier))
        .route("/:id", put(update_supplier))
        .route("/:id", delete(delete_supplier))
}
