use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::products::{CreateProductRequest, UpdateProductRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

/// Signed stock delta applied by the update-stock action
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStockRequest {
    pub quantity: i32,
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product = state
        .services
        .products
        .create_product(payload)
        .await
        .map_err(map_service_error)?;

    info!("Product created: {}", product.id);
    Ok(created_response(product))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product fetched"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .get_product(product_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Product with ID {} not found", product_id)))?;

    Ok(success_response(product))
}

/// List products with pagination
pub async fn list_products(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (products, total) = state
        .services
        .products
        .list_products(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        products,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// List products at or below their reorder level
pub async fn list_low_stock(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state
        .services
        .products
        .list_low_stock()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(products))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product = state
        .services
        .products
        .update_product(product_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Product updated: {}", product_id);
    Ok(success_response(product))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .products
        .delete_product(product_id)
        .await
        .map_err(map_service_error)?;

    info!("Product deleted: {}", product_id);
    Ok(no_content_response())
}

/// Apply a signed stock delta and mirror the new level
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/update-stock",
    request_body = UpdateStockRequest,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Stock adjusted", body = crate::services::products::StockAdjustment),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Adjustment would drive stock negative", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_stock(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateStockRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let adjustment = state
        .services
        .products
        .adjust_stock(product_id, payload.quantity)
        .await
        .map_err(map_service_error)?;

    info!(
        "Stock updated for {}: {} -> {}",
        product_id, adjustment.previous_quantity, adjustment.new_quantity
    );
    Ok(success_response(adjustment))
}

/// Creates the router for product endpoints
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/", get(list_products))
        .route("/low-stock", get(list_low_stock))
        .route("/:id", get(get_product))
        .route("/:id", put(update_product))
        .route("/:id", delete(delete_product))
        .route("/:id/update-stock", post(update_stock))
}
