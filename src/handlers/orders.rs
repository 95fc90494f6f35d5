use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::orders::{CreateOrderRequest, OrderItemRequest, UpdateOrderRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tracing::info;
use uuid::Uuid;

/// Create a new order
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .orders
        .create_order(payload)
        .await
        .map_err(map_service_error)?;

    info!("Order created: {}", order.id);
    Ok(created_response(order))
}

/// Get an order with its line items
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .get_order(order_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Order with ID {} not found", order_id)))?;

    Ok(success_response(order))
}

/// List orders with pagination
pub async fn list_orders(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (orders, total) = state
        .services
        .orders
        .list_orders(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        orders,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Update an order's header fields
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .orders
        .update_order(order_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Order updated: {}", order_id);
    Ok(success_response(order))
}

/// Delete an order
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .orders
        .delete_order(order_id)
        .await
        .map_err(map_service_error)?;

    info!("Order deleted: {}", order_id);
    Ok(no_content_response())
}

/// List an order's line items
pub async fn get_order_items(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .orders
        .get_order_items(order_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(items))
}

/// Validate and append a line item to an existing order
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/items",
    request_body = OrderItemRequest,
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 201, description = "Line item appended"),
        (status = 400, description = "Invalid line item", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn add_order_item(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<OrderItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let item = state
        .services
        .orders
        .add_order_item(order_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Order item appended: {} -> {}", order_id, item.id);
    Ok(created_response(item))
}

/// Creates the router for order endpoints
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/", get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id", put(update_order))
        .route("/:id", delete(delete_order))
        .route("/:id/items", get(get_order_items))
        .route("/:id/items", post(add_order_item))
}
