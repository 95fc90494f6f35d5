use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::procurement::{CreatePurchaseOrderRequest, UpdatePurchaseOrderRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tracing::info;
use uuid::Uuid;

/// Create a new purchase order with its line items
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let po = state
        .services
        .procurement
        .create_purchase_order(payload)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order created: {}", po.order.id);
    Ok(created_response(po))
}

/// Get a purchase order by ID
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order fetched"),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let po = state
        .services
        .procurement
        .get_purchase_order(po_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Purchase order with ID {} not found", po_id)))?;

    Ok(success_response(po))
}

/// List purchase orders with pagination
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (orders, total) = state
        .services
        .procurement
        .list_purchase_orders(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        orders,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Update a purchase order's header fields
pub async fn update_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
    Json(payload): Json<UpdatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let po = state
        .services
        .procurement
        .update_purchase_order(po_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order updated: {}", po_id);
    Ok(success_response(po))
}

/// Delete a purchase order
pub async fn delete_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .procurement
        .delete_purchase_order(po_id)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order deleted: {}", po_id);
    Ok(no_content_response())
}

/// Receive a pending purchase order: mark it received and apply every line
/// item's quantity to stock
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/receive",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order received", body = crate::services::procurement::ReceiptSummary),
        (status = 400, description = "Order is not pending", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn receive_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .services
        .procurement
        .receive_purchase_order(po_id)
        .await
        .map_err(map_service_error)?;

    info!(
        "Purchase order received: {} ({} items)",
        po_id, summary.items_received
    );
    Ok(success_response(summary))
}

/// Cancel a pending purchase order
pub async fn cancel_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let po = state
        .services
        .procurement
        .cancel_purchase_order(po_id)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order cancelled: {}", po_id);
    Ok(success_response(po))
}

/// Creates the router for purchase order endpoints
pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase_order))
        .route("/", get(list_purchase_orders))
        .route("/:id", get(get_purchase_order))
        .route("/:id", put(update_purchase_order))
        .route("/:id", delete(delete_purchase_order))
        .route("/:id/receive", post(receive_purchase_order))
        .route("/:id/cancel", post(cancel_purchase_order))
}
