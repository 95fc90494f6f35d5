use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{errors::ApiError, handlers::AppState, services::payments::CreatePaymentRequest};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use tracing::info;
use uuid::Uuid;

pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let payment = state
        .services
        .payments
        .create_payment(payload)
        .await
        .map_err(map_service_error)?;

    info!("Payment recorded: {}", payment.id);
    Ok(created_response(payment))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state
        .services
        .payments
        .get_payment(payment_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Payment with ID {} not found", payment_id))
        })?;

    Ok(success_response(payment))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (payments, total) = state
        .services
        .payments
        .list_payments(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        payments,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// List payments recorded against one order
pub async fn list_payments_for_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state
        .services
        .payments
        .list_payments_for_order(order_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(payments))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .payments
        .delete_payment(payment_id)
        .await
        .map_err(map_service_error)?;

    info!("Payment deleted: {}", payment_id);
    Ok(no_content_response())
}

/// Creates the router for payment endpoints
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment))
        .route("/", get(list_payments))
        .route("/order/:order_id", get(list_payments_for_order))
        .route("/:id", get(get_payment))
        .route("/:id", delete(delete_payment))
}
