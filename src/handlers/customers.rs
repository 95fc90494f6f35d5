use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::customers::{CreateCustomerRequest, UpdateCustomerRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tracing::info;
use uuid::Uuid;

pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let customer = state
        .services
        .customers
        .create_customer(payload)
        .await
        .map_err(map_service_error)?;

    info!("Customer created: {}", customer.id);
    Ok(created_response(customer))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state
        .services
        .customers
        .get_customer(customer_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Customer with ID {} not found", customer_id))
        })?;

    Ok(success_response(customer))
}

pub async fn list_customers(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (customers, total) = state
        .services
        .customers
        .list_customers(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        customers,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let customer = state
        .services
        .customers
        .update_customer(customer_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Customer updated: {}", customer_id);
    Ok(success_response(customer))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .customers
        .delete_customer(customer_id)
        .await
        .map_err(map_service_error)?;

    info!("Customer deleted: {}", customer_id);
    Ok(no_content_response())
}

/// Creates the router for customer endpoints
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_customer))
        .route("/", get(list_customers))
        .route("/:id", get(get_customer))
        .route("/:id", put(update_customer))
        .route("/:id", delete(delete_customer))
}
