use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::employees::{CreateEmployeeRequest, UpdateEmployeeRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tracing::info;
use uuid::Uuid;

pub async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let employee = state
        .services
        .employees
        .create_employee(payload)
        .await
        .map_err(map_service_error)?;

    info!("Employee created: {}", employee.id);
    Ok(created_response(employee))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = state
        .services
        .employees
        .get_employee(employee_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Employee with ID {} not found", employee_id))
        })?;

    Ok(success_response(employee))
}

pub async fn list_employees(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (employees, total) = state
        .services
        .employees
        .list_employees(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        employees,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let employee = state
        .services
        .employees
        .update_employee(employee_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Employee updated: {}", employee_id);
    Ok(success_response(employee))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .employees
        .delete_employee(employee_id)
        .await
        .map_err(map_service_error)?;

    info!("Employee deleted: {}", employee_id);
    Ok(no_content_response())
}

/// Creates the router for employee endpoints
pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_employee))
        .route("/", get(list_employees))
        .route("/:id", get(get_employee))
        .route("/:id", put(update_employee))
        .route("/:id", delete(delete_employee))
}
