use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::json;
use uuid::Uuid;

/// Free-text summary of recent sales activity
#[utoipa::path(
    get,
    path = "/api/v1/insights/sales-trends",
    responses(
        (status = 200, description = "Sales trend insight"),
        (status = 502, description = "Completion service unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "insights"
)]
pub async fn sales_trends(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let insights = state
        .services
        .insights
        .analyze_sales_trends()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({ "insights": insights })))
}

/// Product suggestions for a customer, one per line of the completion
#[utoipa::path(
    get,
    path = "/api/v1/insights/customers/{id}/recommendations",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Product recommendations"),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Completion service unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "insights"
)]
pub async fn product_recommendations(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let recommendations = state
        .services
        .insights
        .recommend_products(customer_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(
        json!({ "recommendations": recommendations }),
    ))
}

/// Suggested stock level for a product
#[utoipa::path(
    get,
    path = "/api/v1/insights/products/{id}/optimize",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Suggested stock level"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Completion service unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "insights"
)]
pub async fn optimize_inventory(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let optimal_level = state
        .services
        .insights
        .optimize_inventory(product_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(
        json!({ "optimal_inventory_level": optimal_level }),
    ))
}

/// Drafted performance review for an employee
#[utoipa::path(
    get,
    path = "/api/v1/insights/employees/{id}/performance",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Performance review"),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Completion service unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "insights"
)]
pub async fn employee_performance(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .services
        .insights
        .review_employee_performance(employee_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({ "performance_review": review })))
}

/// Creates the router for insight endpoints
pub fn insight_routes() -> Router<AppState> {
    Router::new()
        .route("/sales-trends", get(sales_trends))
        .route(
            "/customers/:id/recommendations",
            get(product_recommendations),
        )
        .route("/products/:id/optimize", get(optimize_inventory))
        .route("/employees/:id/performance", get(employee_performance))
}
