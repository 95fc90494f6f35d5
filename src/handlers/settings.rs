use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::settings::{PropertySettingsRequest, TemplateRequest, UiSettingsRequest},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

// UI settings

pub async fn create_ui_settings(
    State(state): State<AppState>,
    Json(payload): Json<UiSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let record = state
        .services
        .settings
        .create_ui_settings(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(record))
}

pub async fn list_ui_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .services
        .settings
        .list_ui_settings()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(records))
}

pub async fn get_ui_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .services
        .settings
        .get_ui_settings(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("UI settings with ID {} not found", id)))?;
    Ok(success_response(record))
}

pub async fn update_ui_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UiSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let record = state
        .services
        .settings
        .update_ui_settings(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(record))
}

pub async fn delete_ui_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .settings
        .delete_ui_settings(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

// Templates

pub async fn create_template(
    State(state): State<AppState>,
    Json(payload): Json<TemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let record = state
        .services
        .settings
        .create_template(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(record))
}

pub async fn list_templates(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .services
        .settings
        .list_templates()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(records))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .services
        .settings
        .get_template(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Template with ID {} not found", id)))?;
    Ok(success_response(record))
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let record = state
        .services
        .settings
        .update_template(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(record))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .settings
        .delete_template(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

// Property settings

pub async fn create_property_settings(
    State(state): State<AppState>,
    Json(payload): Json<PropertySettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let record = state
        .services
        .settings
        .create_property_settings(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(record))
}

pub async fn list_property_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .services
        .settings
        .list_property_settings()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(records))
}

pub async fn get_property_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .services
        .settings
        .get_property_settings(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Property settings with ID {} not found", id))
        })?;
    Ok(success_response(record))
}

pub async fn update_property_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PropertySettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let record = state
        .services
        .settings
        .update_property_settings(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(record))
}

pub async fn delete_property_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .settings
        .delete_property_settings(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

/// Creates the router for UI settings endpoints
pub fn ui_settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_ui_settings))
        .route("/", get(list_ui_settings))
        .route("/:id", get(get_ui_settings))
        .route("/:id", put(update_ui_settings))
        .route("/:id", delete(delete_ui_settings))
}

/// Creates the router for template endpoints
pub fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_template))
        .route("/", get(list_templates))
        .route("/:id", get(get_template))
        .route("/:id", put(update_template))
        .route("/:id", delete(delete_template))
}

/// Creates the router for property settings endpoints
pub fn property_settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_property_settings))
        .route("/", get(list_property_settings))
        .route("/:id", get(get_property_settings))
        .route("/:id", put(update_property_settings))
        .route("/:id", delete(delete_property_settings))
}
