//! Counterpoint API Library
//!
//! Point-of-sale and inventory backend: CRUD resources over a relational
//! schema, stock adjustments mirrored to a realtime store, and AI-assisted
//! insight endpoints.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod completion;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod stock_mirror;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Composes the full v1 API surface
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .nest("/products", handlers::products::product_routes())
        .nest("/suppliers", handlers::suppliers::supplier_routes())
        .nest(
            "/purchase-orders",
            handlers::purchase_orders::purchase_order_routes(),
        )
        .nest("/orders", handlers::orders::order_routes())
        .nest("/customers", handlers::customers::customer_routes())
        .nest("/employees", handlers::employees::employee_routes())
        .nest("/tables", handlers::tables::table_routes())
        .nest("/payments", handlers::payments::payment_routes())
        .nest("/accounting", handlers::accounting::accounting_routes())
        .nest("/ui-settings", handlers::settings::ui_settings_routes())
        .nest("/templates", handlers::settings::template_routes())
        .nest(
            "/property-settings",
            handlers::settings::property_settings_routes(),
        )
        .nest("/insights", handlers::insights::insight_routes())
}

async fn api_status() -> Result<Json<Value>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "counterpoint-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(status_data))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<Value>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(health_data))
}
