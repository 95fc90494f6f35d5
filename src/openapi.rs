use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Counterpoint API",
        version = "0.3.0",
        description = r#"
Point-of-sale and inventory backend.

Every domain entity is a CRUD resource under `/api/v1`. Action endpoints
cover the workflows: stock adjustment (mirrored to the realtime store),
purchase-order receipt, order line-item append, the accounting summary, and
the AI-assisted insight reports.
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    paths(
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::update_stock,
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::receive_purchase_order,
        crate::handlers::orders::add_order_item,
        crate::handlers::accounting::summary,
        crate::handlers::insights::sales_trends,
        crate::handlers::insights::product_recommendations,
        crate::handlers::insights::optimize_inventory,
        crate::handlers::insights::employee_performance,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::products::UpdateStockRequest,
        crate::services::products::CreateProductRequest,
        crate::services::products::UpdateProductRequest,
        crate::services::products::StockAdjustment,
        crate::services::procurement::CreatePurchaseOrderRequest,
        crate::services::procurement::PurchaseOrderItemRequest,
        crate::services::procurement::ReceiptSummary,
        crate::services::orders::OrderItemRequest,
        crate::services::accounting::AccountingSummary,
    )),
    tags(
        (name = "products", description = "Product catalog and stock adjustments"),
        (name = "purchase-orders", description = "Procurement and goods receipt"),
        (name = "orders", description = "Point-of-sale orders"),
        (name = "accounting", description = "Ledger entries and summaries"),
        (name = "insights", description = "AI-assisted analytics")
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated document
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
