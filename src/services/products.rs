use crate::{
    db::DbPool,
    entities::product::{
        self, ActiveModel as ProductActiveModel, Entity as ProductEntity, Model as ProductModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    stock_mirror::StockMirror,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Product name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 50, message = "SKU is required"))]
    pub sku: String,
    pub price: Decimal,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    #[serde(default)]
    pub stock_quantity: i32,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    #[serde(default = "default_reorder_level")]
    pub reorder_level: i32,
}

fn default_reorder_level() -> i32 {
    10
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: Option<i32>,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: Option<i32>,
}

/// Result of one stock adjustment: the persisted before/after quantities.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockAdjustment {
    pub product_id: Uuid,
    pub previous_quantity: i32,
    pub new_quantity: i32,
}

/// Service for the product catalog and the stock-adjustment workflow.
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
    mirror: Arc<dyn StockMirror>,
}

impl ProductService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Option<EventSender>,
        mirror: Arc<dyn StockMirror>,
    ) -> Self {
        Self {
            db,
            event_sender,
            mirror,
        }
    }

    /// Creates a new product
    #[instrument(skip(self, request), fields(sku = %request.sku))]
    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProductModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let now = Utc::now();
        let product_id = Uuid::new_v4();

        let product = ProductActiveModel {
            id: Set(product_id),
            name: Set(request.name),
            description: Set(request.description),
            sku: Set(request.sku.clone()),
            price: Set(request.price),
            stock_quantity: Set(request.stock_quantity),
            reorder_level: Set(request.reorder_level),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = product.insert(db).await.map_err(|e| {
            error!(error = %e, sku = %request.sku, "Failed to create product");
            ServiceError::DatabaseError(e)
        })?;

        info!(product_id = %product_id, "Product created");

        if let Some(sender) = &self.event_sender {
            sender.send_or_log(Event::ProductCreated(product_id)).await;
        }

        Ok(created)
    }

    /// Retrieves a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(
        &self,
        product_id: Uuid,
    ) -> Result<Option<ProductModel>, ServiceError> {
        let db = &*self.db;
        let product = ProductEntity::find_by_id(product_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(product)
    }

    /// Lists products with pagination
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<ProductModel>, u64), ServiceError> {
        let db = &*self.db;
        let paginator = ProductEntity::find()
            .order_by_asc(product::Column::Name)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let products = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((products, total))
    }

    /// Lists products at or below their reorder level
    #[instrument(skip(self))]
    pub async fn list_low_stock(&self) -> Result<Vec<ProductModel>, ServiceError> {
        let db = &*self.db;
        let products = ProductEntity::find()
            .filter(
                Expr::col(product::Column::StockQuantity)
                    .lte(Expr::col(product::Column::ReorderLevel)),
            )
            .order_by_asc(product::Column::StockQuantity)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(products)
    }

    /// Updates a product
    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        product_id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<ProductModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let product = ProductEntity::find_by_id(product_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", product_id))
            })?;

        let mut active: ProductActiveModel = product.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(sku) = request.sku {
            active.sku = Set(sku);
        }
        if let Some(price) = request.price {
            active.price = Set(price);
        }
        if let Some(stock_quantity) = request.stock_quantity {
            active.stock_quantity = Set(stock_quantity);
        }
        if let Some(reorder_level) = request.reorder_level {
            active.reorder_level = Set(reorder_level);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, product_id = %product_id, "Failed to update product");
            ServiceError::DatabaseError(e)
        })?;

        info!(product_id = %product_id, "Product updated");

        if let Some(sender) = &self.event_sender {
            sender.send_or_log(Event::ProductUpdated(product_id)).await;
        }

        Ok(updated)
    }

    /// Deletes a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let result = ProductEntity::delete_by_id(product_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Product {} not found",
                product_id
            )));
        }

        info!(product_id = %product_id, "Product deleted");

        if let Some(sender) = &self.event_sender {
            sender.send_or_log(Event::ProductDeleted(product_id)).await;
        }

        Ok(())
    }

    /// Applies a signed quantity delta to a product's stock, then pushes the
    /// new level to the mirror store.
    ///
    /// The relational update commits first; the mirror push is best-effort
    /// and a push failure never rolls the stock back. An adjustment that
    /// would drive stock below zero is rejected without touching the row.
    #[instrument(skip(self))]
    pub async fn adjust_stock(
        &self,
        product_id: Uuid,
        delta: i32,
    ) -> Result<StockAdjustment, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let product = ProductEntity::find_by_id(product_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", product_id))
            })?;

        let previous_quantity = product.stock_quantity;
        let new_quantity = previous_quantity + delta;
        if new_quantity < 0 {
            return Err(ServiceError::InsufficientStock(format!(
                "adjustment of {} would drive stock below zero (current stock {})",
                delta, previous_quantity
            )));
        }

        let mut active: ProductActiveModel = product.into();
        active.stock_quantity = Set(new_quantity);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await.map_err(|e| {
            error!(error = %e, product_id = %product_id, "Failed to adjust stock");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(
            product_id = %product_id,
            previous_quantity,
            new_quantity,
            "Stock adjusted"
        );

        // Post-commit mirror push; divergence is logged, never propagated
        if let Err(e) = self.mirror.publish_stock(product_id, new_quantity).await {
            warn!(
                product_id = %product_id,
                new_quantity,
                error = %e,
                "Failed to mirror stock level"
            );
        }

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::StockAdjusted {
                    product_id,
                    old_quantity: previous_quantity,
                    new_quantity,
                    delta,
                })
                .await;
        }

        Ok(StockAdjustment {
            product_id,
            previous_quantity,
            new_quantity,
        })
    }
}
