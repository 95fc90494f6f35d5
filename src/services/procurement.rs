use crate::{
    db::DbPool,
    entities::{
        product::{ActiveModel as ProductActiveModel, Entity as ProductEntity},
        purchase_order::{
            self, ActiveModel as PurchaseOrderActiveModel, Entity as PurchaseOrderEntity,
            Model as PurchaseOrderModel, PurchaseOrderStatus,
        },
        purchase_order_item::{
            self, ActiveModel as PurchaseOrderItemActiveModel,
            Entity as PurchaseOrderItemEntity, Model as PurchaseOrderItemModel,
        },
        supplier::Entity as SupplierEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    stock_mirror::StockMirror,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    pub supplier_id: Uuid,
    pub expected_delivery_date: NaiveDate,
    #[validate(length(min = 1, message = "A purchase order needs at least one line item"))]
    pub items: Vec<PurchaseOrderItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PurchaseOrderItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePurchaseOrderRequest {
    pub expected_delivery_date: Option<NaiveDate>,
}

/// Purchase order with its owned line items, as served over the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseOrderResponse {
    #[serde(flatten)]
    pub order: PurchaseOrderModel,
    pub items: Vec<PurchaseOrderItemModel>,
}

/// Outcome of the receipt workflow.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReceiptSummary {
    pub purchase_order_id: Uuid,
    pub status: PurchaseOrderStatus,
    pub items_received: usize,
}

/// Service for purchase orders and the goods-receipt workflow.
#[derive(Clone)]
pub struct ProcurementService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
    mirror: Arc<dyn StockMirror>,
}

impl ProcurementService {
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

    /// Creates a purchase order together with its line items
    #[instrument(skip(self, request), fields(supplier_id = %request.supplier_id))]
    pub async fn create_purchase_order(
        &self,
        request: CreatePurchaseOrderRequest,
    ) -> Result<PurchaseOrderResponse, ServiceError> {
        request.validate()?;
        for item in &request.items {
            item.validate()?;
        }

        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        SupplierEntity::find_by_id(request.supplier_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Supplier {} not found", request.supplier_id))
            })?;

        let order_id = Uuid::new_v4();
        let header = PurchaseOrderActiveModel {
            id: Set(order_id),
            supplier_id: Set(request.supplier_id),
            order_date: Set(Utc::now()),
            expected_delivery_date: Set(request.expected_delivery_date),
            status: Set(PurchaseOrderStatus::Pending),
        };

        let order = header.insert(&txn).await.map_err(|e| {
            error!(error = %e, "Failed to create purchase order header");
            ServiceError::DatabaseError(e)
        })?;

        let mut items = Vec::with_capacity(request.items.len());
        for item in request.items {
            let line = PurchaseOrderItemActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_order_id: Set(order_id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
            };
            let created = line.insert(&txn).await.map_err(|e| {
                error!(error = %e, "Failed to create purchase order line");
                ServiceError::DatabaseError(e)
            })?;
            items.push(created);
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(purchase_order_id = %order_id, lines = items.len(), "Purchase order created");

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderCreated(order_id))
                .await;
        }

        Ok(PurchaseOrderResponse { order, items })
    }

    /// Retrieves a purchase order with its line items
    #[instrument(skip(self))]
    pub async fn get_purchase_order(
        &self,
        order_id: Uuid,
    ) -> Result<Option<PurchaseOrderResponse>, ServiceError> {
        let db = &*self.db;
        let order = PurchaseOrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = PurchaseOrderItemEntity::find()
            .filter(purchase_order_item::Column::PurchaseOrderId.eq(order_id))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(Some(PurchaseOrderResponse { order, items }))
    }

    /// Lists purchase orders with pagination, newest first
    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<PurchaseOrderModel>, u64), ServiceError> {
        let db = &*self.db;
        let paginator = PurchaseOrderEntity::find()
            .order_by_desc(purchase_order::Column::OrderDate)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let orders = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((orders, total))
    }

    /// Updates mutable header fields of a pending purchase order
    #[instrument(skip(self, request))]
    pub async fn update_purchase_order(
        &self,
        order_id: Uuid,
        request: UpdatePurchaseOrderRequest,
    ) -> Result<PurchaseOrderModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let order = PurchaseOrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", order_id))
            })?;

        let mut active: PurchaseOrderActiveModel = order.into();
        if let Some(date) = request.expected_delivery_date {
            active.expected_delivery_date = Set(date);
        }

        let updated = active
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderUpdated(order_id))
                .await;
        }

        Ok(updated)
    }

    /// Deletes a purchase order and its line items
    #[instrument(skip(self))]
    pub async fn delete_purchase_order(&self, order_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let result = PurchaseOrderEntity::delete_by_id(order_id)
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Purchase order {} not found",
                order_id
            )));
        }

        PurchaseOrderItemEntity::delete_many()
            .filter(purchase_order_item::Column::PurchaseOrderId.eq(order_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(purchase_order_id = %order_id, "Purchase order deleted");
        Ok(())
    }

    /// Cancels a pending purchase order
    #[instrument(skip(self))]
    pub async fn cancel_purchase_order(
        &self,
        order_id: Uuid,
    ) -> Result<PurchaseOrderModel, ServiceError> {
        let db = &*self.db;
        let order = PurchaseOrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", order_id))
            })?;

        if order.status != PurchaseOrderStatus::Pending {
            return Err(ServiceError::InvalidStatus(format!(
                "purchase order {} is {:?}; only pending orders can be cancelled",
                order_id, order.status
            )));
        }

        let mut active: PurchaseOrderActiveModel = order.into();
        active.status = Set(PurchaseOrderStatus::Cancelled);
        let updated = active
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(purchase_order_id = %order_id, "Purchase order cancelled");

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderCancelled(order_id))
                .await;
        }

        Ok(updated)
    }

    /// Receives a pending purchase order: marks it received and applies each
    /// line item's quantity to product stock, all in one transaction. Mirror
    /// pushes for the new stock levels happen after commit, one per line,
    /// best-effort.
    #[instrument(skip(self))]
    pub async fn receive_purchase_order(
        &self,
        order_id: Uuid,
    ) -> Result<ReceiptSummary, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let order = PurchaseOrderEntity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", order_id))
            })?;

        if order.status != PurchaseOrderStatus::Pending {
            return Err(ServiceError::InvalidStatus(format!(
                "purchase order {} is {:?}; only pending orders can be received",
                order_id, order.status
            )));
        }

        let items = PurchaseOrderItemEntity::find()
            .filter(purchase_order_item::Column::PurchaseOrderId.eq(order_id))
            .all(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut active: PurchaseOrderActiveModel = order.into();
        active.status = Set(PurchaseOrderStatus::Received);
        active.update(&txn).await.map_err(|e| {
            error!(error = %e, purchase_order_id = %order_id, "Failed to mark purchase order received");
            ServiceError::DatabaseError(e)
        })?;

        let mut new_levels = Vec::with_capacity(items.len());
        for item in &items {
            let product = ProductEntity::find_by_id(item.product_id)
                .one(&txn)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Product {} on purchase order {} not found",
                        item.product_id, order_id
                    ))
                })?;

            let new_quantity = product.stock_quantity + item.quantity;
            let mut product_active: ProductActiveModel = product.into();
            product_active.stock_quantity = Set(new_quantity);
            product_active.updated_at = Set(Utc::now());
            product_active.update(&txn).await.map_err(|e| {
                error!(error = %e, product_id = %item.product_id, "Failed to apply received quantity");
                ServiceError::DatabaseError(e)
            })?;

            new_levels.push((item.product_id, new_quantity));
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(
            purchase_order_id = %order_id,
            items_received = items.len(),
            "Purchase order received"
        );

        // Post-commit mirror pushes, one per line item
        for (product_id, stock_quantity) in &new_levels {
            if let Err(e) = self.mirror.publish_stock(*product_id, *stock_quantity).await {
                warn!(
                    product_id = %product_id,
                    stock_quantity,
                    error = %e,
                    "Failed to mirror stock level after receipt"
                );
            }
        }

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderReceived {
                    purchase_order_id: order_id,
                    items_received: items.len(),
                })
                .await;
        }

        Ok(ReceiptSummary {
            purchase_order_id: order_id,
            status: PurchaseOrderStatus::Received,
            items_received: items.len(),
        })
    }
}
