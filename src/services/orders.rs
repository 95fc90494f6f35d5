use crate::{
    db::DbPool,
    entities::{
        order::{
            self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel,
        },
        order_item::{
            self, ActiveModel as OrderItemActiveModel, Entity as OrderItemEntity,
            Model as OrderItemModel,
        },
        product::Entity as ProductEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub table_id: Option<Uuid>,
    #[serde(default = "default_order_status")]
    pub status: String,
}

fn default_order_status() -> String {
    "open".to_string()
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    pub customer_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub table_id: Option<Uuid>,
    pub status: Option<String>,
}

/// Candidate line item appended to an existing order.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
}

/// Order with its owned line items, as served over the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: OrderModel,
    pub items: Vec<OrderItemModel>,
}

/// Service for point-of-sale orders and their line items.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a new (empty) order
    #[instrument(skip(self, request))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let order = OrderActiveModel {
            id: Set(order_id),
            customer_id: Set(request.customer_id),
            employee_id: Set(request.employee_id),
            table_id: Set(request.table_id),
            order_date: Set(now),
            status: Set(request.status),
            total_amount: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let created = order.insert(db).await.map_err(|e| {
            error!(error = %e, "Failed to create order");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, "Order created");

        if let Some(sender) = &self.event_sender {
            sender.send_or_log(Event::OrderCreated(order_id)).await;
        }

        Ok(created)
    }

    /// Retrieves an order with its line items
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderResponse>, ServiceError> {
        let db = &*self.db;
        let order = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(Some(OrderResponse { order, items }))
    }

    /// Lists orders with pagination, newest first
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<OrderModel>, u64), ServiceError> {
        let db = &*self.db;
        let paginator = OrderEntity::find()
            .order_by_desc(order::Column::OrderDate)
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

    /// Updates an order's header fields
    #[instrument(skip(self, request))]
    pub async fn update_order(
        &self,
        order_id: Uuid,
        request: UpdateOrderRequest,
    ) -> Result<OrderModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let existing = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let mut active: OrderActiveModel = existing.into();
        if let Some(customer_id) = request.customer_id {
            active.customer_id = Set(Some(customer_id));
        }
        if let Some(employee_id) = request.employee_id {
            active.employee_id = Set(Some(employee_id));
        }
        if let Some(table_id) = request.table_id {
            active.table_id = Set(Some(table_id));
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(order_id = %order_id, "Order updated");

        if let Some(sender) = &self.event_sender {
            sender.send_or_log(Event::OrderUpdated(order_id)).await;
        }

        Ok(updated)
    }

    /// Deletes an order and its line items
    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let result = OrderEntity::delete_by_id(order_id)
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Order {} not found",
                order_id
            )));
        }

        OrderItemEntity::delete_many()
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(order_id = %order_id, "Order deleted");
        Ok(())
    }

    /// Lists the line items of an order
    #[instrument(skip(self))]
    pub async fn get_order_items(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        let db = &*self.db;

        OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(items)
    }

    /// Validates and appends a line item to an existing order, bumping the
    /// order total. A validation failure leaves the order untouched.
    #[instrument(skip(self, request), fields(order_id = %order_id))]
    pub async fn add_order_item(
        &self,
        order_id: Uuid,
        request: OrderItemRequest,
    ) -> Result<OrderItemModel, ServiceError> {
        request.validate()?;

        let price = Decimal::try_from(request.price).map_err(|_| {
            ServiceError::ValidationError("Price is not a representable amount".to_string())
        })?;

        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        ProductEntity::find_by_id(request.product_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", request.product_id))
            })?;

        let item_id = Uuid::new_v4();
        let item = OrderItemActiveModel {
            id: Set(item_id),
            order_id: Set(order_id),
            product_id: Set(request.product_id),
            quantity: Set(request.quantity),
            price: Set(price),
        };
        let created = item.insert(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to append order item");
            ServiceError::DatabaseError(e)
        })?;

        let new_total = order.total_amount + price * Decimal::from(request.quantity);
        let mut order_active: OrderActiveModel = order.into();
        order_active.total_amount = Set(new_total);
        order_active.updated_at = Set(Some(Utc::now()));
        order_active
            .update(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(
            order_id = %order_id,
            order_item_id = %item_id,
            quantity = request.quantity,
            "Order item appended"
        );

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::OrderItemAdded {
                    order_id,
                    order_item_id: item_id,
                    product_id: request.product_id,
                    quantity: request.quantity,
                })
                .await;
        }

        Ok(created)
    }
}
