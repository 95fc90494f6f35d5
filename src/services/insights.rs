use crate::{
    completion::CompletionClient,
    db::DbPool,
    entities::{
        customer::Entity as CustomerEntity,
        employee::Entity as EmployeeEntity,
        order::{self, Entity as OrderEntity},
        order_item::{self, Entity as OrderItemEntity},
        product::Entity as ProductEntity,
    },
    errors::ServiceError,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// How many recent orders feed the sales-trend prompt.
const SALES_TREND_ORDER_LIMIT: u64 = 100;
/// How many of a customer's recent orders feed the recommendation prompt.
const RECOMMENDATION_ORDER_LIMIT: u64 = 10;

const SALES_TREND_MAX_TOKENS: u32 = 200;
const RECOMMENDATION_MAX_TOKENS: u32 = 100;
const OPTIMIZE_MAX_TOKENS: u32 = 50;
const PERFORMANCE_MAX_TOKENS: u32 = 200;

/// Read-then-generate analytics over the completion service.
///
/// Each workflow renders a bounded, recency-ordered slice of records into a
/// prompt, submits it with a token budget, and returns the trimmed text. No
/// caching and no retry: a completion failure surfaces as a 502.
#[derive(Clone)]
pub struct InsightService {
    db: Arc<DbPool>,
    completion: Arc<dyn CompletionClient>,
}

impl InsightService {
    pub fn new(db: Arc<DbPool>, completion: Arc<dyn CompletionClient>) -> Self {
        Self { db, completion }
    }

    /// Summarizes recent sales activity as free text
    #[instrument(skip(self))]
    pub async fn analyze_sales_trends(&self) -> Result<String, ServiceError> {
        let db = &*self.db;
        let orders = OrderEntity::find()
            .order_by_desc(order::Column::OrderDate)
            .limit(SALES_TREND_ORDER_LIMIT)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut prompt =
            String::from("Review this recent sales activity and summarize the notable trends:\n\n");
        for order in &orders {
            let _ = writeln!(
                prompt,
                "Order {}: {} on {}, status {}",
                order.id,
                order.total_amount,
                order.order_date.format("%Y-%m-%d %H:%M"),
                order.status
            );
        }

        info!(orders = orders.len(), "Generating sales trend insight");
        let text = self
            .completion
            .complete(&prompt, SALES_TREND_MAX_TOKENS)
            .await?;
        Ok(text)
    }

    /// Suggests products for a customer based on their recent order history.
    /// The completion is split into one suggestion per non-empty line.
    #[instrument(skip(self))]
    pub async fn recommend_products(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<String>, ServiceError> {
        let db = &*self.db;

        CustomerEntity::find_by_id(customer_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Customer {} not found", customer_id))
            })?;

        let orders = OrderEntity::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_desc(order::Column::OrderDate)
            .limit(RECOMMENDATION_ORDER_LIMIT)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let items = if order_ids.is_empty() {
            Vec::new()
        } else {
            OrderItemEntity::find()
                .filter(order_item::Column::OrderId.is_in(order_ids))
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?
        };

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products = if product_ids.is_empty() {
            Vec::new()
        } else {
            ProductEntity::find()
                .filter(crate::entities::product::Column::Id.is_in(product_ids))
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?
        };
        let product_names: HashMap<Uuid, &str> =
            products.iter().map(|p| (p.id, p.name.as_str())).collect();

        let mut prompt = String::from(
            "Given this customer's order history, suggest 3 products they might like:\n\n",
        );
        for order in &orders {
            let names: Vec<&str> = items
                .iter()
                .filter(|i| i.order_id == order.id)
                .filter_map(|i| product_names.get(&i.product_id).copied())
                .collect();
            let _ = writeln!(prompt, "Order {}: {}", order.id, names.join(", "));
        }

        info!(customer_id = %customer_id, orders = orders.len(), "Generating product recommendations");
        let text = self
            .completion
            .complete(&prompt, RECOMMENDATION_MAX_TOKENS)
            .await?;

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Suggests an optimal stock level for a product from its per-day sales
    /// history. The completion is parsed as an integer.
    #[instrument(skip(self))]
    pub async fn optimize_inventory(&self, product_id: Uuid) -> Result<i32, ServiceError> {
        let db = &*self.db;

        let product = ProductEntity::find_by_id(product_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", product_id))
            })?;

        let items = OrderItemEntity::find()
            .filter(order_item::Column::ProductId.eq(product_id))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let order_ids: Vec<Uuid> = items.iter().map(|i| i.order_id).collect();
        let orders = if order_ids.is_empty() {
            Vec::new()
        } else {
            OrderEntity::find()
                .filter(order::Column::Id.is_in(order_ids))
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?
        };
        let order_dates: HashMap<Uuid, NaiveDate> = orders
            .iter()
            .map(|o| (o.id, o.order_date.date_naive()))
            .collect();

        let mut sold_per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for item in &items {
            if let Some(date) = order_dates.get(&item.order_id) {
                *sold_per_day.entry(*date).or_insert(0) += item.quantity as i64;
            }
        }

        let mut prompt = format!(
            "Given the daily sales history for {}, respond with a single integer: the optimal stock level to hold.\n\n",
            product.name
        );
        for (date, sold) in &sold_per_day {
            let _ = writeln!(prompt, "{}: {} sold", date, sold);
        }

        info!(product_id = %product_id, days = sold_per_day.len(), "Generating inventory optimization");
        let text = self
            .completion
            .complete(&prompt, OPTIMIZE_MAX_TOKENS)
            .await?;

        text.trim().parse::<i32>().map_err(|_| {
            ServiceError::ExternalServiceError(format!(
                "completion service returned a non-numeric stock level: {:?}",
                text
            ))
        })
    }

    /// Drafts a performance review for an employee from their order volume
    /// and sales totals
    #[instrument(skip(self))]
    pub async fn review_employee_performance(
        &self,
        employee_id: Uuid,
    ) -> Result<String, ServiceError> {
        let db = &*self.db;

        let employee = EmployeeEntity::find_by_id(employee_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Employee {} not found", employee_id))
            })?;

        let orders = OrderEntity::find()
            .filter(order::Column::EmployeeId.eq(employee_id))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let orders_handled = orders.len();
        let total_sales: Decimal = orders.iter().map(|o| o.total_amount).sum();

        let prompt = format!(
            "Write a short performance review for {}.\n\nOrders handled: {}\nTotal sales: ${}",
            employee.name, orders_handled, total_sales
        );

        info!(employee_id = %employee_id, orders_handled, "Generating performance review");
        let text = self
            .completion
            .complete(&prompt, PERFORMANCE_MAX_TOKENS)
            .await?;
        Ok(text)
    }
}
