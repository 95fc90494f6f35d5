use crate::{
    db::DbPool,
    entities::{
        order::Entity as OrderEntity,
        payment::{
            self, ActiveModel as PaymentActiveModel, Entity as PaymentEntity,
            Model as PaymentModel,
        },
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentRequest {
    pub order_id: Uuid,
    pub amount: Decimal,
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub method: String,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct PaymentService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl PaymentService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Records a payment against an existing order
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<PaymentModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;

        OrderEntity::find_by_id(request.order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Order {} not found", request.order_id))
            })?;

        let payment_id = Uuid::new_v4();
        let payment = PaymentActiveModel {
            id: Set(payment_id),
            order_id: Set(request.order_id),
            amount: Set(request.amount),
            method: Set(request.method),
            paid_at: Set(request.paid_at.unwrap_or_else(Utc::now)),
        };

        let created = payment
            .insert(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(payment_id = %payment_id, order_id = %request.order_id, "Payment recorded");

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PaymentRecorded {
                    payment_id,
                    order_id: created.order_id,
                    amount: created.amount,
                })
                .await;
        }

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_payment(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<PaymentModel>, ServiceError> {
        let db = &*self.db;
        PaymentEntity::find_by_id(payment_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_payments(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<PaymentModel>, u64), ServiceError> {
        let db = &*self.db;
        let paginator = PaymentEntity::find()
            .order_by_desc(payment::Column::PaidAt)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let payments = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((payments, total))
    }

    /// Lists payments recorded against one order
    #[instrument(skip(self))]
    pub async fn list_payments_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<PaymentModel>, ServiceError> {
        let db = &*self.db;
        PaymentEntity::find()
            .filter(payment::Column::OrderId.eq(order_id))
            .order_by_desc(payment::Column::PaidAt)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn delete_payment(&self, payment_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let result = PaymentEntity::delete_by_id(payment_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Payment {} not found",
                payment_id
            )));
        }

        info!(payment_id = %payment_id, "Payment deleted");
        Ok(())
    }
}
