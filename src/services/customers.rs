use crate::{
    db::DbPool,
    entities::customer::{
        self, ActiveModel as CustomerActiveModel, Entity as CustomerEntity,
        Model as CustomerModel,
    },
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255, message = "Customer name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[validate(range(min = 0, message = "Loyalty points cannot be negative"))]
    #[serde(default)]
    pub loyalty_points: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    #[validate(email(message = "A valid email address is required"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 0, message = "Loyalty points cannot be negative"))]
    pub loyalty_points: Option<i32>,
}

#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DbPool>,
}

impl CustomerService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<CustomerModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let customer_id = Uuid::new_v4();
        let customer = CustomerActiveModel {
            id: Set(customer_id),
            name: Set(request.name),
            email: Set(request.email),
            phone: Set(request.phone),
            loyalty_points: Set(request.loyalty_points),
            created_at: Set(Utc::now()),
        };

        let created = customer
            .insert(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(customer_id = %customer_id, "Customer created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<CustomerModel>, ServiceError> {
        let db = &*self.db;
        CustomerEntity::find_by_id(customer_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<CustomerModel>, u64), ServiceError> {
        let db = &*self.db;
        let paginator = CustomerEntity::find()
            .order_by_asc(customer::Column::Name)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let customers = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((customers, total))
    }

    #[instrument(skip(self, request))]
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        request: UpdateCustomerRequest,
    ) -> Result<CustomerModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let customer = CustomerEntity::find_by_id(customer_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Customer {} not found", customer_id))
            })?;

        let mut active: CustomerActiveModel = customer.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(phone);
        }
        if let Some(loyalty_points) = request.loyalty_points {
            active.loyalty_points = Set(loyalty_points);
        }

        let updated = active
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(customer_id = %customer_id, "Customer updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_customer(&self, customer_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let result = CustomerEntity::delete_by_id(customer_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Customer {} not found",
                customer_id
            )));
        }

        info!(customer_id = %customer_id, "Customer deleted");
        Ok(())
    }
}
