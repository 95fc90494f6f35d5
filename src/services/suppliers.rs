use crate::{
    db::DbPool,
    entities::supplier::{
        self, ActiveModel as SupplierActiveModel, Entity as SupplierEntity,
        Model as SupplierModel,
    },
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 255, message = "Supplier name is required"))]
    pub name: String,
    pub contact_person: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierRequest {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    #[validate(email(message = "A valid email address is required"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DbPool>,
}

impl SupplierService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Creates a new supplier
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_supplier(
        &self,
        request: CreateSupplierRequest,
    ) -> Result<SupplierModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let supplier_id = Uuid::new_v4();
        let supplier = SupplierActiveModel {
            id: Set(supplier_id),
            name: Set(request.name),
            contact_person: Set(request.contact_person),
            email: Set(request.email),
            phone: Set(request.phone),
            address: Set(request.address),
        };

        let created = supplier
            .insert(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(supplier_id = %supplier_id, "Supplier created");
        Ok(created)
    }

    /// Gets a supplier by ID
    #[instrument(skip(self))]
    pub async fn get_supplier(
        &self,
        supplier_id: Uuid,
    ) -> Result<Option<SupplierModel>, ServiceError> {
        let db = &*self.db;
        SupplierEntity::find_by_id(supplier_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Lists suppliers with pagination
    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<SupplierModel>, u64), ServiceError> {
        let db = &*self.db;
        let paginator = SupplierEntity::find()
            .order_by_asc(supplier::Column::Name)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let suppliers = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((suppliers, total))
    }

    /// Updates a supplier
    #[instrument(skip(self, request))]
    pub async fn update_supplier(
        &self,
        supplier_id: Uuid,
        request: UpdateSupplierRequest,
    ) -> Result<SupplierModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let supplier = SupplierEntity::find_by_id(supplier_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Supplier {} not found", supplier_id))
            })?;

        let mut active: SupplierActiveModel = supplier.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(contact_person) = request.contact_person {
            active.contact_person = Set(contact_person);
        }
        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = request.address {
            active.address = Set(address);
        }

        let updated = active
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(supplier_id = %supplier_id, "Supplier updated");
        Ok(updated)
    }

    /// Deletes a supplier
    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, supplier_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let result = SupplierEntity::delete_by_id(supplier_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Supplier {} not found",
                supplier_id
            )));
        }

        info!(supplier_id = %supplier_id, "Supplier deleted");
        Ok(())
    }
}
