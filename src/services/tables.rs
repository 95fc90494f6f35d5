use crate::{
    db::DbPool,
    entities::dining_table::{
        self, ActiveModel as TableActiveModel, Entity as TableEntity, Model as TableModel,
    },
    errors::ServiceError,
};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTableRequest {
    #[validate(range(min = 1, message = "Table number must be positive"))]
    pub number: i32,
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTableRequest {
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: Option<i32>,
    pub occupied: Option<bool>,
}

#[derive(Clone)]
pub struct TableService {
    db: Arc<DbPool>,
}

impl TableService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(number = request.number))]
    pub async fn create_table(
        &self,
        request: CreateTableRequest,
    ) -> Result<TableModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let table_id = Uuid::new_v4();
        let table = TableActiveModel {
            id: Set(table_id),
            number: Set(request.number),
            capacity: Set(request.capacity),
            occupied: Set(false),
        };

        let created = table
            .insert(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(table_id = %table_id, number = request.number, "Table created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_table(&self, table_id: Uuid) -> Result<Option<TableModel>, ServiceError> {
        let db = &*self.db;
        TableEntity::find_by_id(table_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_tables(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<TableModel>, u64), ServiceError> {
        let db = &*self.db;
        let paginator = TableEntity::find()
            .order_by_asc(dining_table::Column::Number)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let tables = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((tables, total))
    }

    #[instrument(skip(self, request))]
    pub async fn update_table(
        &self,
        table_id: Uuid,
        request: UpdateTableRequest,
    ) -> Result<TableModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let table = TableEntity::find_by_id(table_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Table {} not found", table_id)))?;

        let mut active: TableActiveModel = table.into();
        if let Some(capacity) = request.capacity {
            active.capacity = Set(capacity);
        }
        if let Some(occupied) = request.occupied {
            active.occupied = Set(occupied);
        }

        let updated = active
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(table_id = %table_id, "Table updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_table(&self, table_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let result = TableEntity::delete_by_id(table_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Table {} not found",
                table_id
            )));
        }

        info!(table_id = %table_id, "Table deleted");
        Ok(())
    }
}
