use crate::{
    db::DbPool,
    entities::employee::{
        self, ActiveModel as EmployeeActiveModel, Entity as EmployeeEntity,
        Model as EmployeeModel,
    },
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 255, message = "Employee name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub hired_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    #[validate(email(message = "A valid email address is required"))]
    pub email: Option<String>,
}

#[derive(Clone)]
pub struct EmployeeService {
    db: Arc<DbPool>,
}

impl EmployeeService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_employee(
        &self,
        request: CreateEmployeeRequest,
    ) -> Result<EmployeeModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let employee_id = Uuid::new_v4();
        let employee = EmployeeActiveModel {
            id: Set(employee_id),
            name: Set(request.name),
            role: Set(request.role),
            email: Set(request.email),
            hired_at: Set(request.hired_at.unwrap_or_else(Utc::now)),
        };

        let created = employee
            .insert(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(employee_id = %employee_id, "Employee created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Option<EmployeeModel>, ServiceError> {
        let db = &*self.db;
        EmployeeEntity::find_by_id(employee_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_employees(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<EmployeeModel>, u64), ServiceError> {
        let db = &*self.db;
        let paginator = EmployeeEntity::find()
            .order_by_asc(employee::Column::Name)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let employees = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((employees, total))
    }

    #[instrument(skip(self, request))]
    pub async fn update_employee(
        &self,
        employee_id: Uuid,
        request: UpdateEmployeeRequest,
    ) -> Result<EmployeeModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let employee = EmployeeEntity::find_by_id(employee_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Employee {} not found", employee_id))
            })?;

        let mut active: EmployeeActiveModel = employee.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(role) = request.role {
            active.role = Set(role);
        }
        if let Some(email) = request.email {
            active.email = Set(email);
        }

        let updated = active
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(employee_id = %employee_id, "Employee updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_employee(&self, employee_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let result = EmployeeEntity::delete_by_id(employee_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Employee {} not found",
                employee_id
            )));
        }

        info!(employee_id = %employee_id, "Employee deleted");
        Ok(())
    }
}
