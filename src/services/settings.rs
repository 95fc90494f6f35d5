//! CRUD over the three settings resources: UI preference bundles, document
//! templates, and venue-level property settings. These are small tables, so
//! list operations return everything.

use crate::{
    db::DbPool,
    entities::{
        property_settings::{
            ActiveModel as PropertyActiveModel, Entity as PropertyEntity,
            Model as PropertyModel,
        },
        template::{
            ActiveModel as TemplateActiveModel, Entity as TemplateEntity, Model as TemplateModel,
        },
        ui_settings::{
            ActiveModel as UiSettingsActiveModel, Entity as UiSettingsEntity,
            Model as UiSettingsModel,
        },
    },
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UiSettingsRequest {
    #[validate(length(min = 1, message = "Settings bundle name is required"))]
    pub name: String,
    pub settings: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct TemplateRequest {
    #[validate(length(min = 1, message = "Template name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Template type is required"))]
    pub template_type: String,
    pub content: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PropertySettingsRequest {
    #[validate(length(min = 1, message = "Business name is required"))]
    pub business_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
    pub tax_rate: Decimal,
}

#[derive(Clone)]
pub struct SettingsService {
    db: Arc<DbPool>,
}

impl SettingsService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    // UI settings

    #[instrument(skip(self, request))]
    pub async fn create_ui_settings(
        &self,
        request: UiSettingsRequest,
    ) -> Result<UiSettingsModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let id = Uuid::new_v4();
        let record = UiSettingsActiveModel {
            id: Set(id),
            name: Set(request.name),
            settings: Set(request.settings),
            updated_at: Set(Utc::now()),
        };

        let created = record.insert(db).await.map_err(ServiceError::DatabaseError)?;
        info!(ui_settings_id = %id, "UI settings created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_ui_settings(&self, id: Uuid) -> Result<Option<UiSettingsModel>, ServiceError> {
        let db = &*self.db;
        UiSettingsEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_ui_settings(&self) -> Result<Vec<UiSettingsModel>, ServiceError> {
        let db = &*self.db;
        UiSettingsEntity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, request))]
    pub async fn update_ui_settings(
        &self,
        id: Uuid,
        request: UiSettingsRequest,
    ) -> Result<UiSettingsModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let record = UiSettingsEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("UI settings {} not found", id)))?;

        let mut active: UiSettingsActiveModel = record.into();
        active.name = Set(request.name);
        active.settings = Set(request.settings);
        active.updated_at = Set(Utc::now());

        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn delete_ui_settings(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let result = UiSettingsEntity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "UI settings {} not found",
                id
            )));
        }
        Ok(())
    }

    // Templates

    #[instrument(skip(self, request))]
    pub async fn create_template(
        &self,
        request: TemplateRequest,
    ) -> Result<TemplateModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let id = Uuid::new_v4();
        let record = TemplateActiveModel {
            id: Set(id),
            name: Set(request.name),
            template_type: Set(request.template_type),
            content: Set(request.content),
            active: Set(request.active),
        };

        let created = record.insert(db).await.map_err(ServiceError::DatabaseError)?;
        info!(template_id = %id, "Template created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_template(&self, id: Uuid) -> Result<Option<TemplateModel>, ServiceError> {
        let db = &*self.db;
        TemplateEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_templates(&self) -> Result<Vec<TemplateModel>, ServiceError> {
        let db = &*self.db;
        TemplateEntity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, request))]
    pub async fn update_template(
        &self,
        id: Uuid,
        request: TemplateRequest,
    ) -> Result<TemplateModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let record = TemplateEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Template {} not found", id)))?;

        let mut active: TemplateActiveModel = record.into();
        active.name = Set(request.name);
        active.template_type = Set(request.template_type);
        active.content = Set(request.content);
        active.active = Set(request.active);

        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn delete_template(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let result = TemplateEntity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Template {} not found",
                id
            )));
        }
        Ok(())
    }

    // Property settings

    #[instrument(skip(self, request))]
    pub async fn create_property_settings(
        &self,
        request: PropertySettingsRequest,
    ) -> Result<PropertyModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let id = Uuid::new_v4();
        let record = PropertyActiveModel {
            id: Set(id),
            business_name: Set(request.business_name),
            address: Set(request.address),
            phone: Set(request.phone),
            currency: Set(request.currency),
            tax_rate: Set(request.tax_rate),
            updated_at: Set(Utc::now()),
        };

        let created = record.insert(db).await.map_err(ServiceError::DatabaseError)?;
        info!(property_settings_id = %id, "Property settings created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_property_settings(
        &self,
        id: Uuid,
    ) -> Result<Option<PropertyModel>, ServiceError> {
        let db = &*self.db;
        PropertyEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_property_settings(&self) -> Result<Vec<PropertyModel>, ServiceError> {
        let db = &*self.db;
        PropertyEntity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, request))]
    pub async fn update_property_settings(
        &self,
        id: Uuid,
        request: PropertySettingsRequest,
    ) -> Result<PropertyModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let record = PropertyEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Property settings {} not found", id))
            })?;

        let mut active: PropertyActiveModel = record.into();
        active.business_name = Set(request.business_name);
        active.address = Set(request.address);
        active.phone = Set(request.phone);
        active.currency = Set(request.currency);
        active.tax_rate = Set(request.tax_rate);
        active.updated_at = Set(Utc::now());

        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn delete_property_settings(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let result = PropertyEntity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Property settings {} not found",
                id
            )));
        }
        Ok(())
    }
}
