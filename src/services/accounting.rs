use crate::{
    db::DbPool,
    entities::accounting_entry::{
        self, ActiveModel as EntryActiveModel, Entity as EntryEntity, EntryType,
        Model as EntryModel,
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
pub struct CreateAccountingEntryRequest {
    pub entry_type: EntryType,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub entry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountingEntryRequest {
    pub entry_type: Option<EntryType>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub entry_date: Option<DateTime<Utc>>,
}

/// Income/expense rollup. Empty books yield all-zero sums.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct AccountingSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_profit: Decimal,
}

/// Service for the accounting ledger.
#[derive(Clone)]
pub struct AccountingService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl AccountingService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Records a new ledger entry
    #[instrument(skip(self, request))]
    pub async fn create_entry(
        &self,
        request: CreateAccountingEntryRequest,
    ) -> Result<EntryModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let entry_id = Uuid::new_v4();

        let entry = EntryActiveModel {
            id: Set(entry_id),
            entry_type: Set(request.entry_type),
            amount: Set(request.amount),
            description: Set(request.description),
            entry_date: Set(request.entry_date.unwrap_or_else(Utc::now)),
        };

        let created = entry.insert(db).await.map_err(ServiceError::DatabaseError)?;

        info!(entry_id = %entry_id, "Accounting entry recorded");

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::AccountingEntryRecorded(entry_id))
                .await;
        }

        Ok(created)
    }

    /// Retrieves a ledger entry by ID
    #[instrument(skip(self))]
    pub async fn get_entry(&self, entry_id: Uuid) -> Result<Option<EntryModel>, ServiceError> {
        let db = &*self.db;
        EntryEntity::find_by_id(entry_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Lists ledger entries with pagination, newest first
    #[instrument(skip(self))]
    pub async fn list_entries(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<EntryModel>, u64), ServiceError> {
        let db = &*self.db;
        let paginator = EntryEntity::find()
            .order_by_desc(accounting_entry::Column::EntryDate)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let entries = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((entries, total))
    }

    /// Updates a ledger entry
    #[instrument(skip(self, request))]
    pub async fn update_entry(
        &self,
        entry_id: Uuid,
        request: UpdateAccountingEntryRequest,
    ) -> Result<EntryModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let entry = EntryEntity::find_by_id(entry_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Accounting entry {} not found", entry_id))
            })?;

        let mut active: EntryActiveModel = entry.into();
        if let Some(entry_type) = request.entry_type {
            active.entry_type = Set(entry_type);
        }
        if let Some(amount) = request.amount {
            active.amount = Set(amount);
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(entry_date) = request.entry_date {
            active.entry_date = Set(entry_date);
        }

        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Deletes a ledger entry
    #[instrument(skip(self))]
    pub async fn delete_entry(&self, entry_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let result = EntryEntity::delete_by_id(entry_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Accounting entry {} not found",
                entry_id
            )));
        }

        Ok(())
    }

    /// Sums income and expense entries into a net-profit figure
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<AccountingSummary, ServiceError> {
        let db = &*self.db;

        let income_entries = EntryEntity::find()
            .filter(accounting_entry::Column::EntryType.eq(EntryType::Income))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let expense_entries = EntryEntity::find()
            .filter(accounting_entry::Column::EntryType.eq(EntryType::Expense))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let total_income: Decimal = income_entries.iter().map(|e| e.amount).sum();
        let total_expense: Decimal = expense_entries.iter().map(|e| e.amount).sum();

        Ok(AccountingSummary {
            total_income,
            total_expense,
            net_profit: total_income - total_expense,
        })
    }
}
