pub mod accounting;
pub mod common;
pub mod customers;
pub mod employees;
pub mod insights;
pub mod orders;
pub mod payments;
pub mod products;
pub mod purchase_orders;
pub mod settings;
pub mod suppliers;
pub mod tables;

use crate::completion::CompletionClient;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::stock_mirror::StockMirror;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<crate::services::products::ProductService>,
    pub suppliers: Arc<crate::services::suppliers::SupplierService>,
    pub procurement: Arc<crate::services::procurement::ProcurementService>,
    pub orders: Arc<crate::services::orders::OrderService>,
    pub customers: Arc<crate::services::customers::CustomerService>,
    pub employees: Arc<crate::services::employees::EmployeeService>,
    pub tables: Arc<crate::services::tables::TableService>,
    pub payments: Arc<crate::services::payments::PaymentService>,
    pub accounting: Arc<crate::services::accounting::AccountingService>,
    pub settings: Arc<crate::services::settings::SettingsService>,
    pub insights: Arc<crate::services::insights::InsightService>,
}

impl AppServices {
    /// Wires every service against the shared pool, event channel, and the
    /// injected outbound capabilities.
    pub fn new(
        db: Arc<DbPool>,
        event_sender: EventSender,
        mirror: Arc<dyn StockMirror>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        let products = Arc::new(crate::services::products::ProductService::new(
            db.clone(),
            Some(event_sender.clone()),
            mirror.clone(),
        ));
        let suppliers = Arc::new(crate::services::suppliers::SupplierService::new(db.clone()));
        let procurement = Arc::new(crate::services::procurement::ProcurementService::new(
            db.clone(),
            Some(event_sender.clone()),
            mirror,
        ));
        let orders = Arc::new(crate::services::orders::OrderService::new(
            db.clone(),
            Some(event_sender.clone()),
        ));
        let customers = Arc::new(crate::services::customers::CustomerService::new(db.clone()));
        let employees = Arc::new(crate::services::employees::EmployeeService::new(db.clone()));
        let tables = Arc::new(crate::services::tables::TableService::new(db.clone()));
        let payments = Arc::new(crate::services::payments::PaymentService::new(
            db.clone(),
            Some(event_sender.clone()),
        ));
        let accounting = Arc::new(crate::services::accounting::AccountingService::new(
            db.clone(),
            Some(event_sender),
        ));
        let settings = Arc::new(crate::services::settings::SettingsService::new(db.clone()));
        let insights = Arc::new(crate::services::insights::InsightService::new(
            db, completion,
        ));

        Self {
            products,
            suppliers,
            procurement,
            orders,
            customers,
            employees,
            tables,
            payments,
            accounting,
            settings,
            insights,
        }
    }
}
