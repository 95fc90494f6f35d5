mod common;

use common::setup_db;
use counterpoint_api::{
    entities::accounting_entry::EntryType,
    services::accounting::{AccountingService, CreateAccountingEntryRequest},
};
use rust_decimal_macros::dec;

#[tokio::test]
async fn empty_ledger_sums_to_zero() {
    let db = setup_db().await;
    let service = AccountingService::new(db, None);

    let summary = service.summary().await.unwrap();
    assert_eq!(summary.total_income, dec!(0));
    assert_eq!(summary.total_expense, dec!(0));
    assert_eq!(summary.net_profit, dec!(0));
}

#[tokio::test]
async fn summary_nets_income_against_expense() {
    let db = setup_db().await;
    let service = AccountingService::new(db, None);

    service
        .create_entry(CreateAccountingEntryRequest {
            entry_type: EntryType::Income,
            amount: dec!(100),
            description: "day sales".to_string(),
            entry_date: None,
        })
        .await
        .unwrap();
    service
        .create_entry(CreateAccountingEntryRequest {
            entry_type: EntryType::Expense,
            amount: dec!(40),
            description: "produce order".to_string(),
            entry_date: None,
        })
        .await
        .unwrap();

    let summary = service.summary().await.unwrap();
    assert_eq!(summary.total_income, dec!(100));
    assert_eq!(summary.total_expense, dec!(40));
    assert_eq!(summary.net_profit, dec!(60));
}

#[tokio::test]
async fn summary_handles_expense_only_books() {
    let db = setup_db().await;
    let service = AccountingService::new(db, None);

    service
        .create_entry(CreateAccountingEntryRequest {
            entry_type: EntryType::Expense,
            amount: dec!(25.50),
            description: "repairs".to_string(),
            entry_date: None,
        })
        .await
        .unwrap();

    let summary = service.summary().await.unwrap();
    assert_eq!(summary.total_income, dec!(0));
    assert_eq!(summary.total_expense, dec!(25.50));
    assert_eq!(summary.net_profit, dec!(-25.50));
}
