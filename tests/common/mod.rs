#![allow(dead_code)]

use chrono::Utc;
use counterpoint_api::{
    db::DbPool,
    entities::{customer, employee, order, order_item, product, supplier},
    events::{Event, EventSender},
    migrator::Migrator,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Fresh in-memory database with the full schema applied.
///
/// Capped at one connection so every query in a test sees the same
/// in-memory SQLite instance.
pub async fn setup_db() -> Arc<DbPool> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory SQLite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    Arc::new(db)
}

/// Event channel wired the way main() wires it, with the receiver kept for
/// assertions.
pub fn event_channel() -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(64);
    (EventSender::new(tx), rx)
}

pub async fn create_test_product(db: &DbPool, sku: &str, stock_quantity: i32) -> product::Model {
    let now = Utc::now();
    product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(format!("Product {}", sku)),
        description: Set(String::new()),
        sku: Set(sku.to_string()),
        price: Set(dec!(9.99)),
        stock_quantity: Set(stock_quantity),
        reorder_level: Set(10),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert test product")
}

pub async fn create_test_supplier(db: &DbPool) -> supplier::Model {
    supplier::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Acme Wholesale".to_string()),
        contact_person: Set("Jane Smith".to_string()),
        email: Set("jane@acme.example".to_string()),
        phone: Set("555-0100".to_string()),
        address: Set("1 Depot Road".to_string()),
    }
    .insert(db)
    .await
    .expect("Failed to insert test supplier")
}

pub async fn create_test_customer(db: &DbPool, name: &str) -> customer::Model {
    customer::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        phone: Set("555-0101".to_string()),
        loyalty_points: Set(0),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert test customer")
}

pub async fn create_test_employee(db: &DbPool, name: &str) -> employee::Model {
    employee::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        role: Set("server".to_string()),
        email: Set(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        hired_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert test employee")
}

pub async fn create_test_order(
    db: &DbPool,
    customer_id: Option<Uuid>,
    employee_id: Option<Uuid>,
    total_amount: Decimal,
) -> order::Model {
    let now = Utc::now();
    order::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        employee_id: Set(employee_id),
        table_id: Set(None),
        order_date: Set(now),
        status: Set("open".to_string()),
        total_amount: Set(total_amount),
        created_at: Set(now),
        updated_at: Set(Some(now)),
    }
    .insert(db)
    .await
    .expect("Failed to insert test order")
}

pub async fn create_test_order_item(
    db: &DbPool,
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    price: Decimal,
) -> order_item::Model {
    order_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        price: Set(price),
    }
    .insert(db)
    .await
    .expect("Failed to insert test order item")
}
