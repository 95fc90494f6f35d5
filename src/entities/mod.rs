//! SeaORM entities for the POS and inventory domain.

pub mod accounting_entry;
pub mod customer;
pub mod dining_table;
pub mod employee;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod product;
pub mod property_settings;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod supplier;
pub mod template;
pub mod ui_settings;
