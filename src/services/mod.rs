pub mod accounting;
pub mod customers;
pub mod employees;
pub mod insights;
pub mod orders;
pub mod payments;
pub mod procurement;
pub mod products;
pub mod settings;
pub mod suppliers;
pub mod tables;
