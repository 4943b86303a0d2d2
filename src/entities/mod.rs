//! Sea-ORM entities for the order back-office schema.
//!
//! Table and column names follow the storefront schema the grid reads from,
//! so `order` is quoted by sea-query wherever it appears.

pub mod credit_note;
pub mod currency;
pub mod customer;
pub mod order;
pub mod order_address;
pub mod order_delay;
pub mod order_product;
pub mod order_status;
pub mod order_status_i18n;
