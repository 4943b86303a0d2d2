//! # easy_order_manager
//!
//! Back-office order grid for e-commerce admins, served with Axum over Sea-ORM.
//!
//! - [`columns`]: the ordered column registry the grid is built from
//! - [`filtering`]: request filters, sorting and pagination as [`OrderCriteria`]
//! - [`projection`]: loaded orders to grid cells
//! - [`export`]: the filtered list as `;`-separated CSV
//! - [`bulk`]: delete, change status and read status over selected ids
//! - [`routes`]: the HTTP surface under `/admin/easy-order-manager`
//!
//! ```rust,ignore
//! let db = Database::connect(&config.database_url).await?;
//! let repository = Arc::new(SeaOrmOrderRepository::new(db));
//! let service = OrderManagerService::new(repository, Arc::new(config.clone()));
//! let app = router(AppState::new(service, TokenAccessGuard::new(config.admin_token)));
//! ```

pub mod bulk;
pub mod columns;
pub mod config;
pub mod entities;
pub mod errors;
pub mod export;
pub mod filtering;
pub mod formatting;
pub mod hooks;
pub mod migration;
pub mod models;
pub mod projection;
pub mod repository;
pub mod routes;
pub mod security;
pub mod service;
pub mod templates;

pub use config::ManagerConfig;
pub use errors::ApiError;
pub use filtering::OrderCriteria;
pub use repository::{MemoryOrderRepository, OrderRepository, SeaOrmOrderRepository};
pub use routes::{AppState, router};
pub use security::{AccessGuard, TokenAccessGuard};
pub use service::OrderManagerService;

pub const MODULE_NAME: &str = "EasyOrderManager";
pub const MODULE_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Translation domain of the module's labels.
pub const DOMAIN_NAME: &str = "easyordermanager";
