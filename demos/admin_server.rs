//! Order manager admin server over SeaORM
//!
//! ```bash
//! EOM_ADMIN_TOKEN=secret cargo run --example admin_server
//! ```
//!
//! Then, with `Authorization: Bearer secret`:
//! - **Grid page**: <http://localhost:3000/admin/easy-order-manager/list>
//! - **CSV export**: <http://localhost:3000/admin/easy-order-manager/list/csv>
//!
//! Configuration comes from `DATABASE_URL` and the `EOM_*` variables; an
//! in-memory SQLite database is used by default.

use easy_order_manager::migration::Migrator;
use easy_order_manager::{
    AppState, ManagerConfig, OrderManagerService, SeaOrmOrderRepository, TokenAccessGuard, router,
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("easy_order_manager=debug,tower_http=info")),
        )
        .init();

    let config = ManagerConfig::from_env();
    let db = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;

    if config.admin_token.is_none() {
        tracing::warn!("EOM_ADMIN_TOKEN is not set, every request will be refused");
    }

    let guard = TokenAccessGuard::new(config.admin_token.clone());
    let bind_address = config.bind_address.clone();
    let service = OrderManagerService::new(
        Arc::new(SeaOrmOrderRepository::new(db)),
        Arc::new(config),
    );
    let app = router(AppState::new(service, guard)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(%bind_address, "Order manager listening");
    axum::serve(listener, app).await?;
    Ok(())
}
