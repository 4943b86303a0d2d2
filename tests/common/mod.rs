#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{NaiveDate, NaiveDateTime};
use easy_order_manager::entities::{
    credit_note, currency, customer, order, order_address, order_delay, order_product,
    order_status, order_status_i18n,
};
use easy_order_manager::migration::Migrator;
use easy_order_manager::{
    AppState, ManagerConfig, OrderManagerService, SeaOrmOrderRepository, TokenAccessGuard, router,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, Database, DatabaseConnection, DbErr, EntityTrait};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TOKEN: &str = "test-admin-token";
pub const BASE: &str = "/admin/easy-order-manager";

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    seed_reference_data(&db).await?;

    Ok(db)
}

pub fn test_config() -> ManagerConfig {
    ManagerConfig {
        export_dir: std::env::temp_dir(),
        admin_token: Some(TOKEN.to_string()),
        ..ManagerConfig::default()
    }
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    let config = test_config();
    let guard = TokenAccessGuard::new(config.admin_token.clone());
    let service = OrderManagerService::new(
        Arc::new(SeaOrmOrderRepository::new(db)),
        Arc::new(config),
    );
    router(AppState::new(service, guard))
}

async fn seed_reference_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    currency::Entity::insert(currency::ActiveModel {
        id: Set(1),
        code: Set("EUR".to_string()),
        symbol: Set("€".to_string()),
        format: Set("%n %s".to_string()),
    })
    .exec(db)
    .await?;

    let statuses = [
        (1, "not_paid", "#f39922", "Not paid", "Non payée"),
        (2, "paid", "#5cb85c", "Paid", "Payée"),
        (3, "processing", "#f0ad4e", "Processing", "Traitement"),
        (4, "sent", "#5bc0de", "Sent", "Envoyée"),
        (5, "canceled", "#d9534f", "Canceled", "Annulée"),
    ];
    for (id, code, color, english, french) in statuses {
        order_status::Entity::insert(order_status::ActiveModel {
            id: Set(id),
            code: Set(code.to_string()),
            color: Set(color.to_string()),
        })
        .exec(db)
        .await?;

        for (locale, title) in [("en_US", english), ("fr_FR", french)] {
            order_status_i18n::Entity::insert(order_status_i18n::ActiveModel {
                id: Set(id),
                locale: Set(locale.to_string()),
                title: Set(title.to_string()),
            })
            .exec_without_returning(db)
            .await?;
        }
    }
    Ok(())
}

/// One order with its customer, both addresses and its lines.
#[derive(Debug, Clone)]
pub struct OrderSeed {
    pub id: i32,
    pub status_id: i32,
    pub payment_module_id: i32,
    pub created_at: NaiveDateTime,
    pub invoice_date: Option<NaiveDateTime>,
    pub company: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub phone: Option<String>,
    pub cellphone: Option<String>,
    pub email: String,
    /// `(price, tax, quantity)` per line.
    pub lines: Vec<(i64, i64, i32)>,
}

impl OrderSeed {
    pub fn new(id: i32, status_id: i32) -> Self {
        Self {
            id,
            status_id,
            payment_module_id: 1,
            created_at: datetime(2024, 3, 1, 12, 0, 0),
            invoice_date: None,
            company: Some(format!("Company {id}")),
            firstname: format!("First{id}"),
            lastname: format!("Last{id}"),
            phone: None,
            cellphone: None,
            email: format!("customer{id}@example.com"),
            lines: vec![(10, 2, 1)],
        }
    }

    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

pub fn datetime(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, min, sec)
        .unwrap()
}

pub async fn insert_order(db: &DatabaseConnection, seed: OrderSeed) -> Result<(), DbErr> {
    customer::Entity::insert(customer::ActiveModel {
        id: Set(seed.id),
        email: Set(seed.email.clone()),
    })
    .exec(db)
    .await?;

    let invoice_address_id = seed.id * 2 - 1;
    let delivery_address_id = seed.id * 2;
    for address_id in [invoice_address_id, delivery_address_id] {
        order_address::Entity::insert(order_address::ActiveModel {
            id: Set(address_id),
            company: Set(seed.company.clone()),
            firstname: Set(seed.firstname.clone()),
            lastname: Set(seed.lastname.clone()),
            phone: Set(seed.phone.clone()),
            cellphone: Set(seed.cellphone.clone()),
        })
        .exec(db)
        .await?;
    }

    order::Entity::insert(order::ActiveModel {
        id: Set(seed.id),
        reference: Set(format!("ORD{:06}", seed.id)),
        customer_id: Set(seed.id),
        invoice_order_address_id: Set(invoice_address_id),
        delivery_order_address_id: Set(delivery_address_id),
        invoice_date: Set(seed.invoice_date),
        invoice_ref: Set(None),
        delivery_ref: Set(None),
        currency_id: Set(1),
        status_id: Set(seed.status_id),
        payment_module_id: Set(seed.payment_module_id),
        postage: Set(Decimal::ZERO),
        discount: Set(Decimal::ZERO),
        created_at: Set(seed.created_at),
    })
    .exec(db)
    .await?;

    for (price, tax, quantity) in seed.lines {
        order_product::Entity::insert(order_product::ActiveModel {
            order_id: Set(seed.id),
            product_ref: Set(format!("PROD{}", seed.id)),
            title: Set("Sample product".to_string()),
            price: Set(Decimal::from(price)),
            tax_amount: Set(Decimal::from(tax)),
            quantity: Set(quantity),
            ..Default::default()
        })
        .exec(db)
        .await?;
    }
    Ok(())
}

pub async fn insert_orders(db: &DatabaseConnection, seeds: Vec<OrderSeed>) -> Result<(), DbErr> {
    for seed in seeds {
        insert_order(db, seed).await?;
    }
    Ok(())
}

pub async fn insert_delay(db: &DatabaseConnection, order_id: i32) -> Result<(), DbErr> {
    order_delay::Entity::insert(order_delay::ActiveModel {
        order_id: Set(order_id),
        reason: Set("Waiting for stock".to_string()),
        created_at: Set(datetime(2024, 3, 2, 8, 0, 0)),
        ..Default::default()
    })
    .exec(db)
    .await?;
    Ok(())
}

pub async fn insert_credit_note(db: &DatabaseConnection, order_id: i32) -> Result<(), DbErr> {
    credit_note::Entity::insert(credit_note::ActiveModel {
        order_id: Set(order_id),
        reference: Set(format!("CN{order_id}")),
        amount: Set(Decimal::from(5)),
        ..Default::default()
    })
    .exec(db)
    .await?;
    Ok(())
}

/// Authorized AJAX request with an optional JSON body.
pub fn ajax_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header("x-requested-with", "XMLHttpRequest");

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}
