//! Order storage behind one async contract.
//!
//! [`SeaOrmOrderRepository`] talks to the database; [`MemoryOrderRepository`]
//! keeps the same semantics in memory for unit tests and benchmarks.

mod memory;
mod seaorm;

pub use self::memory::MemoryOrderRepository;
pub use self::seaorm::SeaOrmOrderRepository;

use crate::filtering::{OrderCriteria, Predicate};
use sea_orm::DbErr;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;

/// Status ids with special meaning for bulk deletion and display.
pub mod status {
    /// Orders still waiting for payment; their delay records go with them.
    pub const NOT_PAID: i32 = 1;
    /// Shipped orders; their credit notes go with them.
    pub const SENT: i32 = 4;
    /// Cancelled orders are never deleted.
    pub const CANCELED: i32 = 5;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressView {
    pub company: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub phone: Option<String>,
    pub cellphone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerView {
    pub id: i32,
    pub email: String,
}

/// Status as displayed, with the title resolved for the requested locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub id: i32,
    pub code: String,
    pub color: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyView {
    pub code: String,
    pub symbol: String,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_ref: String,
    pub title: String,
    pub price: Decimal,
    pub tax_amount: Decimal,
    pub quantity: i32,
}

impl OrderLine {
    /// Taxed line total, rounded to cents.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        ((self.price + self.tax_amount) * Decimal::from(self.quantity))
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }
}

/// One order with everything the grid and the export display.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub id: i32,
    pub reference: String,
    pub created_at: NaiveDateTime,
    pub invoice_date: Option<NaiveDateTime>,
    pub invoice_ref: Option<String>,
    pub delivery_ref: Option<String>,
    pub status_id: i32,
    pub payment_module_id: i32,
    pub postage: Decimal,
    pub discount: Decimal,
    pub customer: Option<CustomerView>,
    pub invoice_address: Option<AddressView>,
    pub delivery_address: Option<AddressView>,
    pub status: Option<StatusView>,
    pub currency: Option<CurrencyView>,
    pub lines: Vec<OrderLine>,
}

impl OrderRecord {
    /// Sum of taxed lines plus postage, minus discount.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        let lines: Decimal = self
            .lines
            .iter()
            .map(|line| (line.price + line.tax_amount) * Decimal::from(line.quantity))
            .sum();
        lines + self.postage - self.discount
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status_id == status::CANCELED
    }

    #[must_use]
    pub fn customer_id(&self) -> Option<i32> {
        self.customer.as_ref().map(|customer| customer.id)
    }
}

/// Dependent records removed in the same transaction as the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cascade {
    None,
    Delays,
    CreditNotes,
}

impl Cascade {
    #[must_use]
    pub fn for_status(status_id: i32) -> Self {
        match status_id {
            status::NOT_PAID => Self::Delays,
            status::SENT => Self::CreditNotes,
            _ => Self::None,
        }
    }
}

#[derive(Debug)]
pub enum DeleteError {
    /// A foreign key still points at the order; the batch goes on.
    Constraint(String),
    /// Anything else aborts the batch.
    Database(DbErr),
}

impl fmt::Display for DeleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constraint(message) => write!(f, "constraint violation: {message}"),
            Self::Database(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DeleteError {}

/// SQLite text for every blocked key, including `ON DELETE RESTRICT` ones
/// that `DbErr::sql_err` does not classify.
const SQLITE_FOREIGN_KEY_MESSAGE: &str = "FOREIGN KEY constraint failed";

impl From<DbErr> for DeleteError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(message)) => {
                Self::Constraint(message)
            }
            _ if err.to_string().contains(SQLITE_FOREIGN_KEY_MESSAGE) => {
                Self::Constraint(err.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Number of distinct orders matching the criteria, ignoring pagination.
    async fn count(&self, criteria: &OrderCriteria) -> Result<u64, DbErr>;

    /// One page of orders, related data loaded and status titles in `locale`.
    async fn find(&self, criteria: &OrderCriteria, locale: &str)
    -> Result<Vec<OrderRecord>, DbErr>;

    async fn find_by_ids(&self, ids: &[i32], locale: &str) -> Result<Vec<OrderRecord>, DbErr> {
        let criteria = OrderCriteria::new().filter(Predicate::IdIn(ids.to_vec()));
        self.find(&criteria, locale).await
    }

    /// Delete one order after clearing the dependents named by `cascade`.
    async fn delete_order(&self, id: i32, cascade: Cascade) -> Result<(), DeleteError>;

    /// Set the status of every existing order in `ids`, returning the ids updated.
    async fn update_status(&self, ids: &[i32], status_id: i32) -> Result<Vec<i32>, DbErr>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: Decimal, tax: Decimal, quantity: i32) -> OrderLine {
        OrderLine {
            product_ref: "REF".to_string(),
            title: "Product".to_string(),
            price,
            tax_amount: tax,
            quantity,
        }
    }

    #[test]
    fn test_line_amount_rounds_half_away_from_zero() {
        assert_eq!(line(Decimal::new(10005, 3), Decimal::ZERO, 1).amount(), Decimal::new(1001, 2));
        assert_eq!(line(Decimal::from(10), Decimal::from(2), 3).amount(), Decimal::from(36));
    }

    #[test]
    fn test_cascade_for_status() {
        assert_eq!(Cascade::for_status(status::NOT_PAID), Cascade::Delays);
        assert_eq!(Cascade::for_status(status::SENT), Cascade::CreditNotes);
        assert_eq!(Cascade::for_status(2), Cascade::None);
    }

    #[test]
    fn test_plain_db_error_is_not_a_constraint() {
        let err: DeleteError = DbErr::Custom("disk I/O error".to_string()).into();
        assert!(matches!(err, DeleteError::Database(_)));
    }

    /// Delete the referenced parent row and return the error SQLite raises.
    #[cfg(feature = "sqlite")]
    async fn blocked_parent_delete(on_delete: &str) -> DbErr {
        use sea_orm::{ConnectionTrait, Database};

        let db = Database::connect("sqlite::memory:").await.unwrap();
        for sql in [
            "CREATE TABLE parent (id INTEGER PRIMARY KEY)".to_string(),
            format!(
                "CREATE TABLE child (id INTEGER PRIMARY KEY, parent_id INTEGER NOT NULL \
                 REFERENCES parent (id) {on_delete})"
            ),
            "INSERT INTO parent (id) VALUES (1)".to_string(),
            "INSERT INTO child (id, parent_id) VALUES (1, 1)".to_string(),
        ] {
            db.execute_unprepared(&sql).await.unwrap();
        }
        db.execute_unprepared("DELETE FROM parent WHERE id = 1")
            .await
            .unwrap_err()
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_sqlite_foreign_key_errors_are_constraints() {
        for on_delete in ["", "ON DELETE RESTRICT"] {
            match DeleteError::from(blocked_parent_delete(on_delete).await) {
                DeleteError::Constraint(message) => {
                    assert!(message.contains("FOREIGN KEY constraint failed"), "{message}");
                }
                DeleteError::Database(err) => panic!("{on_delete:?} was not a constraint: {err}"),
            }
        }
    }
}
