use super::{
    AddressView, Cascade, CurrencyView, CustomerView, DeleteError, OrderLine, OrderRecord,
    OrderRepository, StatusView,
};
use crate::filtering::pagination::paginate_slice;
use crate::filtering::{OrderCriteria, SortDirection};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sea_orm::DbErr;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct MemoryStatus {
    code: String,
    color: String,
    titles: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    orders: Vec<OrderRecord>,
    statuses: BTreeMap<i32, MemoryStatus>,
    delays: HashMap<i32, usize>,
    credit_notes: HashMap<i32, usize>,
    broken_deletes: HashSet<i32>,
}

impl MemoryState {
    fn status_view(&self, status_id: i32, locale: &str) -> Option<StatusView> {
        self.statuses.get(&status_id).map(|status| StatusView {
            id: status_id,
            code: status.code.clone(),
            color: status.color.clone(),
            title: status.titles.get(locale).cloned(),
        })
    }

    fn localized(&self, record: &OrderRecord, locale: &str) -> OrderRecord {
        let mut record = record.clone();
        record.status = self.status_view(record.status_id, locale);
        record
    }
}

/// In-memory [`OrderRepository`] evaluating criteria against stored records.
///
/// Delay and credit-note counts stand in for the restricting foreign keys:
/// deleting an order that still has some fails with a constraint error.
#[derive(Debug, Default)]
pub struct MemoryOrderRepository {
    state: RwLock<MemoryState>,
}

impl MemoryOrderRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The five standard statuses, titled in `en_US` and `fr_FR`.
    #[must_use]
    pub fn with_sample_statuses() -> Self {
        Self::new()
            .with_status(1, "not_paid", "#f39922", &[("en_US", "Not paid"), ("fr_FR", "Non payée")])
            .with_status(2, "paid", "#5cb85c", &[("en_US", "Paid"), ("fr_FR", "Payée")])
            .with_status(3, "processing", "#f0ad4e", &[("en_US", "Processing"), ("fr_FR", "Traitement")])
            .with_status(4, "sent", "#5bc0de", &[("en_US", "Sent"), ("fr_FR", "Envoyée")])
            .with_status(5, "canceled", "#d9534f", &[("en_US", "Canceled"), ("fr_FR", "Annulée")])
    }

    #[must_use]
    pub fn with_status(mut self, id: i32, code: &str, color: &str, titles: &[(&str, &str)]) -> Self {
        self.state.get_mut().statuses.insert(
            id,
            MemoryStatus {
                code: code.to_string(),
                color: color.to_string(),
                titles: titles
                    .iter()
                    .map(|(locale, title)| ((*locale).to_string(), (*title).to_string()))
                    .collect(),
            },
        );
        self
    }

    #[must_use]
    pub fn with_order(mut self, record: OrderRecord) -> Self {
        self.state.get_mut().orders.push(record);
        self
    }

    #[must_use]
    pub fn with_delays(mut self, order_id: i32, count: usize) -> Self {
        self.state.get_mut().delays.insert(order_id, count);
        self
    }

    #[must_use]
    pub fn with_credit_notes(mut self, order_id: i32, count: usize) -> Self {
        self.state.get_mut().credit_notes.insert(order_id, count);
        self
    }

    /// Make deleting `order_id` fail with a non-constraint database error.
    #[must_use]
    pub fn with_broken_delete(mut self, order_id: i32) -> Self {
        self.state.get_mut().broken_deletes.insert(order_id);
        self
    }

    /// Ids of the stored orders, in insertion order.
    pub async fn order_ids(&self) -> Vec<i32> {
        self.state.read().await.orders.iter().map(|order| order.id).collect()
    }

    /// A plausible order: one line of 10.00 + 2.00 tax, created `id` hours after 2024-01-01.
    #[must_use]
    pub fn sample_order(id: i32, status_id: i32) -> OrderRecord {
        let created_at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap_or_default()
            .and_time(NaiveTime::MIN)
            + Duration::hours(i64::from(id));

        OrderRecord {
            id,
            reference: format!("ORD{id:06}"),
            created_at,
            invoice_date: None,
            invoice_ref: None,
            delivery_ref: None,
            status_id,
            payment_module_id: 1,
            postage: Decimal::ZERO,
            discount: Decimal::ZERO,
            customer: Some(CustomerView {
                id,
                email: format!("customer{id}@example.com"),
            }),
            invoice_address: Some(AddressView {
                company: Some(format!("Company {id}")),
                firstname: format!("First{id}"),
                lastname: format!("Last{id}"),
                phone: None,
                cellphone: None,
            }),
            delivery_address: None,
            status: None,
            currency: Some(CurrencyView {
                code: "EUR".to_string(),
                symbol: "€".to_string(),
                format: "%n %s".to_string(),
            }),
            lines: vec![OrderLine {
                product_ref: format!("PROD{id}"),
                title: "Sample product".to_string(),
                price: Decimal::from(10),
                tax_amount: Decimal::from(2),
                quantity: 1,
            }],
        }
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn count(&self, criteria: &OrderCriteria) -> Result<u64, DbErr> {
        let state = self.state.read().await;
        let matching = state.orders.iter().filter(|order| criteria.matches(order)).count();
        Ok(matching as u64)
    }

    async fn find(
        &self,
        criteria: &OrderCriteria,
        locale: &str,
    ) -> Result<Vec<OrderRecord>, DbErr> {
        let state = self.state.read().await;
        let mut matching: Vec<&OrderRecord> = state
            .orders
            .iter()
            .filter(|order| criteria.matches(order))
            .collect();

        if let Some((field, direction)) = criteria.sort() {
            matching.sort_by(|a, b| {
                let ordering = field.compare(a, b);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let page = paginate_slice(matching, criteria.offset(), criteria.limit());
        Ok(page
            .into_iter()
            .map(|order| state.localized(order, locale))
            .collect())
    }

    async fn delete_order(&self, id: i32, cascade: Cascade) -> Result<(), DeleteError> {
        let mut state = self.state.write().await;

        if state.broken_deletes.contains(&id) {
            return Err(DeleteError::Database(DbErr::Custom(format!(
                "could not delete order {id}"
            ))));
        }

        let delays = if cascade == Cascade::Delays {
            0
        } else {
            state.delays.get(&id).copied().unwrap_or(0)
        };
        let credit_notes = if cascade == Cascade::CreditNotes {
            0
        } else {
            state.credit_notes.get(&id).copied().unwrap_or(0)
        };
        // Checked before touching anything, so a failure leaves the dependents in place.
        if delays > 0 || credit_notes > 0 {
            return Err(DeleteError::Constraint(format!(
                "FOREIGN KEY constraint failed: order {id} is still referenced"
            )));
        }

        state.delays.remove(&id);
        state.credit_notes.remove(&id);
        state.orders.retain(|order| order.id != id);
        Ok(())
    }

    async fn update_status(&self, ids: &[i32], status_id: i32) -> Result<Vec<i32>, DbErr> {
        let mut state = self.state.write().await;
        let mut updated = Vec::new();
        for id in ids {
            if updated.contains(id) {
                continue;
            }
            if let Some(order) = state.orders.iter_mut().find(|order| order.id == *id) {
                order.status_id = status_id;
                updated.push(*id);
            }
        }
        Ok(updated)
    }
}
