use super::criteria::{DateBound, INVOICE_ADDRESS_ALIAS, OrderCriteria, Predicate};
use super::search::{
    build_like_condition, contains_ignore_case, normalize_customer_search, search_term,
};
use crate::entities::{customer, order, order_address};
use crate::models::FilterCriteria;
use crate::repository::OrderRecord;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::{
    ColumnTrait, Condition, DbBackend,
    sea_query::{Alias, Expr, SimpleExpr},
};

impl Predicate {
    /// Lower the predicate to a SeaORM condition.
    ///
    /// Address columns are qualified with [`INVOICE_ADDRESS_ALIAS`], so the
    /// query must carry the joins listed by [`Predicate::required_joins`].
    #[must_use]
    pub fn to_condition(&self, backend: DbBackend) -> Condition {
        match self {
            Self::StatusIs(id) => Condition::all().add(order::Column::StatusId.eq(*id)),
            Self::StatusIn(ids) => {
                Condition::all().add(order::Column::StatusId.is_in(ids.iter().copied()))
            }
            Self::PaymentModuleIs(id) => {
                Condition::all().add(order::Column::PaymentModuleId.eq(*id))
            }
            Self::IdIn(ids) => Condition::all().add(order::Column::Id.is_in(ids.iter().copied())),
            Self::CreatedAt(bound) => Condition::all().add(bound_expr(order::Column::CreatedAt, *bound)),
            Self::InvoiceDate(bound) => {
                Condition::all().add(bound_expr(order::Column::InvoiceDate, *bound))
            }
            Self::OrderText(term) => Condition::any()
                .add(build_like_condition(order_col(order::Column::Reference), term))
                .add(build_like_condition(
                    order_col(order::Column::Id).cast_as(Alias::new(text_cast_type(backend))),
                    term,
                ))
                .add(build_like_condition(order_col(order::Column::InvoiceRef), term))
                .add(build_like_condition(order_col(order::Column::DeliveryRef), term)),
            Self::CompanyText(term) => Condition::any().add(build_like_condition(
                invoice_col(order_address::Column::Company),
                term,
            )),
            Self::CustomerText(term) => Condition::any()
                .add(build_like_condition(invoice_col(order_address::Column::Firstname), term))
                .add(build_like_condition(invoice_col(order_address::Column::Lastname), term))
                .add(build_like_condition(invoice_col(order_address::Column::Phone), term))
                .add(build_like_condition(invoice_col(order_address::Column::Cellphone), term))
                .add(build_like_condition(
                    Expr::col((customer::Entity, customer::Column::Email)),
                    term,
                )),
        }
    }

    /// Evaluate the predicate against a loaded record.
    #[must_use]
    pub fn matches(&self, record: &OrderRecord) -> bool {
        match self {
            Self::StatusIs(id) => record.status_id == *id,
            Self::StatusIn(ids) => ids.contains(&record.status_id),
            Self::PaymentModuleIs(id) => record.payment_module_id == *id,
            Self::IdIn(ids) => ids.contains(&record.id),
            Self::CreatedAt(bound) => bound.contains(record.created_at),
            Self::InvoiceDate(bound) => record.invoice_date.is_some_and(|date| bound.contains(date)),
            Self::OrderText(term) => {
                contains_ignore_case(&record.reference, term)
                    || contains_ignore_case(&record.id.to_string(), term)
                    || optional_contains(record.invoice_ref.as_deref(), term)
                    || optional_contains(record.delivery_ref.as_deref(), term)
            }
            Self::CompanyText(term) => record
                .invoice_address
                .as_ref()
                .is_some_and(|address| optional_contains(address.company.as_deref(), term)),
            Self::CustomerText(term) => {
                let address_matches = record.invoice_address.as_ref().is_some_and(|address| {
                    contains_ignore_case(&address.firstname, term)
                        || contains_ignore_case(&address.lastname, term)
                        || optional_contains(address.phone.as_deref(), term)
                        || optional_contains(address.cellphone.as_deref(), term)
                });
                address_matches
                    || record
                        .customer
                        .as_ref()
                        .is_some_and(|customer| contains_ignore_case(&customer.email, term))
            }
        }
    }
}

/// MySQL has no `TEXT` cast target and Postgres truncates `CHAR` to one character.
fn text_cast_type(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::MySql => "CHAR",
        DbBackend::Postgres | DbBackend::Sqlite => "TEXT",
    }
}

fn order_col(column: order::Column) -> Expr {
    Expr::col((order::Entity, column))
}

fn invoice_col(column: order_address::Column) -> Expr {
    Expr::col((Alias::new(INVOICE_ADDRESS_ALIAS), column))
}

fn bound_expr(column: order::Column, bound: DateBound) -> SimpleExpr {
    match bound {
        DateBound::From(from) => column.gte(from),
        DateBound::To(to) => column.lte(to),
    }
}

fn optional_contains(value: Option<&str>, term: &str) -> bool {
    value.is_some_and(|value| contains_ignore_case(value, term))
}

#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::seconds(86_399)
}

/// Append the request filters to `criteria`.
///
/// Each filter is independent: a zero id, a missing date or a search term
/// shorter than three characters adds nothing.
#[must_use]
pub fn apply_filters(criteria: OrderCriteria, filters: &FilterCriteria) -> OrderCriteria {
    let mut criteria = criteria;

    if filters.status != 0 {
        criteria = criteria.filter(Predicate::StatusIs(filters.status));
    }
    if filters.payment_module_id != 0 {
        criteria = criteria.filter(Predicate::PaymentModuleIs(filters.payment_module_id));
    }

    if let Some(from) = filters.created_at_from {
        criteria = criteria.filter(Predicate::CreatedAt(DateBound::From(start_of_day(from))));
    }
    if let Some(to) = filters.created_at_to {
        criteria = criteria.filter(Predicate::CreatedAt(DateBound::To(end_of_day(to))));
    }
    if let Some(from) = filters.invoice_date_from {
        criteria = criteria.filter(Predicate::InvoiceDate(DateBound::From(start_of_day(from))));
    }
    if let Some(to) = filters.invoice_date_to {
        criteria = criteria.filter(Predicate::InvoiceDate(DateBound::To(end_of_day(to))));
    }

    if let Some(term) = search_term(&filters.search_order) {
        criteria = criteria.filter(Predicate::OrderText(term));
    }
    if let Some(term) = search_term(&filters.search_company) {
        criteria = criteria.filter(Predicate::CompanyText(term));
    }
    let customer_term = search_term(&filters.search_customer)
        .map(|term| normalize_customer_search(&term))
        .filter(|term| !term.is_empty());
    if let Some(term) = customer_term {
        // One order can match through several joined rows.
        criteria = criteria.filter(Predicate::CustomerText(term)).group_by_id();
    }

    tracing::debug!(predicates = ?criteria.predicates(), "Applied order filters");
    criteria
}
