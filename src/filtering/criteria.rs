use crate::entities::order;
use crate::repository::OrderRecord;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;

/// Alias of the invoice address join, shared by the company and customer searches.
pub const INVOICE_ADDRESS_ALIAS: &str = "invoice_address";
pub const DELIVERY_ADDRESS_ALIAS: &str = "delivery_address";

/// Order columns a grid column may sort on.
///
/// Serialized as the qualified column name, which is what the column
/// registry exposes as its private `orm` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortField {
    #[serde(rename = "order.id")]
    Id,
    #[serde(rename = "order.ref")]
    Ref,
    #[serde(rename = "order.created_at")]
    CreatedAt,
    #[serde(rename = "order.invoice_date")]
    InvoiceDate,
}

impl SortField {
    #[must_use]
    pub fn column(self) -> order::Column {
        match self {
            Self::Id => order::Column::Id,
            Self::Ref => order::Column::Reference,
            Self::CreatedAt => order::Column::CreatedAt,
            Self::InvoiceDate => order::Column::InvoiceDate,
        }
    }

    /// Ascending comparison of two records on this field. Missing invoice dates sort first.
    #[must_use]
    pub fn compare(self, a: &OrderRecord, b: &OrderRecord) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Ref => a.reference.cmp(&b.reference),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::InvoiceDate => a.invoice_date.cmp(&b.invoice_date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `"asc"` sorts ascending, anything else descending.
    #[must_use]
    pub fn parse(dir: &str) -> Self {
        if dir == "asc" { Self::Asc } else { Self::Desc }
    }
}

impl From<SortDirection> for sea_orm::Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Self::Asc,
            SortDirection::Desc => Self::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    Customer,
    InvoiceAddress,
    DeliveryAddress,
}

/// Inclusive bound of a date range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    From(NaiveDateTime),
    To(NaiveDateTime),
}

impl DateBound {
    #[must_use]
    pub fn contains(self, value: NaiveDateTime) -> bool {
        match self {
            Self::From(from) => value >= from,
            Self::To(to) => value <= to,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    StatusIs(i32),
    StatusIn(Vec<i32>),
    PaymentModuleIs(i32),
    IdIn(Vec<i32>),
    CreatedAt(DateBound),
    InvoiceDate(DateBound),
    /// Reference, id, invoice reference or delivery reference contains the term.
    OrderText(String),
    /// Invoice address company contains the term.
    CompanyText(String),
    /// Invoice name, phones or customer email contain the (normalized) term.
    CustomerText(String),
}

impl Predicate {
    /// Joins the predicate needs to be lowered to SQL.
    #[must_use]
    pub fn required_joins(&self) -> &'static [Join] {
        match self {
            Self::CompanyText(_) => &[Join::InvoiceAddress],
            Self::CustomerText(_) => &[Join::InvoiceAddress, Join::Customer],
            _ => &[],
        }
    }
}

/// Immutable description of an order query.
///
/// Every builder method consumes the criteria and returns a new value, so a
/// count query is just a clone taken at the right point of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderCriteria {
    predicates: Vec<Predicate>,
    joins: Vec<Join>,
    group_by_id: bool,
    sort: Option<(SortField, SortDirection)>,
    offset: u64,
    limit: Option<u64>,
}

impl OrderCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate, AND-ed with the existing ones. Required joins are added once.
    #[must_use]
    pub fn filter(self, predicate: Predicate) -> Self {
        let mut next = predicate
            .required_joins()
            .iter()
            .fold(self, |criteria, join| criteria.with_join(*join));
        next.predicates.push(predicate);
        next
    }

    #[must_use]
    pub fn with_join(mut self, join: Join) -> Self {
        if !self.joins.contains(&join) {
            self.joins.push(join);
        }
        self
    }

    #[must_use]
    pub fn group_by_id(mut self) -> Self {
        self.group_by_id = true;
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = Some((field, direction));
        self
    }

    #[must_use]
    pub fn paginate(mut self, offset: u64, limit: Option<u64>) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    #[must_use]
    pub fn has_join(&self, join: Join) -> bool {
        self.joins.contains(&join)
    }

    #[must_use]
    pub fn is_grouped_by_id(&self) -> bool {
        self.group_by_id
    }

    #[must_use]
    pub fn sort(&self) -> Option<(SortField, SortDirection)> {
        self.sort
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Whether every predicate holds for the record.
    #[must_use]
    pub fn matches(&self, record: &OrderRecord) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(record))
    }
}
