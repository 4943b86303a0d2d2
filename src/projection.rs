//! Turns loaded orders into grid cells, one per registered column.

use crate::columns::{ColumnDefinition, ColumnKind};
use crate::formatting::{MoneyFormatter, UrlBuilder, format_grid_date};
use crate::repository::OrderRecord;
use serde_json::{Value, json};

pub const UNKNOWN_STATUS_LABEL: &str = "unknown";
pub const UNKNOWN_STATUS_COLOR: &str = "#000000";

/// Services the cells need, borrowed for one request.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext<'a> {
    pub money: &'a MoneyFormatter,
    pub urls: &'a UrlBuilder,
}

impl ProjectionContext<'_> {
    #[must_use]
    pub fn order_url(&self, order_id: i32) -> String {
        self.urls.absolute_url(&format!("admin/order/update/{order_id}"))
    }

    #[must_use]
    pub fn customer_url(&self, customer_id: i32) -> String {
        self.urls
            .absolute_url(&format!("admin/customer/update?customer_id={customer_id}"))
    }

    #[must_use]
    pub fn invoice_pdf_url(&self, order_id: i32) -> String {
        self.urls
            .absolute_url(&format!("admin/order/pdf/invoice/{order_id}/1"))
    }
}

/// Localized status label and color, with a placeholder when the order has none.
#[must_use]
pub fn status_label(record: &OrderRecord) -> (String, String) {
    match &record.status {
        Some(status) => (
            status.title.clone().unwrap_or_else(|| status.code.clone()),
            status.color.clone(),
        ),
        None => (
            UNKNOWN_STATUS_LABEL.to_string(),
            UNKNOWN_STATUS_COLOR.to_string(),
        ),
    }
}

#[must_use]
pub fn cell(kind: ColumnKind, record: &OrderRecord, ctx: &ProjectionContext<'_>) -> Value {
    match kind {
        ColumnKind::Checkbox => json!({ "id": record.id }),
        ColumnKind::OrderIdLink => json!({
            "label": record.id,
            "href": ctx.order_url(record.id),
        }),
        ColumnKind::OrderRefLink => json!({
            "label": record.reference,
            "href": ctx.order_url(record.id),
        }),
        ColumnKind::CreatedDate => Value::String(format_grid_date(record.created_at)),
        ColumnKind::InvoiceDate => record
            .invoice_date
            .map_or(Value::Null, |date| Value::String(format_grid_date(date))),
        ColumnKind::Company => record
            .invoice_address
            .as_ref()
            .and_then(|address| address.company.clone())
            .map_or(Value::Null, Value::String),
        ColumnKind::CustomerLink => {
            let label = record
                .invoice_address
                .as_ref()
                .map(|address| format!("{} {}", address.firstname, address.lastname))
                .unwrap_or_default();
            json!({
                "label": label,
                "href": record.customer_id().map(|id| ctx.customer_url(id)),
            })
        }
        ColumnKind::Amount => Value::String(ctx.money.format_by_currency(
            record.total_amount(),
            2,
            ".",
            " ",
            record.currency.as_ref(),
        )),
        ColumnKind::StatusBadge => {
            let (label, color) = status_label(record);
            json!({ "label": label, "color": color })
        }
        ColumnKind::Actions => json!({
            "order_id": record.id,
            "hrefUpdate": ctx.order_url(record.id),
            "hrefPrint": ctx.invoice_pdf_url(record.id),
            "isCancelled": record.is_cancelled(),
        }),
        ColumnKind::InvoiceRef => record.invoice_ref.clone().map_or(Value::Null, Value::String),
        ColumnKind::DeliveryRef => record.delivery_ref.clone().map_or(Value::Null, Value::String),
        ColumnKind::CustomerEmail => record
            .customer
            .as_ref()
            .map_or(Value::Null, |customer| Value::String(customer.email.clone())),
    }
}

/// One row of cells, in column order.
#[must_use]
pub fn project_row(
    columns: &[ColumnDefinition],
    record: &OrderRecord,
    ctx: &ProjectionContext<'_>,
) -> Vec<Value> {
    columns
        .iter()
        .map(|column| cell(column.kind, record, ctx))
        .collect()
}

#[must_use]
pub fn project_rows(
    columns: &[ColumnDefinition],
    records: &[OrderRecord],
    ctx: &ProjectionContext<'_>,
) -> Vec<Vec<Value>> {
    records
        .iter()
        .map(|record| project_row(columns, record, ctx))
        .collect()
}
