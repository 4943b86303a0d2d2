use crate::errors::ApiError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use std::collections::BTreeMap;

/// Filter keys the grid understands. Other `filter[...]` keys are kept for hooks.
pub const FILTER_STATUS: &str = "status";
pub const FILTER_PAYMENT_MODULE: &str = "paymentModuleId";
pub const FILTER_CREATED_AT_FROM: &str = "createdAtFrom";
pub const FILTER_CREATED_AT_TO: &str = "createdAtTo";
pub const FILTER_INVOICE_DATE_FROM: &str = "invoiceDateFrom";
pub const FILTER_INVOICE_DATE_TO: &str = "invoiceDateTo";
pub const SEARCH_ORDER: &str = "searchOrder";
pub const SEARCH_COMPANY: &str = "searchCompany";
pub const SEARCH_CUSTOMER: &str = "searchCustomer";

/// Flat request parameters with bracketed keys (`order[0][column]`), merged
/// from the query string and the body. Later values win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    #[must_use]
    pub fn from_urlencoded(input: &[u8]) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(input).into_owned().collect(),
        }
    }

    /// Flatten a JSON object into bracketed keys: `{"order":[{"column":1}]}`
    /// becomes `order[0][column]=1`.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when the body is not a JSON object.
    pub fn from_json(value: &Value) -> Result<Self, ApiError> {
        let Value::Object(map) = value else {
            return Err(ApiError::bad_request("Request body must be a JSON object"));
        };
        let mut pairs = Vec::new();
        for (key, value) in map {
            flatten_json(key.clone(), value, &mut pairs);
        }
        Ok(Self { pairs })
    }

    pub fn extend(&mut self, other: Self) {
        self.pairs.extend(other.pairs);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Entries of a one-level group: `filter[status]=2` yields `("status", "2")`.
    pub fn group<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.pairs.iter().filter_map(move |(name, value)| {
            let inner = name.strip_prefix(prefix)?.strip_prefix('[')?.strip_suffix(']')?;
            (!inner.contains('[')).then_some((inner, value.as_str()))
        })
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }
}

fn flatten_json(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (child, value) in map {
                flatten_json(format!("{key}[{child}]"), value, pairs);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten_json(format!("{key}[{index}]"), value, pairs);
            }
        }
        Value::String(text) => pairs.push((key, text.clone())),
        Value::Number(number) => pairs.push((key, number.to_string())),
        Value::Bool(flag) => pairs.push((key, if *flag { "1" } else { "" }.to_string())),
        Value::Null => pairs.push((key, String::new())),
    }
}

/// Leading integer of `raw`, or 0: `"12abc"` is 12, `"abc"` is 0.
#[must_use]
pub fn lenient_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map_or(0, |value| if negative { -value } else { value })
}

fn lenient_i32(raw: &str) -> i32 {
    i32::try_from(lenient_int(raw)).unwrap_or(0)
}

fn parse_date(key: &str, raw: &str) -> Result<Option<NaiveDate>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ApiError::bad_request(format!("Invalid date for filter '{key}': expected YYYY-MM-DD")))
}

/// Request-supplied filter values. Zero ids and empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub status: i32,
    pub payment_module_id: i32,
    pub created_at_from: Option<NaiveDate>,
    pub created_at_to: Option<NaiveDate>,
    pub invoice_date_from: Option<NaiveDate>,
    pub invoice_date_to: Option<NaiveDate>,
    pub search_order: String,
    pub search_company: String,
    pub search_customer: String,
    /// Whether any `filter[...]` value was non-empty.
    pub is_filtered: bool,
    /// Every `filter[...]` value after fallback, including keys unknown here.
    pub raw: BTreeMap<String, String>,
}

impl FilterCriteria {
    /// Read `filter[...]` values. An empty `filter[key]` falls back to a
    /// top-level `key` parameter; search values prefer `<key>[value]`.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a non-empty date that is not `YYYY-MM-DD`.
    pub fn from_params(params: &RequestParams) -> Result<Self, ApiError> {
        let mut raw = BTreeMap::new();
        for (key, value) in params.group("filter") {
            let value = if value.is_empty() {
                params.get(key).unwrap_or_default()
            } else {
                value
            };
            raw.insert(key.to_string(), value.to_string());
        }

        let is_filtered = raw.values().any(|value| !value.is_empty());
        let filter = |key: &str| raw.get(key).map(String::as_str).unwrap_or_default();
        let search = |key: &str| {
            params
                .get(&format!("{key}[value]"))
                .unwrap_or_else(|| filter(key))
                .to_string()
        };

        Ok(Self {
            status: lenient_i32(filter(FILTER_STATUS)),
            payment_module_id: lenient_i32(filter(FILTER_PAYMENT_MODULE)),
            created_at_from: parse_date(FILTER_CREATED_AT_FROM, filter(FILTER_CREATED_AT_FROM))?,
            created_at_to: parse_date(FILTER_CREATED_AT_TO, filter(FILTER_CREATED_AT_TO))?,
            invoice_date_from: parse_date(
                FILTER_INVOICE_DATE_FROM,
                filter(FILTER_INVOICE_DATE_FROM),
            )?,
            invoice_date_to: parse_date(FILTER_INVOICE_DATE_TO, filter(FILTER_INVOICE_DATE_TO))?,
            search_order: search(SEARCH_ORDER),
            search_company: search(SEARCH_COMPANY),
            search_customer: search(SEARCH_CUSTOMER),
            is_filtered,
            raw,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRequest {
    /// Index into the column registry.
    pub column: i64,
    pub dir: String,
}

/// A DataTables grid request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridRequest {
    pub draw: i64,
    pub start: i64,
    pub length: i64,
    pub order: Vec<SortRequest>,
    pub filters: FilterCriteria,
    pub locale: Option<String>,
    pub params: RequestParams,
}

impl GridRequest {
    /// # Errors
    ///
    /// Returns `BadRequest` when a filter date cannot be parsed.
    pub fn from_params(params: RequestParams) -> Result<Self, ApiError> {
        let number = |key: &str| params.get(key).map_or(0, lenient_int);

        let mut order = Vec::new();
        while let Some(column) = params.get(&format!("order[{}][column]", order.len())) {
            let dir = params
                .get(&format!("order[{}][dir]", order.len()))
                .unwrap_or_default();
            order.push(SortRequest {
                column: lenient_int(column),
                dir: dir.to_string(),
            });
        }

        Ok(Self {
            draw: number("draw"),
            start: number("start"),
            length: number("length"),
            order,
            filters: FilterCriteria::from_params(&params)?,
            locale: params
                .get("locale")
                .filter(|locale| !locale.is_empty())
                .map(str::to_string),
            params,
        })
    }
}

/// `{"order_ids": [...]}`; ids may be numbers or numeric strings.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOrders {
    #[serde_as(as = "Vec<PickFirst<(_, DisplayFromStr)>>")]
    pub order_ids: Vec<i32>,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusRequest {
    #[serde_as(as = "Vec<PickFirst<(_, DisplayFromStr)>>")]
    pub order_ids: Vec<i32>,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub status_id: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResponse {
    pub draw: i64,
    pub records_total: u64,
    pub records_filtered: u64,
    pub data: Vec<Vec<Value>>,
    /// Rows on this page.
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteFailure {
    pub order_id: i32,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSelectedResponse {
    pub deleted_orders: Vec<i32>,
    pub not_deleted_orders: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub errors: Vec<DeleteFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdatedOrdersResponse {
    pub updated_orders: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderStatusSummary {
    pub order_id: i32,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSelectedResponse {
    pub orders: Vec<OrderStatusSummary>,
}
