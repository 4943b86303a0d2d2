use super::criteria::{OrderCriteria, SortDirection};
use crate::columns::ColumnDefinition;
use crate::models::SortRequest;

/// Sort on the backing field of the first requested column.
///
/// Nothing is sorted when no `order[0]` was sent, when its index is out of
/// range, or when the column has no backing field.
#[must_use]
pub fn apply_sort(
    criteria: OrderCriteria,
    sort: &[SortRequest],
    columns: &[ColumnDefinition],
) -> OrderCriteria {
    let Some(request) = sort.first() else {
        return criteria;
    };

    let field = usize::try_from(request.column)
        .ok()
        .and_then(|index| columns.get(index))
        .and_then(|column| column.orm);

    match field {
        Some(field) => criteria.order_by(field, SortDirection::parse(&request.dir)),
        None => {
            tracing::debug!(column = request.column, "Requested sort column has no backing field");
            criteria
        }
    }
}
