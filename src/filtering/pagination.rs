use super::criteria::OrderCriteria;

/// Apply the requested row offset and an optional row cap. Negative offsets start at 0.
#[must_use]
pub fn apply_pagination(criteria: OrderCriteria, start: i64, limit: Option<u64>) -> OrderCriteria {
    let offset = u64::try_from(start).unwrap_or(0);
    criteria.paginate(offset, limit)
}

/// Slice an already filtered and sorted list the way SQL `OFFSET`/`LIMIT` would.
#[must_use]
pub fn paginate_slice<T>(items: Vec<T>, offset: u64, limit: Option<u64>) -> Vec<T> {
    let skip = usize::try_from(offset).unwrap_or(usize::MAX);
    let take = limit.map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
    items.into_iter().skip(skip).take(take).collect()
}
