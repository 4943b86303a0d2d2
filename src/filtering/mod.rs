//! # Order filtering, sorting and pagination
//!
//! Request parameters become an immutable [`OrderCriteria`]:
//!
//! ```rust,ignore
//! let criteria = OrderCriteria::new().with_join(Join::Customer);
//! let criteria = apply_sort(criteria, &request.order, &columns);
//! let total = repository.count(&criteria).await?;
//! let criteria = apply_filters(criteria, &request.filters);
//! let criteria = apply_pagination(criteria, request.start, Some(25));
//! ```
//!
//! The same criteria lowers to SeaORM conditions ([`Predicate::to_condition`])
//! and evaluates against loaded records ([`OrderCriteria::matches`]), which
//! is what the in-memory repository relies on.
//!
//! Filter parameters (`filter[...]`):
//! - `status`, `paymentModuleId`: applied when non-zero
//! - `createdAtFrom`, `createdAtTo`, `invoiceDateFrom`, `invoiceDateTo`:
//!   `YYYY-MM-DD`, bounds include the whole day
//! - `searchOrder`, `searchCompany`, `searchCustomer`: case-insensitive
//!   substring searches, ignored under three characters

pub mod conditions;
pub mod criteria;
pub mod pagination;
pub mod search;
pub mod sort;

pub use conditions::apply_filters;
pub use criteria::{DateBound, Join, OrderCriteria, Predicate, SortDirection, SortField};
pub use pagination::apply_pagination;
pub use sort::apply_sort;
