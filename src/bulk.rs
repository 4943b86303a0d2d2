//! Bulk actions over an explicit list of order ids.
//!
//! Ids that match no order are ignored by every action.

use crate::formatting::Translator;
use crate::models::{
    DeleteFailure, DeleteSelectedResponse, OrderStatusSummary, StatusSelectedResponse,
    UpdatedOrdersResponse,
};
use crate::projection::status_label;
use crate::repository::{Cascade, DeleteError, OrderRepository};
use sea_orm::DbErr;

const NOT_DELETED_MESSAGE: &str = "Some orders could not be deleted";

/// Delete the selected orders, one transaction per order.
///
/// Cancelled orders are skipped. A foreign key still referencing an order
/// marks it as not deleted and the batch continues.
///
/// # Errors
///
/// Any other database error aborts the remaining batch.
pub async fn delete_selected(
    repository: &dyn OrderRepository,
    translator: &dyn Translator,
    locale: &str,
    order_ids: &[i32],
) -> Result<DeleteSelectedResponse, DbErr> {
    let orders = repository.find_by_ids(order_ids, locale).await?;
    let mut response = DeleteSelectedResponse::default();

    for order in &orders {
        if order.is_cancelled() {
            tracing::debug!(order_id = order.id, "Skipping cancelled order");
            response.not_deleted_orders.push(order.id);
            continue;
        }

        match repository
            .delete_order(order.id, Cascade::for_status(order.status_id))
            .await
        {
            Ok(()) => response.deleted_orders.push(order.id),
            Err(DeleteError::Constraint(message)) => {
                tracing::warn!(order_id = order.id, error = %message, "Order still referenced, not deleted");
                response.not_deleted_orders.push(order.id);
                response.errors.push(DeleteFailure {
                    order_id: order.id,
                    message,
                });
            }
            Err(DeleteError::Database(err)) => return Err(err),
        }
    }

    if !response.not_deleted_orders.is_empty() {
        response.message = Some(translator.translate(NOT_DELETED_MESSAGE, locale));
    }

    tracing::info!(
        deleted = ?response.deleted_orders,
        not_deleted = ?response.not_deleted_orders,
        "Deleted selected orders"
    );
    Ok(response)
}

/// Set `status_id` on every selected order. Any status id is accepted.
///
/// # Errors
///
/// Propagates database errors.
pub async fn change_status_selected(
    repository: &dyn OrderRepository,
    order_ids: &[i32],
    status_id: i32,
) -> Result<UpdatedOrdersResponse, DbErr> {
    let updated_orders = repository.update_status(order_ids, status_id).await?;
    tracing::info!(status_id, updated = ?updated_orders, "Changed status of selected orders");
    Ok(UpdatedOrdersResponse { updated_orders })
}

/// Current localized status of each selected order.
///
/// # Errors
///
/// Propagates database errors.
pub async fn get_status_selected(
    repository: &dyn OrderRepository,
    locale: &str,
    order_ids: &[i32],
) -> Result<StatusSelectedResponse, DbErr> {
    let orders = repository.find_by_ids(order_ids, locale).await?;
    let orders = orders
        .iter()
        .map(|order| {
            let (label, color) = status_label(order);
            OrderStatusSummary {
                order_id: order.id,
                label,
                color,
            }
        })
        .collect();
    Ok(StatusSelectedResponse { orders })
}
