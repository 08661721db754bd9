use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType, RemoteOrderId},
    traits::PaymentGatewayError,
};

/// Inserts a new order into the database using the given connection. The status starts out as 'Pending' via the
/// column default, and neither the remote reference nor the transaction id is set.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, PaymentGatewayError> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                customer_id,
                total_price,
                currency,
                created_at
            ) VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(order.customer_id)
    .bind(order.total_price.value())
    .bind(order.currency)
    .bind(order.created_at)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order inserted with id {}", order.id);
    Ok(order)
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_by_remote_id(
    remote_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE remote_order_id = $1")
        .bind(remote_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Orders for a customer, oldest first.
pub async fn fetch_orders_for_customer(
    customer_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at ASC")
        .bind(customer_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Assigns the gateway reference to an order, exactly once.
///
/// The conditional `remote_order_id IS NULL` clause makes the assignment a no-overwrite operation even under
/// concurrent callers; the UNIQUE constraint on the column rejects cross-order conflicts.
pub async fn attach_remote_id(
    order_id: i64,
    remote_id: &RemoteOrderId,
    conn: &mut SqliteConnection,
) -> Result<Order, PaymentGatewayError> {
    let updated: Option<Order> = sqlx::query_as(
        "UPDATE orders SET remote_order_id = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 AND remote_order_id IS \
         NULL RETURNING *",
    )
    .bind(remote_id.as_str())
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PaymentGatewayError::RemoteIdConflict(remote_id.clone())
        },
        _ => PaymentGatewayError::from(e),
    })?;
    match updated {
        Some(order) => Ok(order),
        None => match fetch_order_by_id(order_id, conn).await? {
            Some(Order { remote_order_id: Some(existing), .. }) => {
                Err(PaymentGatewayError::RemoteIdAlreadySet { order_id, existing })
            },
            Some(_) => Err(PaymentGatewayError::DatabaseError(format!(
                "Conditional remote id assignment for order #{order_id} matched no row, but the order exists with no \
                 remote id"
            ))),
            None => Err(PaymentGatewayError::OrderIdNotFound(order_id)),
        },
    }
}

/// The compare-and-set at the heart of the reconciliation state machine.
///
/// The `status = 'Pending'` guard means at most one concurrent caller can ever see a row come back: everyone else
/// gets `None` and must treat the settlement as already applied. The transaction id travels in the same statement
/// so it is set exactly once, with the terminal transition.
pub async fn settle_order(
    order_id: i64,
    new_status: OrderStatusType,
    transaction_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, PaymentGatewayError> {
    let status = new_status.to_string();
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET status = $1, transaction_id = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $3 AND status = \
         'Pending' AND transaction_id IS NULL RETURNING *",
    )
    .bind(status)
    .bind(transaction_id)
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    if result.is_none() {
        debug!("📝️ Conditional settle of order #{order_id} matched no row. The order has already left Pending.");
    }
    Ok(result)
}
