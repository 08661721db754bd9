use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, RemoteOrderId},
    traits::OrderManagement,
};

/// The write side of a payment engine backend.
///
/// Backends must provide atomic conditional-update semantics on the order status field. Nothing else in this
/// engine locks: idempotency under concurrent duplicate delivery rests entirely on the settle methods refusing to
/// touch an order that has already left `Pending`.
#[allow(async_fn_in_trait)]
pub trait PaymentGatewayDatabase: Clone + OrderManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Stores a brand-new order with `Pending` status and no remote reference, returning the full record.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, PaymentGatewayError>;

    /// Persists the gateway reference for an order, exactly once.
    ///
    /// The reference is immutable after assignment: a second call for the same order fails with
    /// [`PaymentGatewayError::RemoteIdAlreadySet`], and assigning a reference that is already attached to a
    /// different order fails with [`PaymentGatewayError::RemoteIdConflict`].
    async fn attach_remote_id(&self, order_id: i64, remote_id: &RemoteOrderId) -> Result<Order, PaymentGatewayError>;

    /// Conditionally transitions the order from `Pending` to `Paid`, setting the transaction id in the same
    /// atomic statement.
    ///
    /// Returns the updated record if the transition was applied, or `None` if the order was no longer `Pending`
    /// (the caller lost a race, or this is a duplicate delivery). `None` is not an error.
    async fn settle_order_paid(&self, order_id: i64, transaction_id: &str) -> Result<Option<Order>, PaymentGatewayError>;

    /// Conditionally transitions the order from `Pending` to `Failed`. Same contract as
    /// [`Self::settle_order_paid`].
    async fn settle_order_failed(
        &self,
        order_id: i64,
        transaction_id: &str,
    ) -> Result<Option<Order>, PaymentGatewayError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), PaymentGatewayError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("The requested order (internal id {0}) does not exist")]
    OrderIdNotFound(i64),
    #[error("Order #{order_id} already has remote reference {existing}, which is immutable once assigned")]
    RemoteIdAlreadySet { order_id: i64, existing: RemoteOrderId },
    #[error("Remote reference {0} is already attached to a different order")]
    RemoteIdConflict(RemoteOrderId),
}

impl From<sqlx::Error> for PaymentGatewayError {
    fn from(e: sqlx::Error) -> Self {
        PaymentGatewayError::DatabaseError(e.to_string())
    }
}
