use crate::{db_types::Order, traits::PaymentGatewayError};

/// The read side of a payment engine backend: the queries correlation and the status endpoints need.
#[allow(async_fn_in_trait)]
pub trait OrderManagement: Clone {
    /// Fetches an order by its internal id.
    async fn fetch_order_by_id(&self, order_id: i64) -> Result<Option<Order>, PaymentGatewayError>;

    /// Fetches the order holding exactly this gateway reference, if any.
    async fn fetch_order_by_remote_id(&self, remote_id: &str) -> Result<Option<Order>, PaymentGatewayError>;

    /// All orders for a storefront customer, oldest first.
    async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, PaymentGatewayError>;
}
