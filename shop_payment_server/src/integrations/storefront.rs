use std::sync::Arc;

use futures::future::BoxFuture;
use log::*;
use reqwest::Client;
use serde_json::json;
use shop_payment_engine::events::{EventHandlers, EventHooks};
use thiserror::Error;

pub const CART_EVENT_BUFFER_SIZE: usize = 25;

#[derive(Debug, Error)]
pub enum StorefrontApiError {
    #[error("Could not initialize storefront client: {0}")]
    Initialization(String),
    #[error("Cart-clear request failed: {0}")]
    RequestError(String),
    #[error("Cart-clear request was rejected. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}

/// The storefront's side of the order lifecycle: once an order is paid, the customer's shopping cart is cleared
/// so a page refresh does not offer the same purchase again.
pub trait ShoppingCart: Clone + Send + Sync + 'static {
    fn clear_cart(&self, customer_id: String) -> BoxFuture<'static, Result<(), StorefrontApiError>>;
}

/// Clears carts by POSTing to the storefront's cart-clear endpoint.
#[derive(Clone)]
pub struct StorefrontApi {
    cart_clear_url: String,
    client: Arc<Client>,
}

impl StorefrontApi {
    pub fn new(cart_clear_url: String) -> Result<Self, StorefrontApiError> {
        let client = Client::builder().build().map_err(|e| StorefrontApiError::Initialization(e.to_string()))?;
        Ok(Self { cart_clear_url, client: Arc::new(client) })
    }
}

impl ShoppingCart for StorefrontApi {
    fn clear_cart(&self, customer_id: String) -> BoxFuture<'static, Result<(), StorefrontApiError>> {
        let client = Arc::clone(&self.client);
        let url = self.cart_clear_url.clone();
        Box::pin(async move {
            let response = client
                .post(&url)
                .json(&json!({ "customer_id": customer_id }))
                .send()
                .await
                .map_err(|e| StorefrontApiError::RequestError(e.to_string()))?;
            if response.status().is_success() {
                Ok(())
            } else {
                let status = response.status().as_u16();
                let message = response.text().await.unwrap_or_default();
                Err(StorefrontApiError::QueryError { status, message })
            }
        })
    }
}

/// Assigns event handlers for storefront side effects.
///
/// Only the order-paid event triggers a storefront call: the customer's cart is cleared. Because the engine
/// publishes the event exactly once per order, the cart is cleared exactly once no matter how many duplicate
/// notifications the gateway delivers. Failed orders leave the cart alone so the customer can retry the
/// purchase.
pub fn create_cart_event_handlers<C: ShoppingCart>(cart: C) -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_order_paid(move |ev| {
        let order = ev.order;
        let cart = cart.clone();
        Box::pin(async move {
            match cart.clear_cart(order.customer_id.clone()).await {
                Ok(()) => info!("🛒️ Cart cleared for customer {} after order #{} was paid.", order.customer_id, order.id),
                Err(e) => error!("🛒️ Could not clear cart for customer {}. {e}", order.customer_id),
            }
        })
    });
    hooks.on_order_failed(|ev| {
        let order = ev.order;
        Box::pin(async move {
            info!("🛒️ Order #{} failed. Leaving customer {}'s cart untouched.", order.id, order.customer_id);
        })
    });
    EventHandlers::new(CART_EVENT_BUFFER_SIZE, hooks)
}

#[cfg(test)]
mod test {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use futures::future::BoxFuture;
    use shop_payment_engine::{
        db_types::{NewOrder, Order, OrderStatusType},
        events::OrderPaidEvent,
    };

    use super::{create_cart_event_handlers, ShoppingCart, StorefrontApiError};

    #[derive(Clone, Default)]
    struct CountingCart {
        calls: Arc<AtomicUsize>,
    }

    impl ShoppingCart for CountingCart {
        fn clear_cart(&self, _customer_id: String) -> BoxFuture<'static, Result<(), StorefrontApiError>> {
            let calls = Arc::clone(&self.calls);
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        }
    }

    fn paid_order() -> Order {
        let new_order = NewOrder::new("cust-1", "250.00".parse().unwrap());
        Order {
            id: 1,
            customer_id: new_order.customer_id,
            remote_order_id: None,
            total_price: new_order.total_price,
            currency: new_order.currency,
            transaction_id: Some("pay_1".to_string()),
            status: OrderStatusType::Paid,
            created_at: new_order.created_at,
            updated_at: new_order.created_at,
        }
    }

    #[tokio::test]
    async fn paid_events_clear_the_cart() {
        let cart = CountingCart::default();
        let calls = Arc::clone(&cart.calls);
        let handlers = create_cart_event_handlers(cart);
        let producers = handlers.producers();
        handlers.start_handlers().await;

        for emitter in &producers.order_paid_producer {
            emitter.publish_event(OrderPaidEvent::new(paid_order())).await;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
