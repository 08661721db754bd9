//! A thin client for the Cashfree Payment Gateway REST API.
//!
//! Only the slice of the API the payment server needs is covered: creating an order (which yields the payment
//! session handle the storefront redirects the customer with) and the data objects for the webhook envelope
//! Cashfree posts back. Signature verification of that envelope lives in `shop_payment_engine`; this crate is
//! outbound-only.

mod api;
mod config;
mod data_objects;
mod error;
mod helpers;

pub use api::CashfreeApi;
pub use config::CashfreeConfig;
pub use data_objects::{
    CreateOrderRequest,
    CreateOrderResponse,
    CustomerDetails,
    OrderMeta,
    OrderSession,
    WebhookData,
    WebhookEnvelope,
    WebhookOrder,
    WebhookPayment,
};
pub use error::CashfreeApiError;
pub use helpers::{new_remote_order_id, normalize_phone};
