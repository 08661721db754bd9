//! Interface contracts for payment engine backends.
//!
//! The engine never talks to storage directly; everything goes through these traits so the reconciliation logic
//! can be exercised against any backend (or a mock) and so the concurrency contract is explicit:
//!
//! * [`PaymentGatewayDatabase`] carries the write side, most importantly the conditional status transitions. A
//!   backend must implement `settle_order_paid`/`settle_order_failed` as an atomic compare-and-set on the status
//!   column; a read-then-write implementation is a race and will double-fire the order-paid side effects under
//!   concurrent duplicate delivery.
//! * [`OrderManagement`] carries the read side used by correlation and the status endpoints.

mod order_management;
mod payment_gateway_database;

pub use order_management::OrderManagement;
pub use payment_gateway_database::{PaymentGatewayDatabase, PaymentGatewayError};
