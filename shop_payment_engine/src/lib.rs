//! Shop Payment Engine
//!
//! The engine reconciles asynchronous payment-status notifications from the payment gateway against locally-tracked
//! purchase orders. It is transport-agnostic: the HTTP layer lives in `shop_payment_server`, and the outbound
//! gateway client lives in `cashfree_tools`.
//!
//! The library is divided into three main sections:
//! 1. The core helpers ([`mod@helpers`]): webhook signature verification, event-type classification and
//!    order-reference parsing. These are pure functions with no state.
//! 2. The reconciliation API ([`mod@spe_api`]): correlates notifications to orders and applies idempotent,
//!    race-safe state transitions through a [`PaymentGatewayDatabase`] backend. SQLite is the only backend
//!    currently provided, but any implementation of the traits in [`mod@traits`] will do.
//! 3. Events ([`mod@events`]): a small async pub-sub channel. The engine publishes an event on every
//!    Pending→Paid and Pending→Failed edge, exactly once per order, so that collaborators (like the storefront's
//!    cart-clear endpoint) can react without being part of the transition itself.

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod spe_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use spe_api::{CorrelationMode, ReconciliationApi, SettlementResult};
pub use traits::{OrderManagement, PaymentGatewayDatabase, PaymentGatewayError};
