//! The payment engine public API.
//!
//! [`ReconciliationApi`] is the single entry point for both sides of the order lifecycle: registering new orders
//! (and their gateway references) on the way out, and applying settlement notifications on the way back in.

mod reconciliation_api;

pub use reconciliation_api::{CorrelationMode, ReconciliationApi, SettlementResult};
