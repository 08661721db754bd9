use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// Published exactly once per order, on the Pending→Paid edge. Duplicate notification deliveries never produce a
/// second event, because the underlying status transition is a conditional update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPaidEvent {
    pub order: Order,
}

impl OrderPaidEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Published exactly once per order, on the Pending→Failed edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFailedEvent {
    pub order: Order,
}

impl OrderFailedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}
