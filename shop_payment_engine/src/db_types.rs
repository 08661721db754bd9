use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use spg_common::{Rupees, INR_CURRENCY_CODE};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------    RemoteOrderId    ---------------------------------------------------------
/// The order reference known to the payment gateway, as opposed to the internal order id.
///
/// The gateway echoes this reference back in every notification, so it is the preferred correlation key. It is
/// assigned exactly once, by the order-creation client, and is absent until the outbound call has succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct RemoteOrderId(pub String);

impl FromStr for RemoteOrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for RemoteOrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for RemoteOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RemoteOrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order is newly created and the payment outcome is not yet known.
    Pending,
    /// The payment was confirmed by the gateway. Terminal.
    Paid,
    /// The payment failed at the gateway. Terminal.
    Failed,
}

impl OrderStatusType {
    /// Terminal statuses are permanent for the lifetime of the record. Every transition out of a terminal status
    /// is a no-op.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatusType::Paid | OrderStatusType::Failed)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::Paid => write!(f, "Paid"),
            OrderStatusType::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatusType::Pending
        })
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: String,
    pub remote_order_id: Option<RemoteOrderId>,
    pub total_price: Rupees,
    pub currency: String,
    /// The gateway's settlement identifier. Set exactly once, together with the terminal transition.
    pub transaction_id: Option<String>,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    /// The storefront's customer identifier
    pub customer_id: String,
    /// The total price of the order
    pub total_price: Rupees,
    /// The currency of the order
    pub currency: String,
    /// The time the order was placed
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new<S: Into<String>>(customer_id: S, total_price: Rupees) -> Self {
        Self {
            customer_id: customer_id.into(),
            total_price,
            currency: INR_CURRENCY_CODE.to_string(),
            created_at: Utc::now(),
        }
    }
}

//--------------------------------------   PaymentOutcome    ---------------------------------------------------------
/// The canonical outcome of an inbound notification, produced by the event classifier
/// ([`crate::helpers::classify_event`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentOutcome {
    /// The payment settled successfully.
    Confirmed,
    /// The payment failed.
    Failed,
    /// Anything else, including test pings and unknown event types. Must still be acknowledged to the sender.
    Ignored,
}

impl Display for PaymentOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentOutcome::Confirmed => write!(f, "Confirmed"),
            PaymentOutcome::Failed => write!(f, "Failed"),
            PaymentOutcome::Ignored => write!(f, "Ignored"),
        }
    }
}

//--------------------------------------  SettlementUpdate   ---------------------------------------------------------
/// An authenticated, parsed and classified notification, ready to be applied to an order.
#[derive(Debug, Clone)]
pub struct SettlementUpdate {
    /// The order reference the gateway reported. Format is not guaranteed; see
    /// [`crate::spe_api::CorrelationMode`].
    pub remote_reference: String,
    pub outcome: PaymentOutcome,
    /// The gateway's settlement identifier for this payment.
    pub payment_id: String,
}

impl SettlementUpdate {
    pub fn new<S1: Into<String>, S2: Into<String>>(remote_reference: S1, outcome: PaymentOutcome, payment_id: S2) -> Self {
        Self { remote_reference: remote_reference.into(), outcome, payment_id: payment_id.into() }
    }
}
