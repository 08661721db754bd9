use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_payment_engine::db_types::Order;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// The body of `POST /api/checkout`. The price is a decimal string ("500.00") to keep floating point out of the
/// money path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub total_price: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order_id: i64,
    pub remote_order_id: String,
    pub payment_session_id: String,
    pub payment_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusResponse {
    pub order_id: i64,
    pub remote_order_id: Option<String>,
    pub status: String,
    pub transaction_id: Option<String>,
    pub total_price: String,
    pub currency: String,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderStatusResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            remote_order_id: order.remote_order_id.map(|id| id.to_string()),
            status: order.status.to_string(),
            transaction_id: order.transaction_id,
            total_price: format!("{:.2}", order.total_price.to_decimal()),
            currency: order.currency,
            updated_at: order.updated_at,
        }
    }
}
