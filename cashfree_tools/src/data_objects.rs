use serde::{Deserialize, Serialize};
use serde_json::Value;

//--------------------------------------   Outbound objects  ---------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub customer_phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
}

/// The body of `POST /orders`. Cashfree takes the amount as a decimal number of rupees, not paise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub order_id: String,
    pub order_amount: f64,
    pub order_currency: String,
    pub customer_details: CustomerDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_meta: Option<OrderMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub payment_session_id: Option<String>,
    pub order_status: Option<String>,
}

/// Everything the storefront needs to send the customer off to pay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSession {
    pub remote_order_id: String,
    pub payment_session_id: String,
    pub payment_link: String,
}

//--------------------------------------   Webhook envelope  ---------------------------------------------------------

/// The notification body Cashfree posts to the webhook endpoint.
///
/// Every field is optional. Test pings carry no `data` at all, and the gateway has changed the shape of the
/// payment block across api versions, so deserialization must never be the thing that rejects a notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub order: Option<WebhookOrder>,
    #[serde(default)]
    pub payment: Option<WebhookPayment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookOrder {
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookPayment {
    /// Numeric in some api versions, a string in others.
    #[serde(default)]
    pub cf_payment_id: Option<Value>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

impl WebhookEnvelope {
    pub fn order_id(&self) -> Option<&str> {
        self.data.as_ref()?.order.as_ref()?.order_id.as_deref()
    }

    pub fn payment_status(&self) -> Option<&str> {
        self.data.as_ref()?.payment.as_ref()?.payment_status.as_deref()
    }

    /// The gateway's settlement identifier, whichever field and type it arrived in.
    pub fn payment_id(&self) -> Option<String> {
        let payment = self.data.as_ref()?.payment.as_ref()?;
        if let Some(id) = &payment.payment_id {
            return Some(id.clone());
        }
        match payment.cf_payment_id.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
