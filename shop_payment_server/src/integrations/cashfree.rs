use cashfree_tools::WebhookEnvelope;
use shop_payment_engine::{
    db_types::{PaymentOutcome, SettlementUpdate},
    helpers::classify_event,
};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NotificationConversionError {
    #[error("The notification carries no order reference.")]
    NoOrderReference,
}

/// Converts an authenticated Cashfree webhook envelope into a [`SettlementUpdate`].
///
/// A recognised event type is authoritative for classification. Older protocol versions omit the type or use
/// spellings the classifier does not know, and those envelopes still carry a payment status, so an absent or
/// unrecognised type falls back to classifying `payment_status`. A notification that still classifies as
/// `Ignored` converts successfully (the engine acknowledges it without touching any order); only an actionable
/// notification with no order reference is an error.
pub fn settlement_from_webhook(envelope: &WebhookEnvelope) -> Result<SettlementUpdate, NotificationConversionError> {
    let mut outcome = match envelope.event_type.as_deref() {
        Some(event_type) => classify_event(event_type),
        None => PaymentOutcome::Ignored,
    };
    if outcome == PaymentOutcome::Ignored {
        if let Some(status) = envelope.payment_status() {
            outcome = classify_event(status);
        }
    }
    if outcome == PaymentOutcome::Ignored {
        return Ok(SettlementUpdate::new("", outcome, ""));
    }
    let reference = envelope.order_id().ok_or(NotificationConversionError::NoOrderReference)?;
    let payment_id = envelope.payment_id().unwrap_or_default();
    Ok(SettlementUpdate::new(reference, outcome, payment_id))
}
