use log::info;

use crate::db_types::PaymentOutcome;

/// Maps a gateway event-type string onto a canonical [`PaymentOutcome`].
///
/// The gateway has gone through several protocol versions and the spelling of event types has drifted with them,
/// so classification is case-insensitive and accepts the whole historical family for each outcome. Anything that
/// is not a recognised success or failure event, including test pings, classifies as `Ignored`. Ignored is not an
/// error: the notification must still be acknowledged so the sender stops redelivering it.
pub fn classify_event(event_type: &str) -> PaymentOutcome {
    match event_type.trim().to_ascii_uppercase().as_str() {
        "PAYMENT_SUCCESS_WEBHOOK" | "PAYMENT_SUCCESS" | "ORDER_PAID" | "SUCCESS" => PaymentOutcome::Confirmed,
        "PAYMENT_FAILED_WEBHOOK" | "PAYMENT_FAILED" | "FAILED" => PaymentOutcome::Failed,
        other => {
            info!("🏷️ Ignoring unhandled webhook event type '{other}'");
            PaymentOutcome::Ignored
        },
    }
}
