mod event_classification;
mod order_reference;
mod webhook_signature;

pub use event_classification::classify_event;
pub use order_reference::{extract_internal_id, reference_candidates};
pub use webhook_signature::{sign_webhook_payload, verify_webhook_signature, SignaturePolicy};
