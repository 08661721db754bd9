//! Webhook signature verification.
//!
//! The gateway signs every notification with `base64(HMAC-SHA256(secret, "{timestamp}.{raw body}"))`, where the
//! timestamp is carried in the `x-webhook-timestamp` header and the signature in `x-webhook-signature`.
//!
//! The authentication guarantee only holds if sender and verifier agree byte-for-byte on what was hashed, so the
//! body handed to [`verify_webhook_signature`] must be the exact bytes as received. Whether any whitespace
//! normalisation happens before hashing is controlled by an explicit [`SignaturePolicy`] rather than guessed at:
//! historical deployments of the sender disagreed on this, and a silent mismatch shows up as every webhook being
//! rejected.

use std::str::FromStr;

use hmac::{Hmac, Mac};
use log::warn;
use sha2::Sha256;
use spg_common::Secret;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// How the raw notification body is treated before it is hashed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignaturePolicy {
    /// Hash the body exactly as received. This matches the current sender and is the default.
    #[default]
    Verbatim,
    /// Trim leading and trailing ASCII whitespace before hashing, for senders that normalise the payload
    /// themselves.
    TrimmedBody,
}

impl SignaturePolicy {
    fn payload<'a>(&self, body: &'a [u8]) -> &'a [u8] {
        match self {
            SignaturePolicy::Verbatim => body,
            SignaturePolicy::TrimmedBody => trim_ascii(body),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid signature policy: {0}. Expected 'verbatim' or 'trimmed'.")]
pub struct InvalidSignaturePolicy(String);

impl FromStr for SignaturePolicy {
    type Err = InvalidSignaturePolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbatim" => Ok(Self::Verbatim),
            "trimmed" | "trimmed_body" => Ok(Self::TrimmedBody),
            other => Err(InvalidSignaturePolicy(other.to_string())),
        }
    }
}

/// Checks the signature of an inbound notification.
///
/// Returns `false` on any failure, including internal ones (unusable key, undecodable signature). The sender of a
/// webhook controls every input to this function, so verification must never panic or surface an error to the
/// transport layer. The comparison itself is constant-time, courtesy of [`Mac::verify_slice`]. The secret is never
/// logged.
pub fn verify_webhook_signature(
    policy: SignaturePolicy,
    raw_body: &[u8],
    timestamp: &str,
    signature: &str,
    secret: &Secret<String>,
) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret.reveal().as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            warn!("🔐️ Webhook secret is unusable as an HMAC key: {e}");
            return false;
        },
    };
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(policy.payload(raw_body));
    let provided = match base64::decode(signature.trim()) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    mac.verify_slice(&provided).is_ok()
}

/// Computes the signature the sender would attach to the given payload. Used by tests and by tooling that replays
/// notifications.
pub fn sign_webhook_payload(
    policy: SignaturePolicy,
    raw_body: &[u8],
    timestamp: &str,
    secret: &Secret<String>,
) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.reveal().as_bytes()).ok()?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(policy.payload(raw_body));
    Some(base64::encode(mac.finalize().into_bytes()))
}

fn trim_ascii(body: &[u8]) -> &[u8] {
    let start = body.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(body.len());
    let end = body.iter().rposition(|b| !b.is_ascii_whitespace()).map(|i| i + 1).unwrap_or(start);
    &body[start..end]
}

#[cfg(test)]
mod test {
    use super::*;

    fn secret() -> Secret<String> {
        "cf_webhook_secret_123".into()
    }

    #[test]
    fn round_trip_verifies() {
        let body = br#"{"type":"PAYMENT_SUCCESS_WEBHOOK","data":{}}"#;
        let ts = "1700000000000";
        let sig = sign_webhook_payload(SignaturePolicy::Verbatim, body, ts, &secret()).unwrap();
        assert!(verify_webhook_signature(SignaturePolicy::Verbatim, body, ts, &sig, &secret()));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let body = br#"{"type":"PAYMENT_SUCCESS_WEBHOOK"}"#;
        let ts = "1700000000000";
        let sig = sign_webhook_payload(SignaturePolicy::Verbatim, body, ts, &"another_secret".into()).unwrap();
        assert!(!verify_webhook_signature(SignaturePolicy::Verbatim, body, ts, &sig, &secret()));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let ts = "1700000000000";
        let sig = sign_webhook_payload(SignaturePolicy::Verbatim, br#"{"amount":500}"#, ts, &secret()).unwrap();
        assert!(!verify_webhook_signature(SignaturePolicy::Verbatim, br#"{"amount":501}"#, ts, &sig, &secret()));
    }

    #[test]
    fn tampered_timestamp_is_rejected() {
        let body = br#"{"amount":500}"#;
        let sig = sign_webhook_payload(SignaturePolicy::Verbatim, body, "1700000000000", &secret()).unwrap();
        assert!(!verify_webhook_signature(SignaturePolicy::Verbatim, body, "1700000000001", &sig, &secret()));
    }

    #[test]
    fn garbage_signature_is_rejected_not_an_error() {
        let body = b"{}";
        assert!(!verify_webhook_signature(SignaturePolicy::Verbatim, body, "0", "not-base64!!!", &secret()));
        assert!(!verify_webhook_signature(SignaturePolicy::Verbatim, body, "0", "", &secret()));
    }

    #[test]
    fn trimmed_policy_ignores_surrounding_whitespace() {
        let ts = "1700000000000";
        let sig = sign_webhook_payload(SignaturePolicy::TrimmedBody, b"{\"a\":1}", ts, &secret()).unwrap();
        assert!(verify_webhook_signature(SignaturePolicy::TrimmedBody, b"  {\"a\":1}\n", ts, &sig, &secret()));
        // The verbatim policy must not accept the same padded body
        assert!(!verify_webhook_signature(SignaturePolicy::Verbatim, b"  {\"a\":1}\n", ts, &sig, &secret()));
    }

    #[test]
    fn policy_parsing() {
        assert_eq!("verbatim".parse::<SignaturePolicy>().unwrap(), SignaturePolicy::Verbatim);
        assert_eq!("Trimmed".parse::<SignaturePolicy>().unwrap(), SignaturePolicy::TrimmedBody);
        assert!("mangled".parse::<SignaturePolicy>().is_err());
    }
}
