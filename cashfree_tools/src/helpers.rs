use chrono::Utc;

/// Derives the gateway-facing order reference from an internal order id.
///
/// The internal id keeps references correlatable; the millisecond suffix keeps them unique across retries, since
/// Cashfree rejects a create-order call that reuses a reference it has already seen.
pub fn new_remote_order_id(internal_id: i64) -> String {
    format!("ORD_{internal_id}_{}", Utc::now().timestamp_millis())
}

/// Cashfree requires a customer phone number and rejects anything that is not 10 digits. Customers frequently
/// have none on file, so fall back to the gateway's documented placeholder.
pub fn normalize_phone(phone: Option<&str>) -> String {
    match phone {
        Some(p) if p.len() == 10 && p.chars().all(|c| c.is_ascii_digit()) => p.to_string(),
        _ => "9999999999".to_string(),
    }
}
