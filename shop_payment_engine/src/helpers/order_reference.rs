//! Parsing of gateway order references.
//!
//! The reference echoed back by the gateway is not in a fixed format. Across protocol versions it has been
//! observed as a raw numeric internal id (`"42"`), a prefixed string embedding the internal id (`"ORD_42"`), and
//! the prefixed form with one or more trailing `_<digits>` uniqueness tokens appended at order-creation time
//! (`"ORD_42_1700000000000"`). These helpers turn any of those shapes into lookup keys.

use regex::Regex;

/// Returns the exact-match candidates for a reference, most specific first: the reference itself, then the
/// reference with trailing `_<digits>` uniqueness tokens progressively stripped. A candidate is only produced
/// while the remainder still contains a digit, so `"ORD_42"` does not degenerate to `"ORD"`.
pub fn reference_candidates(reference: &str) -> Vec<String> {
    let suffix = Regex::new(r"_\d+$").unwrap();
    let mut candidates = vec![reference.to_string()];
    let mut current = reference.to_string();
    loop {
        let stripped = suffix.replace(&current, "").into_owned();
        if stripped == current || !stripped.bytes().any(|b| b.is_ascii_digit()) {
            break;
        }
        candidates.push(stripped.clone());
        current = stripped;
    }
    candidates
}

/// Extracts the internal order id embedded in a reference: the first run of digits, past any non-numeric prefix.
/// Returns `None` when the reference contains no digits or the run does not fit an `i64`.
pub fn extract_internal_id(reference: &str) -> Option<i64> {
    let digits = Regex::new(r"\d+").unwrap();
    digits.find(reference).and_then(|m| m.as_str().parse::<i64>().ok())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn candidates_for_suffixed_references() {
        assert_eq!(reference_candidates("ORD_42_1700000000000"), vec!["ORD_42_1700000000000", "ORD_42"]);
        assert_eq!(reference_candidates("ORD_42"), vec!["ORD_42"]);
        assert_eq!(reference_candidates("42"), vec!["42"]);
        assert_eq!(reference_candidates("token-xyz"), vec!["token-xyz"]);
    }

    #[test]
    fn embedded_ids() {
        assert_eq!(extract_internal_id("ORD_42_1700000000000"), Some(42));
        assert_eq!(extract_internal_id("ORD_42"), Some(42));
        assert_eq!(extract_internal_id("42"), Some(42));
        assert_eq!(extract_internal_id("no digits here"), None);
        assert_eq!(extract_internal_id("ORD_99999999999999999999999"), None);
    }
}
