//! Email validation

use once_cell::sync::Lazy;
use regex::Regex;

// local@domain.tld, no whitespace (BOM included) and a single '@'
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@\x{FEFF}]+@[^\s@\x{FEFF}]+\.[^\s@\x{FEFF}]+$").unwrap());

/// Validates the `local@domain.tld` shape.
///
/// This is deliberately loose: anything without whitespace that has one `@`
/// and a dot somewhere after it passes. Deliverability is not checked.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}
