//! South African phone number validation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::blank::is_form_space;

// 0XXXXXXXXX (local) or 27XXXXXXXXX (international, '+' already stripped)
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[0-9]{9}|27[0-9]{9})$").unwrap());

/// Strips whitespace, hyphens and plus signs from a phone number.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !is_form_space(*c) && *c != '-' && *c != '+')
        .collect()
}

/// Validates a South African phone number.
///
/// After normalization the number must be 10 digits starting with `0`
/// or 11 digits starting with `27`.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(&normalize_phone(phone))
}
