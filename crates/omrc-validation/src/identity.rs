//! National ID / passport number validation

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::blank::is_form_space;

static NATIONAL_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{13}$").unwrap());

static PASSPORT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i-u)^[A-Z0-9]{5,20}$").unwrap());

/// Which kind of identity document a value looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityKind {
    /// 13-digit South African ID number
    NationalId,
    /// 5-20 alphanumeric characters
    Passport,
}

impl IdentityKind {
    /// Classifies a raw value, or returns `None` when it matches neither shape.
    ///
    /// A 13-digit value is always reported as a national ID even though it
    /// also fits the passport shape.
    ///
    /// # Examples
    /// ```
    /// use omrc_validation::IdentityKind;
    /// assert_eq!(IdentityKind::classify("800101 5009 087"), Some(IdentityKind::NationalId));
    /// assert_eq!(IdentityKind::classify("ab1234"), Some(IdentityKind::Passport));
    /// assert_eq!(IdentityKind::classify("A1"), None);
    /// ```
    pub fn classify(value: &str) -> Option<Self> {
        let cleaned = normalize_identity(value);
        if NATIONAL_ID_REGEX.is_match(&cleaned) {
            Some(IdentityKind::NationalId)
        } else if PASSPORT_REGEX.is_match(&cleaned) {
            Some(IdentityKind::Passport)
        } else {
            None
        }
    }
}

/// Strips whitespace and hyphens from an ID or passport number.
pub fn normalize_identity(id: &str) -> String {
    id.chars()
        .filter(|c| !is_form_space(*c) && *c != '-')
        .collect()
}

/// Validates a national ID number or passport number.
pub fn is_valid_identity(id: &str) -> bool {
    IdentityKind::classify(id).is_some()
}
