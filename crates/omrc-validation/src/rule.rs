//! Named field rules and their user-facing messages

use serde::Serialize;

use crate::{is_valid_email, is_valid_identity, is_valid_phone};

/// A single-field format rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldRule {
    Email,
    Phone,
    Identity,
}

impl FieldRule {
    pub const ALL: [FieldRule; 3] = [FieldRule::Email, FieldRule::Phone, FieldRule::Identity];

    /// Runs the rule against a raw value
    pub fn check(self, value: &str) -> bool {
        match self {
            FieldRule::Email => is_valid_email(value),
            FieldRule::Phone => is_valid_phone(value),
            FieldRule::Identity => is_valid_identity(value),
        }
    }

    /// Message shown when the whole form is validated on submit
    pub fn submit_message(self) -> &'static str {
        match self {
            FieldRule::Email => "Please enter a valid email address",
            FieldRule::Phone => "Please enter a valid South African phone number",
            FieldRule::Identity => "Please enter a valid ID or Passport number",
        }
    }

    /// Message shown when a single field loses focus
    pub fn blur_message(self) -> &'static str {
        match self {
            FieldRule::Email => "Please enter a valid email address",
            FieldRule::Phone => {
                "Please enter a valid South African phone number (e.g., 0821234567 or +27821234567)"
            }
            FieldRule::Identity => "Please enter a valid 13-digit ID number or passport number",
        }
    }

    /// Whether a failure of this rule fails the form as a whole.
    ///
    /// The ID rule only highlights the field; submission still goes ahead.
    pub fn blocks_submission(self) -> bool {
        !matches!(self, FieldRule::Identity)
    }
}
