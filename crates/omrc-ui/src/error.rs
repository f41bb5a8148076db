// File: omrc-ui/src/error.rs
// Purpose: Errors raised while talking to the DOM

use thiserror::Error;

/// Failure of a DOM operation.
///
/// These are system-level problems (bad selectors, rejected browser calls),
/// never user-input validation failures; those are reported on the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("node is not attached to the document")]
    Detached,

    #[error("element <{tag}> does not support {operation}")]
    Unsupported { tag: String, operation: &'static str },

    #[error("browser call failed: {0}")]
    Js(String),
}

impl DomError {
    pub fn selector(selector: &str, reason: impl Into<String>) -> Self {
        DomError::Selector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomError>;
