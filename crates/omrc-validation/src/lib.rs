//! OMRC Validation
//!
//! Pure field validators for the enrollment form. No DOM access, no side
//! effects: every function here is a predicate over a single string value.
//! Used by the headless components in `omrc-ui` and re-exported to
//! JavaScript by `omrc-wasm`.

pub mod blank;
pub mod email;
pub mod identity;
pub mod phone;
pub mod rule;

// Re-export all validators
pub use blank::*;
pub use email::*;
pub use identity::*;
pub use phone::*;
pub use rule::*;
