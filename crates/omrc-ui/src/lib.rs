// File: omrc-ui/src/lib.rs
// Purpose: Headless interactivity components for the enrollment site

//! # omrc-ui
//!
//! Navigation toggle, smooth anchor scrolling, enrollment form validation
//! with a simulated submission, and scroll-triggered fade-in. Everything is
//! written against the [`Dom`] trait so the same code runs in the browser
//! (see `omrc-wasm`) and in tests on [`MemoryDom`].
//!
//! ## Quick Start
//!
//! ```rust
//! use omrc_ui::{MemoryDom, NavState, Site, SiteConfig};
//!
//! let dom = MemoryDom::new();
//! let body = dom.body_node();
//! let toggle = dom.element(body, "button", &[("class", "nav-toggle")]);
//! dom.element(body, "ul", &[("class", "nav-menu")]);
//!
//! let site = Site::mount(dom.clone(), &SiteConfig::default());
//! dom.click(toggle);
//! assert_eq!(site.nav().map(|n| n.state()), Some(NavState::Open));
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod form;
pub mod nav;
pub mod presenter;
pub mod realtime;
pub mod scroll;
pub mod site;
pub mod submission;

// Re-export main types
pub use config::{AnchorConfig, FadeInConfig, FormConfig, NavConfig, OverlayConfig, PresenterConfig, SiteConfig};
pub use dom::{Dom, DomEvent, EventKind, MemoryDom, NodeId, ScrollAlign, Subscription, VisibilityOptions};
pub use error::DomError;
pub use form::{Check, Failure, FormValidator, ValidationReport};
pub use nav::{NavState, NavToggle};
pub use presenter::ErrorPresenter;
pub use site::Site;
pub use submission::{SubmissionFlow, SubmissionState};

pub use omrc_validation as validation;
