// File: omrc-ui/src/submission.rs
// Purpose: Submit interception and the confirmation overlay

//! ```text
//! Idle --submit--> Validating --valid--> Submitted --backdrop click--> Idle
//!                       \--invalid--> Idle
//! ```
//!
//! Nothing is sent anywhere: a valid form only shows the confirmation panel.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::OverlayConfig;
use crate::dom::{Dom, DomEvent, EventKind, Subscription};
use crate::error::{DomError, Result};
use crate::form::{FormValidator, ValidationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitted,
}

struct Overlay<D: Dom> {
    backdrop: D::Node,
    panel: D::Node,
    _subscriptions: Vec<Subscription>,
}

struct FlowInner<D: Dom> {
    dom: D,
    validator: FormValidator<D>,
    config: OverlayConfig,
    state: Cell<SubmissionState>,
    overlay: RefCell<Option<Overlay<D>>>,
    last_report: RefCell<Option<ValidationReport>>,
}

/// Handle to the mounted submission flow; clones share state
pub struct SubmissionFlow<D: Dom> {
    inner: Rc<FlowInner<D>>,
}

impl<D: Dom> Clone for SubmissionFlow<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

const BACKDROP_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("right", "0"),
    ("bottom", "0"),
    ("background", "rgba(0,0,0,0.7)"),
    ("display", "flex"),
    ("align-items", "center"),
    ("justify-content", "center"),
    ("z-index", "10000"),
];

const PANEL_STYLE: &[(&str, &str)] = &[
    ("background", "white"),
    ("padding", "3rem"),
    ("border-radius", "12px"),
    ("max-width", "500px"),
    ("text-align", "center"),
    ("box-shadow", "0 10px 40px rgba(0,0,0,0.3)"),
];

impl<D: Dom> SubmissionFlow<D> {
    pub fn new(dom: D, validator: FormValidator<D>, config: OverlayConfig) -> Self {
        Self {
            inner: Rc::new(FlowInner {
                dom,
                validator,
                config,
                state: Cell::new(SubmissionState::Idle),
                overlay: RefCell::new(None),
                last_report: RefCell::new(None),
            }),
        }
    }

    /// Attach the submit listener to the form
    pub fn mount(&self) -> Result<Subscription> {
        let flow = self.clone();
        let form = self.inner.validator.form().clone();
        self.inner
            .dom
            .listen(&form, EventKind::Submit, Box::new(move |event| flow.on_submit(event)))
    }

    pub fn state(&self) -> SubmissionState {
        self.inner.state.get()
    }

    pub fn validator(&self) -> &FormValidator<D> {
        &self.inner.validator
    }

    /// Report from the most recent submit attempt
    pub fn last_report(&self) -> Option<ValidationReport> {
        self.inner.last_report.borrow().clone()
    }

    /// Backdrop and panel of the open overlay
    pub fn overlay(&self) -> Option<(D::Node, D::Node)> {
        self.inner
            .overlay
            .borrow()
            .as_ref()
            .map(|o| (o.backdrop.clone(), o.panel.clone()))
    }

    fn on_submit(&self, event: &DomEvent<D::Node>) {
        event.prevent_default();

        if self.state() == SubmissionState::Submitted {
            tracing::debug!("submit ignored while confirmation is open");
            return;
        }

        self.inner.state.set(SubmissionState::Validating);
        let report = match self.inner.validator.validate() {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("form validation aborted: {}", e);
                self.inner.state.set(SubmissionState::Idle);
                return;
            }
        };

        let valid = report.is_valid();
        *self.inner.last_report.borrow_mut() = Some(report);

        if !valid {
            self.inner.state.set(SubmissionState::Idle);
            return;
        }

        match self.show_overlay() {
            Ok(overlay) => {
                *self.inner.overlay.borrow_mut() = Some(overlay);
                self.inner.state.set(SubmissionState::Submitted);
                tracing::info!("enrollment application accepted");
            }
            Err(e) => {
                tracing::warn!("could not render confirmation overlay: {}", e);
                self.inner.state.set(SubmissionState::Idle);
            }
        }
    }

    fn show_overlay(&self) -> Result<Overlay<D>> {
        let dom = &self.inner.dom;
        let config = &self.inner.config;

        let backdrop = self.styled("div", BACKDROP_STYLE)?;
        let panel = self.styled("div", PANEL_STYLE)?;

        let check = self.styled(
            "div",
            &[
                ("color", config.accent_color.as_str()),
                ("font-size", "4rem"),
                ("margin-bottom", "1rem"),
            ],
        )?;
        dom.set_text(&check, "\u{2713}");
        dom.append_child(&panel, &check)?;

        let heading = self.styled(
            "h2",
            &[
                ("color", config.heading_color.as_str()),
                ("margin-bottom", "1rem"),
                ("font-family", config.font_family.as_str()),
            ],
        )?;
        dom.set_text(&heading, &config.heading);
        dom.append_child(&panel, &heading)?;

        for text in &config.paragraphs {
            let paragraph = self.styled(
                "p",
                &[("color", config.text_color.as_str()), ("margin-bottom", "2rem")],
            )?;
            dom.set_text(&paragraph, text);
            dom.append_child(&panel, &paragraph)?;
        }

        let button = self.styled(
            "button",
            &[
                ("background-color", config.accent_color.as_str()),
                ("color", "white"),
                ("padding", "1rem 2rem"),
                ("border", "none"),
                ("border-radius", "8px"),
                ("font-size", "1rem"),
                ("font-weight", "600"),
                ("cursor", "pointer"),
                ("font-family", config.font_family.as_str()),
            ],
        )?;
        dom.set_attribute(&button, "type", "button")?;
        dom.set_text(&button, &config.button_label);
        dom.append_child(&panel, &button)?;

        dom.append_child(&backdrop, &panel)?;
        let body = dom.body().ok_or(DomError::Detached)?;
        dom.append_child(&body, &backdrop)?;

        let home = config.home_url.clone();
        let nav_dom = dom.clone();
        let on_button = dom.listen(
            &button,
            EventKind::Click,
            Box::new(move |_| {
                if let Err(e) = nav_dom.navigate(&home) {
                    tracing::warn!("navigation to {} failed: {}", home, e);
                }
            }),
        )?;

        let flow = self.clone();
        let on_backdrop = dom.listen(
            &backdrop,
            EventKind::Click,
            Box::new(move |event| flow.on_backdrop_click(event)),
        )?;

        Ok(Overlay {
            backdrop,
            panel,
            _subscriptions: vec![on_button, on_backdrop],
        })
    }

    fn on_backdrop_click(&self, event: &DomEvent<D::Node>) {
        let is_backdrop = self
            .inner
            .overlay
            .borrow()
            .as_ref()
            .map_or(false, |o| o.backdrop == event.target);
        if !is_backdrop {
            return;
        }
        self.close();
    }

    /// Remove the overlay and reset the form
    pub fn close(&self) {
        let Some(overlay) = self.inner.overlay.borrow_mut().take() else {
            return;
        };
        self.inner.dom.remove(&overlay.backdrop);
        if let Err(e) = self.inner.dom.reset_form(self.inner.validator.form()) {
            tracing::warn!("form reset failed: {}", e);
        }
        self.inner.state.set(SubmissionState::Idle);
        tracing::debug!("confirmation closed, form reset");
        drop(overlay);
    }

    /// Remove the overlay without touching the form, used on unmount
    pub fn discard_overlay(&self) {
        if let Some(overlay) = self.inner.overlay.borrow_mut().take() {
            self.inner.dom.remove(&overlay.backdrop);
            self.inner.state.set(SubmissionState::Idle);
        }
    }

    fn styled(&self, tag: &str, styles: &[(&str, &str)]) -> Result<D::Node> {
        let node = self.inner.dom.create_element(tag)?;
        for (property, value) in styles {
            self.inner.dom.set_style(&node, property, value)?;
        }
        Ok(node)
    }
}
