// File: omrc-ui/src/presenter.rs
// Purpose: Inline error marker and message rendering for form fields

use crate::config::PresenterConfig;
use crate::dom::Dom;
use crate::error::Result;

/// Marks fields invalid and renders the message next to them.
///
/// The message element lives in the field's parent, so a parent holds at
/// most one message at a time.
#[derive(Debug, Clone)]
pub struct ErrorPresenter<D: Dom> {
    dom: D,
    config: PresenterConfig,
}

impl<D: Dom> ErrorPresenter<D> {
    pub fn new(dom: D, config: PresenterConfig) -> Self {
        Self { dom, config }
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    /// Mark `field` invalid, replacing any message in its parent
    pub fn highlight(&self, field: &D::Node, message: Option<&str>) -> Result<()> {
        self.dom.add_class(field, &self.config.marker_class)?;
        self.dom
            .set_style(field, "border-color", &self.config.error_color)?;

        let Some(parent) = self.dom.parent(field) else {
            return Ok(());
        };
        self.remove_message(&parent)?;

        if let Some(message) = message {
            let element = self.dom.create_element("div")?;
            self.dom
                .set_attribute(&element, "class", &self.config.message_class)?;
            self.dom
                .set_style(&element, "color", &self.config.error_color)?;
            self.dom
                .set_style(&element, "font-size", &self.config.message_font_size)?;
            self.dom
                .set_style(&element, "margin-top", &self.config.message_margin_top)?;
            self.dom.set_text(&element, message);
            self.dom.append_child(&parent, &element)?;
        }
        Ok(())
    }

    /// Remove the marker, the inline border colour and the message
    pub fn clear(&self, field: &D::Node) -> Result<()> {
        self.dom.remove_class(field, &self.config.marker_class)?;
        self.dom.set_style(field, "border-color", "")?;
        if let Some(parent) = self.dom.parent(field) {
            self.remove_message(&parent)?;
        }
        Ok(())
    }

    pub fn is_marked(&self, field: &D::Node) -> bool {
        self.dom.has_class(field, &self.config.marker_class)
    }

    /// First marked element in document order
    pub fn first_marked(&self) -> Result<Option<D::Node>> {
        self.dom
            .query_first(None, &format!(".{}", self.config.marker_class))
    }

    fn remove_message(&self, parent: &D::Node) -> Result<()> {
        let selector = format!(".{}", self.config.message_class);
        if let Some(existing) = self.dom.query_first(Some(parent), &selector)? {
            self.dom.remove(&existing);
        }
        Ok(())
    }
}
