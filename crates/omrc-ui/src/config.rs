// File: omrc-ui/src/config.rs
// Purpose: Site configuration (selectors, messages, animation options)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::dom::VisibilityOptions;

/// Everything the components need to find their elements and render
/// feedback. Defaults match the live enrollment site.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SiteConfig {
    #[serde(default)]
    pub nav: NavConfig,

    #[serde(default)]
    pub anchors: AnchorConfig,

    #[serde(default)]
    pub form: FormConfig,

    #[serde(default)]
    pub presenter: PresenterConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub fade_in: FadeInConfig,
}

/// Mobile navigation toggle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavConfig {
    pub toggle_selector: String,
    pub menu_selector: String,
    /// Links inside the menu that close it when clicked
    pub link_selector: String,
    /// Icon bars inside the toggle, in top-to-bottom order
    pub bar_selector: String,
    pub open_class: String,
}

/// In-page anchor smooth scrolling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnchorConfig {
    pub enabled: bool,
    pub link_selector: String,
}

/// Enrollment form element ids and fixed messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormConfig {
    pub form_id: String,
    pub email_id: String,
    pub phone_id: String,
    pub id_number_id: String,
    pub financing_selector: String,
    pub declaration_id: String,
    pub privacy_id: String,
    /// Controls that clear their error while the user types
    pub field_selector: String,
    pub financing_message: String,
    pub declaration_message: String,
    pub privacy_message: String,
}

/// Inline error rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresenterConfig {
    pub marker_class: String,
    pub message_class: String,
    pub error_color: String,
    pub message_font_size: String,
    pub message_margin_top: String,
}

/// Confirmation overlay shown after a successful submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    pub home_url: String,
    pub heading: String,
    pub paragraphs: Vec<String>,
    pub button_label: String,
    pub accent_color: String,
    pub heading_color: String,
    pub text_color: String,
    pub font_family: String,
}

/// Scroll-triggered fade-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FadeInConfig {
    pub enabled: bool,
    pub selector: String,
    pub threshold: f64,
    pub root_margin: String,
    /// Initial downward offset, used in `translateY(..)`
    pub offset: String,
    pub transition: String,
    /// Stop watching an element once it has faded in
    pub once: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            toggle_selector: ".nav-toggle".to_string(),
            menu_selector: ".nav-menu".to_string(),
            link_selector: ".nav-menu a".to_string(),
            bar_selector: "span".to_string(),
            open_class: "active".to_string(),
        }
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            link_selector: r##"a[href^="#"]"##.to_string(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_id: "enrollmentForm".to_string(),
            email_id: "email".to_string(),
            phone_id: "phone".to_string(),
            id_number_id: "idNumber".to_string(),
            financing_selector: r#"input[name="financing"]"#.to_string(),
            declaration_id: "declaration".to_string(),
            privacy_id: "privacy".to_string(),
            field_selector: "input, select, textarea".to_string(),
            financing_message: "Please select at least one financing option".to_string(),
            declaration_message: "You must accept the declaration to proceed".to_string(),
            privacy_message: "You must consent to data processing to proceed".to_string(),
        }
    }
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            marker_class: "error-highlight".to_string(),
            message_class: "error-message".to_string(),
            error_color: "#d32f2f".to_string(),
            message_font_size: "0.85rem".to_string(),
            message_margin_top: "0.25rem".to_string(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            home_url: "index.html".to_string(),
            heading: "Application Submitted!".to_string(),
            paragraphs: vec![
                "Thank you for your application to On The Mountain Revival Centre. \
                 You will receive a confirmation email shortly with next steps."
                    .to_string(),
                "Our admissions team will contact you within 3-5 business days.".to_string(),
            ],
            button_label: "Return to Homepage".to_string(),
            accent_color: "#7AB539".to_string(),
            heading_color: "#1e3a4c".to_string(),
            text_color: "#666".to_string(),
            font_family: "'Montserrat', sans-serif".to_string(),
        }
    }
}

impl Default for FadeInConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".feature-card, .program-card, .form-section".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            offset: "20px".to_string(),
            transition: "opacity 0.6s ease, transform 0.6s ease".to_string(),
            once: true,
        }
    }
}

impl FadeInConfig {
    pub fn visibility_options(&self) -> VisibilityOptions {
        VisibilityOptions {
            threshold: self.threshold,
            root_margin: self.root_margin.clone(),
            once: self.once,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: SiteConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Reject values no browser would accept
    pub fn check(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fade_in.threshold) {
            bail!(
                "fade_in.threshold must be between 0.0 and 1.0, got {}",
                self.fade_in.threshold
            );
        }
        if self.form.form_id.trim().is_empty() {
            bail!("form.form_id must not be empty");
        }
        if self.presenter.marker_class.split_whitespace().count() != 1 {
            bail!(
                "presenter.marker_class must be a single class name, got {:?}",
                self.presenter.marker_class
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.form.form_id, "enrollmentForm");
        assert_eq!(config.form.id_number_id, "idNumber");
        assert_eq!(config.presenter.marker_class, "error-highlight");
        assert_eq!(config.fade_in.threshold, 0.1);
        assert_eq!(config.overlay.home_url, "index.html");
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = SiteConfig::from_toml_str("  \n").unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let toml = r#"
            [overlay]
            home_url = "/"

            [fade_in]
            selector = ".card"
            once = false
        "#;
        let config = SiteConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.overlay.home_url, "/");
        assert_eq!(config.overlay.button_label, "Return to Homepage");
        assert_eq!(config.fade_in.selector, ".card");
        assert!(!config.fade_in.once);
        assert_eq!(config.fade_in.root_margin, "0px 0px -50px 0px");
        assert_eq!(config.nav, NavConfig::default());
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let err = SiteConfig::from_toml_str("[fade_in]\nthreshold = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = SiteConfig::load("does/not/exist/site.toml").unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_visibility_options() {
        let options = FadeInConfig::default().visibility_options();
        assert_eq!(options.threshold, 0.1);
        assert!(options.once);
    }
}
