//! OMRC Enrollment WASM
//!
//! Browser entry points for the enrollment site. Mounts the `omrc-ui`
//! components on the live document and exposes the field validators to
//! JavaScript so page scripts can reuse them.

use std::cell::RefCell;

use omrc_ui::{Site, SiteConfig};
use omrc_ui::validation;
use wasm_bindgen::prelude::*;

mod logging;
mod web_dom;

pub use web_dom::WebDom;

thread_local! {
    static SITE: RefCell<Option<Site<WebDom>>> = RefCell::new(None);
}

/// Install the panic hook and logger, then mount with the default config
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init(tracing::Level::INFO);

    if let Err(e) = mount_with(SiteConfig::default()) {
        tracing::warn!("site not mounted: {}", web_dom::describe_js(&e));
    }
}

/// Remount the site with a configuration object.
///
/// `config` uses the same snake_case keys as the TOML file; omitted
/// sections keep their defaults. `undefined` or `null` mounts the defaults.
#[wasm_bindgen]
pub fn mount(config: JsValue) -> Result<(), JsValue> {
    let config = if config.is_undefined() || config.is_null() {
        SiteConfig::default()
    } else {
        serde_wasm_bindgen::from_value::<SiteConfig>(config)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
    };
    config
        .check()
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
    mount_with(config)
}

/// Detach every listener and remove any open confirmation overlay
#[wasm_bindgen]
pub fn unmount() {
    // Take first so the site drops outside the borrow
    let site = SITE.with(|slot| slot.borrow_mut().take());
    drop(site);
}

/// Report from the most recent submit attempt, or `null`
#[wasm_bindgen(js_name = lastReport)]
pub fn last_report() -> Result<JsValue, JsValue> {
    let report = SITE.with(|slot| {
        slot.borrow()
            .as_ref()
            .and_then(|site| site.submission())
            .and_then(|flow| flow.last_report())
    });
    match report {
        Some(report) => Ok(serde_wasm_bindgen::to_value(&report)?),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen(js_name = isValidEmail)]
pub fn is_valid_email(value: &str) -> bool {
    validation::is_valid_email(value)
}

/// Accepts `0XXXXXXXXX` or `27XXXXXXXXX` after stripping spaces, `-` and `+`
#[wasm_bindgen(js_name = isValidPhone)]
pub fn is_valid_phone(value: &str) -> bool {
    validation::is_valid_phone(value)
}

/// 13-digit national ID or 5-20 character passport number
#[wasm_bindgen(js_name = isValidIdentity)]
pub fn is_valid_identity(value: &str) -> bool {
    validation::is_valid_identity(value)
}

fn mount_with(config: SiteConfig) -> Result<(), JsValue> {
    unmount();
    let dom = WebDom::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let site = Site::mount(dom, &config);
    SITE.with(|slot| *slot.borrow_mut() = Some(site));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_email_export() {
        assert!(is_valid_email("learner@omrc.org.za"));
        assert!(!is_valid_email("learner@omrc"));
        assert!(!is_valid_email("two words@omrc.org"));
    }

    #[wasm_bindgen_test]
    fn test_phone_export() {
        assert!(is_valid_phone("082 123 4567"));
        assert!(is_valid_phone("+27-82-123-4567"));
        assert!(!is_valid_phone("82 123 4567"));
    }

    #[wasm_bindgen_test]
    fn test_identity_export() {
        assert!(is_valid_identity("8001015009087"));
        assert!(is_valid_identity("a1b2c3"));
        assert!(!is_valid_identity("AB-12"));
    }
}
