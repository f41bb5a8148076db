// File: omrc-ui/src/scroll.rs
// Purpose: Smooth in-page anchor scrolling and fade-in on visibility

use crate::config::{AnchorConfig, FadeInConfig};
use crate::dom::{Dom, EventKind, ScrollAlign, Subscription};
use crate::error::Result;

/// Fragment id an href points at, if it is an in-page link to something
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Attach smooth-scroll handlers to every in-page anchor
pub fn mount_anchors<D: Dom>(dom: &D, config: &AnchorConfig) -> Result<Vec<Subscription>> {
    if !config.enabled {
        return Ok(Vec::new());
    }

    let links = dom.query_all(None, &config.link_selector)?;
    let mut subscriptions = Vec::with_capacity(links.len());
    for link in links {
        let d = dom.clone();
        let anchor = link.clone();
        subscriptions.push(dom.listen(
            &link,
            EventKind::Click,
            Box::new(move |event| {
                let href = d.attribute(&anchor, "href").unwrap_or_default();
                let Some(id) = fragment_target(&href) else {
                    return;
                };
                if let Some(target) = d.element_by_id(id) {
                    event.prevent_default();
                    d.scroll_into_view(&target, ScrollAlign::Start);
                }
            }),
        )?);
    }
    Ok(subscriptions)
}

/// Scroll-triggered fade-in for cards and form sections.
///
/// Elements are hidden and shifted down on mount, then restored the first
/// time they become visible.
pub struct FadeIn;

impl FadeIn {
    /// Returns `None` when disabled or when nothing on the page matches
    pub fn mount<D: Dom>(dom: &D, config: &FadeInConfig) -> Result<Option<Subscription>> {
        if !config.enabled {
            return Ok(None);
        }

        let targets = dom.query_all(None, &config.selector)?;
        if targets.is_empty() {
            return Ok(None);
        }

        let hidden = format!("translateY({})", config.offset);
        for el in &targets {
            dom.set_style(el, "opacity", "0")?;
            dom.set_style(el, "transform", &hidden)?;
            dom.set_style(el, "transition", &config.transition)?;
        }

        let d = dom.clone();
        let subscription = dom.observe_visibility(
            &targets,
            &config.visibility_options(),
            Box::new(move |el| {
                let shown = d
                    .set_style(el, "opacity", "1")
                    .and_then(|_| d.set_style(el, "transform", "translateY(0)"));
                if let Err(e) = shown {
                    tracing::warn!("fade-in failed: {}", e);
                }
            }),
        )?;

        tracing::debug!(elements = targets.len(), "fade-in watcher attached");
        Ok(Some(subscription))
    }
}
