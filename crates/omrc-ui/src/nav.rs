// File: omrc-ui/src/nav.rs
// Purpose: Mobile navigation toggle

use crate::config::NavConfig;
use crate::dom::{Dom, EventKind, Subscription};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Closed,
    Open,
}

/// Bar styles (transform, opacity) for the open "X" icon, top to bottom
const OPEN_BARS: [(&str, &str); 3] = [
    ("rotate(-45deg) translate(-5px, 6px)", "1"),
    ("none", "0"),
    ("rotate(45deg) translate(-5px, -6px)", "1"),
];

// Closed clears the inline styles so the stylesheet's parallel bars apply again
const CLOSED_BARS: [(&str, &str); 3] = [("", ""), ("", ""), ("", "")];

/// The menu's open state lives in its class list; this only reads and
/// writes it.
#[derive(Debug, Clone)]
pub struct NavToggle<D: Dom> {
    dom: D,
    toggle: D::Node,
    menu: D::Node,
    config: NavConfig,
}

impl<D: Dom> NavToggle<D> {
    /// Find the toggle and menu; `None` when either is missing
    pub fn find(dom: D, config: NavConfig) -> Result<Option<Self>> {
        let Some(toggle) = dom.query_first(None, &config.toggle_selector)? else {
            return Ok(None);
        };
        let Some(menu) = dom.query_first(None, &config.menu_selector)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            dom,
            toggle,
            menu,
            config,
        }))
    }

    pub fn toggle_node(&self) -> &D::Node {
        &self.toggle
    }

    pub fn menu_node(&self) -> &D::Node {
        &self.menu
    }

    pub fn state(&self) -> NavState {
        if self.dom.has_class(&self.menu, &self.config.open_class) {
            NavState::Open
        } else {
            NavState::Closed
        }
    }

    pub fn toggle(&self) -> Result<NavState> {
        match self.state() {
            NavState::Open => self.close()?,
            NavState::Closed => self.open()?,
        }
        Ok(self.state())
    }

    pub fn open(&self) -> Result<()> {
        self.dom.add_class(&self.menu, &self.config.open_class)?;
        self.paint_bars(&OPEN_BARS)
    }

    /// Close and reset the icon; safe to call when already closed
    pub fn close(&self) -> Result<()> {
        self.dom.remove_class(&self.menu, &self.config.open_class)?;
        self.paint_bars(&CLOSED_BARS)
    }

    fn paint_bars(&self, styles: &[(&str, &str); 3]) -> Result<()> {
        let bars = self.dom.query_all(Some(&self.toggle), &self.config.bar_selector)?;
        for (bar, (transform, opacity)) in bars.iter().zip(styles.iter()) {
            self.dom.set_style(bar, "transform", transform)?;
            self.dom.set_style(bar, "opacity", opacity)?;
        }
        Ok(())
    }

    /// Attach toggle, outside-click and link listeners
    pub fn mount(&self) -> Result<Vec<Subscription>> {
        let mut subscriptions = Vec::new();

        let nav = self.clone();
        subscriptions.push(self.dom.listen(
            &self.toggle,
            EventKind::Click,
            Box::new(move |_| match nav.toggle() {
                Ok(state) => tracing::debug!(?state, "navigation toggled"),
                Err(e) => tracing::warn!("navigation toggle failed: {}", e),
            }),
        )?);

        let nav = self.clone();
        subscriptions.push(self.dom.listen_document(
            EventKind::Click,
            Box::new(move |event| {
                let inside = nav.dom.contains(&nav.menu, &event.target)
                    || nav.dom.contains(&nav.toggle, &event.target);
                if !inside {
                    if let Err(e) = nav.close() {
                        tracing::warn!("closing navigation failed: {}", e);
                    }
                }
            }),
        )?);

        for link in self.dom.query_all(None, &self.config.link_selector)? {
            let nav = self.clone();
            subscriptions.push(self.dom.listen(
                &link,
                EventKind::Click,
                Box::new(move |_| {
                    if nav.state() == NavState::Open {
                        if let Err(e) = nav.close() {
                            tracing::warn!("closing navigation failed: {}", e);
                        }
                    }
                }),
            )?);
        }

        Ok(subscriptions)
    }
}
