// File: omrc-ui/src/site.rs
// Purpose: Mount every component the page supports

use crate::config::SiteConfig;
use crate::dom::{Dom, Subscription};
use crate::error::Result;
use crate::form::FormValidator;
use crate::nav::NavToggle;
use crate::presenter::ErrorPresenter;
use crate::realtime;
use crate::scroll::{self, FadeIn};
use crate::submission::SubmissionFlow;

/// All mounted behaviour for one page.
///
/// Owns every listener; dropping the site (or calling [`Site::unmount`])
/// detaches them all.
pub struct Site<D: Dom> {
    nav: Option<NavToggle<D>>,
    submission: Option<SubmissionFlow<D>>,
    subscriptions: Vec<Subscription>,
}

impl<D: Dom> Site<D> {
    /// Mount each component whose elements exist.
    ///
    /// A component that fails to mount is logged and skipped; the rest of
    /// the page keeps working.
    pub fn mount(dom: D, config: &SiteConfig) -> Self {
        let mut site = Site {
            nav: None,
            submission: None,
            subscriptions: Vec::new(),
        };

        match Self::mount_nav(&dom, config) {
            Ok(Some((nav, subs))) => {
                site.nav = Some(nav);
                site.subscriptions.extend(subs);
            }
            Ok(None) => tracing::debug!("no navigation toggle on page"),
            Err(e) => tracing::warn!("navigation not mounted: {}", e),
        }

        match scroll::mount_anchors(&dom, &config.anchors) {
            Ok(subs) => site.subscriptions.extend(subs),
            Err(e) => tracing::warn!("anchor scrolling not mounted: {}", e),
        }

        match Self::mount_form(&dom, config) {
            Ok(Some((flow, subs))) => {
                site.submission = Some(flow);
                site.subscriptions.extend(subs);
            }
            Ok(None) => tracing::debug!(form = %config.form.form_id, "no enrollment form on page"),
            Err(e) => tracing::warn!("enrollment form not mounted: {}", e),
        }

        match FadeIn::mount(&dom, &config.fade_in) {
            Ok(sub) => site.subscriptions.extend(sub),
            Err(e) => tracing::warn!("fade-in not mounted: {}", e),
        }

        tracing::info!(
            listeners = site.subscriptions.len(),
            nav = site.nav.is_some(),
            form = site.submission.is_some(),
            "site mounted"
        );
        site
    }

    fn mount_nav(dom: &D, config: &SiteConfig) -> Result<Option<(NavToggle<D>, Vec<Subscription>)>> {
        let Some(nav) = NavToggle::find(dom.clone(), config.nav.clone())? else {
            return Ok(None);
        };
        let subs = nav.mount()?;
        Ok(Some((nav, subs)))
    }

    fn mount_form(dom: &D, config: &SiteConfig) -> Result<Option<(SubmissionFlow<D>, Vec<Subscription>)>> {
        let Some(form) = dom.element_by_id(&config.form.form_id) else {
            return Ok(None);
        };

        let presenter = ErrorPresenter::new(dom.clone(), config.presenter.clone());
        let validator = FormValidator::new(dom.clone(), form.clone(), config.form.clone(), presenter.clone());
        let flow = SubmissionFlow::new(dom.clone(), validator, config.overlay.clone());

        let mut subs = vec![flow.mount()?];
        subs.extend(realtime::mount(dom, &form, &presenter, &config.form)?);
        Ok(Some((flow, subs)))
    }

    pub fn nav(&self) -> Option<&NavToggle<D>> {
        self.nav.as_ref()
    }

    pub fn submission(&self) -> Option<&SubmissionFlow<D>> {
        self.submission.as_ref()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Detach everything now
    pub fn unmount(self) {
        drop(self);
    }
}

impl<D: Dom> Drop for Site<D> {
    fn drop(&mut self) {
        if let Some(flow) = &self.submission {
            flow.discard_overlay();
        }
        let count = self.subscriptions.len();
        self.subscriptions.clear();
        tracing::debug!(listeners = count, "site unmounted");
    }
}
