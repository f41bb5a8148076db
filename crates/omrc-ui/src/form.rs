// File: omrc-ui/src/form.rs
// Purpose: Whole-form validation for the enrollment form

use omrc_validation::{is_blank, FieldRule};
use serde::Serialize;

use crate::config::FormConfig;
use crate::dom::{Dom, ScrollAlign};
use crate::error::Result;
use crate::presenter::ErrorPresenter;

/// Which check produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Check {
    Required,
    Format(FieldRule),
    Financing,
    Declaration,
    Privacy,
}

impl Check {
    /// Whether this failure fails the form
    pub fn blocks_submission(self) -> bool {
        match self {
            Check::Format(rule) => rule.blocks_submission(),
            _ => true,
        }
    }
}

/// One failed check. `field` is the element's id (or name) when it has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub check: Check,
    pub field: Option<String>,
}

/// Outcome of a single validation pass.
///
/// Computed fresh on every submit; never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub failures: Vec<Failure>,
}

impl ValidationReport {
    /// True when no blocking check failed
    pub fn is_valid(&self) -> bool {
        self.failures.iter().all(|f| !f.check.blocks_submission())
    }

    pub fn blocking(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(|f| f.check.blocks_submission())
    }

    /// Failures that were highlighted but do not stop submission
    pub fn advisories(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(|f| !f.check.blocks_submission())
    }

    pub fn has_failure(&self, check: Check) -> bool {
        self.failures.iter().any(|f| f.check == check)
    }

    fn push(&mut self, check: Check, field: Option<String>) {
        self.failures.push(Failure { check, field });
    }
}

/// Runs every enrollment check against the live form
#[derive(Debug, Clone)]
pub struct FormValidator<D: Dom> {
    dom: D,
    form: D::Node,
    config: FormConfig,
    presenter: ErrorPresenter<D>,
}

impl<D: Dom> FormValidator<D> {
    pub fn new(dom: D, form: D::Node, config: FormConfig, presenter: ErrorPresenter<D>) -> Self {
        Self {
            dom,
            form,
            config,
            presenter,
        }
    }

    pub fn form(&self) -> &D::Node {
        &self.form
    }

    pub fn presenter(&self) -> &ErrorPresenter<D> {
        &self.presenter
    }

    /// Element id configured for a single-field rule
    pub fn field_id(&self, rule: FieldRule) -> &str {
        match rule {
            FieldRule::Email => &self.config.email_id,
            FieldRule::Phone => &self.config.phone_id,
            FieldRule::Identity => &self.config.id_number_id,
        }
    }

    /// Validate the whole form, marking and clearing fields as it goes.
    ///
    /// Every check runs; nothing short-circuits. When the result is invalid
    /// the first marked element is scrolled to the centre of the viewport.
    pub fn validate(&self) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        for field in self.dom.query_all(Some(&self.form), "[required]")? {
            if is_blank(&self.dom.value(&field)) {
                self.presenter.highlight(&field, None)?;
                report.push(Check::Required, self.describe(&field));
            } else {
                self.presenter.clear(&field)?;
            }
        }

        for rule in FieldRule::ALL {
            let Some(field) = self.dom.element_by_id(self.field_id(rule)) else {
                continue;
            };
            let value = self.dom.value(&field);
            if value.is_empty() {
                continue;
            }

            if !rule.check(&value) {
                self.presenter.highlight(&field, Some(rule.submit_message()))?;
                report.push(Check::Format(rule), self.describe(&field));
            } else if rule.blocks_submission() {
                self.presenter.clear(&field)?;
            }
        }

        let financing = self.dom.query_all(None, &self.config.financing_selector)?;
        if !financing.iter().any(|cb| self.dom.is_checked(cb)) {
            self.dom.alert(&self.config.financing_message);
            report.push(Check::Financing, None);
        }

        self.check_consent(
            &self.config.declaration_id,
            &self.config.declaration_message,
            Check::Declaration,
            &mut report,
        )?;
        self.check_consent(
            &self.config.privacy_id,
            &self.config.privacy_message,
            Check::Privacy,
            &mut report,
        )?;

        if report.is_valid() {
            tracing::debug!(
                advisories = report.advisories().count(),
                "enrollment form passed validation"
            );
        } else {
            tracing::debug!(
                failures = report.blocking().count(),
                "enrollment form failed validation"
            );
            if let Some(first) = self.presenter.first_marked()? {
                self.dom.scroll_into_view(&first, ScrollAlign::Center);
            }
        }

        Ok(report)
    }

    /// Consent errors go on the checkbox's container (its label)
    fn check_consent(&self, id: &str, message: &str, check: Check, report: &mut ValidationReport) -> Result<()> {
        let Some(checkbox) = self.dom.element_by_id(id) else {
            return Ok(());
        };
        let container = self.dom.parent(&checkbox).unwrap_or_else(|| checkbox.clone());

        if self.dom.is_checked(&checkbox) {
            if self.presenter.is_marked(&container) {
                self.presenter.clear(&container)?;
            }
        } else {
            self.presenter.highlight(&container, Some(message))?;
            report.push(check, Some(id.to_string()));
        }
        Ok(())
    }

    fn describe(&self, field: &D::Node) -> Option<String> {
        self.dom
            .attribute(field, "id")
            .or_else(|| self.dom.attribute(field, "name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_ignores_advisories() {
        let mut report = ValidationReport::default();
        assert!(report.is_valid());

        report.push(Check::Format(FieldRule::Identity), Some("idNumber".into()));
        assert!(report.is_valid());
        assert_eq!(report.advisories().count(), 1);

        report.push(Check::Financing, None);
        assert!(!report.is_valid());
        assert_eq!(report.blocking().count(), 1);
        assert!(report.has_failure(Check::Financing));
    }

    #[test]
    fn test_check_blocking() {
        assert!(Check::Required.blocks_submission());
        assert!(Check::Format(FieldRule::Email).blocks_submission());
        assert!(!Check::Format(FieldRule::Identity).blocks_submission());
        assert!(Check::Privacy.blocks_submission());
    }
}
