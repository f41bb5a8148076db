// File: omrc-ui/src/realtime.rs
// Purpose: Per-field validation on blur, optimistic clearing on input

use omrc_validation::FieldRule;

use crate::config::FormConfig;
use crate::dom::{Dom, EventKind, Subscription};
use crate::error::Result;
use crate::presenter::ErrorPresenter;

/// Re-check a single field against its own rule.
///
/// Empty values are never flagged; a required-but-empty field is only
/// reported on submit.
pub fn revalidate<D: Dom>(dom: &D, presenter: &ErrorPresenter<D>, field: &D::Node, rule: FieldRule) -> Result<bool> {
    let value = dom.value(field);
    if !value.is_empty() && !rule.check(&value) {
        presenter.highlight(field, Some(rule.blur_message()))?;
        Ok(false)
    } else {
        presenter.clear(field)?;
        Ok(true)
    }
}

/// Attach blur and input listeners inside `form`
pub fn mount<D: Dom>(
    dom: &D,
    form: &D::Node,
    presenter: &ErrorPresenter<D>,
    config: &FormConfig,
) -> Result<Vec<Subscription>> {
    let mut subscriptions = Vec::new();

    let rules = [
        (FieldRule::Email, &config.email_id),
        (FieldRule::Phone, &config.phone_id),
        (FieldRule::Identity, &config.id_number_id),
    ];
    for (rule, id) in rules {
        let Some(field) = dom.element_by_id(id) else {
            continue;
        };
        let d = dom.clone();
        let p = presenter.clone();
        let target = field.clone();
        let name = id.clone();
        subscriptions.push(dom.listen(
            &field,
            EventKind::Blur,
            Box::new(move |_| {
                if let Err(e) = revalidate(&d, &p, &target, rule) {
                    tracing::warn!("blur validation of #{} failed: {}", name, e);
                }
            }),
        )?);
    }

    let fields = dom.query_all(Some(form), &config.field_selector)?;
    for field in &fields {
        let p = presenter.clone();
        let target = field.clone();
        subscriptions.push(dom.listen(
            field,
            EventKind::Input,
            Box::new(move |_| {
                if p.is_marked(&target) {
                    if let Err(e) = p.clear(&target) {
                        tracing::warn!("clearing field error failed: {}", e);
                    }
                }
            }),
        )?);
    }

    tracing::debug!(fields = fields.len(), "real-time validation attached");
    Ok(subscriptions)
}
