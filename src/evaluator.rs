//! Rule evaluator: driver value → applied visibility/required/value state.

use serde::Serialize;

use crate::document::FormSurface;
use crate::error::FormError;
use crate::registry::FieldRegistry;
use crate::rules::{Branch, RuleSet};

/// What one evaluation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub driver: String,
    pub value: String,
    pub branch: Branch,
    pub shown: Vec<String>,
    pub cleared: Vec<String>,
    /// Fields whose value was filled by a preset during this evaluation.
    pub preset: Vec<String>,
}

/// Apply the branch of `driver` selected by `value` to the surface.
///
/// Hidden fields are always cleared (value emptied, required dropped).
/// Shown fields keep their value; presets only fill empty inputs.
pub fn evaluate<S: FormSurface + ?Sized>(
    surface: &mut S,
    registry: &FieldRegistry,
    rules: &RuleSet,
    driver: &str,
    value: &str,
) -> Result<Evaluation, FormError> {
    let (branch, actions) = rules.select(driver, value)?;

    for name in &actions.cleared {
        let field = registry.get(name)?;
        surface.set_visible(&field.container_id, false)?;
        surface.set_required(&field.input_id, false)?;
        surface.set_value(&field.input_id, "")?;
    }

    let mut preset = Vec::new();
    for name in &actions.show {
        let field = registry.get(name)?;
        surface.set_visible(&field.container_id, true)?;
        surface.set_required(&field.input_id, actions.requires(name))?;
        if let Some(default) = actions.preset.get(name) {
            if surface.value(&field.input_id)?.is_empty() {
                surface.set_value(&field.input_id, default)?;
                preset.push(name.clone());
            }
        }
    }

    tracing::debug!(
        driver,
        value,
        branch = %branch,
        shown = actions.show.len(),
        cleared = actions.cleared.len(),
        "Rule evaluated"
    );

    Ok(Evaluation {
        driver: driver.to_string(),
        value: value.to_string(),
        branch,
        shown: actions.show.clone(),
        cleared: actions.cleared.clone(),
        preset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FormDocument;
    use crate::models::FieldState;

    struct Fixture {
        registry: FieldRegistry,
        rules: RuleSet,
        doc: FormDocument,
    }

    impl Fixture {
        fn new() -> Self {
            let registry = FieldRegistry::call_log_entry().unwrap();
            let rules = RuleSet::call_log_entry(&registry).unwrap();
            let doc = FormDocument::render(&registry);
            Self { registry, rules, doc }
        }

        fn eval(&mut self, driver: &str, value: &str) -> Evaluation {
            evaluate(&mut self.doc, &self.registry, &self.rules, driver, value).unwrap()
        }

        fn state(&self, name: &str) -> FieldState {
            self.doc.field_state(&self.registry, name).unwrap()
        }

        fn fill(&mut self, name: &str, value: &str) {
            let id = self.registry.get(name).unwrap().input_id.clone();
            self.doc.set_value(&id, value).unwrap();
        }
    }

    #[test]
    fn direct_shows_appt_and_may_call() {
        let mut fx = Fixture::new();
        fx.fill("time_of_week", "weekend");
        let eval = fx.eval("contact_type", "direct");
        assert_eq!(eval.branch, Branch::Value("direct".into()));

        let appt = fx.state("appt");
        assert!(appt.visible && appt.required);
        let may_call = fx.state("may_call");
        assert!(may_call.visible && may_call.required);
        assert_eq!(may_call.value, "Yes");
        assert_eq!(eval.preset, vec!["may_call"]);

        for f in ["time_of_week", "time_of_day"] {
            assert_eq!(fx.state(f), FieldState::default(), "{f}");
        }
    }

    #[test]
    fn preset_does_not_overwrite_choice() {
        let mut fx = Fixture::new();
        fx.fill("may_call", "No");
        let eval = fx.eval("contact_type", "indirect");
        assert_eq!(fx.state("may_call").value, "No");
        assert!(eval.preset.is_empty());
    }

    #[test]
    fn unknown_driver_is_missing_rule_set() {
        let mut fx = Fixture::new();
        let err =
            evaluate(&mut fx.doc, &fx.registry, &fx.rules, "time_of_day", "morning").unwrap_err();
        assert_eq!(err, FormError::MissingRuleSet("time_of_day".into()));
    }

    #[test]
    fn unrecognized_value_falls_through_to_else() {
        let mut fx = Fixture::new();
        let eval = fx.eval("appt_location", "Other");
        assert_eq!(eval.branch, Branch::Else);
        assert!(!fx.state("appt_location_other").visible);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut fx = Fixture::new();
        fx.fill("contact_type", "direct");
        fx.eval("contact_type", "direct");
        fx.fill("appt", "Yes");
        fx.eval("appt", "Yes");
        let first = fx.doc.snapshot(&fx.registry).unwrap();
        fx.eval("appt", "Yes");
        let second = fx.doc.snapshot(&fx.registry).unwrap();
        assert!(first.same_state(&second));
    }

    #[test]
    fn missing_container_surfaces_as_error() {
        let mut fx = Fixture::new();
        fx.doc.remove_element("div_id_appt_location_other");
        let err = evaluate(&mut fx.doc, &fx.registry, &fx.rules, "appt_location", "OTHER")
            .unwrap_err();
        assert_eq!(
            err,
            FormError::MissingElement("div_id_appt_location_other".into())
        );
    }
}
