//! Visibility rule set: per-driver `value → ActionSet` tables.
//!
//! `RuleSet::build` is the only way to get a rule set, and it validates the
//! whole table against the field registry up front so that a bad table
//! fails at startup instead of on a change event.

pub mod definitions;
pub mod graph;
pub mod table;
pub mod types;

use std::collections::{BTreeSet, HashMap};

use crate::error::FormError;
use crate::registry::FieldRegistry;

pub use definitions::RuleDefinitions;
pub use graph::DependencyGraph;
pub use types::{ActionSet, Branch, DriverRules, ResolvedActions, Rule};

/// Validated rules for every driver of a form.
#[derive(Debug, Clone)]
pub struct RuleSet {
    drivers: Vec<DriverRules>,
    index: HashMap<String, usize>,
    graph: DependencyGraph,
    /// Resolved actions per driver: one entry per rule, then `else`.
    resolved: Vec<Vec<ResolvedActions>>,
}

impl RuleSet {
    /// Validate driver tables against the registry and resolve subtrees.
    pub fn build(registry: &FieldRegistry, drivers: Vec<DriverRules>) -> Result<Self, FormError> {
        let mut index = HashMap::new();
        for (i, driver) in drivers.iter().enumerate() {
            let descriptor = registry.get(&driver.driver)?;
            if index.insert(driver.driver.clone(), i).is_some() {
                return Err(FormError::DuplicateField(driver.driver.clone()));
            }

            let mut seen_values = BTreeSet::new();
            for rule in &driver.rules {
                if !descriptor.accepts(&rule.value) {
                    return Err(FormError::InvalidOption {
                        field: driver.driver.clone(),
                        value: rule.value.clone(),
                    });
                }
                if !seen_values.insert(rule.value.as_str()) {
                    tracing::warn!(
                        driver = %driver.driver,
                        value = %rule.value,
                        "Duplicate rule value, only the first entry is reachable"
                    );
                }
            }

            for (branch, actions) in driver.branches() {
                check_actions(registry, &driver.driver, &branch, actions)?;
            }
        }

        let graph = DependencyGraph::from_drivers(&drivers)?;

        let mut resolved = Vec::with_capacity(drivers.len());
        for driver in &drivers {
            let mut per_branch = Vec::new();
            for (branch, actions) in driver.branches() {
                let r = resolve(&graph, actions);
                if let Some(field) = r.show.iter().find(|f| r.cleared.contains(*f)) {
                    return Err(FormError::ConflictingActions {
                        driver: driver.driver.clone(),
                        branch: branch.to_string(),
                        field: field.clone(),
                    });
                }
                per_branch.push(r);
            }
            resolved.push(per_branch);
        }

        tracing::debug!(
            drivers = drivers.len(),
            depth = graph.depth(),
            "Rule set built"
        );

        Ok(Self {
            drivers,
            index,
            graph,
            resolved,
        })
    }

    pub fn for_driver(&self, driver: &str) -> Result<&DriverRules, FormError> {
        self.index
            .get(driver)
            .map(|&i| &self.drivers[i])
            .ok_or_else(|| FormError::MissingRuleSet(driver.to_string()))
    }

    pub fn is_driver(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Pick the branch for `value` and return its resolved actions.
    pub fn select(&self, driver: &str, value: &str) -> Result<(Branch, &ResolvedActions), FormError> {
        let i = *self
            .index
            .get(driver)
            .ok_or_else(|| FormError::MissingRuleSet(driver.to_string()))?;
        let rules = &self.drivers[i];
        let slot = rules
            .rules
            .iter()
            .position(|r| r.value == value)
            .unwrap_or(rules.rules.len());
        let branch = match rules.rules.get(slot) {
            Some(rule) => Branch::Value(rule.value.clone()),
            None => Branch::Else,
        };
        Ok((branch, &self.resolved[i][slot]))
    }

    /// Drivers in evaluation order (ancestors first).
    pub fn driver_order(&self) -> Vec<String> {
        self.graph.driver_order()
    }

    pub fn drivers(&self) -> impl Iterator<Item = &DriverRules> {
        self.drivers.iter()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Reference rule set for the call-log entry form.
    pub fn call_log_entry(registry: &FieldRegistry) -> Result<Self, FormError> {
        Self::build(registry, table::call_log_entry_rules())
    }
}

/// Per-rule checks that do not need the graph.
fn check_actions(
    registry: &FieldRegistry,
    driver: &str,
    branch: &Branch,
    actions: &ActionSet,
) -> Result<(), FormError> {
    for field in actions.fields() {
        registry.get(field)?;
    }

    let shown = |f: &str| actions.show.iter().any(|s| s == f);

    if let Some(field) = actions.hidden().find(|&f| shown(f)) {
        return Err(FormError::ConflictingActions {
            driver: driver.to_string(),
            branch: branch.to_string(),
            field: field.to_string(),
        });
    }
    if let Some(field) = actions.require.iter().find(|f| !shown(f.as_str())) {
        return Err(FormError::RequireWithoutShow {
            driver: driver.to_string(),
            branch: branch.to_string(),
            field: field.clone(),
        });
    }
    for (field, value) in &actions.preset {
        if !shown(field.as_str()) {
            return Err(FormError::PresetWithoutShow {
                driver: driver.to_string(),
                branch: branch.to_string(),
                field: field.clone(),
            });
        }
        if !registry.get(field)?.accepts(value) {
            return Err(FormError::InvalidOption {
                field: field.clone(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

/// Expand hidden fields to their subtrees.
fn resolve(graph: &DependencyGraph, actions: &ActionSet) -> ResolvedActions {
    let mut cleared: Vec<String> = Vec::new();
    for field in actions.hidden() {
        for f in graph.subtree(field) {
            if !cleared.contains(&f) {
                cleared.push(f);
            }
        }
    }
    ResolvedActions {
        show: actions.show.clone(),
        require: actions.require.clone(),
        preset: actions.preset.clone(),
        cleared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_registry() -> FieldRegistry {
        FieldRegistry::call_log_entry().unwrap()
    }

    #[test]
    fn reference_table_builds() {
        let rules = RuleSet::call_log_entry(&make_registry()).unwrap();
        assert_eq!(
            rules.driver_order(),
            vec!["contact_type", "appt", "appt_location", "appt_reason_unwilling"]
        );
        assert_eq!(rules.graph().depth(), 3);
    }

    #[test]
    fn for_driver_unknown_is_missing_rule_set() {
        let rules = RuleSet::call_log_entry(&make_registry()).unwrap();
        assert_eq!(
            rules.for_driver("may_call").unwrap_err(),
            FormError::MissingRuleSet("may_call".into())
        );
    }

    #[test]
    fn indirect_clears_whole_appt_subtree() {
        let rules = RuleSet::call_log_entry(&make_registry()).unwrap();
        let (branch, actions) = rules.select("contact_type", "indirect").unwrap();
        assert_eq!(branch, Branch::Value("indirect".into()));
        for f in [
            "appt",
            "appt_date",
            "appt_grading",
            "appt_location",
            "appt_location_other",
            "appt_reason_unwilling",
            "appt_reason_unwilling_other",
        ] {
            assert!(actions.cleared.iter().any(|c| c == f), "{f} not cleared");
        }
    }

    #[test]
    fn unknown_value_selects_else() {
        let rules = RuleSet::call_log_entry(&make_registry()).unwrap();
        let (branch, _) = rules.select("appt", "Maybe").unwrap();
        assert_eq!(branch, Branch::Else);
    }

    #[test]
    fn show_and_hide_disjoint_for_every_rule() {
        let rules = RuleSet::call_log_entry(&make_registry()).unwrap();
        for driver in rules.drivers() {
            for (_, actions) in driver.branches() {
                for f in actions.hidden() {
                    assert!(!actions.show.iter().any(|s| s == f));
                }
            }
        }
    }

    #[test]
    fn unregistered_field_rejected() {
        let drivers = vec![DriverRules::new("appt")
            .when("Yes", ActionSet::new().show_required(&["appt_other_location"]))];
        assert_eq!(
            RuleSet::build(&make_registry(), drivers).unwrap_err(),
            FormError::UnknownField("appt_other_location".into())
        );
    }

    #[test]
    fn unregistered_driver_rejected() {
        let drivers = vec![DriverRules::new("call_reason")];
        assert_eq!(
            RuleSet::build(&make_registry(), drivers).unwrap_err(),
            FormError::UnknownField("call_reason".into())
        );
    }

    #[test]
    fn show_hide_conflict_rejected() {
        let drivers = vec![DriverRules::new("appt").when(
            "Yes",
            ActionSet::new()
                .show_required(&["appt_date"])
                .clear(&["appt_date"]),
        )];
        assert!(matches!(
            RuleSet::build(&make_registry(), drivers),
            Err(FormError::ConflictingActions { .. })
        ));
    }

    #[test]
    fn conflict_through_subtree_rejected() {
        // Showing a child while hiding its parent.
        let drivers = vec![
            DriverRules::new("contact_type").when(
                "direct",
                ActionSet::new()
                    .show_required(&["appt_date"])
                    .clear(&["appt"]),
            ),
            DriverRules::new("appt").when("Yes", ActionSet::new().show_required(&["appt_date"])),
        ];
        let err = RuleSet::build(&make_registry(), drivers).unwrap_err();
        assert_eq!(
            err,
            FormError::ConflictingActions {
                driver: "contact_type".into(),
                branch: "\"direct\"".into(),
                field: "appt_date".into(),
            }
        );
    }

    #[test]
    fn require_without_show_rejected() {
        let mut actions = ActionSet::new();
        actions.require.push("appt_date".into());
        let drivers = vec![DriverRules::new("appt").when("Yes", actions)];
        assert!(matches!(
            RuleSet::build(&make_registry(), drivers),
            Err(FormError::RequireWithoutShow { .. })
        ));
    }

    #[test]
    fn preset_without_show_rejected() {
        let drivers = vec![DriverRules::new("contact_type")
            .when("direct", ActionSet::new().preset("may_call", "Yes"))];
        assert!(matches!(
            RuleSet::build(&make_registry(), drivers),
            Err(FormError::PresetWithoutShow { .. })
        ));
    }

    #[test]
    fn preset_must_be_an_option() {
        let drivers = vec![DriverRules::new("contact_type").when(
            "direct",
            ActionSet::new()
                .show_required(&["may_call"])
                .preset("may_call", "Sometimes"),
        )];
        assert_eq!(
            RuleSet::build(&make_registry(), drivers).unwrap_err(),
            FormError::InvalidOption {
                field: "may_call".into(),
                value: "Sometimes".into(),
            }
        );
    }

    #[test]
    fn match_value_must_be_an_option() {
        let drivers = vec![DriverRules::new("appt").when("yes", ActionSet::new())];
        assert_eq!(
            RuleSet::build(&make_registry(), drivers).unwrap_err(),
            FormError::InvalidOption {
                field: "appt".into(),
                value: "yes".into(),
            }
        );
    }

    #[test]
    fn duplicate_driver_rejected() {
        let drivers = vec![DriverRules::new("appt"), DriverRules::new("appt")];
        assert_eq!(
            RuleSet::build(&make_registry(), drivers).unwrap_err(),
            FormError::DuplicateField("appt".into())
        );
    }
}
