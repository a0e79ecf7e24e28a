use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Action sets ──────────────────────────────────────────────────────────────

/// What one driver value does to its dependents.
///
/// `hide` and `clear` both end with the field hidden, not required and
/// empty; a hidden field is never left holding a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    #[serde(default)]
    pub show: Vec<String>,
    #[serde(default)]
    pub hide: Vec<String>,
    #[serde(default)]
    pub require: Vec<String>,
    #[serde(default)]
    pub clear: Vec<String>,
    /// Value written into a shown field when it is still empty.
    #[serde(default)]
    pub preset: BTreeMap<String, String>,
}

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show fields and mark them required.
    pub fn show_required(mut self, fields: &[&str]) -> Self {
        for f in fields {
            self.show.push((*f).to_string());
            self.require.push((*f).to_string());
        }
        self
    }

    /// Show fields without marking them required.
    pub fn show_optional(mut self, fields: &[&str]) -> Self {
        self.show.extend(fields.iter().map(|f| (*f).to_string()));
        self
    }

    /// Hide and clear fields (and, once resolved, their subtrees).
    pub fn clear(mut self, fields: &[&str]) -> Self {
        self.clear.extend(fields.iter().map(|f| (*f).to_string()));
        self
    }

    pub fn preset(mut self, field: &str, value: &str) -> Self {
        self.preset.insert(field.to_string(), value.to_string());
        self
    }

    /// Every field named by this action set.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.show
            .iter()
            .chain(&self.hide)
            .chain(&self.require)
            .chain(&self.clear)
            .chain(self.preset.keys())
            .map(String::as_str)
    }

    /// Fields that end up hidden, before subtree expansion.
    pub fn hidden(&self) -> impl Iterator<Item = &str> {
        self.hide.iter().chain(&self.clear).map(String::as_str)
    }
}

// ─── Rules ────────────────────────────────────────────────────────────────────

/// One `value → actions` entry for a driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub value: String,
    pub actions: ActionSet,
}

/// All rules for one driver field. `otherwise` makes the value space total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRules {
    pub driver: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(rename = "else", default)]
    pub otherwise: ActionSet,
}

impl DriverRules {
    pub fn new(driver: &str) -> Self {
        Self {
            driver: driver.to_string(),
            rules: Vec::new(),
            otherwise: ActionSet::new(),
        }
    }

    pub fn when(mut self, value: &str, actions: ActionSet) -> Self {
        self.rules.push(Rule {
            value: value.to_string(),
            actions,
        });
        self
    }

    pub fn otherwise(mut self, actions: ActionSet) -> Self {
        self.otherwise = actions;
        self
    }

    /// First rule whose value matches exactly, else the default branch.
    pub fn select(&self, value: &str) -> (Branch, &ActionSet) {
        self.rules
            .iter()
            .find(|r| r.value == value)
            .map(|r| (Branch::Value(r.value.clone()), &r.actions))
            .unwrap_or((Branch::Else, &self.otherwise))
    }

    /// Every branch with its action set, `else` last.
    pub fn branches(&self) -> impl Iterator<Item = (Branch, &ActionSet)> {
        self.rules
            .iter()
            .map(|r| (Branch::Value(r.value.clone()), &r.actions))
            .chain(std::iter::once((Branch::Else, &self.otherwise)))
    }
}

/// Which branch of a driver's rules was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Value(String),
    Else,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Value(v) => write!(f, "{v:?}"),
            Branch::Else => f.write_str("else"),
        }
    }
}

// ─── Resolved actions ─────────────────────────────────────────────────────────

/// An action set after subtree expansion, ready for the evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedActions {
    pub show: Vec<String>,
    pub require: Vec<String>,
    pub preset: BTreeMap<String, String>,
    /// Hidden + cleared fields, subtrees included, in a stable order.
    pub cleared: Vec<String>,
}

impl ResolvedActions {
    pub fn requires(&self, field: &str) -> bool {
        self.require.iter().any(|f| f == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_location_rules() -> DriverRules {
        DriverRules::new("appt_location")
            .when("OTHER", ActionSet::new().show_required(&["appt_location_other"]))
            .otherwise(ActionSet::new().clear(&["appt_location_other"]))
    }

    #[test]
    fn select_exact_match() {
        let rules = make_location_rules();
        let (branch, actions) = rules.select("OTHER");
        assert_eq!(branch, Branch::Value("OTHER".into()));
        assert_eq!(actions.show, vec!["appt_location_other"]);
    }

    #[test]
    fn select_is_case_sensitive() {
        let rules = make_location_rules();
        let (branch, actions) = rules.select("other");
        assert_eq!(branch, Branch::Else);
        assert_eq!(actions.clear, vec!["appt_location_other"]);
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = DriverRules::new("appt")
            .when("Yes", ActionSet::new().show_required(&["appt_date"]))
            .when("Yes", ActionSet::new().show_required(&["appt_grading"]));
        let (_, actions) = rules.select("Yes");
        assert_eq!(actions.show, vec!["appt_date"]);
    }

    #[test]
    fn branches_end_with_else() {
        let rules = make_location_rules();
        let branches: Vec<Branch> = rules.branches().map(|(b, _)| b).collect();
        assert_eq!(branches, vec![Branch::Value("OTHER".into()), Branch::Else]);
    }

    #[test]
    fn show_required_populates_both_lists() {
        let actions = ActionSet::new().show_required(&["a", "b"]).show_optional(&["c"]);
        assert_eq!(actions.show, vec!["a", "b", "c"]);
        assert_eq!(actions.require, vec!["a", "b"]);
    }

    #[test]
    fn driver_rules_json_uses_else_key() {
        let json = serde_json::to_value(make_location_rules()).unwrap();
        assert!(json.get("else").is_some());
        assert!(json.get("otherwise").is_none());
    }

    #[test]
    fn branch_display() {
        assert_eq!(Branch::Value("Yes".into()).to_string(), "\"Yes\"");
        assert_eq!(Branch::Else.to_string(), "else");
    }
}
