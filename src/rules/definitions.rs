//! Rule tables authored as JSON.
//!
//! ```json
//! { "drivers": [
//!     { "driver": "appt_location",
//!       "rules": [ { "value": "OTHER",
//!                    "actions": { "show": ["appt_location_other"],
//!                                 "require": ["appt_location_other"] } } ],
//!       "else": { "clear": ["appt_location_other"] } } ] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::registry::FieldRegistry;

use super::types::DriverRules;
use super::RuleSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinitions {
    pub drivers: Vec<DriverRules>,
}

impl RuleDefinitions {
    /// Reference definitions, same content as `RuleSet::call_log_entry`.
    pub fn call_log_entry() -> Self {
        Self {
            drivers: super::table::call_log_entry_rules(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, FormError> {
        serde_json::from_str(json)
            .map_err(|e| FormError::DefinitionParse("rule definitions".into(), e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, FormError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| FormError::DefinitionLoad(path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&json)
            .map_err(|e| FormError::DefinitionParse(path.display().to_string(), e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, FormError> {
        serde_json::to_string_pretty(self).map_err(|e| FormError::Serialization(e.to_string()))
    }

    pub fn into_rule_set(self, registry: &FieldRegistry) -> Result<RuleSet, FormError> {
        RuleSet::build(registry, self.drivers)
    }
}
