use thiserror::Error;

/// Errors raised while building or driving the call-log entry form.
///
/// Everything except `InvalidOption` is a configuration error: it surfaces
/// when the registry, rule set or binder is built, never per change event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field registered twice: {0}")]
    DuplicateField(String),

    #[error("Invalid field name: {0}")]
    InvalidFieldName(String),

    #[error("No rule set registered for driver {0}")]
    MissingRuleSet(String),

    #[error("Rule {driver}={branch} both shows and hides {field}")]
    ConflictingActions {
        driver: String,
        branch: String,
        field: String,
    },

    #[error("Rule {driver}={branch} requires {field} without showing it")]
    RequireWithoutShow {
        driver: String,
        branch: String,
        field: String,
    },

    #[error("Rule {driver}={branch} presets {field} without showing it")]
    PresetWithoutShow {
        driver: String,
        branch: String,
        field: String,
    },

    #[error("Dependency cycle through field {0}")]
    DependencyCycle(String),

    #[error("Form element missing from page: {0}")]
    MissingElement(String),

    #[error("Invalid option for {field}: {value}")]
    InvalidOption { field: String, value: String },

    #[error("Rule definitions parse failed ({0}): {1}")]
    DefinitionParse(String, String),

    #[error("Rule definitions load failed ({0}): {1}")]
    DefinitionLoad(String, String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
