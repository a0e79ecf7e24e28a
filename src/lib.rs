pub mod binder;
pub mod config;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod registry;
pub mod rules;

pub use binder::FormBinder;
pub use document::{FormDocument, FormSnapshot, FormSurface};
pub use error::FormError;
pub use evaluator::{evaluate, Evaluation};
pub use registry::FieldRegistry;
pub use rules::{RuleDefinitions, RuleSet};

use tracing_subscriber::EnvFilter;

/// Install the `tracing` subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Rule set for the call-log entry form: the table named by
/// `CALLFORM_RULES` when set, the built-in table otherwise.
pub fn call_log_rules(registry: &FieldRegistry) -> Result<RuleSet, FormError> {
    match config::rules_path_from_env() {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading rule table");
            RuleDefinitions::load(&path)?.into_rule_set(registry)
        }
        None => RuleSet::call_log_entry(registry),
    }
}

/// Bind the call-log entry form rendered on `surface`.
pub fn bind_call_log_form<S: FormSurface>(surface: S) -> Result<FormBinder<S>, FormError> {
    let registry = FieldRegistry::call_log_entry()?;
    let rules = call_log_rules(&registry)?;
    tracing::info!("{} v{} binding call-log form", config::APP_NAME, config::APP_VERSION);
    FormBinder::bind(surface, registry, rules)
}
