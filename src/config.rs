use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "callform";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix of the wrapper `<div>` the form template renders around each field.
pub const CONTAINER_ID_PREFIX: &str = "div_id_";

/// Prefix of the `<select>` / `<input>` element id.
pub const INPUT_ID_PREFIX: &str = "id_";

/// Environment variable naming an alternate rule table (JSON).
pub const RULES_PATH_ENV: &str = "CALLFORM_RULES";

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "callform_lib=info"
}

/// Container id for a logical field name.
pub fn container_id(name: &str) -> String {
    format!("{CONTAINER_ID_PREFIX}{name}")
}

/// Input id for a logical field name.
pub fn input_id(name: &str) -> String {
    format!("{INPUT_ID_PREFIX}{name}")
}

/// Path of an alternate rule table, if `CALLFORM_RULES` is set and non-empty.
pub fn rules_path_from_env() -> Option<PathBuf> {
    std::env::var_os(RULES_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
