use serde::{Deserialize, Serialize};

use crate::config;

/// Control type rendered for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Select,
    Text,
    Date,
}

/// Where a logical field lives in the rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub container_id: String,
    pub input_id: String,
    pub kind: FieldKind,
    /// Enumerated option literals. Empty for free-text controls and for
    /// selects whose choices are not pinned here.
    #[serde(default)]
    pub options: Vec<String>,
}

impl FieldDescriptor {
    /// Descriptor with ids derived from the template naming convention.
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            container_id: config::container_id(name),
            input_id: config::input_id(name),
            kind,
            options: Vec::new(),
        }
    }

    pub fn select(name: &str, options: Vec<String>) -> Self {
        Self {
            options,
            ..Self::new(name, FieldKind::Select)
        }
    }

    /// True when `value` is acceptable for this control.
    /// Empty is always acceptable (the unset option).
    pub fn accepts(&self, value: &str) -> bool {
        value.is_empty() || self.options.is_empty() || self.options.iter().any(|o| o == value)
    }
}

/// Visible/required/value state of one field on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    pub value: String,
    pub visible: bool,
    pub required: bool,
}
