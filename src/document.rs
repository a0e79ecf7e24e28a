//! The rendered form, as the rules engine sees it.
//!
//! `FormSurface` is the DOM boundary: containers are shown or hidden,
//! inputs carry a value and a `required` flag. `FormDocument` is the
//! in-memory page used when no browser is attached.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::models::FieldState;
use crate::registry::FieldRegistry;

// ─── Trait ────────────────────────────────────────────────────────────────────

/// Element-level operations on the rendered form, addressed by DOM id.
pub trait FormSurface {
    fn has_element(&self, id: &str) -> bool;

    fn is_visible(&self, container_id: &str) -> Result<bool, FormError>;

    fn value(&self, input_id: &str) -> Result<String, FormError>;

    fn set_value(&mut self, input_id: &str, value: &str) -> Result<(), FormError>;

    fn set_visible(&mut self, container_id: &str, visible: bool) -> Result<(), FormError>;

    fn set_required(&mut self, input_id: &str, required: bool) -> Result<(), FormError>;
}

// ─── In-memory document ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct InputElement {
    value: String,
    required: bool,
}

/// Page state keyed by DOM id.
#[derive(Debug, Clone, Default)]
pub struct FormDocument {
    containers: HashMap<String, bool>,
    inputs: HashMap<String, InputElement>,
}

impl FormDocument {
    /// Fresh page for every registered field: all containers visible,
    /// all inputs empty and optional, as the server renders it.
    pub fn render(registry: &FieldRegistry) -> Self {
        let mut doc = Self::default();
        for field in registry.iter() {
            doc.containers.insert(field.container_id.clone(), true);
            doc.inputs
                .insert(field.input_id.clone(), InputElement::default());
        }
        doc
    }

    /// Rendered page with the initially selected values filled in.
    pub fn with_initial(
        registry: &FieldRegistry,
        initial: &HashMap<String, String>,
    ) -> Result<Self, FormError> {
        let mut doc = Self::render(registry);
        for (name, value) in initial {
            let field = registry.get(name)?;
            doc.set_value(&field.input_id, value)?;
        }
        Ok(doc)
    }

    /// Initial values as a JSON object of field name → value.
    /// `null` is read as the empty option.
    pub fn from_initial_json(registry: &FieldRegistry, json: &str) -> Result<Self, FormError> {
        let raw: HashMap<String, Option<String>> = serde_json::from_str(json)
            .map_err(|e| FormError::DefinitionParse("initial values".into(), e.to_string()))?;
        let initial: HashMap<String, String> = raw
            .into_iter()
            .map(|(k, v)| (k, v.unwrap_or_default()))
            .collect();
        Self::with_initial(registry, &initial)
    }

    /// Drop an element, as a template that forgot to render it would.
    pub fn remove_element(&mut self, id: &str) {
        self.containers.remove(id);
        self.inputs.remove(id);
    }

    pub fn field_state(&self, registry: &FieldRegistry, name: &str) -> Result<FieldState, FormError> {
        let field = registry.get(name)?;
        let visible = *self
            .containers
            .get(&field.container_id)
            .ok_or_else(|| FormError::MissingElement(field.container_id.clone()))?;
        let input = self
            .inputs
            .get(&field.input_id)
            .ok_or_else(|| FormError::MissingElement(field.input_id.clone()))?;
        Ok(FieldState {
            value: input.value.clone(),
            visible,
            required: input.required,
        })
    }

    pub fn snapshot(&self, registry: &FieldRegistry) -> Result<FormSnapshot, FormError> {
        let mut fields = BTreeMap::new();
        for field in registry.iter() {
            fields.insert(field.name.clone(), self.field_state(registry, &field.name)?);
        }
        Ok(FormSnapshot {
            captured_at: Utc::now(),
            fields,
        })
    }
}

impl FormSurface for FormDocument {
    fn has_element(&self, id: &str) -> bool {
        self.containers.contains_key(id) || self.inputs.contains_key(id)
    }

    fn is_visible(&self, container_id: &str) -> Result<bool, FormError> {
        self.containers
            .get(container_id)
            .copied()
            .ok_or_else(|| FormError::MissingElement(container_id.to_string()))
    }

    fn value(&self, input_id: &str) -> Result<String, FormError> {
        self.inputs
            .get(input_id)
            .map(|i| i.value.clone())
            .ok_or_else(|| FormError::MissingElement(input_id.to_string()))
    }

    fn set_value(&mut self, input_id: &str, value: &str) -> Result<(), FormError> {
        let input = self
            .inputs
            .get_mut(input_id)
            .ok_or_else(|| FormError::MissingElement(input_id.to_string()))?;
        input.value = value.to_string();
        Ok(())
    }

    fn set_visible(&mut self, container_id: &str, visible: bool) -> Result<(), FormError> {
        let slot = self
            .containers
            .get_mut(container_id)
            .ok_or_else(|| FormError::MissingElement(container_id.to_string()))?;
        *slot = visible;
        Ok(())
    }

    fn set_required(&mut self, input_id: &str, required: bool) -> Result<(), FormError> {
        let input = self
            .inputs
            .get_mut(input_id)
            .ok_or_else(|| FormError::MissingElement(input_id.to_string()))?;
        input.required = required;
        Ok(())
    }
}

// ─── Snapshot ─────────────────────────────────────────────────────────────────

/// Visible/required/value state of every field at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub captured_at: DateTime<Utc>,
    pub fields: BTreeMap<String, FieldState>,
}

impl FormSnapshot {
    pub fn get(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    pub fn visible_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, s)| s.visible)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Fields that are hidden yet still hold a value. Empty after any evaluation.
    pub fn stale_hidden_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, s)| !s.visible && !s.value.is_empty())
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Same field states, ignoring capture time.
    pub fn same_state(&self, other: &FormSnapshot) -> bool {
        self.fields == other.fields
    }

    pub fn to_json(&self) -> Result<String, FormError> {
        serde_json::to_string(self)
            .map_err(|e| FormError::Serialization(e.to_string()))
    }
}
