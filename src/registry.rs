//! Field registry: logical field name → DOM anchor.
//!
//! Built once at startup. Everything downstream (rules, evaluator, binder)
//! resolves fields through the registry instead of touching ids directly.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::FormError;
use crate::models::enums::{ApptGrading, ApptLocation, ContactType, YesNo};
use crate::models::{FieldDescriptor, FieldKind};

static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

/// Registered fields, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors, rejecting bad or duplicate names.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Self, FormError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, descriptor: FieldDescriptor) -> Result<(), FormError> {
        if !FIELD_NAME.is_match(&descriptor.name) {
            return Err(FormError::InvalidFieldName(descriptor.name));
        }
        if self.index.contains_key(&descriptor.name) {
            return Err(FormError::DuplicateField(descriptor.name));
        }
        self.index.insert(descriptor.name.clone(), self.fields.len());
        self.fields.push(descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&FieldDescriptor, FormError> {
        self.index
            .get(name)
            .map(|&i| &self.fields[i])
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields of the call-log entry form.
    pub fn call_log_entry() -> Result<Self, FormError> {
        Self::from_descriptors(vec![
            FieldDescriptor::select("contact_type", ContactType::values()),
            FieldDescriptor::select("time_of_week", vec![]),
            FieldDescriptor::select("time_of_day", vec![]),
            FieldDescriptor::select("appt", YesNo::values()),
            FieldDescriptor::select("appt_reason_unwilling", vec![]),
            FieldDescriptor::new("appt_reason_unwilling_other", FieldKind::Text),
            FieldDescriptor::new("appt_date", FieldKind::Date),
            FieldDescriptor::select("appt_grading", ApptGrading::values()),
            FieldDescriptor::select("appt_location", ApptLocation::values()),
            FieldDescriptor::new("appt_location_other", FieldKind::Text),
            FieldDescriptor::select("may_call", YesNo::values()),
        ])
    }
}
