//! Event binder: evaluates every driver on load, then on every change.
//!
//! The binder owns the surface for the page lifetime. Change events are
//! handled one at a time, in the order they are dispatched.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::document::FormSurface;
use crate::error::FormError;
use crate::evaluator::{evaluate, Evaluation};
use crate::registry::FieldRegistry;
use crate::rules::RuleSet;

type Listener = Box<dyn FnMut(&Evaluation)>;

pub struct FormBinder<S: FormSurface> {
    surface: S,
    registry: FieldRegistry,
    rules: RuleSet,
    /// Drivers with a change listener attached.
    bound: BTreeSet<String>,
    listeners: Vec<Listener>,
    session_id: Uuid,
    span: tracing::Span,
}

impl<S: FormSurface> FormBinder<S> {
    /// Check the page, run the initial evaluation and attach listeners.
    pub fn bind(surface: S, registry: FieldRegistry, rules: RuleSet) -> Result<Self, FormError> {
        let session_id = Uuid::new_v4();
        let span = tracing::info_span!("call_form", session = %session_id);
        let _entered = span.clone().entered();

        for field in registry.iter() {
            for id in [&field.container_id, &field.input_id] {
                if !surface.has_element(id) {
                    return Err(FormError::MissingElement(id.clone()));
                }
            }
        }

        let mut binder = Self {
            surface,
            registry,
            rules,
            bound: BTreeSet::new(),
            listeners: Vec::new(),
            session_id,
            span: span.clone(),
        };

        for driver in binder.rules.driver_order() {
            let input_id = binder.registry.get(&driver)?.input_id.clone();
            let value = binder.surface.value(&input_id)?;
            binder.run(&driver, &value)?;
            binder.bound.insert(driver);
        }

        tracing::info!(drivers = binder.bound.len(), "Form bound");
        Ok(binder)
    }

    /// Handle a change event on `field`.
    ///
    /// Non-driver fields just take the value. Hidden fields cannot be
    /// edited, so changes to them are dropped. Returns every evaluation the
    /// change caused, in order.
    pub fn change(&mut self, field: &str, value: &str) -> Result<Vec<Evaluation>, FormError> {
        let _entered = self.span.clone().entered();
        let descriptor = self.registry.get(field)?;
        if !self.surface.is_visible(&descriptor.container_id)? {
            tracing::debug!(field, "Change on hidden field ignored");
            return Ok(Vec::new());
        }
        let input_id = descriptor.input_id.clone();
        self.surface.set_value(&input_id, value)?;

        if !self.bound.contains(field) {
            return Ok(Vec::new());
        }
        tracing::debug!(field, value, "Driver changed");
        self.run(field, value)
    }

    /// Called after every evaluation, initial ones excluded.
    pub fn subscribe(&mut self, listener: impl FnMut(&Evaluation) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Evaluate a driver, then any driver whose value a preset just filled.
    fn run(&mut self, driver: &str, value: &str) -> Result<Vec<Evaluation>, FormError> {
        let mut out = Vec::new();
        let mut pending = vec![(driver.to_string(), value.to_string())];

        while let Some((driver, value)) = pending.pop() {
            let eval = evaluate(&mut self.surface, &self.registry, &self.rules, &driver, &value)?;
            for field in &eval.preset {
                if self.rules.is_driver(field) {
                    let id = &self.registry.get(field)?.input_id;
                    pending.push((field.clone(), self.surface.value(id)?));
                }
            }
            for listener in &mut self.listeners {
                listener(&eval);
            }
            out.push(eval);
        }
        Ok(out)
    }

    pub fn is_bound(&self, driver: &str) -> bool {
        self.bound.contains(driver)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Page teardown.
    pub fn into_surface(self) -> S {
        self.surface
    }
}
