//! Form state: the search form's data, its validation rules, and a slot the UI
//! binds its form element into. Rules are stored for an external validation
//! engine and never evaluated here.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event that makes a rule fire in the validation engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Blur,
    Change,
}

/// One trigger or a list of triggers, as the validation engine accepts them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Triggers {
    One(Trigger),
    Many(Vec<Trigger>),
}

/// A single rule descriptor.
///
/// Everything except `trigger` is the engine's constraint definition
/// (`required`, `min`, `pattern`, `message`, ...) and is kept verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Triggers>,
    #[serde(flatten)]
    pub constraint: Map<String, Value>,
}

impl FormRule {
    pub fn new(constraint: Map<String, Value>) -> Self {
        Self {
            trigger: None,
            constraint,
        }
    }

    pub fn with_trigger(mut self, trigger: Triggers) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Whether this rule is configured to fire on `trigger`.
    pub fn triggers_on(&self, trigger: Trigger) -> bool {
        match &self.trigger {
            Some(Triggers::One(t)) => *t == trigger,
            Some(Triggers::Many(ts)) => ts.contains(&trigger),
            None => false,
        }
    }
}

/// Rules for one field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RuleSet {
    One(FormRule),
    Many(Vec<FormRule>),
}

impl RuleSet {
    pub fn as_slice(&self) -> &[FormRule] {
        match self {
            RuleSet::One(rule) => std::slice::from_ref(rule),
            RuleSet::Many(rules) => rules,
        }
    }
}

/// Field name to rules.
pub type ValidationRules = BTreeMap<String, RuleSet>;

/// Slot the UI binds its form element into.
///
/// Clones share the slot. The element type is erased so the core does not
/// depend on any particular widget toolkit.
#[derive(Clone, Default)]
pub struct FormRef {
    slot: Rc<RefCell<Option<Box<dyn Any>>>>,
}

impl FormRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<E: Any>(&self, element: E) {
        *self.slot.borrow_mut() = Some(Box::new(element));
    }

    pub fn unbind(&self) {
        self.slot.borrow_mut().take();
    }

    pub fn is_bound(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Run `f` against the bound element if one of type `E` is bound.
    pub fn with<E: Any, O>(&self, f: impl FnOnce(&E) -> O) -> Option<O> {
        let slot = self.slot.borrow();
        slot.as_ref()
            .and_then(|element| element.downcast_ref::<E>())
            .map(f)
    }
}

impl std::fmt::Debug for FormRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRef")
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Form data, rules, and element slot for one search form.
#[derive(Debug, Clone)]
pub struct FormState<F> {
    initial: F,
    data: F,
    rules: ValidationRules,
    element: FormRef,
}

impl<F: Clone> FormState<F> {
    pub fn new(default_data: F) -> Self {
        Self::with_rules(default_data, ValidationRules::new())
    }

    pub fn with_rules(default_data: F, rules: ValidationRules) -> Self {
        Self {
            initial: default_data.clone(),
            data: default_data,
            rules,
            element: FormRef::new(),
        }
    }

    pub fn data(&self) -> &F {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut F {
        &mut self.data
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Rules for `field`, empty when none are configured.
    pub fn rules_for(&self, field: &str) -> &[FormRule] {
        self.rules
            .get(field)
            .map(RuleSet::as_slice)
            .unwrap_or_default()
    }

    pub fn element(&self) -> &FormRef {
        &self.element
    }

    /// Restore the data given at construction.
    pub fn reset(&mut self) {
        self.data = self.initial.clone();
    }
}
