//! Condition and effect sets.
//!
//! A [`ConditionSet`] describes what must hold in a state: it is used both for
//! action preconditions and for goal targets. An [`EffectSet`] describes how an
//! action changes a state.
//!
//! Entries are either plain data or a function:
//!
//! - [`Condition::Literal`] compares a fact for equality, [`Condition::Predicate`]
//!   runs an arbitrary test on it.
//! - [`Effect::Set`] replaces a fact, [`Effect::Transform`] computes the new value
//!   from the current one.
//!
//! ```
//! use goapauto::{ConditionSet, EffectSet, Value};
//!
//! let pre = ConditionSet::new()
//!     .with("awake", true)
//!     .with_predicate("energy", |v| v.as_int().map_or(false, |e| e > 0));
//!
//! let eff = EffectSet::new()
//!     .set("tired", true)
//!     .transform("energy", |v| Value::from(v.as_int().unwrap_or(0) - 10));
//!
//! assert_eq!(pre.len(), 2);
//! assert!(eff.is_transform("energy"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::state::validate_fact;
use crate::{GoapError, Result, Value};

/// Shared test function of a [`Condition::Predicate`].
pub type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Shared function of an [`Effect::Transform`].
pub type TransformFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A single test on one fact.
#[derive(Clone)]
pub enum Condition {
    /// The fact must equal this value
    Literal(Value),
    /// The fact must pass this test
    Predicate(PredicateFn),
}

impl Condition {
    /// Runs the test against the current value of a fact.
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Condition::Literal(expected) => expected == value,
            Condition::Predicate(predicate) => predicate(value),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Condition::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Literal(value) => write!(f, "{}", value),
            Condition::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}

/// A mapping from fact names to [`Condition`]s.
///
/// A state satisfies the set when every named fact is present and passes its test.
/// Adding a condition for a name that is already present replaces it.
#[derive(Clone, Debug, Default)]
pub struct ConditionSet {
    conditions: BTreeMap<String, Condition>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality test.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, Condition::Literal(value.into()));
        self
    }

    /// Adds an arbitrary test.
    pub fn with_predicate<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.insert(name, Condition::Predicate(Arc::new(predicate)));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, condition: Condition) {
        self.conditions.insert(name.into(), condition);
    }

    pub fn get(&self, name: &str) -> Option<&Condition> {
        self.conditions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.conditions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Iterates over the conditions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Checks names and literal values.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::Validation` for an empty name or a non-finite literal.
    pub fn validate(&self) -> Result<()> {
        for (name, condition) in &self.conditions {
            match condition {
                Condition::Literal(value) => validate_fact(name, value)?,
                Condition::Predicate(_) => validate_name(name)?,
            }
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for ConditionSet
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, (name, value)| set.with(name, value))
    }
}

impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, condition)) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, condition)?;
        }
        write!(f, "}}")
    }
}

/// A single change to one fact.
#[derive(Clone)]
pub enum Effect {
    /// Replace the fact with this value
    Set(Value),
    /// Compute the new value from the current one
    Transform(TransformFn),
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Set(value) => f.debug_tuple("Set").field(value).finish(),
            Effect::Transform(_) => f.write_str("Transform(<fn>)"),
        }
    }
}

/// A mapping from fact names to [`Effect`]s.
#[derive(Clone, Debug, Default)]
pub struct EffectSet {
    effects: BTreeMap<String, Effect>,
}

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a literal replacement.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, Effect::Set(value.into()));
        self
    }

    /// Adds a transform of the fact's current value.
    pub fn transform<F>(mut self, name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.insert(name, Effect::Transform(Arc::new(transform)));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, effect: Effect) {
        self.effects.insert(name.into(), effect);
    }

    pub fn get(&self, name: &str) -> Option<&Effect> {
        self.effects.get(name)
    }

    /// Whether the named fact is changed by a transform.
    pub fn is_transform(&self, name: &str) -> bool {
        matches!(self.effects.get(name), Some(Effect::Transform(_)))
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Effect)> {
        self.effects.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Checks names and literal values.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::Validation` for an empty name or a non-finite literal.
    pub fn validate(&self) -> Result<()> {
        for (name, effect) in &self.effects {
            match effect {
                Effect::Set(value) => validate_fact(name, value)?,
                Effect::Transform(_) => validate_name(name)?,
            }
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for EffectSet
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, (name, value)| set.set(name, value))
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GoapError::Validation(
            "fact name must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}
