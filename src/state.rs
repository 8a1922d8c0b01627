//! # State Module for Goal-Oriented Action Planning (GOAP)
//!
//! This module provides the immutable [`State`] structure the planner searches over,
//! the [`Value`] type stored for each fact, and the [`Fingerprint`] used to recognise
//! states that were already explored.
//!
//! ## What is State in GOAP?
//!
//! A state is a snapshot of the world at one moment: a set of named facts such as
//! `door_open = false` or `energy = 40`. The planner never edits a state in place.
//! Applying an action derives a new state, which lets search nodes share nothing
//! and keeps every explored state available for plan reconstruction.
//!
//! ## Basic Usage
//!
//! ```
//! use goapauto::{ConditionSet, State, Value};
//!
//! let state = State::new([
//!     ("has_key", Value::from(true)),
//!     ("door_open", Value::from(false)),
//! ])
//! .unwrap();
//!
//! // Deriving a state leaves the original untouched
//! let opened = state.merge([("door_open", true)]).unwrap();
//! assert_eq!(state.get("door_open"), Some(&Value::Bool(false)));
//! assert_eq!(opened.get("door_open"), Some(&Value::Bool(true)));
//!
//! // States are tested against condition sets
//! let wanted = ConditionSet::new().with("door_open", true);
//! assert!(!state.matches(&wanted));
//! assert!(opened.matches(&wanted));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use ordered_float::OrderedFloat;

use crate::condition::ConditionSet;
use crate::{GoapError, Result};

/// The value of a single fact.
///
/// Floats are wrapped in [`OrderedFloat`] so that values, and therefore whole states,
/// can be hashed and compared. Non-finite floats are rejected wherever a value enters
/// a [`State`], a literal condition or a literal effect.
///
/// Equality is strict per variant: `Value::Int(1)` is not equal to `Value::from(1.0)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Text(String),
}

impl Value {
    /// Returns the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number as `f64` for both `Int` and `Float` values.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(f.into_inner()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, used in validation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    /// Whether the value can be stored in a state.
    pub fn is_supported(&self) -> bool {
        match self {
            Value::Float(f) => f.into_inner().is_finite(),
            _ => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(OrderedFloat(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Checks that a fact name and value may be stored in a state.
pub(crate) fn validate_fact(name: &str, value: &Value) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GoapError::Validation(
            "fact name must be a non-empty string".to_string(),
        ));
    }
    if !value.is_supported() {
        return Err(GoapError::Validation(format!(
            "fact {} has unsupported {} value {}",
            name,
            value.kind(),
            value
        )));
    }
    Ok(())
}

/// Canonical, order-independent key of a state's facts.
///
/// Two states built from the same facts produce equal fingerprints no matter in
/// which order the facts were inserted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Vec<(String, Value)>);

impl Fingerprint {
    /// Number of facts covered by the fingerprint.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An immutable mapping from fact names to [`Value`]s.
///
/// Facts are kept sorted by name, so equality and hashing are defined over the
/// canonical order of the entries. Every derivation returns a new `State`.
///
/// # Examples
///
/// ```
/// use goapauto::{State, Value};
///
/// let state = State::new([("energy", 40)]).unwrap();
/// assert_eq!(state.get("energy"), Some(&Value::Int(40)));
/// assert_eq!(state.get("mana"), None);
///
/// // Non-finite numbers are not valid facts
/// assert!(State::new([("speed", f64::NAN)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct State {
    facts: BTreeMap<String, Value>,
}

impl State {
    /// Builds a state from `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::Validation` if a name is empty or a value is a non-finite
    /// float.
    pub fn new<I, K, V>(facts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::empty().merge(facts)
    }

    /// A state with no facts.
    pub fn empty() -> Self {
        Self {
            facts: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.facts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterates over the facts in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.facts.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a new state equal to this one except for the given facts, which are
    /// overwritten (or added). The receiver is never modified.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::Validation` if any update is not a valid fact.
    ///
    /// # Examples
    ///
    /// ```
    /// use goapauto::{State, Value};
    ///
    /// let state = State::new([("x", 1), ("y", 2)]).unwrap();
    /// let next = state.merge([("y", 5), ("z", 9)]).unwrap();
    ///
    /// assert_eq!(next.get("x"), Some(&Value::Int(1)));
    /// assert_eq!(next.get("y"), Some(&Value::Int(5)));
    /// assert_eq!(next.get("z"), Some(&Value::Int(9)));
    /// assert_eq!(state.get("y"), Some(&Value::Int(2)));
    /// ```
    pub fn merge<I, K, V>(&self, updates: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut facts = self.facts.clone();
        for (name, value) in updates {
            let name = name.into();
            let value = value.into();
            validate_fact(&name, &value)?;
            facts.insert(name, value);
        }
        Ok(Self { facts })
    }

    /// Checks the state against a condition set.
    ///
    /// Returns `false` (not an error) when a named fact is absent.
    pub fn matches(&self, conditions: &ConditionSet) -> bool {
        conditions.iter().all(|(name, condition)| {
            self.get(name)
                .map_or(false, |value| condition.test(value))
        })
    }

    /// Returns the canonical key used for search deduplication.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(
            self.facts
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.facts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}
