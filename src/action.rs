//! # Action Module for Goal-Oriented Action Planning (GOAP)
//!
//! An [`Action`] is a named state transform: a set of preconditions that must hold
//! before it may run, a set of effects describing what it changes, and a fixed cost.
//! The planner chains actions together to turn a starting state into one that
//! satisfies a goal.
//!
//! ## Basic Usage
//!
//! ```
//! use goapauto::{Action, ConditionSet, EffectSet, State, Value};
//!
//! let chop_wood = Action::new(
//!     "chop_wood",
//!     ConditionSet::new().with("has_axe", true),
//!     EffectSet::new().set("has_wood", true),
//!     2.0,
//! )
//! .unwrap();
//!
//! let state = State::new([("has_axe", true), ("has_wood", false)]).unwrap();
//! assert!(chop_wood.is_applicable(&state));
//!
//! let next = chop_wood.apply(&state).unwrap();
//! assert_eq!(next.get("has_wood"), Some(&Value::Bool(true)));
//! ```

use std::fmt;

use crate::condition::{ConditionSet, Effect, EffectSet};
use crate::{GoapError, Result, State};

/// Represents an action in the Goal-Oriented Action Planning (GOAP) system.
///
/// An action has:
/// - A name that uniquely identifies it inside an [`ActionRegistry`](crate::ActionRegistry)
/// - Preconditions that must be met for the action to be applicable
/// - Effects that describe how the state changes when it is applied
/// - A non-negative, finite cost
///
/// Actions are immutable once built.
#[derive(Clone, Debug)]
pub struct Action {
    name: String,
    preconditions: ConditionSet,
    effects: EffectSet,
    cost: f64,
}

impl Action {
    /// Creates a new action.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::Validation` if:
    /// - the name is empty
    /// - the cost is negative, NaN or infinite
    /// - a precondition or effect entry is malformed
    ///
    /// # Examples
    ///
    /// ```
    /// use goapauto::{Action, ConditionSet, EffectSet, Value};
    ///
    /// let rest = Action::new(
    ///     "rest",
    ///     ConditionSet::new().with_predicate("energy", |v| v.as_int().is_some()),
    ///     EffectSet::new().transform("energy", |v| Value::from(v.as_int().unwrap_or(0) + 10)),
    ///     1.0,
    /// );
    /// assert!(rest.is_ok());
    ///
    /// let invalid = Action::new("wait", ConditionSet::new(), EffectSet::new(), -1.0);
    /// assert!(invalid.is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        preconditions: ConditionSet,
        effects: EffectSet,
        cost: f64,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GoapError::Validation(
                "action name must be a non-empty string".to_string(),
            ));
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(GoapError::Validation(format!(
                "action {} has invalid cost {}: cost must be finite and non-negative",
                name, cost
            )));
        }
        preconditions.validate()?;
        effects.validate()?;

        Ok(Self {
            name,
            preconditions,
            effects,
            cost,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preconditions(&self) -> &ConditionSet {
        &self.preconditions
    }

    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Checks if this action can be applied in the given state.
    pub fn is_applicable(&self, state: &State) -> bool {
        state.matches(&self.preconditions)
    }

    /// Applies the effects to `state` and returns the derived state.
    ///
    /// Only facts named in the effect set change. This method re-checks the
    /// preconditions and refuses to run when they do not hold.
    ///
    /// # Errors
    ///
    /// - `GoapError::PreconditionNotMet` if the action is not applicable
    /// - `GoapError::MissingFact` if a transform has no current value to read
    /// - `GoapError::Validation` if a transform produced an unsupported value
    ///
    /// # Examples
    ///
    /// ```
    /// use goapauto::{Action, ConditionSet, EffectSet, GoapError, State};
    ///
    /// let open = Action::new(
    ///     "open_door",
    ///     ConditionSet::new().with("door_locked", false),
    ///     EffectSet::new().set("door_open", true),
    ///     1.0,
    /// )
    /// .unwrap();
    ///
    /// let locked = State::new([("door_locked", true)]).unwrap();
    /// assert!(matches!(open.apply(&locked), Err(GoapError::PreconditionNotMet(_))));
    /// ```
    pub fn apply(&self, state: &State) -> Result<State> {
        if !self.is_applicable(state) {
            return Err(GoapError::PreconditionNotMet(format!(
                "{} requires {}",
                self.name, self.preconditions
            )));
        }

        let mut updates = Vec::with_capacity(self.effects.len());
        for (fact, effect) in self.effects.iter() {
            let value = match effect {
                Effect::Set(value) => value.clone(),
                Effect::Transform(transform) => {
                    let current = state.get(fact).ok_or_else(|| GoapError::MissingFact {
                        action: self.name.clone(),
                        fact: fact.to_string(),
                    })?;
                    transform(current)
                }
            };
            updates.push((fact, value));
        }

        state.merge(updates)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (cost: {}, requires: {})",
            self.name, self.cost, self.preconditions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    fn energy_action() -> Action {
        Action::new(
            "work",
            ConditionSet::new().with_predicate("energy", |v| v.as_int().map_or(false, |e| e > 0)),
            EffectSet::new()
                .transform("energy", |v| Value::from(v.as_int().unwrap_or(0) - 10))
                .set("tired", true),
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn test_create_valid_action() {
        let action =
            Action::new("test_action", ConditionSet::new(), EffectSet::new(), 1.0).unwrap();
        assert_eq!(action.name(), "test_action");
        assert_eq!(action.cost(), 1.0);
        assert!(action.preconditions().is_empty());
        assert!(action.effects().is_empty());
    }

    #[test]
    fn test_zero_cost_is_allowed() {
        assert!(Action::new("free", ConditionSet::new(), EffectSet::new(), 0.0).is_ok());
    }

    #[test]
    fn test_create_invalid_action() {
        for cost in [-1.0, f64::NAN, f64::INFINITY] {
            let result = Action::new("test_action", ConditionSet::new(), EffectSet::new(), cost);
            assert!(matches!(result, Err(GoapError::Validation(_))));
        }

        let result = Action::new("", ConditionSet::new(), EffectSet::new(), 1.0);
        assert!(matches!(result, Err(GoapError::Validation(_))));
    }

    #[test]
    fn test_transform_on_absent_fact() {
        let tick = Action::new(
            "tick",
            ConditionSet::new(),
            EffectSet::new().transform("turn", |v| Value::from(v.as_int().unwrap_or(0) + 1)),
            1.0,
        )
        .unwrap();

        let next = tick.apply(&State::new([("turn", 3)]).unwrap()).unwrap();
        assert_eq!(next.get("turn"), Some(&Value::Int(4)));

        let result = tick.apply(&State::new([("round", 1)]).unwrap());
        assert_eq!(
            result,
            Err(GoapError::MissingFact {
                action: "tick".to_string(),
                fact: "turn".to_string(),
            })
        );
    }

    #[test]
    fn test_is_applicable() {
        let action = Action::new(
            "test_action",
            ConditionSet::new().with("has_tool", true),
            EffectSet::new(),
            1.0,
        )
        .unwrap();

        assert!(action.is_applicable(&State::new([("has_tool", true)]).unwrap()));
        assert!(!action.is_applicable(&State::new([("has_tool", false)]).unwrap()));
        assert!(!action.is_applicable(&State::empty()));
    }

    #[test]
    fn test_apply_changes_only_effect_keys() {
        let action = energy_action();
        let state = State::new([
            ("energy", Value::from(30)),
            ("tired", Value::from(false)),
            ("gold", Value::from(7)),
        ])
        .unwrap();

        let next = action.apply(&state).unwrap();
        assert_eq!(next.get("energy"), Some(&Value::Int(20)));
        assert_eq!(next.get("tired"), Some(&Value::Bool(true)));
        assert_eq!(next.get("gold"), Some(&Value::Int(7)));
        assert_eq!(state.get("energy"), Some(&Value::Int(30)));
    }

    #[test]
    fn test_apply_adds_new_facts() {
        let action = Action::new(
            "test_action",
            ConditionSet::new(),
            EffectSet::new().set("has_result", true),
            1.0,
        )
        .unwrap();
        let next = action.apply(&State::empty()).unwrap();
        assert_eq!(next.get("has_result"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_apply_fails_fast() {
        let action = energy_action();
        let exhausted = State::new([("energy", 0)]).unwrap();
        assert!(matches!(
            action.apply(&exhausted),
            Err(GoapError::PreconditionNotMet(_))
        ));
    }

    #[test]
    fn test_apply_rejects_unsupported_transform_output() {
        let action = Action::new(
            "overflow",
            ConditionSet::new().with_predicate("speed", |_| true),
            EffectSet::new().transform("speed", |_| Value::from(f64::INFINITY)),
            1.0,
        )
        .unwrap();
        let state = State::new([("speed", 1.0)]).unwrap();
        assert!(matches!(action.apply(&state), Err(GoapError::Validation(_))));
    }
}
