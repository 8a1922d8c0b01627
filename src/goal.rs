//! # Goal Module for Goal-Oriented Action Planning (GOAP)
//!
//! A [`Goal`] names the condition set a plan has to reach. Its target uses the
//! same literal and predicate entries as action preconditions, so a goal is
//! satisfied exactly when a state matches every target entry.
//!
//! Goals are checked once when built and again before each planning call.

use std::fmt;

use crate::condition::ConditionSet;
use crate::{GoapError, Result, State, Value};

/// A target the planner should reach.
///
/// The priority is informational: lower numbers mean more important goals, and it
/// is left to the caller to arbitrate between goals. The search itself ignores it.
///
/// # Examples
///
/// ```
/// use goapauto::{ConditionSet, Goal, State};
///
/// let goal = Goal::new("escape", 1, ConditionSet::new().with("door_open", true)).unwrap();
///
/// let state = State::new([("door_open", false)]).unwrap();
/// assert!(!goal.is_satisfied(&state));
/// assert_eq!(goal.unsatisfied_conditions(&state).len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Goal {
    name: String,
    priority: u32,
    target: ConditionSet,
}

impl Goal {
    /// Creates and validates a goal.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::Validation` if the target is empty or malformed, or the
    /// priority is 0.
    pub fn new(name: impl Into<String>, priority: u32, target: ConditionSet) -> Result<Self> {
        let goal = Self {
            name: name.into(),
            priority,
            target,
        };
        goal.validate()?;
        Ok(goal)
    }

    /// Creates a priority 1 goal named after its target.
    pub fn from_target(target: ConditionSet) -> Result<Self> {
        let name = target.to_string();
        Self::new(name, 1, target)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target.is_empty() {
            return Err(GoapError::Validation(format!(
                "goal {} has an empty target",
                self.name
            )));
        }
        if self.priority == 0 {
            return Err(GoapError::Validation(format!(
                "goal {} has priority {}: priority must be >= 1",
                self.name, self.priority
            )));
        }
        self.target.validate()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn target(&self) -> &ConditionSet {
        &self.target
    }

    pub fn is_satisfied(&self, state: &State) -> bool {
        state.matches(&self.target)
    }

    /// Lists the target facts that fail against `state`, with their current value
    /// (`None` when the fact is absent).
    pub fn unsatisfied_conditions<'a>(
        &'a self,
        state: &'a State,
    ) -> Vec<(&'a str, Option<&'a Value>)> {
        self.target
            .iter()
            .filter_map(|(name, condition)| match state.get(name) {
                Some(value) if condition.test(value) => None,
                current => Some((name, current)),
            })
            .collect()
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Goal({}, priority={})", self.name, self.priority)
    }
}
