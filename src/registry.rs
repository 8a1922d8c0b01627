//! The named collection of actions a planner can choose from.

use std::collections::HashMap;
use std::fmt;

use crate::condition::{ConditionSet, EffectSet};
use crate::{Action, GoapError, Result, State};

/// One entry of a bulk registration: `(name, preconditions, effects, cost)`.
pub type ActionDefinition = (String, ConditionSet, EffectSet, f64);

/// A registry of uniquely named [`Action`]s.
///
/// Actions keep their registration order, which is the order the planner tries
/// them in. The registry is an ordinary value passed to
/// [`Planner::generate_plan`](crate::Planner::generate_plan); several registries
/// can coexist and be read from multiple threads at once.
///
/// # Examples
///
/// ```
/// use goapauto::{ActionRegistry, ConditionSet, EffectSet, GoapError, State};
///
/// let mut registry = ActionRegistry::new();
/// registry
///     .add_action(
///         "open_door",
///         ConditionSet::new().with("door_locked", false),
///         EffectSet::new().set("door_open", true),
///         1.0,
///     )
///     .unwrap();
///
/// // Names are unique
/// let again = registry.add_action("open_door", ConditionSet::new(), EffectSet::new(), 1.0);
/// assert!(matches!(again, Err(GoapError::DuplicateName(_))));
///
/// let state = State::new([("door_locked", false)]).unwrap();
/// let names: Vec<_> = registry.applicable_actions(&state).map(|a| a.name()).collect();
/// assert_eq!(names, ["open_door"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<Action>,
    index: HashMap<String, usize>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and registers an action.
    ///
    /// # Errors
    ///
    /// - `GoapError::DuplicateName` if the name is already registered
    /// - `GoapError::Validation` if the action itself is invalid
    pub fn add_action(
        &mut self,
        name: impl Into<String>,
        preconditions: ConditionSet,
        effects: EffectSet,
        cost: f64,
    ) -> Result<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(GoapError::DuplicateName(name));
        }
        let action = Action::new(name, preconditions, effects, cost)?;
        self.register(action)
    }

    /// Registers a pre-built action.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::DuplicateName` if the name is already registered.
    pub fn register(&mut self, action: Action) -> Result<()> {
        if self.index.contains_key(action.name()) {
            return Err(GoapError::DuplicateName(action.name().to_string()));
        }
        log::debug!("Registered action {} (cost {})", action.name(), action.cost());
        self.index.insert(action.name().to_string(), self.actions.len());
        self.actions.push(action);
        Ok(())
    }

    /// Registers several actions in order.
    ///
    /// Stops at the first invalid entry. Entries added before it stay registered.
    pub fn add_actions<I>(&mut self, definitions: I) -> Result<()>
    where
        I: IntoIterator<Item = ActionDefinition>,
    {
        for (i, (name, preconditions, effects, cost)) in definitions.into_iter().enumerate() {
            if let Err(e) = self.add_action(name, preconditions, effects, cost) {
                log::warn!("Failed to add action at index {}: {}", i, e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Looks an action up by name.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::NotFound` if no action has that name.
    pub fn get_action(&self, name: &str) -> Result<&Action> {
        self.index
            .get(name)
            .map(|&i| &self.actions[i])
            .ok_or_else(|| GoapError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterates over all actions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Lazily yields the actions applicable to `state`, in registration order.
    pub fn applicable_actions<'a, 's>(
        &'a self,
        state: &'s State,
    ) -> impl Iterator<Item = &'a Action> + 's
    where
        'a: 's,
    {
        self.actions.iter().filter(move |a| a.is_applicable(state))
    }

    /// Applies the named actions one after another starting from `state`.
    ///
    /// This is how a caller simulates a plan returned by the planner.
    ///
    /// # Errors
    ///
    /// Fails with `GoapError::NotFound` for an unknown name, or with whatever
    /// [`Action::apply`] reports for the first step that cannot run.
    pub fn replay<S: AsRef<str>>(&self, state: &State, plan: &[S]) -> Result<State> {
        plan.iter().try_fold(state.clone(), |current, name| {
            self.get_action(name.as_ref())?.apply(&current)
        })
    }
}

impl fmt::Display for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionRegistry({} actions)", self.actions.len())
    }
}
