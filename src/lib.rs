mod action;
mod condition;
mod error;
mod goal;
mod planner;
mod registry;
mod search;
mod state;

pub use action::Action;
pub use condition::{Condition, ConditionSet, Effect, EffectSet, PredicateFn, TransformFn};
pub use error::{GoapError, Result};
pub use goal::Goal;
pub use planner::{
    PlanResult, PlanStats, PlanStatus, Planner, PlannerConfig, DEFAULT_MAX_ITERATIONS,
};
pub use registry::{ActionDefinition, ActionRegistry};
pub use search::{HeuristicStrategy, UnsatisfiedConditionsHeuristic, ZeroHeuristic};
pub use state::{Fingerprint, State, Value};
