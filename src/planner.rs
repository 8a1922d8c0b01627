//! # Planner Module for Goal-Oriented Action Planning (GOAP)
//!
//! The planner is the central component of a GOAP system. Given a starting
//! [`State`], a [`Goal`] and an [`ActionRegistry`], it runs a best-first (A*)
//! search over the states reachable through applicable actions and returns the
//! cheapest sequence of action names that satisfies the goal.
//!
//! ## Overview
//!
//! 1. The initial state becomes the root of the search.
//! 2. Nodes are expanded in ascending `f = g + h` order, ties broken by lower `h`,
//!    then by insertion order, so the search is reproducible.
//! 3. Each expanded state is recorded by [`Fingerprint`](crate::Fingerprint) with
//!    the cost at which it was reached, and costlier revisits are skipped.
//! 4. When a popped node satisfies the goal, the plan is rebuilt by walking
//!    parent links back to the root.
//!
//! Not finding a plan is an ordinary outcome: [`generate_plan`](Planner::generate_plan)
//! returns `Ok` with a [`PlanStatus`] telling why, and the [`PlanStats`] are always
//! filled in.
//!
//! ## Basic Usage
//!
//! ```
//! use goapauto::{ActionRegistry, ConditionSet, EffectSet, Goal, Planner, State};
//!
//! let mut registry = ActionRegistry::new();
//! registry.add_action(
//!     "unlock_door",
//!     ConditionSet::new().with("has_key", true),
//!     EffectSet::new().set("door_locked", false),
//!     1.5,
//! ).unwrap();
//! registry.add_action(
//!     "open_door",
//!     ConditionSet::new().with("door_locked", false),
//!     EffectSet::new().set("door_open", true),
//!     1.0,
//! ).unwrap();
//!
//! let start = State::new([
//!     ("has_key", true),
//!     ("door_locked", true),
//!     ("door_open", false),
//! ]).unwrap();
//! let goal = Goal::new("enter", 1, ConditionSet::new().with("door_open", true)).unwrap();
//!
//! let result = Planner::new().generate_plan(&start, &goal, &registry).unwrap();
//! assert_eq!(result.plan.unwrap(), ["unlock_door", "open_door"]);
//! assert_eq!(result.stats.total_cost, Some(2.5));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::search::{HeuristicStrategy, SearchContext, SearchOutcome, ZeroHeuristic};
use crate::{ActionRegistry, GoapError, Goal, Result, State};

/// Default cap on the number of open-set pops per planning call.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Planner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Upper bound on open-set pops for one call. Bounds the work spent on
    /// unreachable goals and unbounded state spaces.
    pub max_iterations: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(GoapError::Validation(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a planning call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    /// A goal-satisfying plan was found
    Found,
    /// Every reachable state was explored without satisfying the goal
    NoPlan,
    /// The iteration cap was hit before the search finished
    IterationLimit,
}

impl PlanStatus {
    pub fn message(&self) -> &'static str {
        match self {
            PlanStatus::Found => "plan found",
            PlanStatus::NoPlan => "no plan found",
            PlanStatus::IterationLimit => "iteration limit reached",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Statistics gathered during one planning call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanStats {
    /// Nodes goal-checked and expanded (stale open-set entries are not counted)
    pub nodes_expanded: usize,
    /// Child nodes pushed to the open set
    pub nodes_generated: usize,
    /// Applicable actions whose effects could not be applied during expansion
    pub successors_skipped: usize,
    /// Open-set pops, stale entries included
    pub iterations_used: usize,
    /// Number of actions in the plan, 0 on failure
    pub plan_length: usize,
    /// Cost of the plan, `None` on failure
    pub total_cost: Option<f64>,
    /// Wall-clock duration of the call
    pub execution_time: Duration,
}

impl fmt::Display for PlanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded={} generated={} skipped={} iterations={} length={} cost={} time={:?}",
            self.nodes_expanded,
            self.nodes_generated,
            self.successors_skipped,
            self.iterations_used,
            self.plan_length,
            self.total_cost
                .map_or_else(|| "-".to_string(), |c| format!("{:.2}", c)),
            self.execution_time
        )
    }
}

/// Result of [`Planner::generate_plan`].
#[derive(Debug, Clone)]
pub struct PlanResult {
    pub status: PlanStatus,
    /// Action names in execution order, `None` unless a plan was found
    pub plan: Option<Vec<String>>,
    pub stats: PlanStats,
}

impl PlanResult {
    pub fn is_success(&self) -> bool {
        self.status == PlanStatus::Found
    }

    /// Human-readable outcome.
    pub fn message(&self) -> &'static str {
        self.status.message()
    }
}

/// The A* planner.
///
/// A planner holds only configuration: the heuristic and the iteration cap. All
/// search structures are local to each [`generate_plan`](Self::generate_plan) call,
/// so one planner can serve concurrent calls from several threads.
///
/// # Examples
///
/// Plugging in a heuristic and a tighter iteration cap:
///
/// ```
/// use goapauto::{Planner, PlannerConfig, UnsatisfiedConditionsHeuristic};
///
/// let planner = Planner::with_config(PlannerConfig { max_iterations: 200 })
///     .unwrap()
///     .with_heuristic(UnsatisfiedConditionsHeuristic);
/// assert_eq!(planner.config().max_iterations, 200);
/// ```
#[derive(Clone)]
pub struct Planner {
    heuristic: Arc<dyn HeuristicStrategy>,
    config: PlannerConfig,
}

impl Planner {
    /// Creates a planner with the zero heuristic and the default configuration.
    pub fn new() -> Self {
        Self {
            heuristic: Arc::new(ZeroHeuristic),
            config: PlannerConfig::default(),
        }
    }

    /// Creates a planner with the zero heuristic and the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::Validation` if `max_iterations` is 0.
    pub fn with_config(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Replaces the heuristic.
    pub fn with_heuristic<H>(mut self, heuristic: H) -> Self
    where
        H: HeuristicStrategy + 'static,
    {
        self.heuristic = Arc::new(heuristic);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Searches for the cheapest action sequence taking `initial_state` to a state
    /// that satisfies `goal`.
    ///
    /// # Returns
    ///
    /// A [`PlanResult`] whose status is one of:
    /// - `PlanStatus::Found`: `plan` holds the action names (empty if the initial
    ///   state already satisfies the goal)
    /// - `PlanStatus::NoPlan`: the reachable state space was exhausted
    /// - `PlanStatus::IterationLimit`: `max_iterations` was reached first
    ///
    /// # Errors
    ///
    /// - `GoapError::Validation` if the goal is invalid
    /// - `GoapError::InvalidHeuristic` if the heuristic returns NaN or a negative value
    ///
    /// An action whose effects fail to apply during the search is skipped and
    /// counted in [`PlanStats::successors_skipped`].
    ///
    /// # Examples
    ///
    /// ```
    /// use goapauto::{ActionRegistry, ConditionSet, EffectSet, Goal, PlanStatus, Planner, State};
    ///
    /// let mut registry = ActionRegistry::new();
    /// registry.add_action(
    ///     "cook_meal",
    ///     ConditionSet::new().with("has_ingredients", true),
    ///     EffectSet::new().set("has_food", true),
    ///     1.0,
    /// ).unwrap();
    ///
    /// // No way to get ingredients
    /// let start = State::new([("has_ingredients", false)]).unwrap();
    /// let goal = Goal::new("eat", 1, ConditionSet::new().with("has_food", true)).unwrap();
    ///
    /// let result = Planner::new().generate_plan(&start, &goal, &registry).unwrap();
    /// assert_eq!(result.status, PlanStatus::NoPlan);
    /// assert_eq!(result.message(), "no plan found");
    /// assert!(result.plan.is_none());
    /// assert_eq!(result.stats.nodes_expanded, 1);
    /// ```
    pub fn generate_plan(
        &self,
        initial_state: &State,
        goal: &Goal,
        registry: &ActionRegistry,
    ) -> Result<PlanResult> {
        let start_time = Instant::now();
        goal.validate()?;
        log::info!("Planning for {} with target {}", goal, goal.target());
        log::debug!("Initial state: {}", initial_state);

        let mut context = SearchContext::new(initial_state, goal, self.heuristic.as_ref())?;
        let outcome = context.run(goal, registry, self.config.max_iterations)?;

        let mut stats = PlanStats {
            nodes_expanded: context.nodes_expanded,
            nodes_generated: context.nodes_generated,
            successors_skipped: context.successors_skipped,
            iterations_used: context.iterations,
            ..PlanStats::default()
        };

        let (status, plan) = match outcome {
            SearchOutcome::Found(idx) => {
                let plan = context.reconstruct_path(idx);
                stats.plan_length = plan.len();
                stats.total_cost = Some(context.g_cost(idx));
                (PlanStatus::Found, Some(plan))
            }
            SearchOutcome::Exhausted => (PlanStatus::NoPlan, None),
            SearchOutcome::IterationLimit => (PlanStatus::IterationLimit, None),
        };
        stats.execution_time = start_time.elapsed();

        match &plan {
            Some(steps) => {
                log::info!("Found plan with {} actions: {:?}", steps.len(), steps);
            }
            None => log::info!("Planning for {} failed: {}", goal.name(), status),
        }
        log::info!("Planning statistics: {}", stats);

        Ok(PlanResult {
            status,
            plan,
            stats,
        })
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
