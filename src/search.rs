//! Best-first search machinery used by the [`Planner`](crate::Planner).
//!
//! Search nodes live in an arena (`Vec`) for the duration of one planning call.
//! Each node refers to its parent by index, so the explored graph never owns
//! itself and is released in one step when the call returns.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::condition::ConditionSet;
use crate::state::Fingerprint;
use crate::{ActionRegistry, GoapError, Goal, Result, State};

/// A trait for heuristic functions used by the planner.
///
/// An estimate must be a non-negative number. To keep the returned plans optimal it
/// must also never overestimate the true remaining cost to satisfy `target`; the
/// planner cannot check this.
///
/// Closures with the matching signature implement the trait:
///
/// ```
/// use goapauto::{ConditionSet, HeuristicStrategy, State};
///
/// let h = |_state: &State, target: &ConditionSet| target.len() as f64 * 0.5;
/// assert_eq!(h.calculate(&State::empty(), &ConditionSet::new().with("a", true)), 0.5);
/// ```
pub trait HeuristicStrategy: Send + Sync {
    /// Estimates the cost from `state` to a state satisfying `target`.
    fn calculate(&self, state: &State, target: &ConditionSet) -> f64;
}

impl<F> HeuristicStrategy for F
where
    F: Fn(&State, &ConditionSet) -> f64 + Send + Sync,
{
    fn calculate(&self, state: &State, target: &ConditionSet) -> f64 {
        self(state, target)
    }
}

/// Zero heuristic: the search degrades to uniform-cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl HeuristicStrategy for ZeroHeuristic {
    fn calculate(&self, _state: &State, _target: &ConditionSet) -> f64 {
        0.0
    }
}

/// Counts the target conditions the state does not satisfy.
///
/// Only admissible when every action costs at least 1 and satisfies at most one
/// target condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsatisfiedConditionsHeuristic;

impl HeuristicStrategy for UnsatisfiedConditionsHeuristic {
    fn calculate(&self, state: &State, target: &ConditionSet) -> f64 {
        target
            .iter()
            .filter(|(name, condition)| !state.get(name).map_or(false, |v| condition.test(v)))
            .count() as f64
    }
}

/// Represents a node in the search space.
#[derive(Debug)]
struct Node<'a> {
    state: State,
    /// Index of the parent node in the arena
    parent: Option<usize>,
    /// Action that led to this state (from parent)
    action: Option<&'a str>,
    g_cost: f64,
    h_cost: f64,
}

impl Node<'_> {
    /// Total estimated cost (f = g + h).
    fn f_cost(&self) -> f64 {
        self.g_cost + self.h_cost
    }
}

/// Open set entry ordered by ascending f, then ascending h, then insertion order.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    idx: usize,
    f_cost: f64,
    h_cost: f64,
    seq: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that BinaryHeap pops the smallest entry first.
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.h_cost.total_cmp(&self.h_cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    /// Index of the node satisfying the goal
    Found(usize),
    /// The open set ran dry
    Exhausted,
    /// The iteration budget ran out first
    IterationLimit,
}

/// Manages the state of one graph search.
pub(crate) struct SearchContext<'a> {
    nodes: Vec<Node<'a>>,
    open_set: BinaryHeap<OpenEntry>,
    /// Best g at which each fingerprint was expanded
    closed: HashMap<Fingerprint, f64>,
    next_seq: u64,
    heuristic: &'a dyn HeuristicStrategy,
    target: &'a ConditionSet,
    pub(crate) nodes_expanded: usize,
    pub(crate) nodes_generated: usize,
    pub(crate) successors_skipped: usize,
    pub(crate) iterations: usize,
}

impl<'a> SearchContext<'a> {
    /// Creates a new search context holding the root node.
    pub(crate) fn new(
        initial_state: &State,
        goal: &'a Goal,
        heuristic: &'a dyn HeuristicStrategy,
    ) -> Result<Self> {
        let mut context = Self {
            nodes: Vec::new(),
            open_set: BinaryHeap::new(),
            closed: HashMap::new(),
            next_seq: 0,
            heuristic,
            target: goal.target(),
            nodes_expanded: 0,
            nodes_generated: 0,
            successors_skipped: 0,
            iterations: 0,
        };
        let h_cost = context.estimate(initial_state)?;
        context.push(Node {
            state: initial_state.clone(),
            parent: None,
            action: None,
            g_cost: 0.0,
            h_cost,
        });
        Ok(context)
    }

    fn estimate(&self, state: &State) -> Result<f64> {
        let h = self.heuristic.calculate(state, self.target);
        if h.is_nan() || h < 0.0 {
            return Err(GoapError::InvalidHeuristic { value: h });
        }
        Ok(h)
    }

    fn push(&mut self, node: Node<'a>) {
        let entry = OpenEntry {
            idx: self.nodes.len(),
            f_cost: node.f_cost(),
            h_cost: node.h_cost,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.nodes.push(node);
        self.open_set.push(entry);
    }

    fn is_closed_at_or_below(&self, fingerprint: &Fingerprint, g_cost: f64) -> bool {
        self.closed
            .get(fingerprint)
            .map_or(false, |&best| best <= g_cost)
    }

    /// Runs the search loop until the goal is reached, the open set is empty or
    /// `max_iterations` pops have been made.
    pub(crate) fn run(
        &mut self,
        goal: &Goal,
        registry: &'a ActionRegistry,
        max_iterations: usize,
    ) -> Result<SearchOutcome> {
        while self.iterations < max_iterations {
            let Some(entry) = self.open_set.pop() else {
                return Ok(SearchOutcome::Exhausted);
            };
            self.iterations += 1;

            let node = &self.nodes[entry.idx];
            if goal.is_satisfied(&node.state) {
                self.nodes_expanded += 1;
                return Ok(SearchOutcome::Found(entry.idx));
            }

            let fingerprint = node.state.fingerprint();
            if self.is_closed_at_or_below(&fingerprint, node.g_cost) {
                log::trace!("Skipping stale node {} (g={})", entry.idx, node.g_cost);
                continue;
            }
            let g_cost = node.g_cost;
            self.closed.insert(fingerprint, g_cost);
            self.nodes_expanded += 1;
            log::debug!(
                "Expanding node {} (g={}, h={}) {}",
                entry.idx,
                g_cost,
                node.h_cost,
                node.state
            );

            let mut successors = Vec::new();
            for action in registry.applicable_actions(&node.state) {
                match action.apply(&node.state) {
                    Ok(child_state) => successors.push((action, child_state)),
                    Err(e) => {
                        log::warn!("Skipping {} from node {}: {}", action.name(), entry.idx, e);
                        self.successors_skipped += 1;
                    }
                }
            }

            for (action, child_state) in successors {
                let child_g = g_cost + action.cost();
                if self.is_closed_at_or_below(&child_state.fingerprint(), child_g) {
                    log::trace!("Pruned {} from node {}: no improvement", action.name(), entry.idx);
                    continue;
                }
                let h_cost = self.estimate(&child_state)?;
                self.push(Node {
                    state: child_state,
                    parent: Some(entry.idx),
                    action: Some(action.name()),
                    g_cost: child_g,
                    h_cost,
                });
                self.nodes_generated += 1;
            }
        }

        if self.open_set.is_empty() {
            Ok(SearchOutcome::Exhausted)
        } else {
            Ok(SearchOutcome::IterationLimit)
        }
    }

    /// Cost from the root to the given node.
    pub(crate) fn g_cost(&self, node_idx: usize) -> f64 {
        self.nodes[node_idx].g_cost
    }

    /// Reconstructs the action names from the root to the given node.
    pub(crate) fn reconstruct_path(&self, node_idx: usize) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(node_idx);

        while let Some(node) = current.and_then(|idx| self.nodes.get(idx)) {
            if let Some(action) = node.action {
                path.push(action.to_string());
            }
            current = node.parent;
        }

        path.reverse();
        path
    }
}
