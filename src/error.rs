use thiserror::Error;

/// Errors raised while building planning inputs or applying actions.
///
/// A search that cannot reach its goal is not an error: see
/// [`PlanStatus`](crate::PlanStatus).
///
/// # Examples
///
/// ```
/// use goapauto::GoapError;
///
/// let err = GoapError::DuplicateName("open_door".to_string());
/// assert_eq!(format!("{}", err), "Action already registered: open_door");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GoapError {
    /// Malformed state, condition, effect, action or goal input
    #[error("Validation error: {0}")]
    Validation(String),

    /// An action with the same name is already in the registry
    #[error("Action already registered: {0}")]
    DuplicateName(String),

    /// No action with the given name is in the registry
    #[error("Action not found: {0}")]
    NotFound(String),

    /// The action was applied to a state that does not meet its preconditions
    #[error("Action precondition not met: {0}")]
    PreconditionNotMet(String),

    /// A transform effect had no current value to work from
    #[error("Action {action} cannot transform missing fact {fact}")]
    MissingFact { action: String, fact: String },

    /// The heuristic produced NaN or a negative estimate
    #[error("Heuristic returned an invalid estimate: {value}")]
    InvalidHeuristic { value: f64 },
}

/// Result type alias for GOAP operations
pub type Result<T> = std::result::Result<T, GoapError>;
