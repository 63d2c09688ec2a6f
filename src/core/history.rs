//! Phase transition history.
//!
//! An append-only audit trail of the controller's phase changes. Each
//! completed sale shows up as an `Idle -> Dispensing` record followed by a
//! `Dispensing -> Idle` record carrying the same receipt. A history may be
//! capped, in which case the oldest records are evicted first.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single phase transition.
///
/// # Example
///
/// ```rust
/// use vendsim::core::{DispenseState, StateTransition};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: DispenseState::Idle,
///     to: DispenseState::Idle,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.from, transition.to);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of phase transitions.
///
/// The owner records transitions in place. A history built with
/// [`StateHistory::with_limit`] keeps at most that many records and evicts
/// the oldest ones as new ones arrive.
///
/// # Example
///
/// ```rust
/// use vendsim::catalog::ItemId;
/// use vendsim::core::{DispenseState, StateHistory, StateTransition};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let dispensing = DispenseState::Dispensing {
///     item_id: ItemId::from("A1"),
///     receipt: Uuid::new_v4(),
/// };
///
/// let mut history = StateHistory::new();
/// history.record(StateTransition {
///     from: DispenseState::Idle,
///     to: dispensing.clone(),
///     timestamp: Utc::now(),
/// });
/// history.record(StateTransition {
///     from: dispensing,
///     to: DispenseState::Idle,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path().len(), 3); // Idle -> Dispensing -> Idle
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    evicted: u64,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty, unbounded history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: None,
            evicted: 0,
        }
    }

    /// Create an empty history that retains at most `limit` transitions.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(1024)),
            limit: Some(limit),
            evicted: 0,
        }
    }

    /// Append a transition, evicting the oldest records past the limit.
    pub fn record(&mut self, transition: StateTransition<S>) {
        self.transitions.push_back(transition);
        if let Some(limit) = self.limit {
            while self.transitions.len() > limit {
                self.transitions.pop_front();
                self.evicted += 1;
            }
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the initial state followed by the `to` state of each
    /// retained transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last retained transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> &VecDeque<StateTransition<S>> {
        &self.transitions
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Number of transitions dropped to stay within the limit.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
