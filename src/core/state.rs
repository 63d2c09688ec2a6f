//! Machine phase states.
//!
//! The controller is always in exactly one phase. Phases are plain values
//! with pure inspection methods, so the lockout rule can be checked by
//! matching on the enum instead of consulting a loose boolean.

use crate::catalog::ItemId;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

/// Trait for state machine phases.
///
/// All methods are pure - no side effects.
///
/// # Required Traits
///
/// - `Clone`: States must be cloneable for history tracking
/// - `PartialEq`: States must be comparable for transition logic
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States must be serializable for audit export
///
/// # Example
///
/// ```rust
/// use vendsim::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum DoorState {
///     Closed,
///     Opening,
/// }
///
/// impl State for DoorState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Opening => "Opening",
///         }
///     }
///
///     fn accepts_commands(&self) -> bool {
///         matches!(self, Self::Closed)
///     }
/// }
///
/// assert!(DoorState::Closed.accepts_commands());
/// assert!(!DoorState::Opening.accepts_commands());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Whether external commands are evaluated in this state.
    ///
    /// Default implementation returns `true`.
    fn accepts_commands(&self) -> bool {
        true
    }
}

/// Phase of the dispense sequence.
///
/// `Dispensing` carries the item being released and the receipt id of the
/// pending completion timer. Only a timer event with the same receipt can
/// move the machine back to `Idle`.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DispenseState {
    #[default]
    Idle,
    Dispensing { item_id: ItemId, receipt: Uuid },
}

impl DispenseState {
    pub fn is_dispensing(&self) -> bool {
        matches!(self, Self::Dispensing { .. })
    }

    /// Receipt of the dispense in progress, if any.
    pub fn receipt(&self) -> Option<Uuid> {
        match self {
            Self::Idle => None,
            Self::Dispensing { receipt, .. } => Some(*receipt),
        }
    }

    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            Self::Idle => None,
            Self::Dispensing { item_id, .. } => Some(item_id),
        }
    }
}

impl State for DispenseState {
    fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Dispensing { .. } => "Dispensing",
        }
    }

    fn accepts_commands(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
