//! Inbound commands and their outcomes.

use crate::catalog::ItemId;
use serde::{Deserialize, Serialize};

/// External command accepted by the controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    InsertCoin { amount_cents: u32 },
    SelectItem { item_id: ItemId },
    Cancel,
}

/// Why a command or timer event left the machine untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// A dispense is in progress; external commands are locked out.
    Dispensing,
    /// The selected id is not in the catalog.
    UnknownItem,
    /// The timer does not belong to the dispense in progress.
    StaleTimer,
}

/// Result of handing a command or timer event to the controller.
///
/// Ignored input is not an error: nothing changed and nobody was notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum CommandOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}
