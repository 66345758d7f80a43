//! CCI command text generation.
//!
//! Encodes the same state machine as the predicates module, from the other
//! direction: given a pair and an operation name, produce the literal
//! command lines to show the operator. Nothing is ever executed here; the
//! output goes to display or clipboard.

use crate::pair_engine::types::{PairStatus, ReplicationPair, VolumeRole};

/// Returned for operation names the generator does not recognize.
/// A data value, not an error: the caller displays it.
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// Returned when no resynchronization transition is legal from the pair's
/// current state.
pub const RESYNC_INVALID_STATE: &str = "# Cannot perform resync - invalid pair state";

/// Generate the command text for an operation on a pair.
///
/// Deterministic and side-effect free. Multi-step operations return several
/// newline-joined command lines.
pub fn command_for_operation(pair: &ReplicationPair, operation: &str) -> String {
    match operation {
        "split_left" => format!("pairsplit -g {} {}", pair.group, pair.left.instance),
        "split_right" => format!("pairsplit -g {} -RS {}", pair.group, pair.right.instance),
        "swap_left_to_right" => {
            format!("pairresync -g {} -swaps {}", pair.group, pair.right.instance)
        }
        "swap_right_to_left" => {
            format!("pairresync -g {} -swaps {}", pair.group, pair.left.instance)
        }
        "resync" => resync_command(pair),
        _ => UNKNOWN_COMMAND.to_string(),
    }
}

/// Multi-branch resynchronization rule.
///
/// Only three of the four `can_resync` combinations have a command branch;
/// the fourth falls through to the invalid-state sentinel (see DESIGN.md).
pub fn resync_command(pair: &ReplicationPair) -> String {
    let left = &pair.left;
    let right = &pair.right;

    if right.role == VolumeRole::Secondary
        && right.status == PairStatus::Ssws
        && left.role == VolumeRole::Primary
        && left.status == PairStatus::Psus
    {
        // Writes moved to the right side: swap there first, then swap back.
        format!(
            "pairresync -g {group} -swaps {right_inst}\npairresync -g {group} -swaps {left_inst}",
            group = pair.group,
            right_inst = right.instance,
            left_inst = left.instance,
        )
    } else if left.role == VolumeRole::Secondary
        && left.status == PairStatus::Ssws
        && right.role == VolumeRole::Primary
        && right.status == PairStatus::Psus
    {
        format!(
            "pairresync -g {group} -swaps {left_inst}\npairresync -g {group} {left_inst}",
            group = pair.group,
            left_inst = left.instance,
        )
    } else if left.role == VolumeRole::Primary
        && left.status == PairStatus::Psus
        && right.role == VolumeRole::Secondary
        && right.status == PairStatus::Ssus
    {
        // Plain suspended pair: a single resync from the primary side.
        format!(
            "pairresync -g {group} {left_inst}",
            group = pair.group,
            left_inst = left.instance,
        )
    } else {
        RESYNC_INVALID_STATE.to_string()
    }
}
