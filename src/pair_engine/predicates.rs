//! Pure state predicates over a parsed pair snapshot.
//!
//! These answer "what is clickable right now". A host UI must recompute
//! them from the current snapshot instead of caching flags.

use crate::pair_engine::types::{AccessMode, PairStatus, ReplicationPair, StorageSide, VolumeRole};

/// Operation names understood by the command generator.
pub const OPERATIONS: [&str; 5] = [
    "split_left",
    "split_right",
    "swap_left_to_right",
    "swap_right_to_left",
    "resync",
];

/// Both sides report `PAIR`.
pub fn is_synchronized(pair: &ReplicationPair) -> bool {
    pair.left.status == PairStatus::Pair && pair.right.status == PairStatus::Pair
}

/// Whether this side currently holds the latest data.
///
/// Decision table evaluated per side; earlier rows win.
pub fn holds_latest_data(side: &StorageSide) -> bool {
    if side.status == PairStatus::Psus && side.rw_status == AccessMode::Blocked {
        return false;
    }
    if side.status == PairStatus::Ssws && side.rw_status == AccessMode::Local {
        return true;
    }
    match side.status {
        PairStatus::Pair => true,
        PairStatus::Copy => side.role == VolumeRole::Primary,
        PairStatus::Psus | PairStatus::Ssus => side.role == VolumeRole::Primary,
        PairStatus::Psue => {
            side.rw_status == AccessMode::Blocked || side.role == VolumeRole::Primary
        }
        _ => false,
    }
}

/// Splitting is legal only for a synchronized pair; both split directions
/// become legal at once.
pub fn can_split(pair: &ReplicationPair) -> bool {
    is_synchronized(pair)
}

pub fn can_swap_left_to_right(pair: &ReplicationPair) -> bool {
    is_synchronized(pair)
        && pair.left.role == VolumeRole::Primary
        && pair.right.role == VolumeRole::Secondary
}

pub fn can_swap_right_to_left(pair: &ReplicationPair) -> bool {
    is_synchronized(pair)
        && pair.left.role == VolumeRole::Secondary
        && pair.right.role == VolumeRole::Primary
}

/// Resynchronization is legal in four role/status combinations.
///
/// The fourth combination (SSWS on a P-VOL right side) enables the action
/// here but has no branch in the command generator, which then emits its
/// invalid-state sentinel. Kept as-is on purpose; see the tracking note in
/// DESIGN.md before "fixing" either side.
pub fn can_resync(pair: &ReplicationPair) -> bool {
    let left = &pair.left;
    let right = &pair.right;

    (right.role == VolumeRole::Secondary
        && right.status == PairStatus::Ssws
        && left.role == VolumeRole::Primary
        && left.status == PairStatus::Psus)
        || (left.role == VolumeRole::Secondary
            && left.status == PairStatus::Ssws
            && right.role == VolumeRole::Primary
            && right.status == PairStatus::Psus)
        || (left.role == VolumeRole::Primary
            && left.status == PairStatus::Psus
            && right.role == VolumeRole::Secondary
            && right.status == PairStatus::Ssus)
        || (right.status == PairStatus::Ssws
            && right.role == VolumeRole::Primary
            && left.status == PairStatus::Psus
            && left.role == VolumeRole::Secondary)
}

/// Operation names currently legal for the pair, in display order.
pub fn legal_operations(pair: &ReplicationPair) -> Vec<&'static str> {
    let mut ops = Vec::new();
    if can_split(pair) {
        ops.push("split_left");
        ops.push("split_right");
    }
    if can_swap_left_to_right(pair) {
        ops.push("swap_left_to_right");
    }
    if can_swap_right_to_left(pair) {
        ops.push("swap_right_to_left");
    }
    if can_resync(pair) {
        ops.push("resync");
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(status: PairStatus, role: VolumeRole, rw: AccessMode) -> StorageSide {
        StorageSide {
            serial_number: "811111".to_string(),
            port_info: "(CL8-F-8, 0,   5)".to_string(),
            ldev_number: "6001".to_string(),
            status,
            role,
            rw_status: rw,
            instance: "-IH10".to_string(),
        }
    }

    fn pair(left: StorageSide, right: StorageSide) -> ReplicationPair {
        ReplicationPair {
            group: "HDID".to_string(),
            name: "GAD_TEST_HA".to_string(),
            left,
            right,
        }
    }

    fn synchronized() -> ReplicationPair {
        pair(
            side(PairStatus::Pair, VolumeRole::Primary, AccessMode::Mirrored),
            side(PairStatus::Pair, VolumeRole::Secondary, AccessMode::Mirrored),
        )
    }

    #[test]
    fn test_is_synchronized_requires_both_sides() {
        assert!(is_synchronized(&synchronized()));

        let halfway = pair(
            side(PairStatus::Pair, VolumeRole::Primary, AccessMode::Mirrored),
            side(PairStatus::Psus, VolumeRole::Secondary, AccessMode::Blocked),
        );
        assert!(!is_synchronized(&halfway));
    }

    #[test]
    fn test_latest_data_decision_table() {
        // PSUS + B/B loses regardless of role.
        assert!(!holds_latest_data(&side(
            PairStatus::Psus,
            VolumeRole::Primary,
            AccessMode::Blocked
        )));
        // SSWS + L/L wins regardless of role.
        assert!(holds_latest_data(&side(
            PairStatus::Ssws,
            VolumeRole::Secondary,
            AccessMode::Local
        )));
        // PAIR always wins.
        assert!(holds_latest_data(&side(
            PairStatus::Pair,
            VolumeRole::Secondary,
            AccessMode::Mirrored
        )));
        // COPY follows the role.
        assert!(holds_latest_data(&side(
            PairStatus::Copy,
            VolumeRole::Primary,
            AccessMode::Mirrored
        )));
        assert!(!holds_latest_data(&side(
            PairStatus::Copy,
            VolumeRole::Secondary,
            AccessMode::Mirrored
        )));
        // Suspended states follow the role when not blocked.
        assert!(holds_latest_data(&side(
            PairStatus::Psus,
            VolumeRole::Primary,
            AccessMode::Local
        )));
        assert!(!holds_latest_data(&side(
            PairStatus::Ssus,
            VolumeRole::Secondary,
            AccessMode::Local
        )));
        // PSUE: blocked side wins, otherwise the role decides.
        assert!(holds_latest_data(&side(
            PairStatus::Psue,
            VolumeRole::Secondary,
            AccessMode::Blocked
        )));
        assert!(holds_latest_data(&side(
            PairStatus::Psue,
            VolumeRole::Primary,
            AccessMode::Local
        )));
        assert!(!holds_latest_data(&side(
            PairStatus::Psue,
            VolumeRole::Secondary,
            AccessMode::Local
        )));
        // SSWS without L/L falls through to "no".
        assert!(!holds_latest_data(&side(
            PairStatus::Ssws,
            VolumeRole::Secondary,
            AccessMode::Blocked
        )));
    }

    #[test]
    fn test_split_legal_only_when_synchronized() {
        assert!(can_split(&synchronized()));

        let suspended = pair(
            side(PairStatus::Psus, VolumeRole::Primary, AccessMode::Blocked),
            side(PairStatus::Ssws, VolumeRole::Secondary, AccessMode::Local),
        );
        assert!(!can_split(&suspended));
    }

    #[test]
    fn test_swap_legality_follows_roles() {
        let forward = synchronized();
        assert!(can_swap_left_to_right(&forward));
        assert!(!can_swap_right_to_left(&forward));

        let reversed = pair(
            side(PairStatus::Pair, VolumeRole::Secondary, AccessMode::Mirrored),
            side(PairStatus::Pair, VolumeRole::Primary, AccessMode::Mirrored),
        );
        assert!(!can_swap_left_to_right(&reversed));
        assert!(can_swap_right_to_left(&reversed));
    }

    #[test]
    fn test_swap_requires_synchronization() {
        let suspended = pair(
            side(PairStatus::Psus, VolumeRole::Primary, AccessMode::Blocked),
            side(PairStatus::Ssus, VolumeRole::Secondary, AccessMode::Blocked),
        );
        assert!(!can_swap_left_to_right(&suspended));
        assert!(!can_swap_right_to_left(&suspended));
    }

    #[test]
    fn test_resync_combinations() {
        // 1: right S-VOL SSWS, left P-VOL PSUS.
        assert!(can_resync(&pair(
            side(PairStatus::Psus, VolumeRole::Primary, AccessMode::Blocked),
            side(PairStatus::Ssws, VolumeRole::Secondary, AccessMode::Local),
        )));
        // 2: left S-VOL SSWS, right P-VOL PSUS.
        assert!(can_resync(&pair(
            side(PairStatus::Ssws, VolumeRole::Secondary, AccessMode::Local),
            side(PairStatus::Psus, VolumeRole::Primary, AccessMode::Blocked),
        )));
        // 3: left P-VOL PSUS, right S-VOL SSUS.
        assert!(can_resync(&pair(
            side(PairStatus::Psus, VolumeRole::Primary, AccessMode::Local),
            side(PairStatus::Ssus, VolumeRole::Secondary, AccessMode::Blocked),
        )));
        // 4: right P-VOL SSWS, left S-VOL PSUS.
        assert!(can_resync(&pair(
            side(PairStatus::Psus, VolumeRole::Secondary, AccessMode::Blocked),
            side(PairStatus::Ssws, VolumeRole::Primary, AccessMode::Local),
        )));
        // Synchronized pairs are not resync candidates.
        assert!(!can_resync(&synchronized()));
    }

    #[test]
    fn test_legal_operations_for_synchronized_pair() {
        assert_eq!(
            legal_operations(&synchronized()),
            vec!["split_left", "split_right", "swap_left_to_right"]
        );
    }

    #[test]
    fn test_legal_operations_only_emits_known_names() {
        for candidate in [
            synchronized(),
            pair(
                side(PairStatus::Psus, VolumeRole::Primary, AccessMode::Blocked),
                side(PairStatus::Ssws, VolumeRole::Secondary, AccessMode::Local),
            ),
        ] {
            for op in legal_operations(&candidate) {
                assert!(OPERATIONS.contains(&op));
            }
        }
    }

    #[test]
    fn test_legal_operations_for_suspended_pair() {
        let suspended = pair(
            side(PairStatus::Psus, VolumeRole::Primary, AccessMode::Blocked),
            side(PairStatus::Ssws, VolumeRole::Secondary, AccessMode::Local),
        );
        assert_eq!(legal_operations(&suspended), vec!["resync"]);
    }
}
