use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A token that is not one of the enumerated literals for its field.
///
/// Unrecognized status/role/rw tokens must fail parsing rather than be
/// stored, so the state machine never sees a value outside its alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind} literal: '{token}'")]
pub struct UnknownLiteral {
    pub kind: &'static str,
    pub token: String,
}

/// Replication state reported for one side of a GAD pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PairStatus {
    /// Volumes are synchronized.
    #[serde(rename = "PAIR")]
    Pair,
    /// Suspended from the primary side.
    #[serde(rename = "PSUS")]
    Psus,
    /// Suspended from the secondary side.
    #[serde(rename = "SSUS")]
    Ssus,
    /// Suspended, secondary side accepts writes.
    #[serde(rename = "SSWS")]
    Ssws,
    /// Suspended due to an error.
    #[serde(rename = "PSUE")]
    Psue,
    /// Initial copy in progress.
    #[serde(rename = "COPY")]
    Copy,
}

impl PairStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairStatus::Pair => "PAIR",
            PairStatus::Psus => "PSUS",
            PairStatus::Ssus => "SSUS",
            PairStatus::Ssws => "SSWS",
            PairStatus::Psue => "PSUE",
            PairStatus::Copy => "COPY",
        }
    }
}

impl FromStr for PairStatus {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAIR" => Ok(PairStatus::Pair),
            "PSUS" => Ok(PairStatus::Psus),
            "SSUS" => Ok(PairStatus::Ssus),
            "SSWS" => Ok(PairStatus::Ssws),
            "PSUE" => Ok(PairStatus::Psue),
            "COPY" => Ok(PairStatus::Copy),
            other => Err(UnknownLiteral {
                kind: "pair status",
                token: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Volume role within the pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VolumeRole {
    #[serde(rename = "P-VOL")]
    Primary,
    #[serde(rename = "S-VOL")]
    Secondary,
}

impl VolumeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeRole::Primary => "P-VOL",
            VolumeRole::Secondary => "S-VOL",
        }
    }
}

impl FromStr for VolumeRole {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P-VOL" => Ok(VolumeRole::Primary),
            "S-VOL" => Ok(VolumeRole::Secondary),
            other => Err(UnknownLiteral {
                kind: "volume role",
                token: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for VolumeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read/write access mode reported per side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccessMode {
    /// Read-write, mirrored (`L/M`).
    #[serde(rename = "L/M")]
    Mirrored,
    /// Read-write, local only (`L/L`).
    #[serde(rename = "L/L")]
    Local,
    /// Blocked on both paths (`B/B`).
    #[serde(rename = "B/B")]
    Blocked,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::Mirrored => "L/M",
            AccessMode::Local => "L/L",
            AccessMode::Blocked => "B/B",
        }
    }
}

impl FromStr for AccessMode {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L/M" => Ok(AccessMode::Mirrored),
            "L/L" => Ok(AccessMode::Local),
            "B/B" => Ok(AccessMode::Blocked),
            other => Err(UnknownLiteral {
                kind: "r/w status",
                token: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a replication pair as extracted from a pairdisplay line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageSide {
    /// 6-digit serial number of the storage system.
    pub serial_number: String,
    /// `(CL…)` port token from the line; empty when absent.
    pub port_info: String,
    /// Numeric LDEV identifier, kept as text.
    pub ldev_number: String,
    pub status: PairStatus,
    pub role: VolumeRole,
    pub rw_status: AccessMode,
    /// HORCM instance handle used to address this side, e.g. `-IH10`.
    pub instance: String,
}

/// One GAD pair: two sides in input order.
///
/// Left/right carry no meaning beyond "first line" / "second line" of the
/// source record. A new parse wholesale-replaces any prior collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicationPair {
    pub group: String,
    pub name: String,
    pub left: StorageSide,
    pub right: StorageSide,
}

impl ReplicationPair {
    /// `group/name` key used by the copy-progress tracker.
    pub fn pair_id(&self) -> String {
        format!("{}/{}", self.group, self.name)
    }
}
