//! pairdisplay output parser.
//!
//! The dump is semi-structured: fields sit at variable offsets inside each
//! line, so extraction searches for per-field patterns instead of indexing
//! columns. Each required field has its own extractor so a failure names
//! the exact field that was missing.

use crate::pair_engine::types::{AccessMode, PairStatus, ReplicationPair, StorageSide, VolumeRole};
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Canonical `pairdisplay -g GROUP -CLI -IH10` output, as shown in the
/// in-app example. Contains a repeated header, a duplicated record and a
/// second group.
pub const EXAMPLE_PAIRDISPLAY: &str = "\
Group   PairVol(L/R) (Port#,TID, LU),Seq#,LDEV#.P/S,Status,Fence,   %,P-LDEV# M CTG JID AP EM       E-Seq# E-LDEV# R/W QM DM P PR CS D_Status ST ELV PGID           CT(s) LUT
HDID    GAD_TEST_HA(L) (CL8-F-8, 0,   5)811111  6001.P-VOL PSUS NEVER ,  100  6001 -   -   0  4  -            -       - B/B -  D  N D   3 -         - -      -               - -
HDID    GAD_TEST_HA(R) (CL8-F-12, 0,   5)822222  6001.S-VOL SSWS NEVER ,  100  6001 -   -   0  4  -            -       - L/L -  D  N D   3 -         - -      -               - -
Group   PairVol(L/R) (Port#,TID, LU),Seq#,LDEV#.P/S,Status,Fence,   %,P-LDEV# M CTG JID AP EM       E-Seq# E-LDEV# R/W QM DM P PR CS D_Status ST ELV PGID           CT(s) LUT
HDID    GAD_TEST_HA(L) (CL8-F-8, 0,   5)811111  6001.P-VOL PSUS NEVER ,  100  6001 -   -   0  4  -            -       - B/B -  D  N D   3 -         - -      -               - -
HDID    GAD_TEST_HA(R) (CL8-F-12, 0,   5)822222  6001.S-VOL SSWS NEVER ,  100  6001 -   -   0  4  -            -       - L/L -  D  N D   3 -         - -      -               - -
HDID2    GAD_TEST_HA2(L) (CL8-F-8, 0,   5)811111  6002.P-VOL PAIR NEVER ,  100  6002 -   -   0  4  -            -       - L/L -  D  N D   3 -         - -      -               - -
HDID2    GAD_TEST_HA2(R) (CL8-F-12, 0,   5)822222  6002.S-VOL PAIR NEVER ,  100  6002 -   -   0  4  -            -       - L/L -  D  N D   3 -         - -      -               - -";

/// Required fields of the line grammar, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    GroupAndName,
    SerialNumber,
    LdevAndRole,
    Status,
    RwStatus,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::GroupAndName => "group/name header",
            Field::SerialNumber => "serial number",
            Field::LdevAndRole => "LDEV/role marker",
            Field::Status => "status literal",
            Field::RwStatus => "r/w status token",
        };
        f.write_str(name)
    }
}

/// A required field could not be extracted from a record.
///
/// Carries both raw lines of the record for diagnostics. The failure aborts
/// the whole parse call; earlier records from the same call are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not extract {field} from pair record\n  left:  {left_line}\n  right: {right_line}")]
pub struct RecordParseError {
    pub field: Field,
    pub left_line: String,
    pub right_line: String,
}

/// Parses pairdisplay text dumps into [`ReplicationPair`] records.
///
/// Lines are trimmed, header lines (leading `Group` token) are discarded and
/// the remaining lines are consumed two at a time: first line is the left
/// side, second line the right side. A trailing unpaired line is dropped
/// silently. The instance handles are attached per side so generated
/// commands can address the correct HORCM instance.
pub struct PairdisplayParser {
    left_instance: String,
    right_instance: String,
    group_name: Regex,
    serial: Regex,
    ldev_role: Regex,
    rw_token: Regex,
}

impl Default for PairdisplayParser {
    fn default() -> Self {
        Self::new("-IH10", "-IH20")
    }
}

impl PairdisplayParser {
    pub fn new(left_instance: impl Into<String>, right_instance: impl Into<String>) -> Self {
        Self {
            left_instance: left_instance.into(),
            right_instance: right_instance.into(),
            group_name: Regex::new(r"^(\w+)\s+(\w+)").expect("valid regex"),
            serial: Regex::new(r"\d{6}").expect("valid regex"),
            ldev_role: Regex::new(r"(\d+)\.([PS])-VOL").expect("valid regex"),
            rw_token: Regex::new(r"[BL]/[BLM]").expect("valid regex"),
        }
    }

    /// Parse a full dump. All-or-nothing: the first record that fails
    /// aborts the call and nothing is returned.
    pub fn parse(&self, raw: &str) -> Result<Vec<ReplicationPair>, RecordParseError> {
        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with("Group"))
            .collect();

        let mut pairs = Vec::with_capacity(lines.len() / 2);
        for record in lines.chunks_exact(2) {
            pairs.push(self.parse_record(record[0], record[1])?);
        }
        Ok(pairs)
    }

    fn parse_record(
        &self,
        left_line: &str,
        right_line: &str,
    ) -> Result<ReplicationPair, RecordParseError> {
        let fail = |field: Field| RecordParseError {
            field,
            left_line: left_line.to_string(),
            right_line: right_line.to_string(),
        };

        // Group and name come from the left line only.
        let (group, name) = self
            .group_and_name(left_line)
            .ok_or_else(|| fail(Field::GroupAndName))?;

        let left = self.parse_side(left_line, &self.left_instance, &fail)?;
        let right = self.parse_side(right_line, &self.right_instance, &fail)?;

        Ok(ReplicationPair {
            group,
            name,
            left,
            right,
        })
    }

    fn parse_side(
        &self,
        line: &str,
        instance: &str,
        fail: &dyn Fn(Field) -> RecordParseError,
    ) -> Result<StorageSide, RecordParseError> {
        let serial_number = self
            .serial_number(line)
            .ok_or_else(|| fail(Field::SerialNumber))?;
        let (ldev_number, role) = self
            .ldev_and_role(line)
            .ok_or_else(|| fail(Field::LdevAndRole))?;
        let status = self.status_token(line).ok_or_else(|| fail(Field::Status))?;
        let rw_status = self.rw_status(line).ok_or_else(|| fail(Field::RwStatus))?;
        let port_info = self.port_info(line).unwrap_or_default();

        Ok(StorageSide {
            serial_number,
            port_info,
            ldev_number,
            status,
            role,
            rw_status,
            instance: instance.to_string(),
        })
    }

    /// Leading whitespace-delimited identifier pair at line start.
    pub(crate) fn group_and_name(&self, line: &str) -> Option<(String, String)> {
        let caps = self.group_name.captures(line)?;
        Some((caps[1].to_string(), caps[2].to_string()))
    }

    /// First run of six consecutive digits anywhere in the line.
    pub(crate) fn serial_number(&self, line: &str) -> Option<String> {
        self.serial.find(line).map(|m| m.as_str().to_string())
    }

    /// Numeric token immediately followed by `.P-VOL` or `.S-VOL`.
    pub(crate) fn ldev_and_role(&self, line: &str) -> Option<(String, VolumeRole)> {
        let caps = self.ldev_role.captures(line)?;
        let role = match &caps[2] {
            "P" => VolumeRole::Primary,
            _ => VolumeRole::Secondary,
        };
        Some((caps[1].to_string(), role))
    }

    /// First whitespace-delimited token that is exactly one of the six
    /// status literals.
    pub(crate) fn status_token(&self, line: &str) -> Option<PairStatus> {
        line.split_whitespace()
            .find_map(|token| token.parse::<PairStatus>().ok())
    }

    /// First `[BL]/[BLM]` token, which must then be one of the three
    /// storable access modes.
    pub(crate) fn rw_status(&self, line: &str) -> Option<AccessMode> {
        self.rw_token
            .find(line)
            .and_then(|m| m.as_str().parse::<AccessMode>().ok())
    }

    /// Substring from the first `(CL` through the next `)`, inclusive.
    /// Absent port info is not an error.
    pub(crate) fn port_info(&self, line: &str) -> Option<String> {
        let start = line.find("(CL")?;
        let end = line[start..].find(')')? + start;
        Some(line[start..=end].to_string())
    }
}
