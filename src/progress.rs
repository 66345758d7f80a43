//! Copy-progress tracking and completion estimation.
//!
//! Keeps exactly one sample per pair id; every update overwrites the
//! previous one. The estimator divides the sampled percent by the time
//! since that single sample was recorded, and refuses to answer until the
//! store has seen at least two distinct pair ids. Both quirks are kept
//! deliberately; see the latent-defect notes in DESIGN.md before changing
//! the arithmetic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Latest progress sample for one pair id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopySample {
    pub percent: u8,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CopyState {
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "COPYING")]
    Copying,
    #[serde(rename = "COMPLETED")]
    Completed,
}

/// Detailed copy status for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyStatus {
    pub state: CopyState,
    pub percent: u8,
    pub estimated_end: Option<DateTime<Utc>>,
}

/// Process-local keyed store of copy-progress samples.
#[derive(Debug, Default)]
pub struct CopyProgressTracker {
    samples: HashMap<String, CopySample>,
}

impl CopyProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored sample for `pair_id` with the given percent,
    /// stamped now. No history is retained.
    pub fn update_progress(&mut self, pair_id: &str, percent: u8) {
        self.record(pair_id, percent, Utc::now());
    }

    fn record(&mut self, pair_id: &str, percent: u8, at: DateTime<Utc>) {
        self.samples.insert(
            pair_id.to_string(),
            CopySample {
                percent,
                recorded_at: at,
            },
        );
    }

    /// Number of distinct pair ids ever recorded.
    pub fn tracked_pairs(&self) -> usize {
        self.samples.len()
    }

    /// Estimated completion time for a pair, or `None` when the pair is
    /// untracked, the store-wide two-pair gate is not met, no whole second
    /// has elapsed since the sample, or the rate works out to zero.
    pub fn estimate_completion(&self, pair_id: &str) -> Option<DateTime<Utc>> {
        self.estimate_completion_at(pair_id, Utc::now())
    }

    fn estimate_completion_at(&self, pair_id: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let sample = self.samples.get(pair_id)?;
        if self.samples.len() < 2 {
            return None;
        }

        let elapsed = (now - sample.recorded_at).num_seconds();
        if elapsed <= 0 {
            return None;
        }

        let rate = f64::from(sample.percent) / elapsed as f64;
        if rate <= 0.0 {
            return None;
        }

        let remaining_secs = f64::from(100 - sample.percent) / rate;
        Some(now + Duration::milliseconds((remaining_secs * 1000.0) as i64))
    }

    /// Current copy status for a pair. Untracked pairs report `UNKNOWN`
    /// with zero percent.
    pub fn status_of(&self, pair_id: &str) -> CopyStatus {
        let Some(sample) = self.samples.get(pair_id) else {
            return CopyStatus {
                state: CopyState::Unknown,
                percent: 0,
                estimated_end: None,
            };
        };

        CopyStatus {
            state: if sample.percent < 100 {
                CopyState::Copying
            } else {
                CopyState::Completed
            },
            percent: sample.percent,
            estimated_end: self.estimate_completion(pair_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIR_A: &str = "HDID/GAD_TEST_HA";
    const PAIR_B: &str = "HDID2/GAD_TEST_HA2";

    #[test]
    fn test_update_overwrites_single_slot() {
        let mut tracker = CopyProgressTracker::new();
        tracker.update_progress(PAIR_A, 10);
        tracker.update_progress(PAIR_A, 55);

        assert_eq!(tracker.tracked_pairs(), 1);
        assert_eq!(tracker.status_of(PAIR_A).percent, 55);
    }

    #[test]
    fn test_untracked_pair_has_no_estimate_and_unknown_status() {
        let tracker = CopyProgressTracker::new();
        assert!(tracker.estimate_completion(PAIR_A).is_none());

        let status = tracker.status_of(PAIR_A);
        assert_eq!(status.state, CopyState::Unknown);
        assert_eq!(status.percent, 0);
        assert!(status.estimated_end.is_none());
    }

    #[test]
    fn test_store_wide_gate_requires_two_distinct_pairs() {
        let mut tracker = CopyProgressTracker::new();
        let start = Utc::now() - Duration::seconds(30);
        tracker.record(PAIR_A, 60, start);

        // One tracked pair: no estimate even though the sample is old.
        assert!(tracker.estimate_completion(PAIR_A).is_none());

        // A second, unrelated pair opens the gate for the first one.
        tracker.record(PAIR_B, 5, start);
        assert!(tracker.estimate_completion(PAIR_A).is_some());
    }

    #[test]
    fn test_estimate_arithmetic() {
        let mut tracker = CopyProgressTracker::new();
        let now = Utc::now();
        // 60 percent in 30 seconds: rate 2 %/s, 20 s remaining.
        tracker.record(PAIR_A, 60, now - Duration::seconds(30));
        tracker.record(PAIR_B, 5, now);

        let estimate = tracker.estimate_completion_at(PAIR_A, now).unwrap();
        assert_eq!((estimate - now).num_seconds(), 20);
    }

    #[test]
    fn test_zero_percent_yields_no_estimate() {
        let mut tracker = CopyProgressTracker::new();
        let now = Utc::now();
        tracker.record(PAIR_A, 0, now - Duration::seconds(30));
        tracker.record(PAIR_B, 5, now);

        assert!(tracker.estimate_completion_at(PAIR_A, now).is_none());
    }

    #[test]
    fn test_fresh_sample_yields_no_estimate() {
        let mut tracker = CopyProgressTracker::new();
        let now = Utc::now();
        tracker.record(PAIR_A, 40, now);
        tracker.record(PAIR_B, 5, now);

        // Less than a whole second elapsed.
        assert!(tracker.estimate_completion_at(PAIR_A, now).is_none());
    }

    #[test]
    fn test_status_transitions_to_completed_at_100() {
        let mut tracker = CopyProgressTracker::new();
        tracker.update_progress(PAIR_A, 99);
        assert_eq!(tracker.status_of(PAIR_A).state, CopyState::Copying);

        tracker.update_progress(PAIR_A, 100);
        assert_eq!(tracker.status_of(PAIR_A).state, CopyState::Completed);
    }

    #[test]
    fn test_completed_pair_estimate_is_immediate() {
        let mut tracker = CopyProgressTracker::new();
        let now = Utc::now();
        tracker.record(PAIR_A, 100, now - Duration::seconds(10));
        tracker.record(PAIR_B, 5, now);

        // Zero percent remaining: the estimate collapses onto "now".
        let estimate = tracker.estimate_completion_at(PAIR_A, now).unwrap();
        assert_eq!((estimate - now).num_seconds(), 0);
    }
}
