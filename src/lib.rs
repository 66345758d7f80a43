pub mod config;
pub mod horcm;
pub mod input_validation;
pub mod logging;
pub mod pair_engine;
pub mod progress;


use std::sync::Arc;

use anyhow::Result;
use config::AppConfig;
use logging::LogManager;
use pair_engine::{PairdisplayParser, ReplicationPair};
use progress::{CopyProgressTracker, CopyStatus};

/// Holds the current pair snapshot and the copy-progress tracker.
///
/// A successful parse wholesale-replaces the snapshot; a failed parse
/// leaves the previous one untouched. All reads are recomputed from the
/// snapshot, nothing is cached.
pub struct PairManager {
    parser: PairdisplayParser,
    pairs: Vec<ReplicationPair>,
    tracker: CopyProgressTracker,
    log_manager: Arc<LogManager>,
}

impl PairManager {
    pub fn new(config: &AppConfig) -> Self {
        let log_manager = Arc::new(LogManager::new(config.max_log_lines));
        Self::with_log_manager(config, log_manager)
    }

    pub fn with_log_manager(config: &AppConfig, log_manager: Arc<LogManager>) -> Self {
        Self {
            parser: PairdisplayParser::new(&config.left_instance, &config.right_instance),
            pairs: Vec::new(),
            tracker: CopyProgressTracker::new(),
            log_manager,
        }
    }

    /// Validate and parse a pasted dump, replacing the snapshot on success.
    /// Returns the number of parsed pairs.
    pub fn refresh_from_dump(&mut self, raw: &str) -> Result<usize> {
        input_validation::validate_dump_text(raw)?;

        match self.parser.parse(raw) {
            Ok(pairs) => {
                self.log_manager.log(
                    "info",
                    &format!("parsed {} pair(s) from pairdisplay output", pairs.len()),
                    None,
                );
                self.pairs = pairs;
                Ok(self.pairs.len())
            }
            Err(err) => {
                self.log_manager.log("error", &err.to_string(), None);
                Err(err.into())
            }
        }
    }

    pub fn pairs(&self) -> &[ReplicationPair] {
        &self.pairs
    }

    pub fn pair(&self, index: usize) -> Option<&ReplicationPair> {
        self.pairs.get(index)
    }

    /// Generate command text for an operation on a pair.
    pub fn command_for_operation(&self, pair: &ReplicationPair, operation: &str) -> String {
        let text = pair_engine::command_for_operation(pair, operation);
        self.log_manager.log(
            "info",
            &format!("generated '{operation}' command"),
            Some(pair.pair_id()),
        );
        text
    }

    /// Record a copy-progress sample for a pair id.
    pub fn record_progress(&mut self, pair_id: &str, percent: u8) -> Result<()> {
        input_validation::validate_pair_id(pair_id)?;
        input_validation::validate_percent(percent)?;
        self.tracker.update_progress(pair_id, percent);
        self.log_manager.log(
            "info",
            &format!("copy progress {percent}%"),
            Some(pair_id.to_string()),
        );
        Ok(())
    }

    pub fn copy_status(&self, pair_id: &str) -> CopyStatus {
        self.tracker.status_of(pair_id)
    }

    pub fn log_manager(&self) -> &Arc<LogManager> {
        &self.log_manager
    }
}
