use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Default maximum number of log lines to keep in memory
pub const DEFAULT_MAX_LOG_LINES: usize = 10000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: String,
    pub level: String,
    pub message: String,
    pub pair_id: Option<String>,
}

pub struct LogManager {
    system_logs: Arc<Mutex<VecDeque<LogEntry>>>,
    max_lines: usize,
}

impl LogManager {
    pub fn new(max_lines: usize) -> Self {
        Self {
            system_logs: Arc::new(Mutex::new(VecDeque::with_capacity(max_lines))),
            max_lines,
        }
    }

    pub fn log(&self, level: &str, message: &str, pair_id: Option<String>) {
        let now = chrono::Utc::now().to_rfc3339();
        let entry = LogEntry {
            id: now.clone(),
            timestamp: now,
            level: level.to_string(),
            message: message.to_string(),
            pair_id,
        };

        let mut logs = self.system_logs.lock().unwrap();
        logs.push_back(entry); // Add to end

        // Remove from front if full
        while logs.len() > self.max_lines {
            logs.pop_front();
        }
    }

    pub fn get_logs(&self, pair_id: Option<String>) -> Vec<LogEntry> {
        let logs = self.system_logs.lock().unwrap();
        match pair_id {
            Some(id) => logs
                .iter()
                .filter(|l| l.pair_id.as_ref() == Some(&id))
                .cloned()
                .collect(),
            None => logs.iter().cloned().collect(),
        }
    }

    /// Get logs with pagination for better performance with large log sets
    pub fn get_logs_paginated(
        &self,
        pair_id: Option<String>,
        offset: usize,
        limit: usize,
    ) -> Vec<LogEntry> {
        let logs = self.system_logs.lock().unwrap();
        let filtered: Vec<_> = match pair_id {
            Some(id) => logs
                .iter()
                .filter(|l| l.pair_id.as_ref() == Some(&id))
                .collect(),
            None => logs.iter().collect(),
        };

        let start = offset.min(filtered.len());
        let end = (offset + limit).min(filtered.len());

        filtered[start..end].iter().map(|&entry| entry.clone()).collect()
    }
}
