//! Run report: what succeeded and what failed, in order.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    successes: Vec<String>,
    failures: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.successes.push(message.into());
    }

    pub fn failure(&mut self, message: impl Into<String>) {
        self.failures.push(message.into());
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.successes.is_empty() && self.failures.is_empty()
    }

    /// Append another report, keeping order.
    pub fn merge(&mut self, other: Report) {
        self.successes.extend(other.successes);
        self.failures.extend(other.failures);
    }

    /// Summary lines with 1-based indexes; `No update.` when empty.
    pub fn lines(&self) -> Vec<String> {
        if self.is_empty() {
            return vec!["No update.".to_string()];
        }
        let successes = self
            .successes
            .iter()
            .enumerate()
            .map(|(i, s)| format!("Success: [{}] {}", i + 1, s));
        let failures = self
            .failures
            .iter()
            .enumerate()
            .map(|(i, s)| format!("Failure: [{}] {}", i + 1, s));
        successes.chain(failures).collect()
    }

    /// Write the summary to the log.
    pub fn log_summary(&self) {
        if self.is_empty() {
            log::info!("No update.");
        }
        for (i, s) in self.successes.iter().enumerate() {
            log::info!("Success: [{}] {}", i + 1, s);
        }
        for (i, f) in self.failures.iter().enumerate() {
            log::warn!("Failure: [{}] {}", i + 1, f);
        }
        log::info!("Done");
    }
}
