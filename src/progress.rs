//! Terminal callbacks for the executor: an indicatif bar and a dialoguer prompt.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reconcile::{ApplyResult, ConfirmCallback, Operation, ProgressCallback};

/// Progress bar over the operations of a plan
pub struct BarProgress {
    bar: Option<ProgressBar>,
    hidden: bool,
}

impl BarProgress {
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: None,
            hidden: quiet,
        }
    }
}

impl ProgressCallback for BarProgress {
    fn on_start(&mut self, count: usize) {
        let bar = if self.hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(count as u64)
        };
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        self.bar = Some(bar);
    }

    fn on_operation_start(&mut self, operation: &Operation) {
        if let Some(bar) = &self.bar {
            bar.set_message(operation.to_string());
        }
    }

    fn on_operation_complete(&mut self, operation: &Operation, result: &ApplyResult) {
        let Some(bar) = &self.bar else {
            return;
        };
        let symbol = match result {
            ApplyResult::Created | ApplyResult::Modified | ApplyResult::Removed => "✓",
            ApplyResult::Failed { .. } => "✗",
            ApplyResult::Skipped { .. } => "⊘",
        };
        bar.set_message(format!("{} {}", symbol, operation));
        bar.inc(1);
    }

    fn on_complete(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Asks on the terminal unless `--yes` was given
pub struct PromptConfirm {
    pub assume_yes: bool,
}

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}
