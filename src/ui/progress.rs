//! Progress indicators with CI fallback

use super::context::UiContext;
use crate::fetch::Progress;
use console::style;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// A task spinner with CI fallback
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    /// Create a new spinner (shows once started in interactive mode)
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    /// Start the spinner with a message
    pub fn start(&mut self, message: &str) {
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            eprintln!("{} {}", style("...").dim(), message);
        }
    }

    /// Stop with success message
    pub fn stop(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(message);
        } else if self.interactive {
            println!("{} {}", style("✓").green(), message);
        } else {
            println!("{} {}", style("[OK]").green(), message);
        }
    }

    /// Stop with error message
    pub fn stop_error(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.error(message);
        } else if self.interactive {
            eprintln!("{} {}", style("✗").red(), message);
        } else {
            eprintln!("{} {}", style("[FAIL]").red(), message);
        }
    }
}

/// Transfer progress for downloads and clones.
///
/// Shows an indicatif byte bar (or a spinner when the length is unknown) in
/// interactive mode, and one plain line per transfer otherwise. Everything
/// goes to stderr so stdout stays machine-readable.
pub struct TransferProgress {
    interactive: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl TransferProgress {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            interactive: ctx.use_fancy_output(),
            bar: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(ref bar) = *guard {
                f(bar);
            }
        }
    }
}

fn bar_style(total: Option<u64>) -> ProgressStyle {
    let template = match total {
        Some(_) => "  {spinner:.cyan} {prefix}  {bar:24.cyan/dim} {bytes}/{total_bytes} {msg:.dim}",
        None => "  {spinner:.cyan} {prefix}  {bytes} {msg:.dim}  {elapsed:.dim}",
    };
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .progress_chars("━╸─")
}

impl Progress for TransferProgress {
    fn start(&self, label: &str, total: Option<u64>) {
        if !self.interactive {
            match total {
                Some(len) => eprintln!("Fetching {} ({})", label, HumanBytes(len)),
                None => eprintln!("Fetching {}", label),
            }
            return;
        }

        let bar = match total {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::no_length(),
        };
        bar.set_style(bar_style(total));
        bar.set_prefix(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn advance(&self, done: u64) {
        self.with_bar(|bar| bar.set_position(done));
    }

    fn message(&self, line: &str) {
        self.with_bar(|bar| bar.set_message(truncate(line.trim(), 60)));
    }

    fn finish(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.disable_steady_tick();
                bar.finish_and_clear();
            }
        }
    }
}

/// Shorten a status line to at most `max` characters
fn truncate(line: &str, max: usize) -> String {
    if line.chars().count() <= max {
        return line.to_string();
    }
    let kept: String = line.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
