// User-facing status output
//
// One Reporter is built per run and handed to every stage that talks to
// the user. Status lines go to stdout through the same MultiProgress that
// owns the transfer bars, so lines never tear a bar in half.

use std::collections::HashMap;

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::sync::mpsc;

use super::errors::RunError;
use super::models::{StreamRole, TransferProgress, TransferStatus};

pub struct Reporter {
    multi: MultiProgress,
    quiet: bool,
}

impl Reporter {
    /// Reporter drawing to stdout
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::stdout()),
            quiet: false,
        }
    }

    /// Reporter that prints nothing
    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            quiet: true,
        }
    }

    fn line(&self, text: String) {
        if self.quiet {
            return;
        }
        if self.multi.is_hidden() {
            // Not a terminal: MultiProgress would swallow the line
            println!("{}", text);
        } else {
            let _ = self.multi.println(text);
        }
    }

    pub fn banner(&self, text: &str) {
        self.line(format!("\n{}\n", style(text).magenta().bold()));
    }

    pub fn step(&self, text: &str) {
        self.line(style(text).cyan().to_string());
    }

    pub fn success(&self, text: &str) {
        self.line(format!("{} {}", style("✔").green().bold(), style(text).green()));
    }

    pub fn warn(&self, text: &str) {
        self.line(format!("{} {}", style("!").yellow().bold(), text));
    }

    pub fn error(&self, err: &RunError) {
        self.line(format!("{} {}", style("✖").red().bold(), style(err).red().bright()));
        if let Some(hint) = err.hint() {
            self.line(format!("  {}", style(hint).dim()));
        }
    }

    /// Render progress events until every sender is dropped
    pub async fn track_transfers(&self, mut events: mpsc::Receiver<TransferProgress>, title: &str) {
        let mut bars: HashMap<StreamRole, ProgressBar> = HashMap::new();

        while let Some(event) = events.recv().await {
            let bar = bars
                .entry(event.role)
                .or_insert_with(|| self.add_bar(event.role, title));

            // Bars start as spinners and switch once a length is known
            if let Some(total) = event.total {
                if bar.length() != Some(total) {
                    bar.set_style(bytes_style());
                    bar.set_length(total);
                }
            }
            bar.set_position(event.downloaded);

            match event.status {
                TransferStatus::InProgress => bar.tick(),
                TransferStatus::Completed => bar.finish(),
                TransferStatus::Failed => {
                    bar.abandon_with_message(failure_message(&event, &bar.message()))
                }
            }
        }
    }

    fn add_bar(&self, role: StreamRole, title: &str) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(spinner_style());
        bar.set_prefix(format!("{:<5}", role.as_str()));
        bar.set_message(truncate(title, 40));
        bar
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

fn bytes_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{prefix:.bold} [{bar:30.cyan/blue}] {bytes}/{total_bytes} {bytes_per_sec} ETA {eta} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ")
}

/// Total unknown: show bytes so far, never a percentage
fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:.bold} {spinner:.green} {bytes} {bytes_per_sec} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn failure_message(event: &TransferProgress, message: &str) -> String {
    match event.percent() {
        Some(pct) => format!("{} {}", style(format!("failed at {:.0}%:", pct)).red(), message),
        None => format!("{} {}", style("failed:").red(), message),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('…');
    short
}
