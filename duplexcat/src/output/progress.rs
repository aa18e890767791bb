//! Terminal progress indicator for merges.
//!
//! The bar is driven by [`ProgressEvent`]s and draws on stderr, so it can
//! be passed straight to [`Processor::process`] as the progress sink.
//!
//! [`Processor::process`]: crate::merge::Processor::process
//!
//! # Examples
//!
//! ```
//! use duplexcat::output::progress::{ProgressBar, ProgressStyle};
//! use duplexcat::ProgressEvent;
//!
//! let mut progress = ProgressBar::new(ProgressStyle::Bar);
//! progress.observe(&ProgressEvent::processing("a.pdf", 0, 2));
//! progress.observe(&ProgressEvent::processing("b.pdf", 1, 2));
//! progress.observe(&ProgressEvent::finalizing());
//! progress.finish();
//! ```

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use crate::document::ProgressEvent;

const BAR_WIDTH: usize = 30;

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Classic progress bar: [=====>    ]
    Bar,
    /// Spinner indicator: ⠋ ⠙ ⠹ ⠸ ⠼ ⠴ ⠦ ⠧ ⠇ ⠏
    Spinner,
    /// Plain percentage: 42%
    Percent,
}

/// Progress indicator for visual feedback during a merge.
#[derive(Debug)]
pub struct ProgressBar {
    /// Completion in percent.
    percent: f64,
    /// Progress bar style.
    style: ProgressStyle,
    /// Latest status message.
    message: Option<String>,
    /// Start time of the operation.
    start_time: Instant,
    /// Last render time (for rate limiting).
    last_render: Option<Instant>,
    /// Minimum time between renders.
    update_interval: Duration,
    /// Whether anything is drawn at all.
    enabled: bool,
    /// Current spinner frame.
    spinner_frame: usize,
}

impl ProgressBar {
    /// Create a progress bar, enabled when stderr is a terminal.
    pub fn new(style: ProgressStyle) -> Self {
        Self {
            percent: 0.0,
            style,
            message: None,
            start_time: Instant::now(),
            last_render: None,
            update_interval: Duration::from_millis(80),
            enabled: io::stderr().is_terminal(),
            spinner_frame: 0,
        }
    }

    /// Create a disabled progress bar (no output).
    pub fn disabled() -> Self {
        let mut pb = Self::new(ProgressStyle::Percent);
        pb.enabled = false;
        pb
    }

    /// Whether the bar draws anything.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the message to display with the progress bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Apply a progress event and redraw.
    pub fn observe(&mut self, event: &ProgressEvent) {
        self.set_message(event.message.clone());
        self.update(event.percent_complete);
    }

    /// Move the bar to `percent` (clamped to `0..=100`).
    pub fn update(&mut self, percent: f64) {
        self.percent = percent.clamp(0.0, 100.0);

        // Rate limit, but never drop the final frame.
        if let Some(last) = self.last_render
            && last.elapsed() < self.update_interval
            && self.percent < 100.0
        {
            return;
        }

        self.render();
    }

    /// Draw the completed bar and end the line.
    pub fn finish(&mut self) {
        self.percent = 100.0;
        if self.enabled {
            self.render();
            eprintln!();
        }
    }

    /// Remove the bar from the terminal.
    pub fn clear(&self) {
        if self.enabled {
            eprint!("\r\x1b[K");
            io::stderr().flush().ok();
        }
    }

    fn render(&mut self) {
        self.last_render = Some(Instant::now());
        if !self.enabled {
            return;
        }

        let line = self.line();
        eprint!("\r\x1b[K{line}");
        io::stderr().flush().ok();
    }

    /// The line that would be drawn for the current state.
    fn line(&mut self) -> String {
        let elapsed = format_duration(self.start_time.elapsed());
        let indicator = match self.style {
            ProgressStyle::Bar => render_bar(self.percent, BAR_WIDTH),
            ProgressStyle::Spinner => {
                let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
                let frame = frames[self.spinner_frame % frames.len()];
                self.spinner_frame += 1;
                frame.to_string()
            }
            ProgressStyle::Percent => String::new(),
        };

        let mut parts = Vec::with_capacity(4);
        if !indicator.is_empty() {
            parts.push(indicator);
        }
        parts.push(format!("{:>3.0}%", self.percent));
        parts.push(elapsed);
        if let Some(message) = &self.message {
            parts.push(message.clone());
        }

        parts.join(" ")
    }

    /// Current completion in percent.
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Get the elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

fn render_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    let head = if filled > 0 && filled < width { ">" } else { "" };
    let body = if head.is_empty() { filled } else { filled - 1 };

    format!("[{}{}{}]", "=".repeat(body), head, " ".repeat(width - filled))
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
