//! Terminal progress for bind operations.
//!
//! # Examples
//!
//! ```
//! use pdfbind::model::BindProgress;
//! use pdfbind::output::progress::{ProgressBar, ProgressStyle};
//!
//! let mut progress = ProgressBar::new(2, ProgressStyle::Bar);
//! progress.apply(&BindProgress {
//!     completed_count: 1,
//!     total_count: 2,
//!     current_source: Some("a.pdf".into()),
//! });
//! progress.finish();
//! ```

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::model::BindProgress;

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Classic progress bar: [=====>    ]
    Bar,
    /// Simple counter: 3/12
    Counter,
}

/// Progress display fed by [`BindProgress`] events.
#[derive(Debug)]
pub struct ProgressBar {
    total: usize,
    current: usize,
    style: ProgressStyle,
    /// Display name of the last processed source.
    message: Option<String>,
    start_time: Instant,
    last_update: Instant,
    /// Minimum time between redraws.
    update_interval: Duration,
    enabled: bool,
}

impl ProgressBar {
    /// Create a new progress bar for `total` sources.
    pub fn new(total: usize, style: ProgressStyle) -> Self {
        Self {
            total,
            current: 0,
            style,
            message: None,
            start_time: Instant::now(),
            last_update: Instant::now(),
            update_interval: Duration::from_millis(100),
            enabled: Self::is_terminal(),
        }
    }

    /// Create a disabled progress bar (no output).
    pub fn disabled() -> Self {
        let mut pb = Self::new(0, ProgressStyle::Counter);
        pb.enabled = false;
        pb
    }

    fn is_terminal() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal()
    }

    /// Record one progress event and redraw.
    pub fn apply(&mut self, progress: &BindProgress) {
        self.total = progress.total_count;
        self.message = progress.current_source.clone();
        self.update(progress.completed_count);
    }

    /// Move to `current` and redraw, rate limited except for the last step.
    pub fn update(&mut self, current: usize) {
        self.current = current;

        if self.last_update.elapsed() < self.update_interval && current < self.total {
            return;
        }

        self.last_update = Instant::now();
        self.render();
    }

    /// Mark the bar as complete and end the line.
    pub fn finish(&mut self) {
        if self.enabled {
            self.current = self.total;
            self.render();
            println!();
        }
    }

    /// Erase the bar, leaving the cursor at the start of the line.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    fn render(&self) {
        if !self.enabled {
            return;
        }

        let output = match self.style {
            ProgressStyle::Bar => self.render_bar(),
            ProgressStyle::Counter => self.render_counter(),
        };

        print!("\r\x1b[K{output}");
        io::stdout().flush().ok();
    }

    fn render_bar(&self) -> String {
        let width = 30;
        let filled = (width * self.current) / self.total.max(1);
        let empty = width - filled.min(width);

        let bar = format!(
            "[{}{}]",
            "=".repeat(filled.saturating_sub(1)) + if filled > 0 { ">" } else { "" },
            " ".repeat(empty)
        );

        let mut parts = vec![
            bar,
            format!("{:.0}%", self.percent()),
            format!("{}/{}", self.current, self.total),
            format_duration(self.start_time.elapsed()),
        ];
        if let Some(ref msg) = self.message {
            parts.push(msg.clone());
        }

        parts.join(" ")
    }

    fn render_counter(&self) -> String {
        let mut parts = vec![
            format!("{}/{}", self.current, self.total),
            format_duration(self.start_time.elapsed()),
        ];
        if let Some(ref msg) = self.message {
            parts.push(msg.clone());
        }

        parts.join(" ")
    }

    /// Completion percentage; zero for an empty batch.
    pub fn percent(&self) -> f64 {
        if self.total > 0 {
            (self.current as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Time since the bar was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

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
