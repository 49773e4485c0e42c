//! Spinner and progress bar.
//!
//! The spinner glyph advances once per tick interval of accumulated time,
//! independent of the reported percentage. A progress indicator never
//! completes on its own: its owner calls [`Progress::succeed`] or
//! [`Progress::fail`].

use std::time::Duration;

use super::Widget;
use crate::config::{DEFAULT_TICK_MS, SpinnerStyle};
use crate::tui::frame::{Frame, Span};
use crate::tui::terminal::TermSize;
use crate::tui::theme::theme;

/// Width of the bar drawn for determinate progress.
const BAR_WIDTH: usize = 20;

/// Completion percentage of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Percent {
    /// Amount of work unknown; only the spinner animates.
    #[default]
    Indeterminate,
    /// 0..=100
    Determinate(u8),
}

impl From<u8> for Percent {
    fn from(value: u8) -> Self {
        Percent::Determinate(value.min(100))
    }
}

impl From<Option<u8>> for Percent {
    fn from(value: Option<u8>) -> Self {
        value.map_or(Percent::Indeterminate, Percent::from)
    }
}

/// An update sent by a running task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressReport {
    pub percent: Percent,
    pub message: Option<String>,
}

/// Where the tracked task stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressStatus {
    Running,
    Succeeded,
    Failed(String),
}

/// Spinner with an optional percentage bar.
#[derive(Debug, Clone)]
pub struct Progress {
    label: String,
    percent: Percent,
    message: Option<String>,
    glyphs: &'static [char],
    interval: Duration,
    frame_index: usize,
    elapsed_ticks: u64,
    since_advance: Duration,
    elapsed: Duration,
    show_elapsed: bool,
    status: ProgressStatus,
}

impl Progress {
    /// `indeterminate` starts without a bar; the first determinate report
    /// switches the bar on.
    pub fn new(label: impl Into<String>, indeterminate: bool) -> Self {
        Self {
            label: label.into(),
            percent: if indeterminate {
                Percent::Indeterminate
            } else {
                Percent::Determinate(0)
            },
            message: None,
            glyphs: SpinnerStyle::default().glyphs(),
            interval: Duration::from_millis(DEFAULT_TICK_MS),
            frame_index: 0,
            elapsed_ticks: 0,
            since_advance: Duration::ZERO,
            elapsed: Duration::ZERO,
            show_elapsed: false,
            status: ProgressStatus::Running,
        }
    }

    pub fn with_spinner(mut self, style: SpinnerStyle) -> Self {
        self.glyphs = style.glyphs();
        self.frame_index = 0;
        self
    }

    /// Time that must accumulate before the glyph advances.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_elapsed(mut self, show: bool) -> Self {
        self.show_elapsed = show;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn percent(&self) -> Percent {
        self.percent
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    pub fn status(&self) -> &ProgressStatus {
        &self.status
    }

    /// Current spinner glyph.
    pub fn glyph(&self) -> char {
        self.glyphs[self.frame_index % self.glyphs.len()]
    }

    /// Record a new percentage. Once determinate, the value never goes
    /// down, and an indeterminate report does not erase it.
    pub fn set_percent(&mut self, percent: Percent) {
        let percent = match percent {
            Percent::Determinate(new) => Percent::Determinate(new.min(100)),
            Percent::Indeterminate => Percent::Indeterminate,
        };
        self.percent = match (self.percent, percent) {
            (Percent::Determinate(old), Percent::Determinate(new)) => {
                Percent::Determinate(old.max(new))
            }
            (Percent::Determinate(old), Percent::Indeterminate) => Percent::Determinate(old),
            (Percent::Indeterminate, new) => new,
        };
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Apply a report from the running task.
    pub fn apply(&mut self, report: ProgressReport) {
        self.set_percent(report.percent);
        if let Some(message) = report.message {
            self.message = Some(message);
        }
    }

    /// Mark the task done. A determinate bar is filled.
    pub fn succeed(&mut self) {
        if let Percent::Determinate(_) = self.percent {
            self.percent = Percent::Determinate(100);
        }
        self.status = ProgressStatus::Succeeded;
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = ProgressStatus::Failed(reason.into());
    }

    fn bar(&self, percent: u8) -> Vec<Span> {
        let filled = BAR_WIDTH * percent as usize / 100;
        let mut spans = vec![Span::styled("━".repeat(filled), theme().progress())];
        if filled < BAR_WIDTH {
            spans.push(Span::styled(
                "─".repeat(BAR_WIDTH - filled),
                theme().hint(),
            ));
        }
        spans.push(Span::raw(format!(" {:>3}%", percent)));
        spans
    }
}

impl Widget for Progress {
    fn name(&self) -> &'static str {
        "progress"
    }

    fn tick(&mut self, elapsed: Duration, area: TermSize) -> Frame {
        if self.status == ProgressStatus::Running {
            self.elapsed_ticks += 1;
            self.elapsed += elapsed;
            self.since_advance += elapsed;
            while self.since_advance >= self.interval {
                self.since_advance -= self.interval;
                self.frame_index = (self.frame_index + 1) % self.glyphs.len();
            }
        }

        let mut spans = Vec::new();
        match &self.status {
            ProgressStatus::Running => {
                spans.push(Span::styled(self.glyph().to_string(), theme().progress()));
                spans.push(Span::styled(format!(" {}", self.label), theme().normal()));
                if let Percent::Determinate(p) = self.percent {
                    spans.push(Span::raw(" "));
                    spans.extend(self.bar(p));
                }
                if let Some(message) = &self.message {
                    spans.push(Span::styled(format!(" {}", message), theme().hint()));
                }
                if self.show_elapsed {
                    spans.push(Span::styled(
                        format!(" ({:.1}s)", self.elapsed.as_secs_f64()),
                        theme().hint(),
                    ));
                }
            }
            ProgressStatus::Succeeded => {
                spans.push(Span::styled("✔", theme().success()));
                spans.push(Span::styled(format!(" {}", self.label), theme().success()));
            }
            ProgressStatus::Failed(reason) => {
                spans.push(Span::styled("✖", theme().error()));
                spans.push(Span::styled(
                    format!(" {}: {}", self.label, reason),
                    theme().error(),
                ));
            }
        }

        let mut frame = Frame::new(area.cols);
        frame.push_spans(&spans);
        frame
    }

    fn is_complete(&self) -> bool {
        self.status != ProgressStatus::Running
    }
}
