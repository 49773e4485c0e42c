//! Static text widgets: boxed banners and one-line status messages.

use std::time::Duration;

use unicode_width::UnicodeWidthStr;

use super::Widget;
use crate::tui::frame::{Frame, Span, pad_to_width, truncate_value};
use crate::tui::terminal::TermSize;
use crate::tui::theme::theme;

/// Text inside a rounded border, sized to its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    text: String,
}

impl Banner {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Widget for Banner {
    fn name(&self) -> &'static str {
        "banner"
    }

    fn tick(&mut self, _elapsed: Duration, area: TermSize) -> Frame {
        let width = area.cols;
        let style = theme().banner();
        // two border columns plus one space of padding on each side
        let max_inner = (width as usize).saturating_sub(4);
        let lines: Vec<String> = self
            .text
            .lines()
            .map(|line| truncate_value(line, max_inner))
            .collect();
        let inner = lines.iter().map(|l| l.width()).max().unwrap_or(0);

        let mut frame = Frame::new(width);
        frame.push_text(&format!("╭{}╮", "─".repeat(inner + 2)), style);
        for line in &lines {
            frame.push_spans(&[Span::styled(
                format!("│ {} │", pad_to_width(line, inner)),
                style,
            )]);
        }
        frame.push_text(&format!("╰{}╯", "─".repeat(inner + 2)), style);
        frame
    }

    fn is_complete(&self) -> bool {
        true
    }
}

/// Severity of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
    /// Section title, e.g. the phase a workflow is entering.
    Heading,
}

/// One status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    level: MessageLevel,
    text: String,
}

impl Message {
    pub fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageLevel::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(MessageLevel::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(MessageLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageLevel::Error, text)
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(MessageLevel::Heading, text)
    }

    pub fn level(&self) -> MessageLevel {
        self.level
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Widget for Message {
    fn name(&self) -> &'static str {
        "message"
    }

    fn tick(&mut self, _elapsed: Duration, area: TermSize) -> Frame {
        let (mark, style) = match self.level {
            MessageLevel::Info => ("", theme().normal()),
            MessageLevel::Success => ("✔ ", theme().success()),
            MessageLevel::Warning => ("! ", theme().warning()),
            MessageLevel::Error => ("✖ ", theme().error()),
            MessageLevel::Heading => ("▸ ", theme().cursor()),
        };
        let mut frame = Frame::new(area.cols);
        for (i, line) in self.text.lines().enumerate() {
            // continuation lines align under the text, not the mark
            let lead = if i == 0 {
                mark.to_string()
            } else {
                " ".repeat(mark.width())
            };
            frame.push_spans(&[Span::styled(lead, style), Span::styled(line, style)]);
        }
        if frame.is_empty() {
            frame.push_text(mark, style);
        }
        frame
    }

    fn is_complete(&self) -> bool {
        true
    }
}
