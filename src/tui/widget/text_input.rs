//! Text prompt, single-line or multi-line.

use std::time::Duration;

use unicode_width::UnicodeWidthStr;

use super::{InputOutcome, Widget, WidgetResult};
use crate::tui::event::Key;
use crate::tui::frame::{Frame, Span};
use crate::tui::terminal::TermSize;
use crate::tui::style::Style;
use crate::tui::theme::theme;

/// Editable text with a byte cursor that always sits on a char boundary.
#[derive(Debug, Default, Clone)]
struct EditBuffer {
    buffer: String,
    cursor: usize,
}

impl EditBuffer {
    fn with_value(value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.len(),
        }
    }

    fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn delete_before_cursor(&mut self) {
        if let Some(c) = self.buffer[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.buffer.remove(self.cursor);
        }
    }

    fn delete_after_cursor(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    fn move_left(&mut self) {
        if let Some(c) = self.buffer[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    fn move_right(&mut self) {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Byte range of the line holding the cursor, newline excluded.
    fn line_bounds(&self, at: usize) -> (usize, usize) {
        let start = self.buffer[..at].rfind('\n').map_or(0, |i| i + 1);
        let end = self.buffer[at..]
            .find('\n')
            .map_or(self.buffer.len(), |i| at + i);
        (start, end)
    }

    fn move_line_start(&mut self) {
        self.cursor = self.line_bounds(self.cursor).0;
    }

    fn move_line_end(&mut self) {
        self.cursor = self.line_bounds(self.cursor).1;
    }

    /// Move to the same char column on the previous line, clamped to its length.
    fn move_up(&mut self) {
        let (start, _) = self.line_bounds(self.cursor);
        if start == 0 {
            return;
        }
        let column = self.buffer[start..self.cursor].chars().count();
        let (prev_start, prev_end) = self.line_bounds(start - 1);
        self.cursor = self.offset_in_line(prev_start, prev_end, column);
    }

    fn move_down(&mut self) {
        let (start, end) = self.line_bounds(self.cursor);
        if end == self.buffer.len() {
            return;
        }
        let column = self.buffer[start..self.cursor].chars().count();
        let (next_start, next_end) = self.line_bounds(end + 1);
        self.cursor = self.offset_in_line(next_start, next_end, column);
    }

    fn offset_in_line(&self, start: usize, end: usize, column: usize) -> usize {
        self.buffer[start..end]
            .char_indices()
            .nth(column)
            .map_or(end, |(i, _)| start + i)
    }

    fn value(&self) -> &str {
        &self.buffer
    }
}

/// Prompt for free text. Single-line submits on Enter; multi-line inserts a
/// newline on Enter and submits on Ctrl-D.
#[derive(Debug, Clone)]
pub struct TextInput {
    prompt: String,
    edit: EditBuffer,
    multiline: bool,
    result: Option<WidgetResult>,
}

impl TextInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            edit: EditBuffer::default(),
            multiline: false,
            result: None,
        }
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Start with `value` in the buffer and the cursor at its end.
    pub fn with_value(mut self, value: &str) -> Self {
        self.edit = EditBuffer::with_value(value);
        self
    }

    pub fn value(&self) -> &str {
        self.edit.value()
    }

    pub fn cursor_position(&self) -> usize {
        self.edit.cursor
    }

    fn complete(&mut self, result: WidgetResult) -> InputOutcome {
        self.result = Some(result.clone());
        InputOutcome::Completed(result)
    }

    fn submit(&mut self) -> InputOutcome {
        let text = self.edit.value().to_string();
        self.complete(WidgetResult::Text(text))
    }

    /// Spans for one line with the cursor cell highlighted when it falls on it.
    fn line_spans(&self, start: usize, end: usize) -> Vec<Span> {
        let line = &self.edit.buffer[start..end];
        let cursor = self.edit.cursor;
        if self.result.is_some() || cursor < start || cursor > end {
            return vec![Span::styled(line, theme().normal())];
        }
        let split = cursor - start;
        let (before, rest) = line.split_at(split);
        let mut chars = rest.chars();
        let under = chars.next().unwrap_or(' ');
        vec![
            Span::styled(before, theme().normal()),
            Span::styled(under.to_string(), Style::new().fg(theme().fg).bg(theme().accent)),
            Span::styled(chars.as_str(), theme().normal()),
        ]
    }

    fn line_ranges(&self) -> Vec<(usize, usize)> {
        let mut ranges = Vec::new();
        let mut start = 0;
        for (i, _) in self.edit.buffer.match_indices('\n') {
            ranges.push((start, i));
            start = i + 1;
        }
        ranges.push((start, self.edit.buffer.len()));
        ranges
    }
}

impl Widget for TextInput {
    fn name(&self) -> &'static str {
        "text_input"
    }

    fn tick(&mut self, _elapsed: Duration, area: TermSize) -> Frame {
        let mut frame = Frame::new(area.cols);
        let (mark, mark_style) = match &self.result {
            None => ("? ", theme().progress()),
            Some(WidgetResult::Text(_)) => ("✔ ", theme().success()),
            Some(_) => ("✖ ", theme().error()),
        };
        let mut head = vec![
            Span::styled(mark, mark_style),
            Span::styled(&self.prompt, theme().title()),
        ];

        if self.result.as_ref().is_some_and(WidgetResult::is_cancelled) {
            head.push(Span::styled(" cancelled", theme().hint()));
            frame.push_spans(&head);
            return frame;
        }

        let lines = self.line_ranges();
        if !self.multiline {
            head.push(Span::raw(" "));
            if let Some(&(start, end)) = lines.first() {
                head.extend(self.line_spans(start, end));
            }
            frame.push_spans(&head);
            return frame;
        }

        if self.result.is_none() {
            head.push(Span::styled(" (ctrl-d to submit)", theme().hint()));
        }
        frame.push_spans(&head);
        let indent = " ".repeat(mark.width());
        for (start, end) in lines {
            let mut spans = vec![Span::raw(indent.clone())];
            spans.extend(self.line_spans(start, end));
            frame.push_spans(&spans);
        }
        frame
    }

    fn handle_input(&mut self, key: Key) -> InputOutcome {
        if self.result.is_some() {
            return InputOutcome::StillActive;
        }
        match key {
            Key::Char(c) => self.edit.insert_char(c),
            Key::Space => self.edit.insert_char(' '),
            Key::Backspace => self.edit.delete_before_cursor(),
            Key::Delete => self.edit.delete_after_cursor(),
            Key::Left => self.edit.move_left(),
            Key::Right => self.edit.move_right(),
            Key::Home => self.edit.move_line_start(),
            Key::End => self.edit.move_line_end(),
            Key::Up if self.multiline => self.edit.move_up(),
            Key::Down if self.multiline => self.edit.move_down(),
            Key::Enter if self.multiline => self.edit.insert_char('\n'),
            Key::Enter | Key::Submit => return self.submit(),
            Key::Escape => return self.complete(WidgetResult::Cancelled),
            _ => {}
        }
        InputOutcome::StillActive
    }

    fn is_complete(&self) -> bool {
        self.result.is_some()
    }
}
