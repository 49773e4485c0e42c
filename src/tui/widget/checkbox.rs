//! Multi-choice list prompt.

use std::collections::BTreeSet;
use std::time::Duration;

use tracing::warn;

use super::selection::{Selectable, Viewport};
use super::{InputOutcome, Widget, WidgetResult};
use crate::error::{Error, Result};
use crate::tui::event::Key;
use crate::tui::frame::{Frame, Span};
use crate::tui::terminal::TermSize;
use crate::tui::theme::theme;

/// Toggle any number of options with Space, confirm with Enter.
#[derive(Debug, Clone)]
pub struct Checkbox {
    prompt: String,
    options: Vec<String>,
    selected: BTreeSet<usize>,
    cursor: usize,
    viewport: Viewport,
    confirmed: bool,
    result: Option<WidgetResult>,
}

impl Checkbox {
    pub fn new<I, T>(prompt: impl Into<String>, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            return Err(Error::InvalidWidget(
                "checkbox needs at least one option".to_string(),
            ));
        }
        Ok(Self {
            prompt: prompt.into(),
            options,
            selected: BTreeSet::new(),
            cursor: 0,
            viewport: Viewport::default(),
            confirmed: false,
            result: None,
        })
    }

    /// Pre-select options. Out-of-range indices are dropped with a warning.
    pub fn with_selected(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        for index in indices {
            if index < self.options.len() {
                self.selected.insert(index);
            } else {
                warn!(index, options = self.options.len(), "Ignoring out-of-range preselection");
            }
        }
        self
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Flip membership of the option under the cursor.
    pub fn toggle(&mut self) {
        if !self.selected.remove(&self.cursor) {
            self.selected.insert(self.cursor);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.options.len()).collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    fn complete(&mut self, result: WidgetResult) -> InputOutcome {
        self.result = Some(result.clone());
        InputOutcome::Completed(result)
    }
}

impl Selectable for Checkbox {
    fn count(&self) -> usize {
        self.options.len()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, index: usize) {
        self.cursor = index;
    }
}

impl Widget for Checkbox {
    fn name(&self) -> &'static str {
        "checkbox"
    }

    fn tick(&mut self, _elapsed: Duration, area: TermSize) -> Frame {
        let mut frame = Frame::new(area.cols);
        match &self.result {
            Some(WidgetResult::Checked { labels, .. }) => {
                let answer = if labels.is_empty() {
                    "(none)".to_string()
                } else {
                    labels.join(", ")
                };
                frame.push_spans(&[
                    Span::styled("✔ ", theme().success()),
                    Span::styled(&self.prompt, theme().title()),
                    Span::raw(" "),
                    Span::styled(answer, theme().label()),
                ]);
            }
            Some(_) => {
                frame.push_spans(&[
                    Span::styled("✖ ", theme().error()),
                    Span::styled(&self.prompt, theme().title()),
                    Span::styled(" cancelled", theme().hint()),
                ]);
            }
            None => {
                frame.push_spans(&[
                    Span::styled("? ", theme().progress()),
                    Span::styled(&self.prompt, theme().title()),
                    Span::styled(
                        " (space to toggle, a all, n none, enter to confirm)",
                        theme().hint(),
                    ),
                ]);
                let rows = (area.rows as usize).saturating_sub(1);
                let window = self.viewport.scroll(self.cursor, self.options.len(), rows);
                for (i, option) in self
                    .options
                    .iter()
                    .enumerate()
                    .skip(window.start)
                    .take(window.len())
                {
                    let pointer = if i == self.cursor { "❯" } else { " " };
                    let (mark, mark_style) = if self.selected.contains(&i) {
                        ("◉", theme().success())
                    } else {
                        ("○", theme().hint())
                    };
                    let text_style = if i == self.cursor {
                        theme().cursor()
                    } else {
                        theme().normal()
                    };
                    frame.push_spans(&[
                        Span::styled(format!("{} ", pointer), theme().cursor()),
                        Span::styled(mark, mark_style),
                        Span::styled(format!(" {}", option), text_style),
                    ]);
                }
            }
        }
        frame
    }

    fn handle_input(&mut self, key: Key) -> InputOutcome {
        if self.result.is_some() {
            return InputOutcome::StillActive;
        }
        match key {
            k if k.is_up() => self.prev(),
            k if k.is_down() => self.next(),
            Key::Space => self.toggle(),
            Key::Char('a') => self.select_all(),
            Key::Char('n') => self.select_none(),
            Key::Enter => {
                self.confirmed = true;
                let indices: Vec<usize> = self.selected.iter().copied().collect();
                let labels = indices.iter().map(|&i| self.options[i].clone()).collect();
                return self.complete(WidgetResult::Checked { indices, labels });
            }
            Key::Escape => return self.complete(WidgetResult::Cancelled),
            _ => {}
        }
        InputOutcome::StillActive
    }

    fn is_complete(&self) -> bool {
        self.result.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkbox() -> Checkbox {
        Checkbox::new("Select items:", ["Item 1", "Item 2", "Item 3", "Item 4"]).unwrap()
    }

    #[test]
    fn toggling_twice_restores_selection() {
        let mut widget = checkbox().with_selected([0, 2]);
        for cursor in 0..4 {
            widget.select(cursor);
            let before = widget.selected().clone();
            widget.handle_input(Key::Space);
            assert_ne!(widget.selected(), &before);
            widget.handle_input(Key::Space);
            assert_eq!(widget.selected(), &before);
        }
    }

    #[test]
    fn enter_yields_full_selection_sorted() {
        let mut widget = checkbox();
        widget.handle_input(Key::Down);
        widget.handle_input(Key::Down);
        widget.handle_input(Key::Space);
        widget.handle_input(Key::Up);
        widget.handle_input(Key::Up);
        widget.handle_input(Key::Space);
        let outcome = widget.handle_input(Key::Enter);
        assert_eq!(
            outcome,
            InputOutcome::Completed(WidgetResult::Checked {
                indices: vec![0, 2],
                labels: vec!["Item 1".to_string(), "Item 3".to_string()],
            })
        );
        assert!(widget.is_confirmed());
    }

    #[test]
    fn preselection_drops_out_of_range() {
        let widget = checkbox().with_selected([1, 9]);
        assert_eq!(widget.selected().iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn bulk_keys_select_all_and_none() {
        let mut widget = checkbox();
        widget.handle_input(Key::Char('a'));
        assert_eq!(widget.selected().len(), 4);
        widget.handle_input(Key::Char('n'));
        assert!(widget.selected().is_empty());
    }

    #[test]
    fn cursor_wraps_at_bounds() {
        let mut widget = checkbox();
        widget.handle_input(Key::Up);
        assert_eq!(widget.cursor(), 3);
        widget.handle_input(Key::Down);
        assert_eq!(widget.cursor(), 0);
    }

    #[test]
    fn escape_cancels() {
        let mut widget = checkbox();
        assert_eq!(
            widget.handle_input(Key::Escape),
            InputOutcome::Completed(WidgetResult::Cancelled)
        );
        assert!(!widget.is_confirmed());
    }

    #[test]
    fn renders_marks() {
        let mut widget = checkbox().with_selected([1]);
        let lines = widget.tick(Duration::ZERO, TermSize::new(24, 80)).to_lines();
        assert_eq!(lines[1], "❯ ○ Item 1");
        assert_eq!(lines[2], "  ◉ Item 2");
    }

    #[test]
    fn short_terminal_shows_window_around_cursor() {
        let mut widget = checkbox().with_selected([3]);
        widget.handle_input(Key::Up);
        let lines = widget.tick(Duration::ZERO, TermSize::new(3, 80)).to_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "  ○ Item 3");
        assert_eq!(lines[2], "❯ ◉ Item 4");

        widget.handle_input(Key::Down);
        let lines = widget.tick(Duration::ZERO, TermSize::new(3, 80)).to_lines();
        assert_eq!(lines[1], "❯ ○ Item 1");
        assert_eq!(lines[2], "  ○ Item 2");
    }

    #[test]
    fn empty_confirmation_renders_none() {
        let mut widget = checkbox();
        widget.handle_input(Key::Enter);
        assert_eq!(
            widget.tick(Duration::ZERO, TermSize::new(24, 80)).to_lines(),
            vec!["✔ Select items: (none)"]
        );
    }
}
