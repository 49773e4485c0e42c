//! Single-choice list prompt.

use std::time::Duration;

use super::selection::{Selectable, Viewport};
use super::{InputOutcome, Widget, WidgetResult};
use crate::error::{Error, Result};
use crate::tui::event::Key;
use crate::tui::frame::{Frame, Span};
use crate::tui::terminal::TermSize;
use crate::tui::theme::theme;

/// Pick one option with up/down and Enter; Esc cancels.
#[derive(Debug, Clone)]
pub struct Select {
    prompt: String,
    options: Vec<String>,
    cursor: usize,
    viewport: Viewport,
    confirmed: bool,
    result: Option<WidgetResult>,
}

impl Select {
    pub fn new<I, T>(prompt: impl Into<String>, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            return Err(Error::InvalidWidget(
                "select needs at least one option".to_string(),
            ));
        }
        Ok(Self {
            prompt: prompt.into(),
            options,
            cursor: 0,
            viewport: Viewport::default(),
            confirmed: false,
            result: None,
        })
    }

    /// Start with the cursor on `index` (wrapped into range).
    pub fn with_cursor(mut self, index: usize) -> Self {
        self.select(index);
        self
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    fn complete(&mut self, result: WidgetResult) -> InputOutcome {
        self.result = Some(result.clone());
        InputOutcome::Completed(result)
    }
}

impl Selectable for Select {
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

impl Widget for Select {
    fn name(&self) -> &'static str {
        "select"
    }

    fn tick(&mut self, _elapsed: Duration, area: TermSize) -> Frame {
        let mut frame = Frame::new(area.cols);
        match &self.result {
            Some(WidgetResult::Selected { label, .. }) => {
                frame.push_spans(&[
                    Span::styled("✔ ", theme().success()),
                    Span::styled(&self.prompt, theme().title()),
                    Span::raw(" "),
                    Span::styled(label, theme().label()),
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
                    Span::styled(" (↑/↓ to move, enter to confirm)", theme().hint()),
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
                    if i == self.cursor {
                        frame.push_spans(&[Span::styled(format!("❯ {}", option), theme().cursor())]);
                    } else {
                        frame.push_spans(&[Span::styled(format!("  {}", option), theme().normal())]);
                    }
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
            Key::Home => self.select(0),
            Key::End => self.select(self.options.len() - 1),
            Key::Enter => {
                self.confirmed = true;
                let result = WidgetResult::Selected {
                    index: self.cursor,
                    label: self.options[self.cursor].clone(),
                };
                return self.complete(result);
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

    fn select() -> Select {
        Select::new("Choose an option:", ["Option 1", "Option 2", "Option 3"]).unwrap()
    }

    #[test]
    fn empty_options_are_rejected() {
        let err = Select::new("Pick", Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidWidget(_)));
    }

    #[test]
    fn up_from_top_wraps_to_bottom() {
        let mut widget = select();
        widget.handle_input(Key::Up);
        assert_eq!(widget.cursor(), 2);
        widget.handle_input(Key::Char('j'));
        assert_eq!(widget.cursor(), 0);
    }

    #[test]
    fn enter_yields_cursor_item() {
        let mut widget = select();
        widget.handle_input(Key::Down);
        let outcome = widget.handle_input(Key::Enter);
        assert_eq!(
            outcome,
            InputOutcome::Completed(WidgetResult::Selected {
                index: 1,
                label: "Option 2".to_string(),
            })
        );
        assert!(widget.is_confirmed());
        assert!(widget.is_complete());
    }

    #[test]
    fn escape_cancels() {
        let mut widget = select();
        let outcome = widget.handle_input(Key::Escape);
        assert_eq!(outcome, InputOutcome::Completed(WidgetResult::Cancelled));
        assert!(!widget.is_confirmed());
        assert!(widget.is_complete());
    }

    #[test]
    fn renders_cursor_marker() {
        let mut widget = select().with_cursor(2);
        let lines = widget.tick(Duration::ZERO, TermSize::new(24, 60)).to_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("? Choose an option:"));
        assert_eq!(lines[1], "  Option 1");
        assert_eq!(lines[3], "❯ Option 3");
    }

    #[test]
    fn long_list_scrolls_to_keep_cursor_on_screen() {
        let labels: Vec<String> = (1..=12).map(|i| format!("Option {}", i)).collect();
        let mut widget = Select::new("Pick", labels).unwrap();
        let short = TermSize::new(5, 40);

        widget.handle_input(Key::End);
        let lines = widget.tick(Duration::ZERO, short).to_lines();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("? Pick"));
        assert_eq!(lines[1], "  Option 9");
        assert_eq!(lines[4], "❯ Option 12");

        widget.handle_input(Key::Down);
        let lines = widget.tick(Duration::ZERO, short).to_lines();
        assert_eq!(lines[1], "❯ Option 1");
        assert_eq!(lines[4], "  Option 4");
    }

    #[test]
    fn collapses_to_answer_after_confirm() {
        let mut widget = select();
        widget.handle_input(Key::Enter);
        let lines = widget.tick(Duration::ZERO, TermSize::new(24, 60)).to_lines();
        assert_eq!(lines, vec!["✔ Choose an option: Option 1"]);
    }

    #[test]
    fn keys_after_completion_are_ignored() {
        let mut widget = select();
        widget.handle_input(Key::Enter);
        assert_eq!(widget.handle_input(Key::Down), InputOutcome::StillActive);
        assert_eq!(widget.cursor(), 0);
    }
}
