//! Static table in a rounded box.

use std::time::Duration;

use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use super::Widget;
use crate::error::{Error, Result};
use crate::tui::frame::{Frame, Span, pad_to_width, truncate_value};
use crate::tui::terminal::TermSize;
use crate::tui::style::Style;
use crate::tui::theme::theme;

/// Narrowest a column is shrunk to; room for "..." after truncation.
const MIN_COLUMN_WIDTH: usize = 3;

const EMPTY_NOTICE: &str = "No data to display";

/// Headers plus rows of cell strings. Render-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Short rows are padded with empty cells; a row longer than the header
    /// list is rejected.
    pub fn new<H, I, R, C>(headers: H, rows: I) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut table_rows = Vec::new();
        for (i, row) in rows.into_iter().enumerate() {
            let mut cells: Vec<String> = row.into_iter().map(Into::into).collect();
            if cells.len() > headers.len() {
                return Err(Error::InvalidWidget(format!(
                    "table row {} has {} cells but only {} headers",
                    i,
                    cells.len(),
                    headers.len()
                )));
            }
            cells.resize(headers.len(), String::new());
            table_rows.push(cells);
        }
        Ok(Self {
            title: None,
            headers,
            rows: table_rows,
        })
    }

    /// Build from JSON records. Columns come from the first record's keys;
    /// a non-object first record gives a single `value` column.
    pub fn from_records(title: impl Into<String>, records: &[Value]) -> Self {
        let headers: Vec<String> = match records.first() {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            Some(_) => vec!["value".to_string()],
            None => Vec::new(),
        };
        let rows = records
            .iter()
            .map(|record| match record {
                Value::Object(map) => headers
                    .iter()
                    .map(|h| map.get(h).map(stringify).unwrap_or_default())
                    .collect(),
                other => {
                    let mut row = vec![stringify(other)];
                    row.resize(headers.len(), String::new());
                    row
                }
            })
            .collect();
        Self {
            title: Some(title.into()),
            headers,
            rows,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Natural column widths, shrunk widest-first until the box fits `width`.
    fn column_widths(&self, width: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .map(|row| row[col].width())
                    .chain(std::iter::once(header.width()))
                    .max()
                    .unwrap_or(0)
                    .max(1)
            })
            .collect();

        while box_width(&widths) > width {
            let Some((widest, &w)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            if w <= MIN_COLUMN_WIDTH {
                break;
            }
            widths[widest] -= 1;
        }
        widths
    }
}

/// Rendered width of a box with these column widths.
fn box_width(widths: &[usize]) -> usize {
    1 + widths.iter().map(|w| w + 3).sum::<usize>()
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn rule(widths: &[usize], left: &str, mid: &str, right: &str) -> Span {
    let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    Span::styled(
        format!("{}{}{}", left, inner.join(mid), right),
        theme().border(),
    )
}

fn row_spans(cells: &[String], widths: &[usize], style: Style) -> Vec<Span> {
    let mut spans = vec![Span::styled("│", theme().border())];
    for (cell, &w) in cells.iter().zip(widths) {
        let text = pad_to_width(&truncate_value(cell, w), w);
        spans.push(Span::styled(format!(" {} ", text), style));
        spans.push(Span::styled("│", theme().border()));
    }
    spans
}

impl Widget for Table {
    fn name(&self) -> &'static str {
        "table"
    }

    fn tick(&mut self, _elapsed: Duration, area: TermSize) -> Frame {
        let width = area.cols;
        let mut frame = Frame::new(width);

        if self.headers.is_empty() {
            if let Some(title) = &self.title {
                frame.push_text(title, theme().title());
            }
            frame.push_text(EMPTY_NOTICE, theme().warning());
            return frame;
        }

        let widths = self.column_widths(width as usize);
        if let Some(title) = &self.title {
            let total = box_width(&widths);
            let title = truncate_value(title, total);
            let indent = total.saturating_sub(title.width()) / 2;
            frame.push_spans(&[
                Span::raw(" ".repeat(indent)),
                Span::styled(title, theme().title()),
            ]);
        }

        frame.push_spans(&[rule(&widths, "╭", "┬", "╮")]);
        frame.push_spans(&row_spans(&self.headers, &widths, theme().title()));
        frame.push_spans(&[rule(&widths, "├", "┼", "┤")]);
        for row in &self.rows {
            frame.push_spans(&row_spans(row, &widths, theme().normal()));
        }
        frame.push_spans(&[rule(&widths, "╰", "┴", "╯")]);
        frame
    }

    fn is_complete(&self) -> bool {
        true
    }
}
