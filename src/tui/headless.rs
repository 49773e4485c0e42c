//! In-memory terminal for tests and non-interactive hosts.
//!
//! Keys are injected through a [`KeySender`], output lands on a virtual
//! screen, and every paint operation is recorded so callers can assert on
//! how much was written.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use super::event::Key;
use super::style::Cell;
use super::terminal::{Surface, TermSize};
use crate::error::Result;

/// A paint operation recorded by [`HeadlessSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    Write { row: u16, col: u16, len: usize },
    Clear { row: u16 },
    Scroll { lines: u16 },
}

/// Handle for feeding keys to a [`HeadlessSurface`] from any thread.
#[derive(Debug, Clone)]
pub struct KeySender(Sender<Key>);

impl KeySender {
    /// Queue a key. Silently dropped once the surface is gone.
    pub fn send(&self, key: Key) {
        let _ = self.0.send(key);
    }

    /// Queue every character of `text` as `Key::Char`.
    pub fn send_text(&self, text: &str) {
        for ch in text.chars() {
            self.send(if ch == ' ' { Key::Space } else { Key::Char(ch) });
        }
    }
}

/// Virtual terminal screen.
pub struct HeadlessSurface {
    size: TermSize,
    screen: Vec<Vec<Cell>>,
    start_row: u16,
    cursor_row: u16,
    keys: Receiver<Key>,
    sender: Sender<Key>,
    ops: Vec<SurfaceOp>,
    flushes: usize,
    active: bool,
    enter_count: usize,
    exit_count: usize,
}

impl HeadlessSurface {
    pub fn new(rows: u16, cols: u16) -> Self {
        let (sender, keys) = mpsc::channel();
        Self {
            size: TermSize::new(rows, cols),
            screen: vec![vec![Cell::blank(); cols as usize]; rows as usize],
            start_row: 0,
            cursor_row: 0,
            keys,
            sender,
            ops: Vec::new(),
            flushes: 0,
            active: false,
            enter_count: 0,
            exit_count: 0,
        }
    }

    /// Report `row` as the cursor position at start, as if earlier shell
    /// output occupied the rows above.
    pub fn starting_at(mut self, row: u16) -> Self {
        self.start_row = row;
        self
    }

    pub fn key_sender(&self) -> KeySender {
        KeySender(self.sender.clone())
    }

    /// Text of each screen row with trailing blanks removed.
    pub fn screen_lines(&self) -> Vec<String> {
        self.screen
            .iter()
            .map(|row| {
                let line: String = row
                    .iter()
                    .filter(|c| !c.is_continuation())
                    .map(|c| c.ch)
                    .collect();
                line.trim_end().to_string()
            })
            .collect()
    }

    /// Screen rows joined with newlines, trailing empty rows dropped.
    pub fn screen_text(&self) -> String {
        let mut lines = self.screen_lines();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    pub fn cell(&self, row: u16, col: u16) -> Cell {
        self.screen
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or_default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Number of cell-painting operations so far.
    pub fn write_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Write { .. }))
            .count()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn enter_count(&self) -> usize {
        self.enter_count
    }

    pub fn exit_count(&self) -> usize {
        self.exit_count
    }

    /// Where the cursor was left by the last [`Surface::park_cursor`].
    pub fn parked_row(&self) -> u16 {
        self.cursor_row
    }

    fn resize(&mut self, rows: u16, cols: u16) {
        self.size = TermSize::new(rows, cols);
        self.screen.resize(rows as usize, vec![Cell::blank(); cols as usize]);
        for row in &mut self.screen {
            row.resize(cols as usize, Cell::blank());
        }
    }
}

impl Surface for HeadlessSurface {
    fn enter(&mut self) -> Result<()> {
        if !self.active {
            self.active = true;
            self.enter_count += 1;
            self.cursor_row = self.start_row.min(self.size.rows.saturating_sub(1));
        }
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        if self.active {
            self.active = false;
            self.exit_count += 1;
        }
        Ok(())
    }

    fn read_key(&mut self, timeout: Duration) -> Result<Option<Key>> {
        match self.keys.recv_timeout(timeout) {
            Ok(Key::Resize(cols, rows)) => {
                self.resize(rows, cols);
                Ok(Some(Key::Resize(cols, rows)))
            }
            Ok(key) => Ok(Some(key)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => Ok(None),
        }
    }

    fn size(&self) -> Result<TermSize> {
        Ok(self.size)
    }

    fn cursor_row(&mut self) -> Result<u16> {
        Ok(self.cursor_row)
    }

    fn write_cells(&mut self, row: u16, col: u16, cells: &[Cell]) -> Result<()> {
        self.ops.push(SurfaceOp::Write {
            row,
            col,
            len: cells.len(),
        });
        if let Some(line) = self.screen.get_mut(row as usize) {
            for (offset, cell) in cells.iter().enumerate() {
                if let Some(slot) = line.get_mut(col as usize + offset) {
                    *slot = *cell;
                }
            }
        }
        Ok(())
    }

    fn clear_row(&mut self, row: u16) -> Result<()> {
        self.ops.push(SurfaceOp::Clear { row });
        if let Some(line) = self.screen.get_mut(row as usize) {
            line.iter_mut().for_each(|c| *c = Cell::blank());
        }
        Ok(())
    }

    fn scroll_up(&mut self, lines: u16) -> Result<()> {
        self.ops.push(SurfaceOp::Scroll { lines });
        let cols = self.size.cols as usize;
        for _ in 0..lines.min(self.size.rows) {
            self.screen.remove(0);
            self.screen.push(vec![Cell::blank(); cols]);
        }
        Ok(())
    }

    fn park_cursor(&mut self, row: u16) -> Result<()> {
        self.cursor_row = row;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
