//! Cursor movement shared by list widgets

use std::ops::Range;

/// List widgets with a wrapping cursor
pub trait Selectable {
    /// Total number of options
    fn count(&self) -> usize;
    /// Current cursor index
    fn cursor(&self) -> usize;
    /// Set the cursor; callers pass an index already in range
    fn set_cursor(&mut self, index: usize);

    /// Move down, wrapping from the last option to the first
    fn next(&mut self) {
        let count = self.count();
        if count == 0 {
            return;
        }
        self.set_cursor((self.cursor() + 1) % count);
        self.check_cursor();
    }

    /// Move up, wrapping from the first option to the last
    fn prev(&mut self) {
        let count = self.count();
        if count == 0 {
            return;
        }
        let prev = if self.cursor() == 0 {
            count - 1
        } else {
            self.cursor() - 1
        };
        self.set_cursor(prev);
        self.check_cursor();
    }

    /// Jump to an index, wrapping out-of-range values
    fn select(&mut self, index: usize) {
        let count = self.count();
        if count == 0 {
            return;
        }
        self.set_cursor(index % count);
    }

    /// Panics in debug builds if the cursor left `[0, count)`
    fn check_cursor(&self) {
        debug_assert!(
            self.cursor() < self.count(),
            "cursor {} out of range for {} options",
            self.cursor(),
            self.count()
        );
    }
}

/// Scroll window over a list taller than the screen. Keeps its offset
/// between frames so the list only moves when the cursor reaches an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
}

impl Viewport {
    /// Items of a `count`-long list to draw in `rows` lines with `cursor`
    /// on screen.
    pub fn scroll(&mut self, cursor: usize, count: usize, rows: usize) -> Range<usize> {
        let rows = rows.max(1);
        if count <= rows {
            self.offset = 0;
            return 0..count;
        }
        if cursor < self.offset {
            self.offset = cursor;
        } else if cursor >= self.offset + rows {
            self.offset = cursor + 1 - rows;
        }
        self.offset = self.offset.min(count - rows);
        self.offset..self.offset + rows
    }
}
