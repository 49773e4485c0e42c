//! Render buffer: diffs each new frame against the last painted one.
//!
//! The buffer owns a screen region that starts at `origin` and is as tall
//! as the last committed frame. Only cells that differ are repainted, and
//! everything is flushed once per commit. A region that would run past
//! the bottom edge scrolls the screen up first; since the painted rows move
//! with the scroll, the stored frame stays valid.

use tracing::debug;

use super::frame::Frame;
use super::style::Cell;
use super::terminal::{Surface, TermSize};
use crate::error::Result;

/// Work done by one commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
    /// Runs of cells written.
    pub writes: usize,
    /// Rows blanked.
    pub clears: usize,
    /// Whether the whole region was repainted.
    pub full_repaint: bool,
}

/// Frame diffing and region bookkeeping for one terminal.
#[derive(Debug, Default)]
pub struct RenderBuffer {
    origin: Option<u16>,
    last: Option<Frame>,
    last_height: usize,
    last_size: Option<TermSize>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// First screen row of the current region, once known.
    pub fn origin(&self) -> Option<u16> {
        self.origin
    }

    /// Forget what is on screen; the next commit repaints everything.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Close the current region. The next commit starts on the row below
    /// the last frame and repaints in full.
    pub fn reset(&mut self) {
        if let Some(origin) = self.origin {
            let next = origin as usize + self.last_height;
            self.origin = Some(next.min(u16::MAX as usize) as u16);
        }
        self.last = None;
        self.last_height = 0;
    }

    /// Paint `frame`, writing only what changed since the last commit.
    pub fn commit<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        frame: &Frame,
    ) -> Result<CommitStats> {
        let size = surface.size()?;
        if self.last_size.is_some_and(|previous| previous != size) {
            debug!(rows = size.rows, cols = size.cols, "Terminal resized, repainting");
            self.invalidate();
        }
        self.last_size = Some(size);

        let visible = clip(frame, size);
        let origin = match self.origin {
            Some(origin) => origin.min(size.rows.saturating_sub(1)),
            None => surface.cursor_row()?,
        };
        // rows of the old region that still exist after a shrink
        let stale = self
            .last_height
            .min((size.rows as usize).saturating_sub(origin as usize));
        let origin = make_room(surface, origin, visible.height().max(stale), size)?;
        self.origin = Some(origin);
        let room = (size.rows as usize).saturating_sub(origin as usize);

        let mut stats = CommitStats {
            full_repaint: self.last.is_none(),
            ..Default::default()
        };

        let previous = self.last.take();
        let height = visible.height().max(stale).min(room);
        for r in 0..height {
            let row = origin + r as u16;
            if r >= visible.height() {
                surface.clear_row(row)?;
                stats.clears += 1;
                continue;
            }
            match &previous {
                None => {
                    surface.clear_row(row)?;
                    stats.clears += 1;
                    let cells = &visible.rows()[r];
                    if !cells.is_empty() {
                        surface.write_cells(row, 0, cells)?;
                        stats.writes += 1;
                    }
                }
                Some(old) => {
                    for (start, end) in changed_runs(old, &visible, r) {
                        let cells: Vec<Cell> = (start..end).map(|c| visible.cell(r, c)).collect();
                        surface.write_cells(row, start as u16, &cells)?;
                        stats.writes += 1;
                    }
                }
            }
        }
        surface.flush()?;

        self.last_height = visible.height();
        self.last = Some(visible);
        Ok(stats)
    }

    /// Leave the cursor on the first free row below everything painted.
    pub fn park<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        let Some(origin) = self.origin else {
            return Ok(());
        };
        let size = surface.size()?;
        let below = origin as usize + self.last_height;
        let row = if below >= size.rows as usize {
            let overflow = below + 1 - size.rows as usize;
            surface.scroll_up(overflow as u16)?;
            size.rows.saturating_sub(1)
        } else {
            below as u16
        };
        surface.park_cursor(row)?;
        surface.flush()?;
        Ok(())
    }
}

/// Clip a frame to the terminal: keep the bottom `rows` rows and the
/// leftmost `cols` columns.
fn clip(frame: &Frame, size: TermSize) -> Frame {
    let mut clipped = Frame::new(size.cols.min(frame.width()));
    let mut copy = frame.clone();
    copy.keep_last(size.rows as usize);
    clipped.extend(copy);
    clipped
}

/// Scroll so that `height` rows fit below `origin`; returns the new origin.
fn make_room<S: Surface + ?Sized>(
    surface: &mut S,
    origin: u16,
    height: usize,
    size: TermSize,
) -> Result<u16> {
    let bottom = origin as usize + height;
    if bottom <= size.rows as usize {
        return Ok(origin);
    }
    let overflow = (bottom - size.rows as usize).min(origin as usize);
    if overflow > 0 {
        surface.scroll_up(overflow as u16)?;
    }
    Ok(origin - overflow as u16)
}

/// Column ranges of row `r` whose cells differ between two frames. Ranges
/// are widened so a double-width glyph is always written whole.
fn changed_runs(old: &Frame, new: &Frame, r: usize) -> Vec<(usize, usize)> {
    let old_len = old.rows().get(r).map_or(0, |row| row.len());
    let new_len = new.rows().get(r).map_or(0, |row| row.len());
    let width = old_len.max(new_len);

    let mut runs: Vec<(usize, usize)> = Vec::new();
    let mut c = 0;
    while c < width {
        if old.cell(r, c) == new.cell(r, c) {
            c += 1;
            continue;
        }
        let mut start = c;
        while c < width && old.cell(r, c) != new.cell(r, c) {
            c += 1;
        }
        let mut end = c;
        if start > 0 && new.cell(r, start).is_continuation() {
            start -= 1;
        }
        if end < width && new.cell(r, end).is_continuation() {
            end += 1;
        }
        match runs.last_mut() {
            Some(last) if last.1 >= start => last.1 = end,
            _ => runs.push((start, end)),
        }
    }
    runs
}
