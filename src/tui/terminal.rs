//! Terminal surface: raw mode lifecycle, key input and styled row output.
//!
//! [`Surface`] is the capability set the rest of the toolkit consumes.
//! [`CrosstermSurface`] drives a real terminal; `HeadlessSurface` (in
//! `headless.rs`) stands in for it in tests.

use std::io::{self, BufWriter, IsTerminal, Stdout, Write};
use std::sync::Once;
use std::time::Duration;

use crossterm::{
    cursor::{self, Hide, MoveTo, Show},
    event,
    queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, ScrollUp, disable_raw_mode, enable_raw_mode},
};
use tracing::{debug, info};

use super::event::Key;
use super::style::{Cell, Style};
use crate::error::{Error, Result};

/// Terminal dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub rows: u16,
    pub cols: u16,
}

impl TermSize {
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }
}

/// Raw terminal capabilities used by the event loop and render buffer.
pub trait Surface {
    /// Switch to raw input mode.
    fn enter(&mut self) -> Result<()>;

    /// Restore the mode that was active before [`Surface::enter`]. Idempotent.
    fn exit(&mut self) -> Result<()>;

    /// Wait at most `timeout` for a key. `Ok(None)` means nothing arrived.
    fn read_key(&mut self, timeout: Duration) -> Result<Option<Key>>;

    /// Current size. May change between calls.
    fn size(&self) -> Result<TermSize>;

    /// Row the cursor is on; widgets render from here downwards.
    fn cursor_row(&mut self) -> Result<u16>;

    /// Paint `cells` starting at (`row`, `col`).
    fn write_cells(&mut self, row: u16, col: u16, cells: &[Cell]) -> Result<()>;

    /// Blank an entire row.
    fn clear_row(&mut self, row: u16) -> Result<()>;

    /// Scroll the whole screen up by `lines`.
    fn scroll_up(&mut self, lines: u16) -> Result<()>;

    /// Leave the cursor at the start of `row`.
    fn park_cursor(&mut self, row: u16) -> Result<()>;

    /// Push queued output to the terminal.
    fn flush(&mut self) -> Result<()>;
}

static PANIC_HOOK: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            // Best-effort terminal restoration
            let mut out = io::stdout();
            let _ = queue!(out, ResetColor, SetAttribute(Attribute::Reset), Show);
            let _ = out.flush();
            let _ = disable_raw_mode();
            original_hook(panic_info);
        }));
    });
}

/// Surface backed by the process's stdin/stdout through crossterm.
pub struct CrosstermSurface {
    out: BufWriter<Stdout>,
    active: bool,
}

impl CrosstermSurface {
    /// Probe the environment. Fails with `UnsupportedTerminal` when stdin
    /// or stdout is not an interactive terminal.
    pub fn new() -> Result<Self> {
        if !io::stdout().is_terminal() || !io::stdin().is_terminal() {
            return Err(Error::UnsupportedTerminal(
                "stdin and stdout must both be attached to a terminal".to_string(),
            ));
        }
        terminal::size().map_err(|e| {
            Error::UnsupportedTerminal(format!("cannot query terminal size: {}", e))
        })?;

        Ok(Self {
            out: BufWriter::new(io::stdout()),
            active: false,
        })
    }

    fn apply_style(&mut self, style: Style) -> io::Result<()> {
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        if let Some(fg) = style.fg {
            queue!(self.out, SetForegroundColor(fg))?;
        }
        if let Some(bg) = style.bg {
            queue!(self.out, SetBackgroundColor(bg))?;
        }
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(self.out, SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }
}

impl Surface for CrosstermSurface {
    fn enter(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        crate::os::install_termination_handlers();
        enable_raw_mode()
            .map_err(|e| Error::UnsupportedTerminal(format!("cannot enter raw mode: {}", e)))?;
        self.active = true;
        queue!(self.out, Hide)?;
        self.out.flush()?;
        info!("Terminal entered raw mode");
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        queue!(self.out, ResetColor, SetAttribute(Attribute::Reset), Show)?;
        self.out.flush()?;
        disable_raw_mode()?;
        info!("Terminal restored");
        Ok(())
    }

    fn read_key(&mut self, timeout: Duration) -> Result<Option<Key>> {
        if event::poll(timeout)? {
            Ok(Key::from_event(event::read()?))
        } else {
            Ok(None)
        }
    }

    fn size(&self) -> Result<TermSize> {
        let (cols, rows) = terminal::size()?;
        Ok(TermSize::new(rows, cols))
    }

    fn cursor_row(&mut self) -> Result<u16> {
        self.out.flush()?;
        let (_, row) = cursor::position()?;
        Ok(row)
    }

    fn write_cells(&mut self, row: u16, col: u16, cells: &[Cell]) -> Result<()> {
        queue!(self.out, MoveTo(col, row))?;
        let mut current: Option<Style> = None;
        for cell in cells.iter().filter(|c| !c.is_continuation()) {
            if current != Some(cell.style) {
                self.apply_style(cell.style)?;
                current = Some(cell.style);
            }
            queue!(self.out, Print(cell.ch))?;
        }
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        Ok(())
    }

    fn clear_row(&mut self, row: u16) -> Result<()> {
        queue!(self.out, MoveTo(0, row), Clear(ClearType::CurrentLine))?;
        Ok(())
    }

    fn scroll_up(&mut self, lines: u16) -> Result<()> {
        debug!(lines, "Scrolling screen to make room");
        queue!(self.out, ScrollUp(lines))?;
        Ok(())
    }

    fn park_cursor(&mut self, row: u16) -> Result<()> {
        queue!(self.out, MoveTo(0, row))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for CrosstermSurface {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
