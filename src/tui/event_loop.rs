//! Single-threaded scheduler that drives one widget at a time.
//!
//! Each iteration waits for a key at most until the next tick is due, hands
//! any key to the widget, then ticks the widget and commits its frame. Ctrl-C
//! (or a termination signal) unwinds immediately: the terminal is restored
//! and [`Error::UserCancelled`] is returned.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::buffer::RenderBuffer;
use super::event::Key;
use super::terminal::Surface;
use super::widget::{InputOutcome, Widget, WidgetResult};
use crate::error::{Error, Result};

/// Owns the surface and render buffer for the whole session.
pub struct EventLoop<S: Surface> {
    surface: S,
    buffer: RenderBuffer,
    tick_interval: Duration,
    entered: bool,
}

impl<S: Surface> EventLoop<S> {
    /// Put the surface in raw mode and start a loop ticking every `tick_interval`.
    pub fn new(mut surface: S, tick_interval: Duration) -> Result<Self> {
        surface.enter()?;
        debug!(tick_ms = tick_interval.as_millis() as u64, "Event loop ready");
        Ok(Self {
            surface,
            buffer: RenderBuffer::new(),
            tick_interval: tick_interval.max(Duration::from_millis(1)),
            entered: true,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Whether the surface is still in raw mode.
    pub fn is_active(&self) -> bool {
        self.entered
    }

    /// Run a widget until it completes and return its result.
    pub fn run(&mut self, widget: &mut dyn Widget) -> Result<WidgetResult> {
        self.drive(widget, |_| Ok(()))
    }

    /// Paint a static widget once and move below it.
    pub fn show(&mut self, widget: &mut dyn Widget) -> Result<()> {
        self.run(widget).map(|_| ())
    }

    /// Like [`EventLoop::run`], calling `on_tick` before every tick so the
    /// caller can feed state into the widget or complete it.
    pub fn drive<W, F>(&mut self, widget: &mut W, mut on_tick: F) -> Result<WidgetResult>
    where
        W: Widget + ?Sized,
        F: FnMut(&mut W) -> Result<()>,
    {
        if !self.entered {
            self.surface.enter()?;
            self.entered = true;
        }
        debug!(widget = widget.name(), "Widget started");

        let mut last_tick = Instant::now();
        let mut result = None;
        self.paint(widget, Duration::ZERO)?;

        while result.is_none() && !widget.is_complete() {
            let wait = self.tick_interval.saturating_sub(last_tick.elapsed());
            let key = self.surface.read_key(wait)?;

            if key == Some(Key::Interrupt) || crate::os::termination_requested() {
                return Err(self.cancel());
            }
            match key {
                Some(Key::Resize(cols, rows)) => {
                    debug!(cols, rows, "Resize event");
                    self.buffer.invalidate();
                }
                Some(key) => {
                    if let InputOutcome::Completed(r) = widget.handle_input(key) {
                        result = Some(r);
                    }
                }
                None => {}
            }

            if let Err(e) = on_tick(widget) {
                self.buffer.reset();
                return Err(e);
            }
            let now = Instant::now();
            self.paint(widget, now - last_tick)?;
            last_tick = now;
        }

        self.buffer.reset();
        debug!(widget = widget.name(), "Widget completed");
        Ok(result.unwrap_or(WidgetResult::Done))
    }

    /// Park the cursor below the output and leave raw mode.
    pub fn finish(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.buffer.park(&mut self.surface)?;
        self.entered = false;
        self.surface.exit()
    }

    fn paint<W: Widget + ?Sized>(&mut self, widget: &mut W, elapsed: Duration) -> Result<()> {
        let size = self.surface.size()?;
        let frame = widget.tick(elapsed, size);
        self.buffer.commit(&mut self.surface, &frame)?;
        Ok(())
    }

    fn cancel(&mut self) -> Error {
        warn!("Interrupted by user, restoring terminal");
        self.buffer.reset();
        if let Err(e) = self.finish() {
            warn!("Failed to restore terminal: {}", e);
        }
        Error::UserCancelled
    }
}

impl<S: Surface> Drop for EventLoop<S> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}
