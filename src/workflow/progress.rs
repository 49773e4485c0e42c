//! Progress channel between a running action and the tick loop.
//!
//! The channel holds at most one pending report. A new report overwrites an
//! unread one, keeping the unread percent or message when the new report
//! leaves that field out, so the loop sees one merged update per tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::tui::widget::{Percent, ProgressReport};

/// Sleep slice used by [`ProgressHandle::wait`] between cancellation checks.
const WAIT_SLICE: Duration = Duration::from_millis(20);

#[derive(Debug, Default)]
struct Shared {
    slot: Mutex<Option<ProgressReport>>,
    cancelled: AtomicBool,
}

/// Handed to an action so it can report progress and notice cancellation.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    shared: Arc<Shared>,
}

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a percentage and a status message.
    pub fn report(&self, percent: impl Into<Percent>, message: impl Into<String>) {
        self.publish(ProgressReport {
            percent: percent.into(),
            message: Some(message.into()),
        });
    }

    /// Publish a percentage, keeping the last message.
    pub fn percent(&self, percent: u8) {
        self.publish(ProgressReport {
            percent: Percent::from(percent),
            message: None,
        });
    }

    /// Publish a message, keeping the last percentage.
    pub fn message(&self, message: impl Into<String>) {
        self.publish(ProgressReport {
            percent: Percent::Indeterminate,
            message: Some(message.into()),
        });
    }

    /// Whether the session was interrupted. Long actions should poll this
    /// and return early.
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    /// Sleep up to `duration`, waking early on cancellation. Returns false
    /// if cancelled.
    pub fn wait(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(WAIT_SLICE.min(deadline - now));
        }
    }

    /// Take the pending report, leaving the slot empty.
    pub fn take_report(&self) -> Option<ProgressReport> {
        self.slot().take()
    }

    pub(crate) fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
    }

    fn publish(&self, report: ProgressReport) {
        let mut slot = self.slot();
        let merged = match slot.take() {
            Some(unread) => ProgressReport {
                percent: match report.percent {
                    Percent::Indeterminate => unread.percent,
                    determinate => determinate,
                },
                message: report.message.or(unread.message),
            },
            None => report,
        };
        *slot = Some(merged);
    }

    fn slot(&self) -> MutexGuard<'_, Option<ProgressReport>> {
        self.shared
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_report_wins() {
        let handle = ProgressHandle::new();
        handle.report(10, "first");
        handle.report(20, "second");
        assert_eq!(
            handle.take_report(),
            Some(ProgressReport {
                percent: Percent::Determinate(20),
                message: Some("second".into()),
            })
        );
        assert_eq!(handle.take_report(), None);
    }

    #[test]
    fn partial_reports_merge_with_unread_one() {
        let handle = ProgressHandle::new();
        handle.report(40, "copying");
        handle.percent(60);
        handle.message("almost");
        assert_eq!(
            handle.take_report(),
            Some(ProgressReport {
                percent: Percent::Determinate(60),
                message: Some("almost".into()),
            })
        );
    }

    #[test]
    fn reports_cross_threads() {
        let handle = ProgressHandle::new();
        let worker = handle.clone();
        std::thread::spawn(move || worker.percent(75))
            .join()
            .unwrap();
        assert_eq!(
            handle.take_report().map(|r| r.percent),
            Some(Percent::Determinate(75))
        );
    }

    #[test]
    fn wait_returns_early_when_cancelled() {
        let handle = ProgressHandle::new();
        let worker = handle.clone();
        let started = Instant::now();
        let waiter = std::thread::spawn(move || worker.wait(Duration::from_secs(10)));
        handle.cancel();
        assert!(!waiter.join().unwrap());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(handle.is_cancelled());
    }

    #[test]
    fn wait_completes_without_cancel() {
        let handle = ProgressHandle::new();
        assert!(handle.wait(Duration::from_millis(5)));
    }
}
