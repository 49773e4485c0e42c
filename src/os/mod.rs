//! Platform-specific process features.
//!
//! On unix, termination signals (SIGTERM, SIGHUP, SIGQUIT) set a flag the
//! event loop checks every iteration, so a killed session still unwinds
//! through the normal restore path. Elsewhere the flag is never set.

use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(unix)]
pub mod unix;

static TERMINATION_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Install the signal handlers once per process.
#[cfg(unix)]
pub fn install_termination_handlers() {
    unix::install_handlers();
}

#[cfg(not(unix))]
pub fn install_termination_handlers() {}

/// Whether a termination signal arrived since start-up.
pub fn termination_requested() -> bool {
    TERMINATION_REQUESTED.load(Ordering::SeqCst)
}

fn request_termination() {
    TERMINATION_REQUESTED.store(true, Ordering::SeqCst);
}
