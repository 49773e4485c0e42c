//! Unix signal handling.

use std::sync::Once;

use nix::libc::c_int;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use tracing::{debug, warn};

static INSTALL: Once = Once::new();

const SIGNALS: [Signal; 3] = [Signal::SIGTERM, Signal::SIGHUP, Signal::SIGQUIT];

extern "C" fn on_termination(_signal: c_int) {
    // only async-signal-safe work here
    super::request_termination();
}

pub(super) fn install_handlers() {
    INSTALL.call_once(|| {
        let action = SigAction::new(
            SigHandler::Handler(on_termination),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );
        for signal in SIGNALS {
            // SAFETY: the handler only stores to an atomic.
            match unsafe { sigaction(signal, &action) } {
                Ok(_) => debug!(?signal, "Installed termination handler"),
                Err(e) => warn!(?signal, "Failed to install signal handler: {}", e),
            }
        }
    });
}
