//! Termination-signal forwarding.
//!
//! SIGINT/SIGTERM (or the console Ctrl-C event on Windows) are turned into
//! messages on a channel instead of killing the process, so the owner can
//! unmount and stop the hook before exiting.

use crate::error::{PlatformError, PlatformResult};
use crossbeam_channel::{bounded, Receiver};
use tracing::debug;

/// One `()` per delivered signal.
pub type SignalReceiver = Receiver<()>;

/// Install the process-wide signal handler.
///
/// Can only succeed once per process.
pub fn install_signal_handler() -> PlatformResult<SignalReceiver> {
    let (tx, rx) = bounded(8);
    ctrlc::set_handler(move || {
        debug!("Termination signal received");
        let _ = tx.try_send(());
    })
    .map_err(|e| PlatformError::Signal(e.to_string()))?;
    Ok(rx)
}
