// SPDX-License-Identifier: GPL-3.0-only

//! Shutdown signalling
//!
//! An external interrupt never aborts mid-frame. The signal handler only
//! sets an atomic flag; the capture loop observes it at its end-of-frame
//! checkpoint and winds down through the normal teardown path. SIGUSR1 is
//! reserved for future interactive-capture triggering and is explicitly
//! ignored.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Cloneable handle to the process-wide shutdown flag
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the capture loop to stop after the current frame
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Checked by the loop at well-defined checkpoints
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Install the interrupt handler and swallow the reserved signal.
///
/// Must run before the camera or renderer come up so an early Ctrl+C still
/// reaches the orderly teardown path.
pub fn install_signal_handlers(flag: &ShutdownFlag) -> Result<(), ctrlc::Error> {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGUSR1, libc::SIG_IGN);
    }

    let flag = flag.clone();
    ctrlc::set_handler(move || {
        info!("Interrupt received, finishing current frame");
        flag.request();
    })
}
