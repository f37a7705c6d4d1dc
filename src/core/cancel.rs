/*!
# Cooperative Cancellation

A shared monotone shutdown flag. Solver loops sample it at safe points and
wind down in bounded time once it is set; timeouts arm a deadline thread that
sets the very same flag, and the binaries register termination signals onto
it. Once set, the flag stays set for the process lifetime.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::core::error::{Result, TreedecError};

/// Cloneable handle to the process-wide shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag. Irreversible.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns true once the flag has been set.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Returns `Err(Cancelled)` once the flag has been set.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(TreedecError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// The underlying atomic, for signal-handler registration.
    pub fn as_arc(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Arms a deadline thread that sets the flag after `duration`.
    pub fn cancel_after(&self, duration: Duration) {
        let flag = Arc::clone(&self.flag);
        std::thread::spawn(move || {
            std::thread::sleep(duration);
            flag.store(true, Ordering::SeqCst);
        });
    }
}
