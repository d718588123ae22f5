//! Call gate: one state-mutating engine call at a time.
//!
//! The gate is a busy flag, not a lock. While a swap or cancel is running,
//! every other attempt to enter fails with [`SwapError::ReentrantCall`]
//! instead of waiting, whichever thread it comes from. A ledger callback
//! that hands work to a helper thread is rejected the same way as one that
//! calls back directly, and nothing ever blocks on the gate.

use std::sync::atomic::{AtomicBool, Ordering};

use openswap_types::{Result, SwapError};

/// Busy flag guarding the engine's mutating calls.
#[derive(Debug, Default)]
pub struct CallGate {
    busy: AtomicBool,
}

impl CallGate {
    /// An idle gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate for one call.
    ///
    /// # Errors
    /// [`SwapError::ReentrantCall`] if a call is already in progress.
    pub fn enter(&self) -> Result<CallScope<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Reentrant call rejected");
            return Err(SwapError::ReentrantCall);
        }
        Ok(CallScope { busy: &self.busy })
    }

    /// Whether a call is in progress.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof that the current call holds the gate.
///
/// Dropping the scope releases the gate, on every exit path.
#[derive(Debug)]
pub struct CallScope<'a> {
    busy: &'a AtomicBool,
}

impl Drop for CallScope<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
