//! Race-free shutdown signalling shared by all queue implementations.
//!
//! Shutdown is a one-way, monotonic state transition: once requested it never
//! reverts for the lifetime of the queue. Each queue embeds a [`ShutdownFlag`]
//! and pairs it with its own wakeup mechanism (condition-variable broadcast
//! for the blocking variants, flag observation in the retry loop for the
//! lock-free variant).

use std::sync::atomic::{AtomicBool, Ordering};

/// A monotonic, one-way shutdown flag.
///
/// Raising the flag is idempotent. [`raise`](ShutdownFlag::raise) reports
/// whether this call performed the transition, so the owning queue can
/// broadcast wakeups and log exactly once.
#[derive(Debug, Default)]
pub struct ShutdownFlag {
    requested: AtomicBool,
}

impl ShutdownFlag {
    /// Creates a flag in the not-shut-down state.
    pub fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    /// Requests shutdown. Returns `true` if this call performed the
    /// transition, `false` if shutdown was already requested.
    pub fn raise(&self) -> bool {
        !self.requested.swap(true, Ordering::SeqCst)
    }

    /// Returns `true` once shutdown has been requested.
    pub fn is_raised(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}
