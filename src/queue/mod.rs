//! Queue abstractions for interchangeable MPMC hand-off implementations.
//!
//! This module provides the [`WorkQueue`] trait that abstracts the
//! push/pop/shutdown contract, enabling the blocking, lock-free, and priority
//! implementations to be used interchangeably.
//!
//! # Built-in Implementations
//!
//! - [`BlockingQueue`]: mutex + condition-variable FIFO queue, optionally bounded
//! - [`LockFreeQueue`]: Michael–Scott CAS-based queue with epoch reclamation
//! - [`PriorityQueue`]: priority-ordered variant keyed by the item's `Ord`
//!
//! # Queue Capability Introspection
//!
//! All queues report their characteristics via [`QueueCapabilities`]:
//!
//! ```rust
//! use workqueue::queue::{BlockingQueue, CapabilityFlags, WorkQueue};
//!
//! let queue: BlockingQueue<u32> = BlockingQueue::bounded(64);
//! assert!(queue.supports(CapabilityFlags::BOUNDED | CapabilityFlags::BLOCKING));
//! println!("{}", queue.capabilities().describe());
//! ```

mod blocking;
mod factory;
mod lockfree;
mod priority;

pub use blocking::BlockingQueue;
pub use factory::{QueueFactory, QueueRequirements};
pub use lockfree::LockFreeQueue;
pub use priority::PriorityQueue;

use crate::core::QueueResult;
use bitflags::bitflags;
use std::time::Duration;

bitflags! {
    /// Flags for specifying required queue capabilities.
    ///
    /// Combine flags to express multiple requirements, then check them with
    /// [`WorkQueue::supports()`] or [`QueueCapabilities::satisfies()`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CapabilityFlags: u32 {
        /// Require a bounded queue (has maximum capacity)
        const BOUNDED = 1 << 0;
        /// Require an unbounded queue (no maximum capacity)
        const UNBOUNDED = 1 << 1;
        /// Require lock-free operations
        const LOCK_FREE = 1 << 2;
        /// Require priority ordering support
        const PRIORITY = 1 << 3;
        /// Require exact size reporting
        const EXACT_SIZE = 1 << 4;
        /// Require blocking push/pop support
        const BLOCKING = 1 << 5;
        /// Require timeout operations support
        const TIMEOUT = 1 << 6;
    }
}

/// Capabilities of a queue implementation for runtime introspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueCapabilities {
    /// Whether the queue has a maximum capacity
    pub is_bounded: bool,
    /// Maximum capacity if bounded (None for unbounded)
    pub capacity: Option<usize>,
    /// Whether the queue uses lock-free algorithms
    pub is_lock_free: bool,
    /// Whether the queue supports priority ordering
    pub supports_priority: bool,
    /// Whether `len()` returns an exact count (vs approximate)
    pub exact_size: bool,
    /// Whether the queue supports blocking operations
    pub supports_blocking: bool,
    /// Whether the queue supports timeout operations
    pub supports_timeout: bool,
    /// Queue implementation name for debugging/logging
    pub implementation_name: &'static str,
}

impl QueueCapabilities {
    /// Creates capabilities for the mutex + condvar queue.
    pub fn blocking(capacity: Option<usize>) -> Self {
        Self {
            is_bounded: capacity.is_some(),
            capacity,
            is_lock_free: false,
            supports_priority: false,
            exact_size: true,
            supports_blocking: true,
            supports_timeout: true,
            implementation_name: "BlockingQueue",
        }
    }

    /// Creates capabilities for the lock-free queue.
    pub fn lock_free() -> Self {
        Self {
            is_bounded: false,
            capacity: None,
            is_lock_free: true,
            supports_priority: false,
            exact_size: false,
            supports_blocking: true,
            supports_timeout: true,
            implementation_name: "LockFreeQueue",
        }
    }

    /// Creates capabilities for the priority queue.
    pub fn priority() -> Self {
        Self {
            is_bounded: false,
            capacity: None,
            is_lock_free: false,
            supports_priority: true,
            exact_size: true,
            supports_blocking: true,
            supports_timeout: true,
            implementation_name: "PriorityQueue",
        }
    }

    /// Returns a human-readable description of the queue capabilities.
    pub fn describe(&self) -> String {
        let mut features = Vec::new();

        if self.is_bounded {
            if let Some(cap) = self.capacity {
                features.push(format!("bounded({})", cap));
            } else {
                features.push("bounded".to_string());
            }
        } else {
            features.push("unbounded".to_string());
        }

        if self.is_lock_free {
            features.push("lock-free".to_string());
        }
        if self.supports_priority {
            features.push("priority".to_string());
        }
        if self.exact_size {
            features.push("exact-size".to_string());
        }

        format!("{}: [{}]", self.implementation_name, features.join(", "))
    }

    /// Checks if these capabilities satisfy the given flags.
    ///
    /// Returns `true` if all required capabilities are present.
    pub fn satisfies(&self, flags: CapabilityFlags) -> bool {
        if flags.contains(CapabilityFlags::BOUNDED) && !self.is_bounded {
            return false;
        }
        if flags.contains(CapabilityFlags::UNBOUNDED) && self.is_bounded {
            return false;
        }
        if flags.contains(CapabilityFlags::LOCK_FREE) && !self.is_lock_free {
            return false;
        }
        if flags.contains(CapabilityFlags::PRIORITY) && !self.supports_priority {
            return false;
        }
        if flags.contains(CapabilityFlags::EXACT_SIZE) && !self.exact_size {
            return false;
        }
        if flags.contains(CapabilityFlags::BLOCKING) && !self.supports_blocking {
            return false;
        }
        if flags.contains(CapabilityFlags::TIMEOUT) && !self.supports_timeout {
            return false;
        }
        true
    }
}

/// Trait for MPMC work queue implementations.
///
/// Any number of producer threads may call the push operations while any
/// number of consumer threads call the pop operations. Every item pushed
/// successfully is handed to exactly one consumer.
///
/// # Shutdown protocol
///
/// [`shutdown()`](WorkQueue::shutdown) is idempotent and one-way. After it is
/// called, push operations are rejected with `Closed` (the item is handed
/// back), while pop operations drain the remaining backlog and then report
/// the queue as finished (`None` / `Disconnected`) permanently.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow sharing across threads,
/// typically behind an `Arc`.
pub trait WorkQueue<T: Send>: Send + Sync {
    /// Pushes an item, blocking while a bounded queue is full.
    ///
    /// # Errors
    ///
    /// Returns `Closed(item)` if the queue has been shut down; the caller
    /// retains ownership of the item.
    fn push(&self, item: T) -> QueueResult<(), T>;

    /// Attempts to push without blocking.
    ///
    /// # Errors
    ///
    /// - `Full(item)` if a bounded queue is at capacity
    /// - `Closed(item)` if the queue has been shut down
    fn try_push(&self, item: T) -> QueueResult<(), T>;

    /// Pushes with a bounded wait for space.
    ///
    /// # Errors
    ///
    /// - `Timeout(item)` if no space appeared within `timeout`
    /// - `Closed(item)` if the queue has been shut down
    fn push_timeout(&self, item: T, timeout: Duration) -> QueueResult<(), T>;

    /// Pops an item, blocking until one is available or the queue has been
    /// shut down and drained.
    ///
    /// Returns `None` only in the latter case, and then permanently: once a
    /// queue has reported itself finished it never yields another item.
    fn pop(&self) -> Option<T>;

    /// Attempts to pop without blocking.
    ///
    /// # Errors
    ///
    /// - `Empty` if no item was available right now
    /// - `Disconnected` if the queue has been shut down and drained
    fn try_pop(&self) -> QueueResult<T, T>;

    /// Pops with a bounded wait, distinguishing all three outcomes.
    ///
    /// # Returns
    ///
    /// - `Ok(item)` if an item arrived within the timeout
    /// - `Err(Empty)` if the wait timed out (more items may still arrive)
    /// - `Err(Disconnected)` if the queue has been shut down and drained
    fn pop_timeout(&self, timeout: Duration) -> QueueResult<T, T>;

    /// Shuts the queue down, rejecting new items while letting consumers
    /// drain the backlog. Idempotent; wakes every blocked producer and
    /// consumer.
    fn shutdown(&self);

    /// Returns `true` once shutdown has been requested.
    fn is_shutdown(&self) -> bool;

    /// Returns the current number of queued items.
    ///
    /// Advisory only: the value may be stale the instant it returns under
    /// concurrent use. Check [`QueueCapabilities::exact_size`] to determine
    /// whether the count is exact at a quiescent point.
    fn len(&self) -> usize;

    /// Returns `true` if the queue is empty. Advisory, like `len()`.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the capabilities of this queue implementation.
    fn capabilities(&self) -> QueueCapabilities;

    /// Checks if this queue supports the required capabilities.
    fn supports(&self, flags: CapabilityFlags) -> bool {
        self.capabilities().satisfies(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_blocking() {
        let caps = QueueCapabilities::blocking(Some(100));
        assert!(caps.is_bounded);
        assert_eq!(caps.capacity, Some(100));
        assert!(!caps.is_lock_free);
        assert!(caps.exact_size);
        assert!(caps.supports_blocking);
        assert!(caps.supports_timeout);
        assert_eq!(caps.implementation_name, "BlockingQueue");

        let caps = QueueCapabilities::blocking(None);
        assert!(!caps.is_bounded);
        assert!(caps.capacity.is_none());
    }

    #[test]
    fn test_capabilities_lock_free() {
        let caps = QueueCapabilities::lock_free();
        assert!(!caps.is_bounded);
        assert!(caps.is_lock_free);
        assert!(!caps.supports_priority);
        assert!(!caps.exact_size);
        assert_eq!(caps.implementation_name, "LockFreeQueue");
    }

    #[test]
    fn test_capabilities_priority() {
        let caps = QueueCapabilities::priority();
        assert!(caps.supports_priority);
        assert!(!caps.is_lock_free);
        assert!(caps.exact_size);
        assert_eq!(caps.implementation_name, "PriorityQueue");
    }

    #[test]
    fn test_capabilities_describe() {
        let desc = QueueCapabilities::blocking(Some(8)).describe();
        assert!(desc.contains("BlockingQueue"));
        assert!(desc.contains("bounded(8)"));
        assert!(desc.contains("exact-size"));

        let desc = QueueCapabilities::lock_free().describe();
        assert!(desc.contains("unbounded"));
        assert!(desc.contains("lock-free"));

        let desc = QueueCapabilities::priority().describe();
        assert!(desc.contains("priority"));
    }

    #[test]
    fn test_capabilities_satisfies() {
        let caps = QueueCapabilities::lock_free();

        assert!(caps.satisfies(CapabilityFlags::LOCK_FREE));
        assert!(caps.satisfies(CapabilityFlags::UNBOUNDED));
        assert!(caps.satisfies(CapabilityFlags::LOCK_FREE | CapabilityFlags::TIMEOUT));

        assert!(!caps.satisfies(CapabilityFlags::BOUNDED));
        assert!(!caps.satisfies(CapabilityFlags::PRIORITY));
        assert!(!caps.satisfies(CapabilityFlags::EXACT_SIZE));
        assert!(!caps.satisfies(CapabilityFlags::LOCK_FREE | CapabilityFlags::PRIORITY));
    }

    #[test]
    fn test_capability_flags_combinations() {
        let flags = CapabilityFlags::LOCK_FREE | CapabilityFlags::UNBOUNDED;
        assert!(flags.contains(CapabilityFlags::LOCK_FREE));
        assert!(flags.contains(CapabilityFlags::UNBOUNDED));
        assert!(!flags.contains(CapabilityFlags::BOUNDED));
    }
}
