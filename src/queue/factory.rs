//! Queue factory for capability-based queue creation.
//!
//! This module provides a factory pattern for selecting a queue
//! implementation from a set of requirements, so callers can describe the
//! queue they need instead of naming an implementation.
//!
//! # Example
//!
//! ```rust
//! use workqueue::queue::{QueueFactory, QueueRequirements};
//!
//! let queue = QueueFactory::create::<String>(
//!     QueueRequirements::new().bounded(1000)
//! ).unwrap();
//! assert!(queue.capabilities().is_bounded);
//! ```

use super::{BlockingQueue, LockFreeQueue, PriorityQueue, WorkQueue};
use crate::core::ConfigError;
use std::sync::Arc;

/// Requirements for queue creation.
///
/// Use the builder pattern to specify what capabilities the queue should
/// have. The factory selects an appropriate implementation based on these
/// requirements.
///
/// # Example
///
/// ```rust
/// use workqueue::queue::QueueRequirements;
///
/// let requirements = QueueRequirements::new().bounded(1000);
/// assert!(requirements.is_bounded());
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueueRequirements {
    /// Maximum capacity (None = unbounded)
    capacity: Option<usize>,

    /// Require a lock-free implementation
    lock_free: bool,

    /// Require priority ordering
    priority: bool,

    /// Require exact size reporting
    exact_size: bool,
}

impl QueueRequirements {
    /// Creates a new empty requirements builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the queue to be bounded with the specified capacity.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn bounded(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Sets the queue to be unbounded.
    ///
    /// This is the default behavior.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn unbounded(mut self) -> Self {
        self.capacity = None;
        self
    }

    /// Requires the queue to use lock-free algorithms.
    ///
    /// Lock-free queues avoid lock contention and are optimal for
    /// high-contention scenarios.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn lock_free(mut self) -> Self {
        self.lock_free = true;
        self
    }

    /// Requires priority ordering.
    ///
    /// Priority queues need items that implement `Ord`, so they are
    /// created through [`QueueFactory::create_priority`] rather than
    /// [`QueueFactory::create`].
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_priority(mut self) -> Self {
        self.priority = true;
        self
    }

    /// Requires the queue to report exact size.
    ///
    /// The lock-free queue only provides an approximate count.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn exact_size(mut self) -> Self {
        self.exact_size = true;
        self
    }

    /// Returns whether a bounded queue is required.
    pub fn is_bounded(&self) -> bool {
        self.capacity.is_some()
    }

    /// Returns the required capacity, if any.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Returns whether lock-free is required.
    pub fn requires_lock_free(&self) -> bool {
        self.lock_free
    }

    /// Returns whether priority ordering is required.
    pub fn requires_priority(&self) -> bool {
        self.priority
    }

    /// Returns whether exact size is required.
    pub fn requires_exact_size(&self) -> bool {
        self.exact_size
    }
}

/// Factory for creating queue implementations based on requirements.
///
/// The factory selects the most appropriate queue implementation for the
/// specified requirements, or returns an error when the combination cannot
/// be satisfied.
///
/// # Example
///
/// ```rust
/// use workqueue::queue::{QueueFactory, QueueRequirements};
///
/// let queue = QueueFactory::create::<u64>(
///     QueueRequirements::new().lock_free()
/// ).unwrap();
/// assert!(queue.capabilities().is_lock_free);
/// ```
pub struct QueueFactory;

impl QueueFactory {
    /// Creates a queue matching the specified requirements.
    ///
    /// # Selection Logic
    ///
    /// | Requirements | Selected Queue |
    /// |-------------|----------------|
    /// | Default | `BlockingQueue` (unbounded) |
    /// | `bounded(N)` | `BlockingQueue` (bounded) |
    /// | `lock_free()` | `LockFreeQueue` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `bounded(0)` (zero capacity holds nothing)
    /// - `lock_free` + `bounded` (the lock-free queue is unbounded)
    /// - `lock_free` + `exact_size` (the lock-free count is approximate)
    /// - `with_priority` (use [`QueueFactory::create_priority`])
    pub fn create<T: Send + 'static>(
        requirements: QueueRequirements,
    ) -> Result<Arc<dyn WorkQueue<T>>, ConfigError> {
        Self::validate(&requirements)?;

        if requirements.priority {
            return Err(ConfigError::unsupported(
                "priority ordering requires Ord items; use QueueFactory::create_priority",
            ));
        }

        if requirements.lock_free {
            return Ok(Arc::new(LockFreeQueue::new()));
        }

        if let Some(capacity) = requirements.capacity {
            return Ok(Arc::new(BlockingQueue::bounded(capacity)));
        }

        Ok(Arc::new(BlockingQueue::unbounded()))
    }

    /// Creates a priority queue matching the specified requirements.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the requirements ask for capabilities the
    /// priority queue does not have (bounded capacity or lock freedom).
    pub fn create_priority<T: Ord + Send + 'static>(
        requirements: QueueRequirements,
    ) -> Result<Arc<dyn WorkQueue<T>>, ConfigError> {
        Self::validate(&requirements)?;

        if requirements.lock_free {
            return Err(ConfigError::unsupported(
                "lock-free priority queue is not supported",
            ));
        }
        if requirements.capacity.is_some() {
            return Err(ConfigError::unsupported(
                "bounded priority queue is not supported",
            ));
        }

        Ok(Arc::new(PriorityQueue::new()))
    }

    /// Creates a default unbounded FIFO queue.
    #[must_use]
    pub fn default_queue<T: Send + 'static>() -> Arc<dyn WorkQueue<T>> {
        Arc::new(BlockingQueue::unbounded())
    }

    /// Creates a queue optimized for high contention.
    ///
    /// Uses the lock-free queue, which avoids mutex convoys when many
    /// threads push and pop at once.
    #[must_use]
    pub fn high_contention<T: Send + 'static>() -> Arc<dyn WorkQueue<T>> {
        Arc::new(LockFreeQueue::new())
    }

    /// Creates a bounded queue that applies backpressure at `capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`QueueFactory::create`] for a
    /// non-panicking variant.
    #[must_use]
    pub fn bounded<T: Send + 'static>(capacity: usize) -> Arc<dyn WorkQueue<T>> {
        Arc::new(BlockingQueue::bounded(capacity))
    }

    /// Checks whether a queue satisfies the given requirements.
    pub fn satisfies<T: Send>(queue: &dyn WorkQueue<T>, requirements: &QueueRequirements) -> bool {
        let caps = queue.capabilities();

        if let Some(required_cap) = requirements.capacity {
            if !caps.is_bounded {
                return false;
            }
            if let Some(actual_cap) = caps.capacity {
                if actual_cap < required_cap {
                    return false;
                }
            }
        }

        if requirements.lock_free && !caps.is_lock_free {
            return false;
        }
        if requirements.priority && !caps.supports_priority {
            return false;
        }
        if requirements.exact_size && !caps.exact_size {
            return false;
        }

        true
    }

    /// Returns a human-readable description of what queue would be created.
    ///
    /// Useful for logging and debugging configuration.
    pub fn describe(requirements: &QueueRequirements) -> String {
        if requirements.priority {
            return "PriorityQueue (priority ordering)".to_string();
        }

        if requirements.lock_free {
            return "LockFreeQueue (unbounded)".to_string();
        }

        if let Some(capacity) = requirements.capacity {
            return format!("BlockingQueue (capacity: {})", capacity);
        }

        "BlockingQueue (unbounded)".to_string()
    }

    fn validate(req: &QueueRequirements) -> Result<(), ConfigError> {
        if req.capacity == Some(0) {
            return Err(ConfigError::invalid_capacity(
                "bounded",
                "capacity must be greater than 0",
            ));
        }

        if req.lock_free && req.capacity.is_some() {
            return Err(ConfigError::unsupported(
                "bounded lock-free queue is not supported",
            ));
        }

        if req.lock_free && req.exact_size {
            return Err(ConfigError::unsupported(
                "the lock-free queue reports an approximate size only",
            ));
        }

        Ok(())
    }
}
