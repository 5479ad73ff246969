//! Error types for the work queue system

use std::fmt;

/// Result type for queue operations.
///
/// `V` is the success value and `T` the item type, so that rejecting variants
/// of [`QueueError`] can hand the item back to the caller.
pub type QueueResult<V, T> = std::result::Result<V, QueueError<T>>;

/// Errors that can occur during queue operations.
///
/// Variants that reject an item carry it back to the caller, allowing a retry
/// or alternative handling without cloning. Shutdown rejection is an expected
/// condition, not an exceptional one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError<T> {
    /// Queue is full (bounded queues, non-blocking push)
    Full(T),
    /// Queue has been shut down and no longer accepts items
    Closed(T),
    /// Queue is momentarily empty (try_pop, or pop_timeout expiring)
    Empty,
    /// Queue has been shut down and fully drained; no item will ever arrive
    Disconnected,
    /// Operation timed out; the item was not enqueued
    Timeout(T),
}

impl<T> QueueError<T> {
    /// Returns the rejected item, if this error carries one.
    pub fn into_item(self) -> Option<T> {
        match self {
            QueueError::Full(item) | QueueError::Closed(item) | QueueError::Timeout(item) => {
                Some(item)
            }
            QueueError::Empty | QueueError::Disconnected => None,
        }
    }

    /// Returns `true` if this error was caused by queue shutdown.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, QueueError::Closed(_) | QueueError::Disconnected)
    }
}

impl<T> fmt::Display for QueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Full(_) => write!(f, "queue is full"),
            QueueError::Closed(_) => write!(f, "queue is shut down"),
            QueueError::Empty => write!(f, "queue is empty"),
            QueueError::Disconnected => write!(f, "queue is shut down and drained"),
            QueueError::Timeout(_) => write!(f, "operation timed out"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for QueueError<T> {}

/// Errors produced when constructing a queue from an invalid configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Requested capacity is not usable for the requested queue kind
    #[error("Invalid capacity for '{queue_kind}' queue: {message}")]
    InvalidCapacity {
        /// Kind of queue being configured
        queue_kind: &'static str,
        /// Why the capacity was rejected
        message: String,
    },

    /// Requested capabilities cannot be satisfied by any implementation
    #[error("Unsupported queue configuration: {message}")]
    Unsupported {
        /// Which combination of requirements conflicted
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid capacity error
    pub fn invalid_capacity(queue_kind: &'static str, message: impl Into<String>) -> Self {
        ConfigError::InvalidCapacity {
            queue_kind,
            message: message.into(),
        }
    }

    /// Create an unsupported configuration error
    pub fn unsupported(message: impl Into<String>) -> Self {
        ConfigError::Unsupported {
            message: message.into(),
        }
    }
}
