//! Convenient re-exports for common types and traits

pub use crate::core::{ConfigError, Prioritized, Priority, QueueError, QueueResult, ShutdownFlag};
pub use crate::queue::{
    BlockingQueue, CapabilityFlags, LockFreeQueue, PriorityQueue, QueueCapabilities, QueueFactory,
    QueueRequirements, WorkQueue,
};
