//! Core types shared by all queue implementations

pub mod error;
pub mod priority;
pub mod shutdown;

pub use error::{ConfigError, QueueError, QueueResult};
pub use priority::{Prioritized, Priority};
pub use shutdown::ShutdownFlag;
