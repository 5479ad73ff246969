//! # Work Queue
//!
//! Concurrent multi-producer multi-consumer work queues with blocking,
//! lock-free, and priority-ordered implementations behind one trait.
//!
//! ## Features
//!
//! - **Blocking Queue**: mutex + condition-variable FIFO queue, optionally
//!   bounded with backpressure on `push`
//! - **Lock-Free Queue**: Michael–Scott CAS-based queue with epoch-based
//!   memory reclamation, built on crossbeam
//! - **Priority Queue**: binary-heap queue ordered by the item's `Ord`,
//!   with FIFO delivery among equal items
//! - **Graceful Shutdown**: idempotent one-way shutdown that rejects new
//!   items while consumers drain the backlog
//! - **Exactly-Once Delivery**: every pushed item is handed to exactly one
//!   consumer, across all implementations
//!
//! ## Quick Start
//!
//! ```rust
//! use workqueue::prelude::*;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(BlockingQueue::bounded(100));
//!
//! // Producers push, consumers pop, any number of each.
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         for i in 0..10 {
//!             queue.push(i).unwrap();
//!         }
//!     })
//! };
//!
//! let consumer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         let mut sum = 0;
//!         while let Some(item) = queue.pop() {
//!             sum += item;
//!         }
//!         sum
//!     })
//! };
//!
//! producer.join().unwrap();
//! queue.shutdown();
//! assert_eq!(consumer.join().unwrap(), 45);
//! ```
//!
//! ## Choosing a Queue
//!
//! ```rust
//! use workqueue::prelude::*;
//!
//! // Describe the queue you need and let the factory pick.
//! let queue = QueueFactory::create::<String>(
//!     QueueRequirements::new().lock_free()
//! ).unwrap();
//! assert!(queue.supports(CapabilityFlags::LOCK_FREE));
//! ```
//!
//! ## Priority Ordering
//!
//! ```rust
//! use workqueue::prelude::*;
//!
//! let queue = PriorityQueue::new();
//! queue.push(Prioritized::new(Priority::Low, "cleanup")).unwrap();
//! queue.push(Prioritized::new(Priority::Critical, "page")).unwrap();
//!
//! assert_eq!(queue.pop().unwrap().into_value(), "page");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod prelude;
pub mod queue;

pub use core::{ConfigError, Prioritized, Priority, QueueError, QueueResult, ShutdownFlag};
pub use queue::{
    BlockingQueue, CapabilityFlags, LockFreeQueue, PriorityQueue, QueueCapabilities, QueueFactory,
    QueueRequirements, WorkQueue,
};
