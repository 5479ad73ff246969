//! Blocking FIFO queue built on a mutex and condition variables.

use super::{QueueCapabilities, WorkQueue};
use crate::core::{QueueError, QueueResult, ShutdownFlag};
use log::debug;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A blocking MPMC FIFO queue, optionally bounded.
///
/// The baseline implementation: a `VecDeque` guarded by a mutex, with two
/// condition variables for the not-empty and not-full predicates. A bounded
/// queue applies backpressure by blocking producers until a consumer frees a
/// slot or the queue shuts down.
///
/// Items are delivered in the order their pushes completed. Each successful
/// push wakes a single waiting consumer; only shutdown broadcasts to all
/// waiters.
///
/// # Example
///
/// ```rust
/// use workqueue::queue::{BlockingQueue, WorkQueue};
///
/// let queue = BlockingQueue::unbounded();
/// queue.push(42).unwrap();
/// assert_eq!(queue.pop(), Some(42));
///
/// queue.shutdown();
/// assert_eq!(queue.push(7).err().and_then(|e| e.into_item()), Some(7));
/// assert_eq!(queue.pop(), None);
/// ```
pub struct BlockingQueue<T> {
    inner: Mutex<VecDeque<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: Option<usize>,
    shutdown: ShutdownFlag,
}

impl<T> BlockingQueue<T> {
    /// Creates a new unbounded queue. Pushes never block.
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    /// Creates a new bounded queue with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. Use [`QueueRequirements`] for fallible
    /// construction.
    ///
    /// [`QueueRequirements`]: super::QueueRequirements
    pub fn bounded(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        Self::with_capacity(Some(capacity))
    }

    fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            shutdown: ShutdownFlag::new(),
        }
    }

    /// Returns the maximum capacity, or `None` if unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn is_full(&self, len: usize) -> bool {
        self.capacity.map_or(false, |cap| len >= cap)
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T: Send> WorkQueue<T> for BlockingQueue<T> {
    fn push(&self, item: T) -> QueueResult<(), T> {
        let mut guard = self.inner.lock();
        if self.shutdown.is_raised() {
            return Err(QueueError::Closed(item));
        }
        while self.is_full(guard.len()) {
            self.not_full.wait(&mut guard);
            // the wake may be spurious or a shutdown broadcast
            if self.shutdown.is_raised() {
                return Err(QueueError::Closed(item));
            }
        }
        guard.push_back(item);
        drop(guard);
        self.not_empty.notify_one();
        Ok(())
    }

    fn try_push(&self, item: T) -> QueueResult<(), T> {
        let mut guard = self.inner.lock();
        if self.shutdown.is_raised() {
            return Err(QueueError::Closed(item));
        }
        if self.is_full(guard.len()) {
            return Err(QueueError::Full(item));
        }
        guard.push_back(item);
        drop(guard);
        self.not_empty.notify_one();
        Ok(())
    }

    fn push_timeout(&self, item: T, timeout: Duration) -> QueueResult<(), T> {
        let deadline = Instant::now() + timeout;
        let mut guard = self.inner.lock();
        if self.shutdown.is_raised() {
            return Err(QueueError::Closed(item));
        }
        while self.is_full(guard.len()) {
            let result = self.not_full.wait_until(&mut guard, deadline);
            if self.shutdown.is_raised() {
                return Err(QueueError::Closed(item));
            }
            if result.timed_out() && self.is_full(guard.len()) {
                return Err(QueueError::Timeout(item));
            }
        }
        guard.push_back(item);
        drop(guard);
        self.not_empty.notify_one();
        Ok(())
    }

    fn pop(&self) -> Option<T> {
        let mut guard = self.inner.lock();
        loop {
            if let Some(item) = guard.pop_front() {
                drop(guard);
                if self.capacity.is_some() {
                    self.not_full.notify_one();
                }
                return Some(item);
            }
            if self.shutdown.is_raised() {
                return None;
            }
            self.not_empty.wait(&mut guard);
        }
    }

    fn try_pop(&self) -> QueueResult<T, T> {
        let mut guard = self.inner.lock();
        if let Some(item) = guard.pop_front() {
            drop(guard);
            if self.capacity.is_some() {
                self.not_full.notify_one();
            }
            return Ok(item);
        }
        if self.shutdown.is_raised() {
            return Err(QueueError::Disconnected);
        }
        Err(QueueError::Empty)
    }

    fn pop_timeout(&self, timeout: Duration) -> QueueResult<T, T> {
        let deadline = Instant::now() + timeout;
        let mut guard = self.inner.lock();
        loop {
            if let Some(item) = guard.pop_front() {
                drop(guard);
                if self.capacity.is_some() {
                    self.not_full.notify_one();
                }
                return Ok(item);
            }
            if self.shutdown.is_raised() {
                return Err(QueueError::Disconnected);
            }
            if self.not_empty.wait_until(&mut guard, deadline).timed_out() {
                // final re-check: an item may have arrived with the wake
                if let Some(item) = guard.pop_front() {
                    drop(guard);
                    if self.capacity.is_some() {
                        self.not_full.notify_one();
                    }
                    return Ok(item);
                }
                if self.shutdown.is_raised() {
                    return Err(QueueError::Disconnected);
                }
                return Err(QueueError::Empty);
            }
        }
    }

    fn shutdown(&self) {
        let pending = {
            let guard = self.inner.lock();
            // raising under the mutex makes shutdown a total order point:
            // a push either completed before it or observes the flag
            if !self.shutdown.raise() {
                return;
            }
            guard.len()
        };
        debug!("blocking queue shut down with {} items pending", pending);
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.is_raised()
    }

    fn len(&self) -> usize {
        self.inner.lock().len()
    }

    fn capabilities(&self) -> QueueCapabilities {
        QueueCapabilities::blocking(self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_push_pop_fifo() {
        let queue = BlockingQueue::unbounded();
        for i in 0..5 {
            queue.push(i).unwrap();
        }
        for i in 0..5 {
            assert_eq!(queue.pop(), Some(i));
        }
    }

    #[test]
    fn test_capacity() {
        let queue: BlockingQueue<i32> = BlockingQueue::bounded(5);
        assert_eq!(queue.capacity(), Some(5));

        let queue: BlockingQueue<i32> = BlockingQueue::unbounded();
        assert_eq!(queue.capacity(), None);
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than 0")]
    fn test_zero_capacity_panics() {
        let _ = BlockingQueue::<i32>::bounded(0);
    }

    #[test]
    fn test_try_push_full_returns_item() {
        let queue = BlockingQueue::bounded(2);
        queue.try_push(1).unwrap();
        queue.try_push(2).unwrap();

        match queue.try_push(3) {
            Err(QueueError::Full(item)) => assert_eq!(item, 3),
            _ => panic!("expected Full error"),
        }
    }

    #[test]
    fn test_push_blocks_when_full() {
        let queue = Arc::new(BlockingQueue::bounded(1));
        queue.push(1).unwrap();

        let q = Arc::clone(&queue);
        let handle = thread::spawn(move || {
            // blocks until the pop below frees a slot
            q.push(2).unwrap();
        });

        thread::sleep(Duration::from_millis(20));
        assert_eq!(queue.pop(), Some(1));

        handle.join().unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop(), Some(2));
    }

    #[test]
    fn test_push_timeout_when_full() {
        let queue = BlockingQueue::bounded(1);
        queue.push(1).unwrap();

        match queue.push_timeout(2, Duration::from_millis(10)) {
            Err(QueueError::Timeout(item)) => assert_eq!(item, 2),
            _ => panic!("expected Timeout error"),
        }
    }

    #[test]
    fn test_try_pop_empty() {
        let queue: BlockingQueue<i32> = BlockingQueue::unbounded();
        match queue.try_pop() {
            Err(QueueError::Empty) => {}
            _ => panic!("expected Empty error"),
        }
    }

    #[test]
    fn test_pop_timeout_distinguishes_empty_from_shutdown() {
        let queue: BlockingQueue<i32> = BlockingQueue::unbounded();
        match queue.pop_timeout(Duration::from_millis(10)) {
            Err(QueueError::Empty) => {}
            _ => panic!("expected Empty error on timeout"),
        }

        queue.shutdown();
        match queue.pop_timeout(Duration::from_millis(10)) {
            Err(QueueError::Disconnected) => {}
            _ => panic!("expected Disconnected error after shutdown"),
        }
    }

    #[test]
    fn test_shutdown_rejects_push_and_returns_item() {
        let queue = BlockingQueue::unbounded();
        queue.push(1).unwrap();
        assert!(!queue.is_shutdown());
        queue.shutdown();
        assert!(queue.is_shutdown());

        match queue.push(2) {
            Err(QueueError::Closed(item)) => assert_eq!(item, 2),
            _ => panic!("expected Closed error"),
        }
    }

    #[test]
    fn test_shutdown_drains_backlog_before_none() {
        let queue = BlockingQueue::unbounded();
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        queue.shutdown();

        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let queue: BlockingQueue<i32> = BlockingQueue::unbounded();
        queue.shutdown();
        queue.shutdown();
        assert!(queue.is_shutdown());
    }

    #[test]
    fn test_shutdown_wakes_blocked_consumer() {
        let queue: Arc<BlockingQueue<i32>> = Arc::new(BlockingQueue::unbounded());

        let q = Arc::clone(&queue);
        let handle = thread::spawn(move || q.pop());

        thread::sleep(Duration::from_millis(50));
        queue.shutdown();

        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn test_shutdown_unblocks_capacity_blocked_producer() {
        let queue = Arc::new(BlockingQueue::bounded(1));
        queue.push(1).unwrap();

        let q = Arc::clone(&queue);
        let handle = thread::spawn(move || q.push(2));

        thread::sleep(Duration::from_millis(50));
        queue.shutdown();

        match handle.join().unwrap() {
            Err(QueueError::Closed(item)) => assert_eq!(item, 2),
            _ => panic!("expected Closed error"),
        }
        // the blocked push was rejected, so only the first item remains
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_len_and_is_empty() {
        let queue = BlockingQueue::unbounded();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);

        queue.push(1).unwrap();
        assert!(!queue.is_empty());
        assert_eq!(queue.len(), 1);

        queue.pop().unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_capabilities() {
        let queue: BlockingQueue<i32> = BlockingQueue::bounded(100);
        let caps = queue.capabilities();
        assert!(caps.is_bounded);
        assert_eq!(caps.capacity, Some(100));
        assert!(!caps.is_lock_free);
        assert!(caps.exact_size);
    }

    #[test]
    fn test_concurrent_bounded() {
        let queue = Arc::new(BlockingQueue::bounded(10));
        let num_items = 1000;

        let q_send = Arc::clone(&queue);
        let sender = thread::spawn(move || {
            for i in 0..num_items {
                q_send.push(i).unwrap();
            }
        });

        let q_recv = Arc::clone(&queue);
        let receiver = thread::spawn(move || {
            let mut received = 0;
            for _ in 0..num_items {
                q_recv.pop().unwrap();
                received += 1;
            }
            received
        });

        sender.join().unwrap();
        assert_eq!(receiver.join().unwrap(), num_items);
    }
}
