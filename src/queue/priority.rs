//! Priority-ordered blocking queue.
//!
//! A structural variant of [`BlockingQueue`](super::BlockingQueue): the same
//! mutex + condition-variable contract, but backed by a binary heap so
//! consumers always receive the greatest item first. The comparator is the
//! item's `Ord` implementation; [`Prioritized`](crate::core::Prioritized)
//! provides a ready-made level-plus-payload key.

use super::{QueueCapabilities, WorkQueue};
use crate::core::{QueueError, QueueResult, ShutdownFlag};
use log::debug;
use parking_lot::{Condvar, Mutex};
use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// Heap entry pairing an item with its insertion sequence number.
struct Entry<T> {
    item: T,
    seq: u64,
}

impl<T: Ord> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == CmpOrdering::Equal
    }
}

impl<T: Ord> Eq for Entry<T> {}

impl<T: Ord> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        // greatest item first; equal items pop in insertion order
        // (earlier sequence wins, reversed because the heap is a max-heap)
        self.item
            .cmp(&other.item)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct Heap<T> {
    entries: BinaryHeap<Entry<T>>,
    /// Assigned under the mutex, so sequence order matches push completion
    /// order and the FIFO tie-break is well defined.
    next_seq: u64,
}

/// A blocking MPMC queue ordered by the item's `Ord` implementation.
///
/// `pop` always yields the greatest queued item. Items that compare equal are
/// delivered in the order their pushes completed; this insertion-order
/// tie-break is documented behavior that holds unless the item's `Ord`
/// already distinguishes them. The queue is unbounded, so the non-blocking
/// and timed push variants behave like `push`.
///
/// # Example
///
/// ```rust
/// use workqueue::queue::{PriorityQueue, WorkQueue};
///
/// let queue = PriorityQueue::new();
/// for priority in [1, 3, 2, 4] {
///     queue.push(priority).unwrap();
/// }
/// queue.shutdown();
///
/// let drained: Vec<i32> = std::iter::from_fn(|| queue.pop()).collect();
/// assert_eq!(drained, vec![4, 3, 2, 1]);
/// ```
pub struct PriorityQueue<T> {
    inner: Mutex<Heap<T>>,
    not_empty: Condvar,
    shutdown: ShutdownFlag,
}

impl<T> PriorityQueue<T> {
    /// Creates a new empty priority queue.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new priority queue with pre-allocated heap capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Heap {
                entries: BinaryHeap::with_capacity(capacity),
                next_seq: 0,
            }),
            not_empty: Condvar::new(),
            shutdown: ShutdownFlag::new(),
        }
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Send> WorkQueue<T> for PriorityQueue<T> {
    fn push(&self, item: T) -> QueueResult<(), T> {
        let mut guard = self.inner.lock();
        if self.shutdown.is_raised() {
            return Err(QueueError::Closed(item));
        }
        let seq = guard.next_seq;
        guard.next_seq += 1;
        guard.entries.push(Entry { item, seq });
        drop(guard);
        self.not_empty.notify_one();
        Ok(())
    }

    fn try_push(&self, item: T) -> QueueResult<(), T> {
        // unbounded, so try_push behaves like push
        self.push(item)
    }

    fn push_timeout(&self, item: T, _timeout: Duration) -> QueueResult<(), T> {
        // unbounded, so the timeout is never exercised
        self.push(item)
    }

    fn pop(&self) -> Option<T> {
        let mut guard = self.inner.lock();
        loop {
            if let Some(entry) = guard.entries.pop() {
                return Some(entry.item);
            }
            if self.shutdown.is_raised() {
                return None;
            }
            self.not_empty.wait(&mut guard);
        }
    }

    fn try_pop(&self) -> QueueResult<T, T> {
        let mut guard = self.inner.lock();
        if let Some(entry) = guard.entries.pop() {
            return Ok(entry.item);
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
            if let Some(entry) = guard.entries.pop() {
                return Ok(entry.item);
            }
            if self.shutdown.is_raised() {
                return Err(QueueError::Disconnected);
            }
            if self.not_empty.wait_until(&mut guard, deadline).timed_out() {
                if let Some(entry) = guard.entries.pop() {
                    return Ok(entry.item);
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
            if !self.shutdown.raise() {
                return;
            }
            guard.entries.len()
        };
        debug!("priority queue shut down with {} items pending", pending);
        self.not_empty.notify_all();
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.is_raised()
    }

    fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    fn capabilities(&self) -> QueueCapabilities {
        QueueCapabilities::priority()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Prioritized, Priority};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_highest_priority_first() {
        let queue = PriorityQueue::new();
        for p in [1, 3, 2, 4] {
            queue.push(p).unwrap();
        }

        assert_eq!(queue.pop(), Some(4));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(1));
    }

    #[test]
    fn test_fifo_within_equal_priority() {
        let queue = PriorityQueue::new();
        for name in ["first", "second", "third"] {
            queue.push(Prioritized::new(Priority::Normal, name)).unwrap();
        }
        queue.push(Prioritized::new(Priority::High, "urgent")).unwrap();

        assert_eq!(queue.pop().unwrap().into_value(), "urgent");
        assert_eq!(queue.pop().unwrap().into_value(), "first");
        assert_eq!(queue.pop().unwrap().into_value(), "second");
        assert_eq!(queue.pop().unwrap().into_value(), "third");
    }

    #[test]
    fn test_try_pop_empty() {
        let queue: PriorityQueue<i32> = PriorityQueue::new();
        match queue.try_pop() {
            Err(QueueError::Empty) => {}
            _ => panic!("expected Empty error"),
        }
    }

    #[test]
    fn test_pop_timeout_distinguishes_empty_from_shutdown() {
        let queue: PriorityQueue<i32> = PriorityQueue::new();
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
    fn test_shutdown_rejects_push_and_drains_in_order() {
        let queue = PriorityQueue::new();
        queue.push(2).unwrap();
        queue.push(5).unwrap();
        queue.shutdown();

        match queue.push(9) {
            Err(QueueError::Closed(item)) => assert_eq!(item, 9),
            _ => panic!("expected Closed error"),
        }

        assert_eq!(queue.pop(), Some(5));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_shutdown_wakes_waiting_consumer() {
        let queue: Arc<PriorityQueue<i32>> = Arc::new(PriorityQueue::new());

        let q = Arc::clone(&queue);
        let handle = thread::spawn(move || q.pop());

        thread::sleep(Duration::from_millis(50));
        queue.shutdown();

        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn test_pop_blocks_until_item_available() {
        let queue: Arc<PriorityQueue<i32>> = Arc::new(PriorityQueue::new());

        let q = Arc::clone(&queue);
        let handle = thread::spawn(move || q.pop());

        thread::sleep(Duration::from_millis(50));
        queue.push(7).unwrap();

        assert_eq!(handle.join().unwrap(), Some(7));
    }

    #[test]
    fn test_len_and_is_empty() {
        let queue = PriorityQueue::new();
        assert!(queue.is_empty());

        queue.push(1).unwrap();
        assert_eq!(queue.len(), 1);

        queue.pop().unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_capabilities() {
        let queue: PriorityQueue<i32> = PriorityQueue::new();
        let caps = queue.capabilities();
        assert!(caps.supports_priority);
        assert!(!caps.is_bounded);
        assert!(caps.exact_size);
    }

    #[test]
    fn test_concurrent_producers() {
        let queue = Arc::new(PriorityQueue::new());
        let num_items = 400;

        let mut handles = vec![];
        for t in 0..4 {
            let q = Arc::clone(&queue);
            handles.push(thread::spawn(move || {
                for i in 0..num_items / 4 {
                    q.push(t * 1000 + i).unwrap();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let mut received = 0;
        let mut last = i32::MAX;
        while let Ok(item) = queue.try_pop() {
            assert!(item <= last);
            last = item;
            received += 1;
        }
        assert_eq!(received, num_items);
    }
}
