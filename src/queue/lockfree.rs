//! Lock-free MPMC queue (Michael–Scott) with epoch-based reclamation.
//!
//! The queue is a singly linked list with atomic `head` and `tail` pointers.
//! `head` always refers to a sentinel node whose successor holds the next
//! value out; an empty queue is a lone sentinel. Consumers race on a single
//! CAS of `head`, which is the arbitration point guaranteeing exactly-once
//! hand-off. Retired sentinels are reclaimed through `crossbeam_epoch`, so a
//! consumer that still holds a reference to a node another consumer just
//! unlinked can never observe freed memory, and the ABA hazard on the head
//! CAS is ruled out.

use super::{QueueCapabilities, WorkQueue};
use crate::core::{QueueError, QueueResult, ShutdownFlag};
use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned, Shared};
use crossbeam_utils::{Backoff, CachePadded};
use log::debug;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

struct Node<T> {
    /// Uninitialized in the sentinel; initialized in every linked node until
    /// the pop that unlinks its predecessor moves the value out.
    value: MaybeUninit<T>,
    next: Atomic<Node<T>>,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Self {
            value: MaybeUninit::uninit(),
            next: Atomic::null(),
        }
    }
}

/// A lock-free MPMC FIFO queue.
///
/// Push and pop never take a lock; under contention they retry with
/// [`Backoff`], degrading to cooperative yielding, so blocked consumers stay
/// responsive to shutdown without busy-looping unboundedly. The queue is
/// unbounded: `push` fails only once shutdown has been observed.
///
/// `len()` is an approximate counter maintained alongside the list; it may
/// momentarily over-report during a push but never drops below zero. Treat
/// it as diagnostic, never as a correctness signal.
///
/// # Example
///
/// ```rust
/// use workqueue::queue::{LockFreeQueue, WorkQueue};
///
/// let queue = LockFreeQueue::new();
/// queue.push("job").unwrap();
/// assert_eq!(queue.pop(), Some("job"));
/// ```
pub struct LockFreeQueue<T> {
    head: CachePadded<Atomic<Node<T>>>,
    tail: CachePadded<Atomic<Node<T>>>,
    len: AtomicUsize,
    shutdown: ShutdownFlag,
}

// Safety: the queue hands each value to exactly one consumer and the epoch
// guard keeps unlinked nodes alive until no thread can reference them.
unsafe impl<T: Send> Send for LockFreeQueue<T> {}
unsafe impl<T: Send> Sync for LockFreeQueue<T> {}

impl<T> LockFreeQueue<T> {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        let sentinel = Owned::new(Node::sentinel());
        let queue = Self {
            head: CachePadded::new(Atomic::null()),
            tail: CachePadded::new(Atomic::null()),
            len: AtomicUsize::new(0),
            shutdown: ShutdownFlag::new(),
        };
        unsafe {
            let guard = epoch::unprotected();
            let sentinel = sentinel.into_shared(guard);
            queue.head.store(sentinel, Ordering::Relaxed);
            queue.tail.store(sentinel, Ordering::Relaxed);
        }
        queue
    }

    fn enqueue(&self, item: T, guard: &Guard) {
        let new = Owned::new(Node {
            value: MaybeUninit::new(item),
            next: Atomic::null(),
        })
        .into_shared(guard);

        let backoff = Backoff::new();
        loop {
            let tail = self.tail.load(Ordering::Acquire, guard);
            // the sentinel is never unlinked while we hold the guard
            let tail_ref = unsafe { tail.deref() };
            let next = tail_ref.next.load(Ordering::Acquire, guard);

            if !next.is_null() {
                // tail lags behind the real last node; help swing it forward
                let _ = self.tail.compare_exchange(
                    tail,
                    next,
                    Ordering::Release,
                    Ordering::Relaxed,
                    guard,
                );
                backoff.spin();
                continue;
            }

            // release ordering publishes the value write before the link
            // becomes visible to any acquire load of `next` in dequeue
            if tail_ref
                .next
                .compare_exchange(
                    Shared::null(),
                    new,
                    Ordering::Release,
                    Ordering::Relaxed,
                    guard,
                )
                .is_ok()
            {
                let _ = self.tail.compare_exchange(
                    tail,
                    new,
                    Ordering::Release,
                    Ordering::Relaxed,
                    guard,
                );
                return;
            }
            backoff.spin();
        }
    }

    /// Unlinks and returns the front value, or `None` if the queue was
    /// observed empty.
    fn dequeue(&self, guard: &Guard) -> Option<T> {
        let backoff = Backoff::new();
        loop {
            let head = self.head.load(Ordering::Acquire, guard);
            let head_ref = unsafe { head.deref() };
            let next = head_ref.next.load(Ordering::Acquire, guard);

            let next_ref = match unsafe { next.as_ref() } {
                Some(node) => node,
                None => return None,
            };

            // keep tail from pointing at the node we are about to retire
            let tail = self.tail.load(Ordering::Acquire, guard);
            if head == tail {
                let _ = self.tail.compare_exchange(
                    tail,
                    next,
                    Ordering::Release,
                    Ordering::Relaxed,
                    guard,
                );
            }

            // single arbitration point: the winning CAS owns next's value
            if self
                .head
                .compare_exchange(head, next, Ordering::Release, Ordering::Relaxed, guard)
                .is_ok()
            {
                let value = unsafe { next_ref.value.as_ptr().read() };
                self.len.fetch_sub(1, Ordering::Relaxed);
                // the old sentinel is unreachable once no thread's epoch
                // still covers it
                unsafe { guard.defer_destroy(head) };
                return Some(value);
            }
            backoff.spin();
        }
    }
}

impl<T> Default for LockFreeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> WorkQueue<T> for LockFreeQueue<T> {
    fn push(&self, item: T) -> QueueResult<(), T> {
        if self.shutdown.is_raised() {
            return Err(QueueError::Closed(item));
        }
        // counted before the node is linked: the matching decrement runs
        // only after a pop unlinks it, so the counter never goes below zero
        self.len.fetch_add(1, Ordering::Relaxed);
        let guard = epoch::pin();
        self.enqueue(item, &guard);
        Ok(())
    }

    fn try_push(&self, item: T) -> QueueResult<(), T> {
        // unbounded: a non-blocking push is an ordinary push
        self.push(item)
    }

    fn push_timeout(&self, item: T, _timeout: Duration) -> QueueResult<(), T> {
        // unbounded: push never waits for space
        self.push(item)
    }

    fn pop(&self) -> Option<T> {
        let backoff = Backoff::new();
        loop {
            {
                let guard = epoch::pin();
                if let Some(item) = self.dequeue(&guard) {
                    return Some(item);
                }
            }
            if self.shutdown.is_raised() {
                // drain check: a push that began before shutdown may have
                // landed between the dequeue above and the flag load
                let guard = epoch::pin();
                return self.dequeue(&guard);
            }
            if backoff.is_completed() {
                std::thread::yield_now();
            } else {
                backoff.snooze();
            }
        }
    }

    fn try_pop(&self) -> QueueResult<T, T> {
        let guard = epoch::pin();
        if let Some(item) = self.dequeue(&guard) {
            return Ok(item);
        }
        if self.shutdown.is_raised() {
            // drain check: a push that began before shutdown may have
            // landed between the dequeue above and the flag load
            return match self.dequeue(&guard) {
                Some(item) => Ok(item),
                None => Err(QueueError::Disconnected),
            };
        }
        Err(QueueError::Empty)
    }

    fn pop_timeout(&self, timeout: Duration) -> QueueResult<T, T> {
        let deadline = Instant::now() + timeout;
        let backoff = Backoff::new();
        loop {
            {
                let guard = epoch::pin();
                if let Some(item) = self.dequeue(&guard) {
                    return Ok(item);
                }
            }
            if self.shutdown.is_raised() {
                // same drain check as pop(): a pre-shutdown push may have
                // landed after the dequeue above
                let guard = epoch::pin();
                return match self.dequeue(&guard) {
                    Some(item) => Ok(item),
                    None => Err(QueueError::Disconnected),
                };
            }
            if Instant::now() >= deadline {
                return Err(QueueError::Empty);
            }
            if backoff.is_completed() {
                std::thread::yield_now();
            } else {
                backoff.snooze();
            }
        }
    }

    fn shutdown(&self) {
        if self.shutdown.raise() {
            debug!(
                "lock-free queue shut down with {} items pending",
                self.len.load(Ordering::Relaxed)
            );
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.is_raised()
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    fn capabilities(&self) -> QueueCapabilities {
        QueueCapabilities::lock_free()
    }
}

impl<T> Drop for LockFreeQueue<T> {
    fn drop(&mut self) {
        // &mut self: no concurrent access, so walk the chain unprotected.
        // The first node is the sentinel and holds no live value.
        unsafe {
            let guard = epoch::unprotected();
            let mut node = self.head.load(Ordering::Relaxed, guard);
            let mut is_sentinel = true;
            while !node.is_null() {
                let mut owned = node.into_owned();
                node = owned.next.load(Ordering::Relaxed, guard);
                if !is_sentinel {
                    std::ptr::drop_in_place(owned.value.as_mut_ptr());
                }
                is_sentinel = false;
                drop(owned);
            }
        }
    }
}
