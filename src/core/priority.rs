//! Priority levels for priority-ordered queues.
//!
//! The priority queue orders items by their `Ord` implementation. This module
//! provides a ready-made key: the [`Priority`] levels and a [`Prioritized`]
//! wrapper that attaches a level to an arbitrary payload.

use std::cmp::Ordering;

/// Item priority levels (higher number = dequeued first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    /// Lowest priority - background work
    Low = 1,
    /// Normal priority - default for most work
    #[default]
    Normal = 5,
    /// High priority - important work
    High = 8,
    /// Critical priority - must be handled ASAP
    Critical = 10,
}

impl Priority {
    /// Get the numeric value of the priority
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

/// A payload tagged with a [`Priority`] level.
///
/// Ordering considers the priority only: two items with equal priority
/// compare as equal regardless of payload, so the priority queue's documented
/// insertion-order tie-break applies between them.
#[derive(Debug, Clone)]
pub struct Prioritized<T> {
    /// Priority level used for ordering
    pub priority: Priority,
    /// The wrapped payload
    pub value: T,
}

impl<T> Prioritized<T> {
    /// Wraps `value` at the given priority level.
    pub fn new(priority: Priority, value: T) -> Self {
        Self { priority, value }
    }

    /// Unwraps the payload, discarding the priority.
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> PartialEq for Prioritized<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl<T> Eq for Prioritized<T> {}

impl<T> PartialOrd for Prioritized<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Prioritized<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);
    }

    #[test]
    fn test_priority_value() {
        assert_eq!(Priority::Low.value(), 1);
        assert_eq!(Priority::Normal.value(), 5);
        assert_eq!(Priority::High.value(), 8);
        assert_eq!(Priority::Critical.value(), 10);
    }

    #[test]
    fn test_priority_default() {
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn test_prioritized_orders_by_level_only() {
        let a = Prioritized::new(Priority::High, "first");
        let b = Prioritized::new(Priority::High, "second");
        let c = Prioritized::new(Priority::Low, "third");

        assert_eq!(a, b);
        assert!(a > c);
        assert_eq!(a.into_value(), "first");
    }
}
