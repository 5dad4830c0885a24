//! Deferred effects keyed by round generation
//!
//! Tasks are scheduled for a future clock reading and tagged with the round
//! generation that scheduled them. When a task comes due under a different
//! generation it is discarded instead of applied.

use std::collections::VecDeque;

use crate::Millis;

/// A task waiting for its due time
#[derive(Debug, Clone, PartialEq)]
pub struct Deferred<T> {
    pub due_at: Millis,
    pub generation: u32,
    pub task: T,
}

/// Queue of deferred tasks ordered by due time (FIFO among equal due times)
#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    pending: VecDeque<Deferred<T>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn schedule(&mut self, due_at: Millis, generation: u32, task: T) {
        let idx = self.pending.partition_point(|d| d.due_at <= due_at);
        self.pending.insert(
            idx,
            Deferred {
                due_at,
                generation,
                task,
            },
        );
    }

    /// Remove every task due at `now`, returning those scheduled under
    /// `generation` in due order. Stale tasks are dropped.
    pub fn take_due(&mut self, now: Millis, generation: u32) -> Vec<T> {
        let mut live = Vec::new();
        let mut stale = 0usize;

        while self.pending.front().is_some_and(|d| d.due_at <= now) {
            let Some(entry) = self.pending.pop_front() else {
                break;
            };
            if entry.generation == generation {
                live.push(entry.task);
            } else {
                stale += 1;
            }
        }

        if stale > 0 {
            log::debug!("Discarded {} stale deferred task(s)", stale);
        }
        live
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.front().map(|d| d.due_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_yet() {
        let mut queue = DeferredQueue::default();
        queue.schedule(250, 0, "nudge");
        assert!(queue.take_due(249, 0).is_empty());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.take_due(250, 0), vec!["nudge"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut queue = DeferredQueue::default();
        queue.schedule(300, 0, 3);
        queue.schedule(100, 0, 1);
        queue.schedule(200, 0, 2);
        queue.schedule(200, 0, 22);
        assert_eq!(queue.next_due(), Some(100));
        assert_eq!(queue.take_due(1_000, 0), vec![1, 2, 22, 3]);
    }

    #[test]
    fn test_stale_generation_discarded() {
        let mut queue = DeferredQueue::default();
        queue.schedule(100, 0, "old");
        queue.schedule(120, 1, "new");
        assert_eq!(queue.take_due(200, 1), vec!["new"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_partial_drain_keeps_future_tasks() {
        let mut queue = DeferredQueue::default();
        queue.schedule(100, 0, 'a');
        queue.schedule(500, 0, 'b');
        assert_eq!(queue.take_due(100, 0), vec!['a']);
        assert_eq!(queue.next_due(), Some(500));
    }
}
