//! Cancellable deferred-task queue on a caller-supplied clock.
//!
//! Tasks are keyed by due time and insertion order. Cancelling a task removes
//! it from the live table, so a cancelled task can never be popped even if its
//! heap entry is still waiting to be discarded.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Handle to a scheduled task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<(Duration, u64)>>,
    live: HashMap<u64, (Duration, T)>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: Duration, task: T) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse((due, seq)));
        self.live.insert(seq, (due, task));
        TaskHandle(seq)
    }

    /// Cancel one task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.live.remove(&handle.0).is_some()
    }

    /// Cancel every pending task, returning how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.live.len();
        self.live.clear();
        self.heap.clear();
        n
    }

    /// Pop the earliest task due at or before `now`. Equal due times pop in
    /// scheduling order.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        loop {
            let Reverse((due, seq)) = *self.heap.peek()?;
            if !self.live.contains_key(&seq) {
                self.heap.pop();
                continue;
            }
            if due > now {
                return None;
            }
            self.heap.pop();
            return self.live.remove(&seq);
        }
    }

    /// Due time of the earliest live task.
    pub fn next_deadline(&mut self) -> Option<Duration> {
        while let Some(&Reverse((due, seq))) = self.heap.peek() {
            if self.live.contains_key(&seq) {
                return Some(due);
            }
            self.heap.pop();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn pops_in_due_order_then_insertion_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(20), "b");
        q.schedule(ms(10), "a");
        q.schedule(ms(20), "c");

        assert_eq!(q.pop_due(ms(5)), None);
        assert_eq!(q.pop_due(ms(30)), Some((ms(10), "a")));
        assert_eq!(q.pop_due(ms(30)), Some((ms(20), "b")));
        assert_eq!(q.pop_due(ms(30)), Some((ms(20), "c")));
        assert_eq!(q.pop_due(ms(30)), None);
        assert!(q.is_empty());
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut q = TimerQueue::new();
        let a = q.schedule(ms(10), "a");
        q.schedule(ms(20), "b");

        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert_eq!(q.next_deadline(), Some(ms(20)));
        assert_eq!(q.pop_due(ms(100)), Some((ms(20), "b")));
        assert_eq!(q.pop_due(ms(100)), None);
    }

    #[test]
    fn cancel_all_reports_pending_count() {
        let mut q = TimerQueue::new();
        q.schedule(ms(1), 1);
        q.schedule(ms(2), 2);
        q.schedule(ms(3), 3);
        q.pop_due(ms(1));

        assert_eq!(q.len(), 2);
        assert_eq!(q.cancel_all(), 2);
        assert_eq!(q.next_deadline(), None);
        assert_eq!(q.pop_due(ms(10)), None);
    }
}
