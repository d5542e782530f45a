//! Wait list - doubly linked list of thread states waiting on a resource
//!
//! The links live in the [`ThreadState`] records themselves, addressed by
//! arena slot. A thread waits on at most one queue, so one pair of links
//! per thread is enough. Threads are appended at the tail, so walking
//! from the head visits them in arrival order.

use super::thread_state::ThreadState;

/// Waiters of one resource queue, in arrival order
#[derive(Debug, Clone, Copy)]
pub(crate) struct WaitList {
    head: Option<usize>,
    tail: Option<usize>,
    count: usize,
}

impl WaitList {
    /// Create a new empty wait list
    pub const fn new() -> Self {
        WaitList {
            head: None,
            tail: None,
            count: 0,
        }
    }

    /// Longest-waiting thread slot
    #[inline]
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// Check if list is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of waiters
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Append a thread at the tail (arrival order)
    ///
    /// The thread must not be linked into any list.
    pub fn insert_tail(&mut self, threads: &mut [ThreadState], slot: usize) {
        debug_assert!(threads[slot].wait_prev.is_none() && threads[slot].wait_next.is_none());

        threads[slot].wait_next = None;
        threads[slot].wait_prev = self.tail;

        match self.tail {
            Some(tail) => threads[tail].wait_next = Some(slot),
            None => self.head = Some(slot),
        }

        self.tail = Some(slot);
        self.count += 1;
    }

    /// Unlink a thread from the list
    ///
    /// The thread must be linked into this list.
    pub fn remove(&mut self, threads: &mut [ThreadState], slot: usize) {
        let prev = threads[slot].wait_prev;
        let next = threads[slot].wait_next;

        match prev {
            Some(prev) => threads[prev].wait_next = next,
            // This was the head
            None => self.head = next,
        }

        match next {
            Some(next) => threads[next].wait_prev = prev,
            // This was the tail
            None => self.tail = prev,
        }

        threads[slot].wait_prev = None;
        threads[slot].wait_next = None;
        self.count = self.count.saturating_sub(1);
    }
}

impl Default for WaitList {
    fn default() -> Self {
        Self::new()
    }
}
