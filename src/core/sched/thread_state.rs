//! Per-thread scheduling record
//!
//! A [`ThreadState`] holds a thread's base priority, its cached effective
//! priority, the resource queues it holds and the one queue it waits on.
//! The thread-side halves of the donation operations live here as
//! methods on [`PriorityScheduler`], since they walk the arena.

use crate::config::CFG_PRIO_DEFAULT;
use crate::queue_set::QueueSet;
use crate::types::{Priority, QueueId, ThreadId};

use super::PriorityScheduler;

/// Scheduling state of one thread
#[derive(Debug, Clone, Copy)]
pub struct ThreadState {
    /// Slot is occupied
    pub(super) in_use: bool,
    /// Handle of the owning thread
    pub(super) id: ThreadId,
    /// Base priority
    pub(super) priority: Priority,
    /// Cached effective priority, valid only while `dirty` is false
    pub(super) effective: Priority,
    /// Cached effective priority must be recomputed before use
    pub(super) dirty: bool,
    /// Transferring queues this thread holds
    pub(super) held: QueueSet,
    /// Queue this thread is enqueued on
    pub(super) waiting_on: Option<QueueId>,
    /// Previous waiter in `waiting_on`'s list
    pub(super) wait_prev: Option<usize>,
    /// Next waiter in `waiting_on`'s list
    pub(super) wait_next: Option<usize>,
}

impl ThreadState {
    /// An unoccupied arena slot
    pub(super) const FREE: ThreadState = ThreadState {
        in_use: false,
        id: ThreadId(0),
        priority: CFG_PRIO_DEFAULT,
        effective: CFG_PRIO_DEFAULT,
        dirty: false,
        held: QueueSet::new(),
        waiting_on: None,
        wait_prev: None,
        wait_next: None,
    };

    /// Claim this slot for `id` with default priority and no holdings
    pub(super) fn init(&mut self, id: ThreadId) {
        *self = Self::FREE;
        self.in_use = true;
        self.id = id;
    }

    /// Thread this state belongs to
    #[inline]
    pub fn thread(&self) -> ThreadId {
        self.id
    }

    /// Base priority
    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Queue this thread is waiting on, if any
    #[inline]
    pub fn waiting_on(&self) -> Option<QueueId> {
        self.waiting_on
    }

    /// Transferring queues this thread currently holds
    #[inline]
    pub fn held(&self) -> &QueueSet {
        &self.held
    }

    /// Whether the cached effective priority is stale
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl PriorityScheduler {
    /// Change a thread's base priority, invalidating everything that
    /// depends on it.
    pub(super) fn thread_set_priority(&mut self, slot: usize, priority: Priority) {
        if self.threads[slot].priority == priority {
            return;
        }

        self.threads[slot].priority = priority;
        self.thread_mark_dirty(slot);
    }

    /// Invalidate a thread's effective priority and, through the queue it
    /// waits on, every holder downstream of it.
    ///
    /// Stops at the first node that is already dirty: a dirty node's own
    /// downstream is dirty already.
    pub(super) fn thread_mark_dirty(&mut self, slot: usize) {
        let ts = &mut self.threads[slot];
        if ts.dirty {
            return;
        }

        ts.dirty = true;
        if let Some(queue) = ts.waiting_on {
            self.queue_mark_dirty(queue);
        }
    }

    /// Effective priority of a thread: its base priority raised by the
    /// effective priority of every transferring queue it holds.
    pub(super) fn thread_effective(&mut self, slot: usize) -> Priority {
        let ts = &mut self.threads[slot];
        if !ts.dirty {
            return ts.effective;
        }

        self.stats.thread_recomputes = self.stats.thread_recomputes.wrapping_add(1);

        // Seed before descending so a deadlock cycle reads the partial
        // value instead of recursing forever.
        ts.dirty = false;
        ts.effective = ts.priority;
        let held = ts.held;
        let mut effective = ts.priority;

        for queue in held.iter() {
            effective = effective.max(self.queue_effective(queue));
        }

        debug_assert!(effective >= self.threads[slot].priority);
        self.threads[slot].effective = effective;
        effective
    }

    /// Thread half of `wait_for_access`
    pub(super) fn thread_wait_for_access(&mut self, slot: usize, queue: QueueId) {
        // A queue this thread still nominally holds loses its holder once
        // the thread starts waiting on it.
        if self.queues[queue.index()].holder == Some(slot) {
            self.queue_detach_holder(queue);
        }

        self.threads[slot].waiting_on = Some(queue);
    }

    /// Thread half of `acquire`
    pub(super) fn thread_acquire(&mut self, slot: usize, queue: QueueId) {
        let transfer = self.queues[queue.index()].transfer_priority;
        let ts = &mut self.threads[slot];

        if transfer {
            ts.held.insert(queue);
        }
        if ts.waiting_on == Some(queue) {
            ts.waiting_on = None;
        }

        self.thread_mark_dirty(slot);
    }
}
