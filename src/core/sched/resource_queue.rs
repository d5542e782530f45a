//! Resource queues with priority donation
//!
//! A [`ResourceQueue`] guards one shared resource (a lock, a join point,
//! a condition). It keeps its waiters in arrival order, remembers its
//! holder and, when it transfers priority, lends the highest effective
//! priority among its waiters to that holder.
//!
//! Selection is priority-aware, the list itself is not: the waiter with
//! the highest effective priority is picked, the earliest arrival winning
//! ties. Priority changes never reorder the list.

use crate::config::CFG_PRIO_MIN;
use crate::critical::CriticalSection;
use crate::error::{SchedError, SchedResult};
use crate::types::{Priority, QueueId, ThreadId};

use super::wait_list::WaitList;
use super::PriorityScheduler;

/// Wait list, holder and donation cache of one resource
#[derive(Debug, Clone, Copy)]
pub struct ResourceQueue {
    /// Slot is occupied
    pub(super) in_use: bool,
    /// Waiters lend their priority to the holder
    pub(super) transfer_priority: bool,
    /// Waiting threads, arrival order
    pub(super) waiters: WaitList,
    /// Thread slot currently owning the resource
    pub(super) holder: Option<usize>,
    /// Cached max effective priority of the waiters, valid only while
    /// `dirty` is false
    pub(super) effective: Priority,
    /// Cached effective priority must be recomputed before use
    pub(super) dirty: bool,
}

impl ResourceQueue {
    /// An unoccupied arena slot
    pub(super) const FREE: ResourceQueue = ResourceQueue {
        in_use: false,
        transfer_priority: false,
        waiters: WaitList::new(),
        holder: None,
        effective: CFG_PRIO_MIN,
        dirty: false,
    };
}

impl PriorityScheduler {
    /// Allocate a new resource queue.
    ///
    /// With `transfer_priority` the queue donates the priority of its
    /// waiters to its holder; without it the queue is a plain priority
    /// wait list.
    pub fn new_resource_queue(&mut self, _cs: &CriticalSection, transfer_priority: bool) -> SchedResult<QueueId> {
        let Some(slot) = self.queues.iter().position(|q| !q.in_use) else {
            crate::warn!("resource queue arena exhausted");
            return Err(SchedError::NoMoreQueues);
        };

        self.queues[slot] = ResourceQueue {
            in_use: true,
            transfer_priority,
            ..ResourceQueue::FREE
        };

        let queue = QueueId(slot as u8);
        crate::debug!("queue {} created, transfer={}", queue, transfer_priority);
        Ok(queue)
    }

    /// Free a resource queue.
    ///
    /// The holder, if any, loses the priority this queue lent it.
    ///
    /// # Returns
    /// * `Err(SchedError::QueueBusy)` - Threads are still waiting on it
    pub fn delete_resource_queue(&mut self, _cs: &CriticalSection, queue: QueueId) -> SchedResult<()> {
        self.check_queue(queue);

        if !self.queues[queue.index()].waiters.is_empty() {
            return Err(SchedError::QueueBusy);
        }

        self.queue_detach_holder(queue);
        self.queues[queue.index()] = ResourceQueue::FREE;
        crate::debug!("queue {} deleted", queue);
        Ok(())
    }

    /// Enqueue `thread` as waiting for access to the resource.
    ///
    /// Only records intent: the caller puts the thread to sleep
    /// afterwards, inside the same critical section.
    ///
    /// # Panics
    /// If the thread is already waiting on a queue.
    pub fn wait_for_access(&mut self, _cs: &CriticalSection, queue: QueueId, thread: ThreadId) -> SchedResult<()> {
        self.check_queue(queue);
        let slot = self.slot_or_create(thread)?;

        assert!(
            self.threads[slot].waiting_on.is_none(),
            "thread already waiting on a resource queue"
        );

        self.thread_wait_for_access(slot, queue);
        self.queues[queue.index()].waiters.insert_tail(&mut self.threads, slot);
        self.queue_mark_dirty(queue);

        crate::trace!("thread {} waits on queue {}", thread, queue);
        Ok(())
    }

    /// Make `thread` the holder of the resource without waiting.
    ///
    /// A previous holder loses the priority this queue lent it.
    ///
    /// # Panics
    /// If the thread is waiting on a different queue.
    pub fn acquire(&mut self, _cs: &CriticalSection, queue: QueueId, thread: ThreadId) -> SchedResult<()> {
        self.check_queue(queue);
        let slot = self.slot_or_create(thread)?;

        self.acquire_slot(queue, slot);
        crate::trace!("thread {} acquires queue {}", thread, queue);
        Ok(())
    }

    /// Hand the resource to the next waiter.
    ///
    /// The current holder is released first. The waiter with the highest
    /// effective priority is removed from the queue, made the holder and
    /// returned; the caller is responsible for readying it.
    ///
    /// # Returns
    /// * `None` - Nobody is waiting; the resource is left without holder
    pub fn next_thread(&mut self, _cs: &CriticalSection, queue: QueueId) -> Option<ThreadId> {
        self.check_queue(queue);
        self.queue_detach_holder(queue);

        let slot = self.pick_next_slot(queue)?;
        self.acquire_slot(queue, slot);

        let thread = self.threads[slot].id;
        crate::trace!("queue {} hands over to thread {}", queue, thread);
        Some(thread)
    }

    /// The thread [`next_thread`](Self::next_thread) would return, without
    /// modifying the queue.
    pub fn pick_next_thread(&mut self, _cs: &CriticalSection, queue: QueueId) -> Option<ThreadId> {
        self.check_queue(queue);
        self.pick_next_slot(queue).map(|slot| self.threads[slot].id)
    }

    /// Effective priority of a queue: the highest effective priority among
    /// its waiters, or the minimum when it does not transfer priority.
    pub fn queue_effective_priority(&mut self, _cs: &CriticalSection, queue: QueueId) -> Priority {
        self.check_queue(queue);
        self.queue_effective(queue)
    }

    /// Current holder of the resource
    pub fn holder(&self, _cs: &CriticalSection, queue: QueueId) -> Option<ThreadId> {
        self.check_queue(queue);
        self.queues[queue.index()].holder.map(|slot| self.threads[slot].id)
    }

    /// Whether the queue lends its waiters' priority to its holder
    pub fn transfers_priority(&self, _cs: &CriticalSection, queue: QueueId) -> bool {
        self.check_queue(queue);
        self.queues[queue.index()].transfer_priority
    }

    /// Number of waiting threads
    pub fn waiter_count(&self, _cs: &CriticalSection, queue: QueueId) -> usize {
        self.check_queue(queue);
        self.queues[queue.index()].waiters.len()
    }

    /// Waiting threads in arrival order
    pub fn waiters<'a>(&'a self, _cs: &'a CriticalSection, queue: QueueId) -> Waiters<'a> {
        self.check_queue(queue);
        Waiters {
            sched: self,
            cursor: self.queues[queue.index()].waiters.head(),
        }
    }

    // ============ Internal ============

    /// # Panics
    /// If `queue` does not name a live queue.
    #[inline]
    pub(super) fn check_queue(&self, queue: QueueId) {
        assert!(
            queue.index() < self.queues.len() && self.queues[queue.index()].in_use,
            "unknown resource queue"
        );
    }

    /// Make `slot` the holder of `queue`, pulling it out of the waiters if
    /// it was waiting there.
    fn acquire_slot(&mut self, queue: QueueId, slot: usize) {
        let was_waiting = match self.threads[slot].waiting_on {
            Some(waiting) if waiting == queue => true,
            Some(_) => panic!("acquire by a thread waiting on another queue"),
            None => false,
        };

        if was_waiting {
            self.queues[queue.index()].waiters.remove(&mut self.threads, slot);
        }

        self.queue_detach_holder(queue);
        self.queues[queue.index()].holder = Some(slot);
        self.thread_acquire(slot, queue);

        if was_waiting {
            self.queue_mark_dirty(queue);
        }
    }

    /// Drop the holder relation of `queue`, invalidating the old holder
    /// whose donated priority just went away.
    pub(super) fn queue_detach_holder(&mut self, queue: QueueId) {
        let q = &mut self.queues[queue.index()];
        let Some(holder) = q.holder.take() else {
            return;
        };

        if q.transfer_priority {
            self.threads[holder].held.remove(queue);
            self.thread_mark_dirty(holder);
        }
    }

    /// Highest effective priority waiter, earliest arrival on ties
    fn pick_next_slot(&mut self, queue: QueueId) -> Option<usize> {
        let mut best: Option<(usize, Priority)> = None;
        let mut cursor = self.queues[queue.index()].waiters.head();

        while let Some(slot) = cursor {
            let priority = self.thread_effective(slot);
            // strictly greater keeps the earlier arrival on ties
            if best.map_or(true, |(_, top)| priority > top) {
                best = Some((slot, priority));
            }
            cursor = self.threads[slot].wait_next;
        }

        best.map(|(slot, _)| slot)
    }

    /// Invalidate a queue's effective priority and its holder's.
    ///
    /// Stops at a queue that is already dirty.
    pub(super) fn queue_mark_dirty(&mut self, queue: QueueId) {
        let q = &mut self.queues[queue.index()];
        if q.dirty {
            return;
        }

        q.dirty = true;
        if q.transfer_priority {
            if let Some(holder) = q.holder {
                self.thread_mark_dirty(holder);
            }
        }
    }

    pub(super) fn queue_effective(&mut self, queue: QueueId) -> Priority {
        let q = &mut self.queues[queue.index()];
        if !q.transfer_priority {
            return CFG_PRIO_MIN;
        }
        if !q.dirty {
            return q.effective;
        }

        self.stats.queue_recomputes = self.stats.queue_recomputes.wrapping_add(1);

        // Seeded for the same reason as thread_effective
        q.dirty = false;
        q.effective = CFG_PRIO_MIN;
        let mut effective = CFG_PRIO_MIN;
        let mut cursor = q.waiters.head();

        while let Some(slot) = cursor {
            effective = effective.max(self.thread_effective(slot));
            cursor = self.threads[slot].wait_next;
        }

        self.queues[queue.index()].effective = effective;
        effective
    }
}

/// Iterator over the waiters of a queue, in arrival order
pub struct Waiters<'a> {
    sched: &'a PriorityScheduler,
    cursor: Option<usize>,
}

impl Iterator for Waiters<'_> {
    type Item = ThreadId;

    fn next(&mut self) -> Option<ThreadId> {
        let slot = self.cursor?;
        let ts = &self.sched.threads[slot];
        self.cursor = ts.wait_next;
        Some(ts.id)
    }
}
