//! Scheduler module
//!
//! [`PriorityScheduler`] is the registry and entry point of the donation
//! core. It owns two fixed-size arenas, one of [`ThreadState`] records
//! keyed by thread handle and one of [`ResourceQueue`] records keyed by
//! [`QueueId`], and dispatches every operation to the thread or queue half
//! of the donation graph. The graph edges are slot indices:
//!
//! - thread -> queue it waits on (`waiting_on`)
//! - thread -> queues it holds (`held`)
//! - queue -> holder, queue -> waiters (intrusive list)
//!
//! Invalidation is pushed along those edges when something changes,
//! recomputation is pulled on read. Every operation takes the
//! [`CriticalSection`] guard as proof that interrupts are off.

mod resource_queue;
mod thread_state;
mod wait_list;

pub use resource_queue::{ResourceQueue, Waiters};
pub use thread_state::ThreadState;

use crate::config::{CFG_PRIO_DEFAULT, CFG_PRIO_MAX, CFG_PRIO_MIN, CFG_QUEUE_MAX, CFG_THREAD_MAX};
use crate::critical::CriticalSection;
use crate::error::{SchedError, SchedResult};
use crate::types::{Priority, QueueId, ThreadId};

/// Recomputation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedStats {
    /// Thread effective priorities rebuilt from their held queues
    pub thread_recomputes: u32,
    /// Queue effective priorities rebuilt from their waiters
    pub queue_recomputes: u32,
}

/// Priority scheduler with priority donation
pub struct PriorityScheduler {
    threads: [ThreadState; CFG_THREAD_MAX],
    queues: [ResourceQueue; CFG_QUEUE_MAX],
    stats: SchedStats,
}

impl PriorityScheduler {
    /// Create a scheduler with empty arenas
    pub const fn new() -> Self {
        PriorityScheduler {
            threads: [ThreadState::FREE; CFG_THREAD_MAX],
            queues: [ResourceQueue::FREE; CFG_QUEUE_MAX],
            stats: SchedStats {
                thread_recomputes: 0,
                queue_recomputes: 0,
            },
        }
    }

    /// Scheduling state of a thread, if it has one yet
    pub fn thread_state(&self, _cs: &CriticalSection, thread: ThreadId) -> Option<&ThreadState> {
        self.slot_of(thread).map(|slot| &self.threads[slot])
    }

    /// Base priority of a thread
    ///
    /// A thread that was never scheduled has the default priority.
    pub fn priority(&self, _cs: &CriticalSection, thread: ThreadId) -> Priority {
        self.slot_of(thread)
            .map_or(CFG_PRIO_DEFAULT, |slot| self.threads[slot].priority)
    }

    /// Set the base priority of a thread
    ///
    /// # Panics
    /// If `priority` is outside `CFG_PRIO_MIN..=CFG_PRIO_MAX`.
    pub fn set_priority(&mut self, _cs: &CriticalSection, thread: ThreadId, priority: Priority) -> SchedResult<()> {
        assert!(
            (CFG_PRIO_MIN..=CFG_PRIO_MAX).contains(&priority),
            "priority out of range"
        );

        let slot = self.slot_or_create(thread)?;
        self.thread_set_priority(slot, priority);
        crate::trace!("thread {} priority {}", thread, priority);
        Ok(())
    }

    /// Effective priority of a thread, including donations received
    /// through the resources it holds.
    pub fn effective_priority(&mut self, _cs: &CriticalSection, thread: ThreadId) -> Priority {
        match self.slot_of(thread) {
            Some(slot) => self.thread_effective(slot),
            None => CFG_PRIO_DEFAULT,
        }
    }

    /// Raise a thread's base priority by one
    ///
    /// # Returns
    /// * `Ok(false)` - Already at `CFG_PRIO_MAX`, nothing changed
    pub fn increase_priority(&mut self, cs: &CriticalSection, thread: ThreadId) -> SchedResult<bool> {
        let priority = self.priority(cs, thread);
        if priority == CFG_PRIO_MAX {
            return Ok(false);
        }

        self.set_priority(cs, thread, priority + 1)?;
        Ok(true)
    }

    /// Lower a thread's base priority by one
    ///
    /// # Returns
    /// * `Ok(false)` - Already at `CFG_PRIO_MIN`, nothing changed
    pub fn decrease_priority(&mut self, cs: &CriticalSection, thread: ThreadId) -> SchedResult<bool> {
        let priority = self.priority(cs, thread);
        if priority == CFG_PRIO_MIN {
            return Ok(false);
        }

        self.set_priority(cs, thread, priority - 1)?;
        Ok(true)
    }

    /// Forget a finished thread.
    ///
    /// Every resource it still holds is left without holder. A thread
    /// that never had a state is ignored.
    ///
    /// # Panics
    /// If the thread is still waiting on a queue.
    pub fn retire_thread(&mut self, _cs: &CriticalSection, thread: ThreadId) {
        let Some(slot) = self.slot_of(thread) else {
            return;
        };

        assert!(
            self.threads[slot].waiting_on.is_none(),
            "retiring a thread that is still waiting"
        );

        for index in 0..CFG_QUEUE_MAX {
            let q = &self.queues[index];
            if q.in_use && q.holder == Some(slot) {
                self.queue_detach_holder(QueueId(index as u8));
            }
        }

        self.threads[slot] = ThreadState::FREE;
        crate::debug!("thread {} retired", thread);
    }

    /// Number of threads with a scheduling state
    pub fn thread_count(&self) -> usize {
        self.threads.iter().filter(|ts| ts.in_use).count()
    }

    /// Number of live resource queues
    pub fn queue_count(&self) -> usize {
        self.queues.iter().filter(|q| q.in_use).count()
    }

    /// Recomputation counters since creation
    #[inline]
    pub fn stats(&self) -> SchedStats {
        self.stats
    }

    // ============ Registry ============

    fn slot_of(&self, thread: ThreadId) -> Option<usize> {
        self.threads
            .iter()
            .position(|ts| ts.in_use && ts.id == thread)
    }

    /// Arena slot of a thread, creating its state on first use
    fn slot_or_create(&mut self, thread: ThreadId) -> SchedResult<usize> {
        if let Some(slot) = self.slot_of(thread) {
            return Ok(slot);
        }

        let Some(slot) = self.threads.iter().position(|ts| !ts.in_use) else {
            crate::warn!("thread state arena exhausted");
            return Err(SchedError::NoMoreThreads);
        };

        self.threads[slot].init(thread);
        crate::debug!("thread {} tracked in slot {}", thread, slot);
        Ok(slot)
    }
}

impl Default for PriorityScheduler {
    fn default() -> Self {
        Self::new()
    }
}
