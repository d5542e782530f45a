//! Lock implementation with priority donation
//!
//! A lock is a transferring resource queue: while a thread holds it,
//! every thread waiting for it lends its effective priority to the
//! holder, transitively through whatever the holder itself waits on.

use crate::critical::{is_isr_context, CriticalSection};
use crate::error::{SchedError, SchedResult};
use crate::sched::PriorityScheduler;
use crate::thread::ThreadOps;
use crate::types::{QueueId, ThreadId};

/// Non-recursive lock with priority donation
#[derive(Debug)]
pub struct Lock {
    queue: QueueId,
}

impl Lock {
    /// Create a new, free lock
    pub fn new(cs: &CriticalSection, sched: &mut PriorityScheduler) -> SchedResult<Self> {
        let queue = sched.new_resource_queue(cs, true)?;
        Ok(Lock { queue })
    }

    /// Acquire the lock
    ///
    /// If the lock is held by another thread, the current thread is queued
    /// (donating its priority to the holder) and put to sleep. It runs
    /// again once a release hands it the lock.
    ///
    /// # Returns
    /// * `Err(SchedError::IsrContext)` - Called from an interrupt handler
    /// * `Err(SchedError::LockOwner)` - Current thread already holds the lock
    pub fn acquire<O: ThreadOps>(
        &self,
        cs: &CriticalSection,
        sched: &mut PriorityScheduler,
        ops: &mut O,
    ) -> SchedResult<()> {
        if is_isr_context() {
            return Err(SchedError::IsrContext);
        }

        let current = ops.current();
        match sched.holder(cs, self.queue) {
            Some(holder) if holder == current => Err(SchedError::LockOwner),
            Some(_) => {
                sched.wait_for_access(cs, self.queue, current)?;
                ops.sleep(cs, sched);
                Ok(())
            }
            None => sched.acquire(cs, self.queue, current),
        }
    }

    /// Release the lock
    ///
    /// The highest-priority waiter, if any, becomes the new holder and is
    /// readied. The releasing thread loses whatever priority it received
    /// through this lock.
    ///
    /// # Returns
    /// * `Err(SchedError::LockNotOwner)` - Current thread does not hold the lock
    pub fn release<O: ThreadOps>(
        &self,
        cs: &CriticalSection,
        sched: &mut PriorityScheduler,
        ops: &mut O,
    ) -> SchedResult<()> {
        if !self.is_held_by(cs, sched, ops.current()) {
            return Err(SchedError::LockNotOwner);
        }

        if let Some(next) = sched.next_thread(cs, self.queue) {
            ops.ready(cs, sched, next);
        }
        Ok(())
    }

    /// Current holder of the lock
    #[inline]
    pub fn holder(&self, cs: &CriticalSection, sched: &PriorityScheduler) -> Option<ThreadId> {
        sched.holder(cs, self.queue)
    }

    /// Whether `thread` holds the lock
    #[inline]
    pub fn is_held_by(&self, cs: &CriticalSection, sched: &PriorityScheduler, thread: ThreadId) -> bool {
        self.holder(cs, sched) == Some(thread)
    }

    /// Resource queue backing this lock
    #[inline]
    pub fn queue(&self) -> QueueId {
        self.queue
    }

    /// Destroy the lock
    ///
    /// # Returns
    /// * `Err(SchedError::QueueBusy)` - Threads are still waiting for it
    pub fn delete(self, cs: &CriticalSection, sched: &mut PriorityScheduler) -> SchedResult<()> {
        sched.delete_resource_queue(cs, self.queue)
    }
}
