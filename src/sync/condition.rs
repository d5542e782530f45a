//! Condition variables
//!
//! Waiters are woken highest effective priority first, first come first
//! served among equals. The wait list does not transfer priority: a
//! thread waiting for a condition is not blocked by any particular
//! thread, so there is nobody to donate to.

use crate::critical::CriticalSection;
use crate::error::{SchedError, SchedResult};
use crate::sched::PriorityScheduler;
use crate::sync::lock::Lock;
use crate::thread::ThreadOps;
use crate::types::QueueId;

/// Condition variable used together with a [`Lock`]
#[derive(Debug)]
pub struct Condition {
    queue: QueueId,
}

impl Condition {
    pub fn new(cs: &CriticalSection, sched: &mut PriorityScheduler) -> SchedResult<Self> {
        let queue = sched.new_resource_queue(cs, false)?;
        Ok(Condition { queue })
    }

    /// Atomically release `lock` and sleep until woken, then re-acquire
    /// `lock` before returning.
    ///
    /// # Returns
    /// * `Err(SchedError::LockNotOwner)` - Current thread does not hold `lock`
    pub fn sleep<O: ThreadOps>(
        &self,
        cs: &CriticalSection,
        sched: &mut PriorityScheduler,
        ops: &mut O,
        lock: &Lock,
    ) -> SchedResult<()> {
        let current = ops.current();
        if !lock.is_held_by(cs, sched, current) {
            return Err(SchedError::LockNotOwner);
        }

        lock.release(cs, sched, ops)?;
        sched.wait_for_access(cs, self.queue, current)?;
        ops.sleep(cs, sched);

        lock.acquire(cs, sched, ops)
    }

    /// Wake one sleeper, if any
    ///
    /// # Returns
    /// * `Ok(true)` - A thread was readied
    /// * `Err(SchedError::LockNotOwner)` - Current thread does not hold `lock`
    pub fn wake<O: ThreadOps>(
        &self,
        cs: &CriticalSection,
        sched: &mut PriorityScheduler,
        ops: &mut O,
        lock: &Lock,
    ) -> SchedResult<bool> {
        if !lock.is_held_by(cs, sched, ops.current()) {
            return Err(SchedError::LockNotOwner);
        }

        match sched.next_thread(cs, self.queue) {
            Some(thread) => {
                ops.ready(cs, sched, thread);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Wake every sleeper
    ///
    /// # Returns
    /// Number of threads readied.
    pub fn wake_all<O: ThreadOps>(
        &self,
        cs: &CriticalSection,
        sched: &mut PriorityScheduler,
        ops: &mut O,
        lock: &Lock,
    ) -> SchedResult<usize> {
        let mut woken = 0;
        while self.wake(cs, sched, ops, lock)? {
            woken += 1;
        }
        Ok(woken)
    }

    /// Number of sleeping threads
    #[inline]
    pub fn sleeper_count(&self, cs: &CriticalSection, sched: &PriorityScheduler) -> usize {
        sched.waiter_count(cs, self.queue)
    }

    /// Resource queue backing this condition
    #[inline]
    pub fn queue(&self) -> QueueId {
        self.queue
    }

    /// Destroy the condition
    ///
    /// # Returns
    /// * `Err(SchedError::QueueBusy)` - Threads are still sleeping on it
    pub fn delete(self, cs: &CriticalSection, sched: &mut PriorityScheduler) -> SchedResult<()> {
        sched.delete_resource_queue(cs, self.queue)
    }
}
