//! Thread join points
//!
//! Joining a thread is waiting for a resource the target holds until it
//! finishes. The join point is a transferring queue acquired by the
//! target, so joiners donate their priority to it exactly as lock
//! waiters donate to a lock holder.

use crate::critical::CriticalSection;
use crate::error::SchedResult;
use crate::sched::PriorityScheduler;
use crate::thread::ThreadOps;
use crate::types::{QueueId, ThreadId};

/// Point where threads wait for `target` to finish
#[derive(Debug)]
pub struct JoinPoint {
    target: ThreadId,
    /// None once the target has finished
    queue: Option<QueueId>,
}

impl JoinPoint {
    /// Create the join point of `target`, usually when it is forked
    pub fn new(cs: &CriticalSection, sched: &mut PriorityScheduler, target: ThreadId) -> SchedResult<Self> {
        let queue = sched.new_resource_queue(cs, true)?;
        sched.acquire(cs, queue, target)?;

        Ok(JoinPoint {
            target,
            queue: Some(queue),
        })
    }

    /// Wait for the target to finish
    ///
    /// Returns at once if it already has.
    ///
    /// # Panics
    /// If the current thread is the target.
    pub fn join<O: ThreadOps>(
        &self,
        cs: &CriticalSection,
        sched: &mut PriorityScheduler,
        ops: &mut O,
    ) -> SchedResult<()> {
        let current = ops.current();
        assert!(current != self.target, "thread cannot join itself");

        let Some(queue) = self.queue else {
            return Ok(());
        };

        sched.wait_for_access(cs, queue, current)?;
        ops.sleep(cs, sched);
        Ok(())
    }

    /// Called by the target as it finishes: readies every joiner, highest
    /// priority first, and frees the join queue.
    ///
    /// # Returns
    /// Number of joiners readied.
    pub fn finish<O: ThreadOps>(
        &mut self,
        cs: &CriticalSection,
        sched: &mut PriorityScheduler,
        ops: &mut O,
    ) -> SchedResult<usize> {
        let Some(queue) = self.queue.take() else {
            return Ok(0);
        };

        let mut woken = 0;
        while let Some(joiner) = sched.next_thread(cs, queue) {
            ops.ready(cs, sched, joiner);
            woken += 1;
        }

        sched.delete_resource_queue(cs, queue)?;
        crate::debug!("thread {} finished, {} joiners readied", self.target, woken);
        Ok(woken)
    }

    /// Thread being joined
    #[inline]
    pub fn target(&self) -> ThreadId {
        self.target
    }

    /// Whether the target has finished
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.queue.is_none()
    }
}
