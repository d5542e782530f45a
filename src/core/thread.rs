//! Cooperative thread layer interface
//!
//! The scheduler core never blocks or wakes anything itself. Locks, join
//! points and the alarm reach the thread layer through [`ThreadOps`]: a
//! thread queued with `wait_for_access` is put to sleep right after, and a
//! thread returned by `next_thread` is readied by the caller.
//!
//! `ready` and `sleep` receive the scheduler: choosing which thread runs
//! next is itself a scheduling decision.

use crate::critical::CriticalSection;
use crate::sched::PriorityScheduler;
use crate::types::ThreadId;

/// Primitives supplied by the cooperative thread layer
pub trait ThreadOps {
    /// Handle of the thread currently running
    fn current(&self) -> ThreadId;

    /// Make `thread` runnable again
    fn ready(&mut self, cs: &CriticalSection, sched: &mut PriorityScheduler, thread: ThreadId);

    /// Block the current thread until something readies it
    ///
    /// Called with interrupts disabled; the thread layer switches away and
    /// returns once the thread runs again.
    fn sleep(&mut self, cs: &CriticalSection, sched: &mut PriorityScheduler);

    /// Give up the rest of the current turn
    fn yield_now(&mut self);
}
