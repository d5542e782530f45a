//! Global scheduler instance
//!
//! The system has one [`PriorityScheduler`], kept in a [`CsCell`] so it
//! can only be reached with interrupts disabled. Access is not re-entrant:
//! calling [`with_scheduler`] from inside its own closure panics.

use crate::core::cs_cell::CsCell;
use crate::critical::{critical_section, CriticalSection};
use crate::error::SchedResult;
use crate::sched::PriorityScheduler;
use crate::thread::ThreadOps;

// ============ Global Instance ============

static SCHEDULER: CsCell<PriorityScheduler> = CsCell::new(PriorityScheduler::new());

/// Run `f` on the global scheduler inside a critical section
///
/// # Panics
/// If called re-entrantly.
pub fn with_scheduler<F, R>(f: F) -> R
where
    F: FnOnce(&CriticalSection, &mut PriorityScheduler) -> R,
{
    critical_section(|cs| SCHEDULER.with(cs, f))
}

// ============ Current-thread priority ============

/// Raise the current thread's base priority by one
///
/// # Returns
/// * `Ok(false)` - Already at the maximum priority
pub fn increase_priority<O: ThreadOps>(ops: &O) -> SchedResult<bool> {
    let current = ops.current();
    with_scheduler(|cs, sched| sched.increase_priority(cs, current))
}

/// Lower the current thread's base priority by one
///
/// # Returns
/// * `Ok(false)` - Already at the minimum priority
pub fn decrease_priority<O: ThreadOps>(ops: &O) -> SchedResult<bool> {
    let current = ops.current();
    with_scheduler(|cs, sched| sched.decrease_priority(cs, current))
}
