//! Core type definitions for the scheduler
//!
//! Handles are small copyable integers; the records they name live in
//! the scheduler's arenas.

/// Thread priority (higher value = more urgent)
pub type Priority = u8;

/// Tick counter type
pub type Tick = u64;

/// Handle of a thread, issued by the cooperative thread layer
///
/// The scheduler only relies on identity equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThreadId(pub u16);

/// Handle of a resource queue, issued by [`PriorityScheduler::new_resource_queue`]
///
/// [`PriorityScheduler::new_resource_queue`]: crate::sched::PriorityScheduler::new_resource_queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueId(pub(crate) u8);

impl QueueId {
    /// Arena slot of this queue
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
