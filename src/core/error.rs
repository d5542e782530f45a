//! Error types for the scheduler
//!
//! Only conditions bounded by configuration or by caller protocol are
//! reported as errors. Broken invariants are contract violations and
//! panic instead.

/// Scheduler error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum SchedError {
    // ============ Arena errors ============
    /// No free thread state slot
    NoMoreThreads = 1001,
    /// No free resource queue slot
    NoMoreQueues = 1002,
    /// Queue still has waiters and cannot be deleted
    QueueBusy = 1003,

    // ============ Lock errors ============
    /// Caller already holds the lock
    LockOwner = 2001,
    /// Caller does not hold the lock
    LockNotOwner = 2002,

    // ============ Context errors ============
    /// Blocking call made from interrupt context
    IsrContext = 3001,

    // ============ Alarm errors ============
    /// Alarm sleeper list is full
    AlarmFull = 4001,
}

/// Result type alias for scheduler operations
pub type SchedResult<T> = Result<T, SchedError>;

impl SchedError {
    /// Numeric error code
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }
}
