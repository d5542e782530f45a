//! Compile-time configuration for the scheduler
//!
//! These constants control priority bounds and arena capacities.

use crate::types::Priority;

/// Lowest priority a thread can have
pub const CFG_PRIO_MIN: Priority = 0;

/// Highest priority a thread can have
pub const CFG_PRIO_MAX: Priority = 7;

/// Base priority of a thread that never had its priority set
pub const CFG_PRIO_DEFAULT: Priority = 1;

/// Number of thread states the scheduler can track at once
pub const CFG_THREAD_MAX: usize = 32;

/// Number of resource queues that can exist at once
///
/// Held resources are tracked in a 64-bit set, so this cannot exceed 64.
pub const CFG_QUEUE_MAX: usize = 64;

/// Number of threads that can sleep on the alarm at once
pub const CFG_ALARM_MAX: usize = 16;

const _: () = assert!(CFG_PRIO_MIN <= CFG_PRIO_DEFAULT && CFG_PRIO_DEFAULT <= CFG_PRIO_MAX);
const _: () = assert!(CFG_QUEUE_MAX <= 64);
const _: () = assert!(CFG_QUEUE_MAX <= u8::MAX as usize + 1);
const _: () = assert!(CFG_THREAD_MAX > 0);
