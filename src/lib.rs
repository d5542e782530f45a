//! Priority scheduler core with priority donation
//!
//! A single-core, cooperative scheduling core providing:
//! - Resource queues that pick the highest effective-priority waiter,
//!   longest-waiting first among equals
//! - Transitive priority donation through held resources (locks, joins)
//! - Lazy, dirty-flag driven recomputation of effective priorities
//! - Locks, condition variables, join points and a tick-driven alarm
//!   built on top of the core

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

// ============ Critical Section ============

#[cfg(target_arch = "arm")]
mod cs_impl {
    use cortex_m::interrupt;
    use cortex_m::register::primask;
    use critical_section::{set_impl, Impl, RawRestoreState};

    struct SingleCoreCriticalSection;
    set_impl!(SingleCoreCriticalSection);

    unsafe impl Impl for SingleCoreCriticalSection {
        unsafe fn acquire() -> RawRestoreState {
            let was_active = primask::read().is_active();
            interrupt::disable();
            was_active
        }

        unsafe fn release(was_active: RawRestoreState) {
            if was_active {
                unsafe { interrupt::enable() }
            }
        }
    }
}

// ============ Modules ============

pub mod log;
mod lang_items;

pub mod core;
pub mod sync;

// ============ Re-exports ============

pub use crate::core::config;
pub use crate::core::config::*;
pub use crate::core::critical;
pub use crate::core::error;
pub use crate::core::error::{SchedError, SchedResult};
pub use crate::core::kernel;
pub use crate::core::queue_set;
pub use crate::core::sched;
pub use crate::core::sched::{PriorityScheduler, SchedStats, ThreadState};
pub use crate::core::thread;
pub use crate::core::thread::ThreadOps;
pub use crate::core::types;
pub use crate::core::types::*;

#[cfg(feature = "alarm")]
pub use crate::core::time;

#[cfg(feature = "lock")]
pub use sync::lock;
#[cfg(feature = "lock")]
pub use sync::condition;
#[cfg(feature = "join")]
pub use sync::join;
