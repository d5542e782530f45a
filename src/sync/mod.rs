//! Synchronization primitives
//!
//! Locks, condition variables and join points built on resource queues.
//! Locks and join points transfer priority; condition variables do not.

#[cfg(feature = "lock")]
pub mod lock;
#[cfg(feature = "lock")]
pub mod condition;
#[cfg(feature = "join")]
pub mod join;
