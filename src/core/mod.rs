//! Core scheduler modules
//!
//! Contains the donation-aware scheduler, its configuration and types,
//! critical section handling, the global instance and time management.

pub mod config;
pub mod critical;
pub mod cs_cell;
pub mod error;
pub mod kernel;
pub mod queue_set;
pub mod sched;
pub mod thread;
pub mod types;

#[cfg(feature = "alarm")]
pub mod time;
