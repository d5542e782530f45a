//! Critical section protected cell
//!
//! Holds the global scheduler. Data inside is reachable only while a
//! [`CriticalSection`] guard is alive.

use core::cell::UnsafeCell;

use portable_atomic::{AtomicBool, Ordering};

use crate::critical::CriticalSection;

/// A cell that can only be accessed within a critical section.
///
/// Access is exclusive: a second access while the first borrow is still
/// live is a contract violation and panics.
pub struct CsCell<T> {
    value: UnsafeCell<T>,
    borrowed: AtomicBool,
}

// SAFETY: all access goes through the critical section plus the borrow flag.
unsafe impl<T: Send> Sync for CsCell<T> {}

impl<T> CsCell<T> {
    /// Create a new CsCell
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
            borrowed: AtomicBool::new(false),
        }
    }

    /// Run `f` with exclusive access to the inner value
    ///
    /// # Panics
    /// If called re-entrantly from inside another `with` on the same cell.
    pub fn with<R>(&self, cs: &CriticalSection, f: impl FnOnce(&CriticalSection, &mut T) -> R) -> R {
        let was_borrowed = self.borrowed.swap(true, Ordering::Acquire);
        assert!(!was_borrowed, "CsCell accessed re-entrantly");

        let _release = BorrowRelease(&self.borrowed);
        // SAFETY: the critical section excludes other contexts and the
        // borrow flag excludes re-entrant access from this one.
        let value = unsafe { &mut *self.value.get() };
        f(cs, value)
    }
}

struct BorrowRelease<'a>(&'a AtomicBool);

impl Drop for BorrowRelease<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
