//! Critical section handling for the scheduler
//!
//! Every scheduler mutation requires a [`CriticalSection`] guard. On a
//! single core this is the "interrupts disabled" region; the guard is the
//! proof handed to each operation.

use core::marker::PhantomData;

use critical_section::RestoreState;

/// RAII guard for critical sections
///
/// When this guard is created, interrupts are disabled (or, on hosted
/// targets, the global critical-section mutex is taken). When it is
/// dropped, the previous state is restored, so guards nest.
pub struct CriticalSection {
    restore: RestoreState,
    // Must be released on the context that acquired it
    _not_send: PhantomData<*mut ()>,
}

impl CriticalSection {
    /// Enter a critical section.
    ///
    /// Returns a guard that will restore the previous state when dropped.
    #[inline(always)]
    pub fn enter() -> Self {
        // SAFETY: the matching release happens exactly once, in Drop.
        let restore = unsafe { critical_section::acquire() };
        CriticalSection {
            restore,
            _not_send: PhantomData,
        }
    }
}

impl Drop for CriticalSection {
    #[inline(always)]
    fn drop(&mut self) {
        // SAFETY: restore came from the acquire in enter(); guards are not
        // Send and are dropped in LIFO order by scope.
        unsafe { critical_section::release(self.restore) };
    }
}

/// Execute a closure inside a critical section
///
/// The closure receives a reference to the critical section guard, which
/// every scheduler operation and [`CsCell`] access requires.
///
/// [`CsCell`]: crate::core::cs_cell::CsCell
#[inline]
pub fn critical_section<F, R>(f: F) -> R
where
    F: FnOnce(&CriticalSection) -> R,
{
    let cs = CriticalSection::enter();
    f(&cs)
}

/// Check if currently executing in an ISR context
#[inline]
pub fn is_isr_context() -> bool {
    #[cfg(target_arch = "arm")]
    {
        let ipsr: u32;
        unsafe {
            core::arch::asm!(
                "mrs {}, IPSR",
                out(reg) ipsr,
                options(nomem, nostack, preserves_flags)
            );
        }
        ipsr != 0
    }

    #[cfg(not(target_arch = "arm"))]
    {
        false
    }
}
