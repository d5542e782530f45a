//! Time management module
//!
//! Provides the global tick counter and an [`Alarm`] that lets threads
//! sleep until a deadline. The timer interrupt advances the clock and
//! wakes every sleeper whose deadline has passed.

use portable_atomic::{AtomicU64, Ordering};

use crate::config::CFG_ALARM_MAX;
use crate::critical::CriticalSection;
use crate::error::{SchedError, SchedResult};
use crate::kernel::with_scheduler;
use crate::sched::PriorityScheduler;
use crate::thread::ThreadOps;
use crate::types::{ThreadId, Tick};

/// Ticks since boot
static TICK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Get current tick count
#[inline]
pub fn time_get() -> Tick {
    TICK_COUNTER.load(Ordering::Relaxed)
}

/// Advance the clock by one tick and return the new count
#[inline]
pub fn tick_increment() -> Tick {
    TICK_COUNTER.fetch_add(1, Ordering::Relaxed) + 1
}

#[derive(Debug, Clone, Copy)]
struct Sleeper {
    thread: ThreadId,
    wake_time: Tick,
}

/// Sleep-until-deadline list
///
/// Sleepers are kept in arrival order, so threads due on the same tick
/// are woken first-come first-served.
pub struct Alarm {
    sleepers: [Option<Sleeper>; CFG_ALARM_MAX],
    count: usize,
}

impl Alarm {
    /// Create an alarm with no sleepers
    pub const fn new() -> Self {
        Alarm {
            sleepers: [None; CFG_ALARM_MAX],
            count: 0,
        }
    }

    /// Put the current thread to sleep for at least `ticks` ticks
    ///
    /// The thread is readied by the first [`timer_interrupt`](Self::timer_interrupt)
    /// at which the clock has reached the call time plus `ticks`.
    ///
    /// # Returns
    /// * `Ok(())` - Returned immediately for `ticks == 0`, otherwise after waking
    /// * `Err(SchedError::AlarmFull)` - No room for another sleeper
    pub fn wait_until<O: ThreadOps>(
        &mut self,
        cs: &CriticalSection,
        sched: &mut PriorityScheduler,
        ops: &mut O,
        ticks: Tick,
    ) -> SchedResult<()> {
        if ticks == 0 {
            return Ok(());
        }

        if self.count == CFG_ALARM_MAX {
            crate::warn!("alarm sleeper list full");
            return Err(SchedError::AlarmFull);
        }

        let thread = ops.current();
        let wake_time = time_get().saturating_add(ticks);
        self.sleepers[self.count] = Some(Sleeper { thread, wake_time });
        self.count += 1;

        crate::trace!("thread {} sleeps until tick {}", thread, wake_time);
        ops.sleep(cs, sched);
        Ok(())
    }

    /// Wake every sleeper whose deadline has passed
    ///
    /// # Returns
    /// Number of threads readied.
    pub fn timer_interrupt<O: ThreadOps>(
        &mut self,
        cs: &CriticalSection,
        sched: &mut PriorityScheduler,
        ops: &mut O,
    ) -> usize {
        let now = time_get();
        let mut kept = 0;
        let mut woken = 0;

        // Compact in place, preserving arrival order of the survivors
        for index in 0..self.count {
            let Some(sleeper) = self.sleepers[index] else {
                continue;
            };

            if sleeper.wake_time <= now {
                ops.ready(cs, sched, sleeper.thread);
                woken += 1;
            } else {
                self.sleepers[kept] = Some(sleeper);
                kept += 1;
            }
        }

        for slot in &mut self.sleepers[kept..self.count] {
            *slot = None;
        }
        self.count = kept;

        woken
    }

    /// Timer interrupt entry point
    ///
    /// Advances the clock and wakes due sleepers on the global scheduler,
    /// then yields the current thread so a higher-priority one can run.
    pub fn on_tick<O: ThreadOps>(&mut self, ops: &mut O) -> usize {
        let woken = with_scheduler(|cs, sched| {
            tick_increment();
            self.timer_interrupt(cs, sched, ops)
        });
        ops.yield_now();
        woken
    }

    /// Number of sleeping threads
    #[inline]
    pub fn sleeper_count(&self) -> usize {
        self.count
    }
}

impl Default for Alarm {
    fn default() -> Self {
        Self::new()
    }
}
