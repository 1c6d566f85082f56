//! Sleep/wake bookkeeping between edge interrupts and the polling tick.
//!
//! While idle, the tick is stopped and every button's edge interrupt is
//! armed. The first edge calls [`WakeFlags::wake_from_edge`], which is the
//! only thing interrupt context ever does. The tick body then disables the
//! interrupts itself and polls until [`IdleHysteresis`] has seen enough
//! quiet ticks in a row.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::IDLE_SLEEP_THRESHOLD;

/// Flags shared between interrupt context and the tick task.
pub struct WakeFlags {
    polling_active: AtomicBool,
    interrupts_need_disable: AtomicBool,
}

impl Default for WakeFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeFlags {
    pub const fn new() -> Self {
        Self {
            polling_active: AtomicBool::new(false),
            interrupts_need_disable: AtomicBool::new(false),
        }
    }

    /// Request polling from an edge interrupt.
    ///
    /// Returns `true` if polling was stopped, in which case the caller must
    /// start the periodic tick.
    pub fn wake_from_edge(&self) -> bool {
        critical_section::with(|_| {
            if self.polling_active.load(Ordering::Relaxed) {
                return false;
            }
            self.polling_active.store(true, Ordering::Release);
            self.interrupts_need_disable.store(true, Ordering::Release);
            true
        })
    }

    pub fn is_polling(&self) -> bool {
        self.polling_active.load(Ordering::Acquire)
    }

    /// Consume a pending request to disable edge interrupts.
    pub fn take_disable_request(&self) -> bool {
        critical_section::with(|_| {
            let pending = self.interrupts_need_disable.load(Ordering::Acquire);
            self.interrupts_need_disable.store(false, Ordering::Relaxed);
            pending
        })
    }

    /// Mark polling as stopped. Call before re-arming the edge interrupts.
    pub fn enter_sleep(&self) {
        self.polling_active.store(false, Ordering::Release);
    }
}

/// Counts consecutive idle ticks. Owned by the tick task.
#[derive(Debug, Default)]
pub struct IdleHysteresis {
    idle_ticks: u32,
}

impl IdleHysteresis {
    pub const fn new() -> Self {
        Self { idle_ticks: 0 }
    }

    /// Record one tick; returns `true` once polling should stop.
    pub fn observe(&mut self, idle: bool) -> bool {
        if !idle {
            self.idle_ticks = 0;
            return false;
        }

        self.idle_ticks = self.idle_ticks.saturating_add(1);
        if self.idle_ticks > IDLE_SLEEP_THRESHOLD {
            self.idle_ticks = 0;
            return true;
        }
        false
    }

    #[cfg(test)]
    fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }
}
