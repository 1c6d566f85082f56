//! Per-button integrating debounce.
//!
//! A sample must be seen `DEBOUNCE_THRESHOLD` ticks in a row before the
//! stable level follows it, which rejects single-tick glitches at a cost of
//! at most `DEBOUNCE_THRESHOLD` ticks of latency.

use crate::config::DEBOUNCE_THRESHOLD;

#[derive(Debug, Clone, Copy, Default)]
pub struct Debouncer {
    counter: u8,
    last_raw: bool,
    stable: bool,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            counter: 0,
            last_raw: false,
            stable: false,
        }
    }

    /// Feed one raw sample (`true` = pressed) and return the stable state.
    pub fn update(&mut self, raw: bool) -> bool {
        if raw != self.last_raw {
            self.counter = 1;
            self.last_raw = raw;
        } else if self.counter < DEBOUNCE_THRESHOLD {
            self.counter += 1;
        }

        if self.counter >= DEBOUNCE_THRESHOLD {
            self.stable = self.last_raw;
        }

        self.stable
    }

    pub fn stable(&self) -> bool {
        self.stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_tick_glitch_is_rejected() {
        let mut d = Debouncer::new();
        assert!(!d.update(false));
        assert!(!d.update(true));
        assert!(!d.update(false));
        assert!(!d.update(false));
        assert!(!d.stable());
    }

    #[test]
    fn level_held_for_threshold_is_accepted() {
        let mut d = Debouncer::new();
        let mut ticks = 0;
        while !d.update(true) {
            ticks += 1;
            assert!(ticks < DEBOUNCE_THRESHOLD as usize);
        }
        assert_eq!(ticks + 1, DEBOUNCE_THRESHOLD as usize);
    }

    #[test]
    fn chatter_never_moves_stable_level() {
        let mut d = Debouncer::new();
        for _ in 0..4 {
            d.update(true);
        }
        assert!(d.stable());

        for i in 0..20 {
            assert!(d.update(i % 2 == 0));
        }
    }

    #[test]
    fn release_lags_by_threshold() {
        let mut d = Debouncer::new();
        d.update(true);
        d.update(true);
        assert!(d.stable());

        assert!(d.update(false));
        assert!(!d.update(false));
    }
}
