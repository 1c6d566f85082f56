//! The timing automaton shared by physical buttons and chords.
//!
//! ```text
//! Idle -> Pressed -> LongPress -> Release -> ReleaseWindow -> Finish -> Idle
//!            \__________________/                  |
//!                                                  +--(re-press)--> Idle
//! ```
//!
//! Elapsed time is always `now - entry_tick` in wrapping `u32` arithmetic, so
//! tick counter overflow is harmless.

use crate::config::ButtonConstraints;
use crate::event::ButtonEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    Idle,
    Pressed,
    LongPress,
    /// Entered for one tick; emits `Released` on the next update.
    Release,
    ReleaseWindow,
    /// Entered for one tick; emits `ClickFinish` on the next update.
    Finish,
}

/// An event together with the machine's counters at the moment it fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub event: ButtonEvent,
    pub history: u32,
    pub hold_count: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct StateMachine {
    state: ButtonState,
    entry_tick: u32,
    history: u32,
    hold_count: u16,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub const fn new() -> Self {
        Self {
            state: ButtonState::Idle,
            entry_tick: 0,
            history: 0,
            hold_count: 0,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn history(&self) -> u32 {
        self.history
    }

    pub fn hold_count(&self) -> u16 {
        self.hold_count
    }

    pub fn is_idle(&self) -> bool {
        self.state == ButtonState::Idle
    }

    /// Drop back to `Idle`, forgetting history and hold count.
    pub fn reset(&mut self) {
        self.state = ButtonState::Idle;
        self.history = 0;
        self.hold_count = 0;
    }

    /// Advance by one tick with the input's effective level.
    pub fn update(
        &mut self,
        constraints: &ButtonConstraints,
        active: bool,
        now: u32,
    ) -> Option<Transition> {
        let elapsed = now.wrapping_sub(self.entry_tick);

        match self.state {
            ButtonState::Idle => {
                if active {
                    self.enter(ButtonState::Pressed, now);
                    self.record(true);
                    return self.fire(ButtonEvent::Pressed);
                }
            }
            ButtonState::Pressed => {
                if !active {
                    self.enter(ButtonState::Release, now);
                } else if elapsed > u32::from(constraints.long_press_start_ms) {
                    self.enter(ButtonState::LongPress, now);
                    self.hold_count = 0;
                    self.record(true);
                    return self.fire(ButtonEvent::LongPressStart);
                }
            }
            ButtonState::LongPress => {
                if !active {
                    self.enter(ButtonState::Release, now);
                } else if elapsed > u32::from(constraints.long_press_period_ms) {
                    self.entry_tick = now;
                    self.hold_count = self.hold_count.saturating_add(1);
                    self.record(true);
                    return self.fire(ButtonEvent::LongPressHold);
                }
            }
            ButtonState::Release => {
                self.record(false);
                let transition = self.fire(ButtonEvent::Released);
                self.enter(ButtonState::ReleaseWindow, now);
                return transition;
            }
            ButtonState::ReleaseWindow => {
                if active {
                    // History is kept so the next press chains onto it.
                    self.state = ButtonState::Idle;
                } else if elapsed > u32::from(constraints.time_window_ms) {
                    self.state = ButtonState::Finish;
                }
            }
            ButtonState::Finish => {
                let transition = self.fire(ButtonEvent::ClickFinish);
                self.history = 0;
                self.state = ButtonState::Idle;
                return transition;
            }
        }

        None
    }

    fn enter(&mut self, state: ButtonState, now: u32) {
        self.state = state;
        self.entry_tick = now;
    }

    fn record(&mut self, active: bool) {
        self.history = (self.history << 1) | u32::from(active);
    }

    fn fire(&self, event: ButtonEvent) -> Option<Transition> {
        Some(Transition {
            event,
            history: self.history,
            hold_count: self.hold_count,
        })
    }
}
