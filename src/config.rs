//! Tuning constants and the configuration records the engine is built from.

use embassy_time::Duration;

/// Maximum number of physical buttons. Bounded by the width of the `u32`
/// chord mask.
pub const MAX_SINGLES: usize = 32;
/// Maximum number of chords.
pub const MAX_COMBINED: usize = 16;
/// Upper bound on the number of logical inputs.
pub const MAX_INPUTS: usize = MAX_SINGLES + MAX_COMBINED;

/// Period of the polling tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);
/// Consecutive identical samples required before the debounced level moves.
pub const DEBOUNCE_THRESHOLD: u8 = 2;
/// How long a chord member holds back its own press while a chord may still form.
pub const COMMIT_DELAY_MS: u32 = 50;
/// Idle ticks tolerated before polling stops (≈100 ms at a 10 ms tick).
pub const IDLE_SLEEP_THRESHOLD: u32 = 10;
/// Capacity of the outbound event queue.
pub const EVENT_QUEUE_CAPACITY: usize = 16;

/// Per-input timing, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConstraints {
    /// Presses shorter than this count as short. Not used by the automaton;
    /// carried for consumers classifying press length.
    pub short_press_ms: u16,
    /// Hold time after which `LongPressStart` fires.
    pub long_press_start_ms: u16,
    /// Period of `LongPressHold` while the button stays down.
    pub long_press_period_ms: u16,
    /// Window after a release in which another press chains into the same click sequence.
    pub time_window_ms: u16,
}

impl ButtonConstraints {
    pub const DEFAULT: Self = Self {
        short_press_ms: 50,
        long_press_start_ms: 1000,
        long_press_period_ms: 500,
        time_window_ms: 300,
    };
}

impl Default for ButtonConstraints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Electrical level at which a button counts as pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    Low,
    High,
}

impl ActiveLevel {
    pub fn is_active(self, line_high: bool) -> bool {
        match self {
            ActiveLevel::Low => !line_high,
            ActiveLevel::High => line_high,
        }
    }
}

/// A physical button, looked up by `alias` on the board.
#[derive(Debug, Clone, Copy)]
pub struct SingleButtonConfig {
    pub alias: &'static str,
    pub active_level: ActiveLevel,
    pub constraints: ButtonConstraints,
}

impl SingleButtonConfig {
    pub const fn new(alias: &'static str, active_level: ActiveLevel) -> Self {
        Self {
            alias,
            active_level,
            constraints: ButtonConstraints::DEFAULT,
        }
    }

    pub const fn with_constraints(mut self, constraints: ButtonConstraints) -> Self {
        self.constraints = constraints;
        self
    }
}

/// A chord over physical buttons named by alias.
#[derive(Debug, Clone, Copy)]
pub struct CombinedButtonConfig {
    pub alias: &'static str,
    /// Members of a matched chord are forced idle and report nothing.
    pub suppress_singles: bool,
    pub members: &'static [&'static str],
    pub constraints: ButtonConstraints,
}

impl CombinedButtonConfig {
    pub const fn new(
        alias: &'static str,
        members: &'static [&'static str],
        suppress_singles: bool,
    ) -> Self {
        Self {
            alias,
            suppress_singles,
            members,
            constraints: ButtonConstraints::DEFAULT,
        }
    }

    pub const fn with_constraints(mut self, constraints: ButtonConstraints) -> Self {
        self.constraints = constraints;
        self
    }
}
