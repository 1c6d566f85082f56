//! The GPIO seam the engine drives. Boards implement these for their pins.

use crate::config::ActiveLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    Up,
    Down,
}

impl Pull {
    /// Bias the line towards its released level.
    pub fn for_active_level(level: ActiveLevel) -> Self {
        match level {
            ActiveLevel::Low => Pull::Up,
            ActiveLevel::High => Pull::Down,
        }
    }
}

/// One button input pin.
pub trait ButtonLine {
    /// Configure as an input with both-edge interrupts and the given pull.
    fn configure(&mut self, pull: Pull);

    /// Synchronous level read.
    fn is_high(&mut self) -> bool;

    /// Arm or disarm the edge interrupt.
    fn set_edge_interrupt(&mut self, enabled: bool);
}

/// Hands out the board's lines by alias, each at most once.
pub trait LineProvider {
    type Line: ButtonLine;

    fn take(&mut self, alias: &str) -> Option<Self::Line>;
}
