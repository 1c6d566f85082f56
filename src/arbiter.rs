//! Chord arbitration.
//!
//! Every tick the chords are walked in priority order (most members first).
//! A chord whose members are all down claims those members for the rest of
//! the tick, so a smaller chord sharing any of them cannot also fire. A
//! matched chord with `suppress_singles` additionally takes its members away
//! from their own state machines.

use crate::config::{COMMIT_DELAY_MS, MAX_COMBINED};

/// The chord fields of a logical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    /// One bit per member physical index.
    pub mask: u32,
    pub key_count: u8,
    pub suppress_singles: bool,
}

/// Outcome of one arbitration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Bit `n` set when the `n`th chord in priority order is effectively active.
    pub active: u16,
    /// Physical inputs claimed by a matched, suppressing chord.
    pub suppression: u32,
}

const _: () = assert!(MAX_COMBINED <= u16::BITS as usize);

impl Resolution {
    pub fn chord_active(&self, position: usize) -> bool {
        self.active & (1 << position) != 0
    }

    pub fn is_suppressed(&self, physical_index: u8) -> bool {
        self.suppression & (1 << physical_index) != 0
    }
}

/// Decide which chords fire given the debounced `current_mask`.
///
/// `chords` must already be in priority order.
pub fn resolve<'a>(current_mask: u32, chords: impl IntoIterator<Item = &'a Chord>) -> Resolution {
    let mut consumed = 0u32;
    let mut resolution = Resolution::default();

    for (position, chord) in chords.into_iter().enumerate() {
        let matched = current_mask & chord.mask == chord.mask;
        if !matched {
            continue;
        }

        if consumed & chord.mask == 0 {
            resolution.active |= 1 << position;
        }
        consumed |= chord.mask;

        if chord.suppress_singles {
            resolution.suppression |= chord.mask;
        }
    }

    resolution
}

/// Holds back the press of a button that belongs to a suppressing chord,
/// giving the other chord members `COMMIT_DELAY_MS` to land.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitGate {
    pending_since: Option<u32>,
}

impl CommitGate {
    pub const fn new() -> Self {
        Self {
            pending_since: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    pub fn clear(&mut self) {
        self.pending_since = None;
    }

    /// Level to feed the state machine this tick.
    ///
    /// `idle` is whether the button's state machine is in `Idle`. Buttons
    /// that are not `suppressible` pass straight through.
    pub fn gate(&mut self, pressed: bool, suppressible: bool, idle: bool, now: u32) -> bool {
        if !(pressed && suppressible && idle) {
            self.pending_since = None;
            return pressed;
        }

        match self.pending_since {
            None => {
                self.pending_since = Some(now);
                false
            }
            Some(since) => now.wrapping_sub(since) >= COMMIT_DELAY_MS,
        }
    }
}
