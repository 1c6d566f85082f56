use core::fmt;

use crate::config::{MAX_COMBINED, MAX_SINGLES};

/// A malformed button table. The engine refuses to start on any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    TooManySingles(usize),
    TooManyCombined(usize),
    DuplicateAlias(&'static str),
    /// A chord names something that is not a physical button.
    UnknownAlias {
        chord: &'static str,
        member: &'static str,
    },
    EmptyChord(&'static str),
    /// A chord lists the same button more than once.
    DuplicateMember {
        chord: &'static str,
        member: &'static str,
    },
    /// The board has no line registered under this alias.
    LineNotFound(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TooManySingles(n) => {
                write!(f, "{n} physical buttons configured, at most {MAX_SINGLES} supported")
            }
            ConfigError::TooManyCombined(n) => {
                write!(f, "{n} chords configured, at most {MAX_COMBINED} supported")
            }
            ConfigError::DuplicateAlias(alias) => write!(f, "alias `{alias}` used twice"),
            ConfigError::UnknownAlias { chord, member } => {
                write!(f, "chord `{chord}` names unknown button `{member}`")
            }
            ConfigError::EmptyChord(chord) => write!(f, "chord `{chord}` has no members"),
            ConfigError::DuplicateMember { chord, member } => {
                write!(f, "chord `{chord}` lists `{member}` twice")
            }
            ConfigError::LineNotFound(alias) => write!(f, "no GPIO line for `{alias}`"),
        }
    }
}

impl core::error::Error for ConfigError {}
