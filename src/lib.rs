//! Button sampling engine: debounce, chord arbitration and per-button
//! press/long-press/click state machines, driven by a fixed polling tick
//! that sleeps behind edge interrupts while nothing is happening.
//!
//! Data flow per tick:
//!
//! ```text
//! raw lines -> Debouncer -> mask -> arbiter::resolve -> StateMachine (x N) -> EventSink
//!                                                                        \-> IdleHysteresis
//! ```
//!
//! Nothing here allocates or blocks. Interrupt context only ever touches
//! [`WakeFlags`]; everything else belongs to whoever calls
//! [`ButtonEngine::tick`].

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod arbiter;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod event;
pub mod fsm;
pub mod line;
pub mod power;
pub mod registry;
pub mod sink;

pub use config::{ActiveLevel, ButtonConstraints, CombinedButtonConfig, SingleButtonConfig};
pub use engine::{ButtonEngine, TickOutcome};
pub use error::ConfigError;
pub use event::{ButtonEvent, ButtonEventResult, make_event_id, split_event_id};
pub use fsm::ButtonState;
pub use line::{ButtonLine, LineProvider, Pull};
pub use power::WakeFlags;
pub use sink::EventSink;
