//! The per-tick pipeline: sample, debounce, arbitrate chords, step every
//! state machine, emit, and decide whether to go back to sleep.

use heapless::Vec;

use crate::arbiter::{self, Resolution};
use crate::config::{ButtonConstraints, CombinedButtonConfig, MAX_SINGLES, SingleButtonConfig};
use crate::error::ConfigError;
use crate::event::ButtonEventResult;
use crate::fsm::{ButtonState, Transition};
use crate::line::{ButtonLine, LineProvider, Pull};
use crate::power::{IdleHysteresis, WakeFlags};
use crate::registry::{InputKind, LogicalInput, Registry};
use crate::sink::EventSink;

/// What the driver should do with the periodic tick after [`ButtonEngine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    KeepPolling,
    /// Edge interrupts are armed again; stop the tick.
    Sleep,
}

pub struct ButtonEngine<'a, L: ButtonLine> {
    registry: Registry,
    lines: Vec<L, MAX_SINGLES>,
    current_mask: u32,
    hysteresis: IdleHysteresis,
    sink: &'a EventSink,
    wake: &'a WakeFlags,
}

impl<'a, L: ButtonLine> ButtonEngine<'a, L> {
    /// Build the button table and claim one line per physical button.
    ///
    /// Every line is configured with a pull towards its released level and
    /// its edge interrupt armed, so the engine starts asleep.
    pub fn new<P>(
        provider: &mut P,
        singles: &[SingleButtonConfig],
        combined: &[CombinedButtonConfig],
        sink: &'a EventSink,
        wake: &'a WakeFlags,
    ) -> Result<Self, ConfigError>
    where
        P: LineProvider<Line = L>,
    {
        let registry = Registry::new(singles, combined)?;

        let mut lines = Vec::new();
        for cfg in singles {
            let mut line = provider
                .take(cfg.alias)
                .ok_or(ConfigError::LineNotFound(cfg.alias))?;
            line.configure(Pull::for_active_level(cfg.active_level));
            line.set_edge_interrupt(true);
            // Registry::new already bounded singles to MAX_SINGLES.
            let _ = lines.push(line);
        }

        Ok(Self {
            registry,
            lines,
            current_mask: 0,
            hysteresis: IdleHysteresis::new(),
            sink,
            wake,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn state(&self, index: u8) -> Option<ButtonState> {
        self.registry.get(index).map(|input| input.machine.state())
    }

    pub fn constraints(&self, index: u8) -> Option<ButtonConstraints> {
        self.registry.get(index).map(|input| input.constraints)
    }

    /// Debounced mask from the last tick, one bit per physical button.
    pub fn current_mask(&self) -> u32 {
        self.current_mask
    }

    pub fn is_polling(&self) -> bool {
        self.wake.is_polling()
    }

    pub fn wake_flags(&self) -> &'a WakeFlags {
        self.wake
    }

    pub fn lines_mut(&mut self) -> &mut [L] {
        &mut self.lines
    }

    /// Run one tick at time `now` (milliseconds, wrapping).
    pub fn tick(&mut self, now: u32) -> TickOutcome {
        if self.wake.take_disable_request() {
            for line in self.lines.iter_mut() {
                line.set_edge_interrupt(false);
            }
        }

        let (physical, chords) = self.registry.split_mut();

        self.current_mask = sample(physical, &mut self.lines);

        let resolution = arbiter::resolve(
            self.current_mask,
            chords.iter().filter_map(LogicalInput::chord),
        );

        let mut busy = false;
        for (position, input) in chords.iter_mut().enumerate() {
            let active = resolution.chord_active(position);
            step(self.sink, input, active, now);
            busy |= !input.machine.is_idle();
        }

        for input in physical.iter_mut() {
            step_physical(self.sink, input, &resolution, self.current_mask, now);
            busy |= !input.machine.is_idle();
        }

        let idle = self.current_mask == 0 && !busy;
        if self.hysteresis.observe(idle) {
            self.enter_sleep();
            return TickOutcome::Sleep;
        }

        TickOutcome::KeepPolling
    }

    fn enter_sleep(&mut self) {
        // Polling must read as stopped before any line can fire, or an edge
        // landing mid re-arm finds `polling_active` still set and is dropped.
        self.wake.enter_sleep();
        for line in self.lines.iter_mut() {
            line.set_edge_interrupt(true);
        }
        info!("buttons idle, polling stopped");
    }
}

/// Read and debounce every physical line, returning the pressed mask.
fn sample<L: ButtonLine>(physical: &mut [LogicalInput], lines: &mut [L]) -> u32 {
    let mut mask = 0u32;
    for (input, line) in physical.iter_mut().zip(lines.iter_mut()) {
        let InputKind::Physical(p) = &mut input.kind else {
            continue;
        };
        let raw = p.active_level.is_active(line.is_high());
        if p.debouncer.update(raw) {
            mask |= 1 << input.logic_index;
        }
    }
    mask
}

fn step_physical(
    sink: &EventSink,
    input: &mut LogicalInput,
    resolution: &Resolution,
    current_mask: u32,
    now: u32,
) {
    let InputKind::Physical(p) = &mut input.kind else {
        return;
    };

    if resolution.is_suppressed(input.logic_index) {
        // The chord owns this press.
        p.commit.clear();
        input.machine.reset();
        return;
    }

    let pressed = current_mask & (1 << input.logic_index) != 0;
    let active = p
        .commit
        .gate(pressed, p.suppressible, input.machine.is_idle(), now);
    step(sink, input, active, now);
}

fn step(sink: &EventSink, input: &mut LogicalInput, active: bool, now: u32) {
    let Some(Transition {
        event,
        history,
        hold_count,
    }) = input.machine.update(&input.constraints, active, now)
    else {
        return;
    };

    sink.emit(
        input.logic_index,
        ButtonEventResult {
            alias: input.alias,
            event,
            history,
            hold_count,
            tick: now,
        },
    );
}
