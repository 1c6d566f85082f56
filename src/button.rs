use bits_button_rs::config::TICK_INTERVAL;
use bits_button_rs::{ButtonEngine, ButtonLine, EventSink, LineProvider, Pull, TickOutcome, split_event_id};
use defmt::{debug, info, warn};
use embassy_futures::select::select4;
use embassy_rp::Peri;
use embassy_rp::gpio::{self, AnyPin, Flex};
use embassy_time::{Instant, Ticker};

pub const BUTTON_COUNT: usize = 4;

/// A button pin. The edge interrupt is "armed" while the idle task is
/// awaiting an edge on it.
pub struct RpLine {
    pin: Flex<'static>,
    armed: bool,
}

impl RpLine {
    async fn edge(&mut self) {
        if self.armed {
            self.pin.wait_for_any_edge().await;
        } else {
            core::future::pending::<()>().await;
        }
    }
}

impl ButtonLine for RpLine {
    fn configure(&mut self, pull: Pull) {
        self.pin.set_as_input();
        self.pin.set_pull(match pull {
            Pull::Up => gpio::Pull::Up,
            Pull::Down => gpio::Pull::Down,
        });
    }

    fn is_high(&mut self) -> bool {
        self.pin.is_high()
    }

    fn set_edge_interrupt(&mut self, enabled: bool) {
        self.armed = enabled;
    }
}

/// The board's button pins, keyed by alias.
pub struct ButtonGPIO {
    pins: [Option<(&'static str, Peri<'static, AnyPin>)>; BUTTON_COUNT],
}

impl ButtonGPIO {
    pub fn new(pins: [(&'static str, Peri<'static, AnyPin>); BUTTON_COUNT]) -> Self {
        Self {
            pins: pins.map(Some),
        }
    }
}

impl LineProvider for ButtonGPIO {
    type Line = RpLine;

    fn take(&mut self, alias: &str) -> Option<RpLine> {
        let slot = self
            .pins
            .iter_mut()
            .find(|slot| matches!(slot, Some((a, _)) if *a == alias))?;
        let (_, pin) = slot.take()?;
        Some(RpLine {
            pin: Flex::new(pin),
            armed: false,
        })
    }
}

async fn wait_for_edge(lines: &mut [RpLine]) {
    let [a, b, c, d] = lines else {
        defmt::panic!("expected {} button lines", BUTTON_COUNT);
    };
    select4(a.edge(), b.edge(), c.edge(), d.edge()).await;
}

#[embassy_executor::task]
pub async fn button_task(mut engine: ButtonEngine<'static, RpLine>) {
    loop {
        wait_for_edge(engine.lines_mut()).await;
        if !engine.wake_flags().wake_from_edge() {
            continue;
        }
        debug!("button edge, polling");

        let mut ticker = Ticker::every(TICK_INTERVAL);
        loop {
            let now = Instant::now().as_millis() as u32;
            if engine.tick(now) == TickOutcome::Sleep {
                // Nothing awaits between here and `wait_for_edge`, so the
                // pin interrupt is live again within a few instructions. A
                // press landing in that gap is only seen on its next edge.
                break;
            }
            ticker.next().await;
        }
    }
}

#[embassy_executor::task]
pub async fn event_task(events: &'static EventSink) {
    loop {
        let id = events.wait().await;
        if let Some((index, kind)) = split_event_id(id) {
            debug!("notified: index {} {}", index, kind);
        }

        while let Some(e) = events.pop() {
            info!(
                "{} {} history={:b} holds={} clicks={} @{}",
                e.alias,
                e.event,
                e.history,
                e.hold_count,
                e.click_count(),
                e.tick
            );
        }

        if events.dropped() > 0 {
            warn!("{} button events dropped so far", events.dropped());
        }
    }
}
