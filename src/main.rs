#![no_std]
#![no_main]

mod button;

use bits_button_rs::{
    ActiveLevel, ButtonConstraints, ButtonEngine, CombinedButtonConfig, EventSink,
    SingleButtonConfig, WakeFlags,
};
use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use crate::button::{ButtonGPIO, button_task, event_task};

static BUTTON_EVENTS: EventSink = EventSink::new();
static BUTTON_WAKE: WakeFlags = WakeFlags::new();

const SINGLES: [SingleButtonConfig; button::BUTTON_COUNT] = [
    SingleButtonConfig::new("key_1", ActiveLevel::Low),
    SingleButtonConfig::new("key_2", ActiveLevel::Low),
    SingleButtonConfig::new("key_3", ActiveLevel::Low),
    // Start key: quick long-press for menu repeat.
    SingleButtonConfig::new("start", ActiveLevel::Low).with_constraints(ButtonConstraints {
        short_press_ms: 50,
        long_press_start_ms: 600,
        long_press_period_ms: 200,
        time_window_ms: 250,
    }),
];

const COMBINED: [CombinedButtonConfig; 2] = [
    CombinedButtonConfig::new("key_1+key_2", &["key_1", "key_2"], true),
    CombinedButtonConfig::new("key_1+key_2+key_3", &["key_1", "key_2", "key_3"], true),
];

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    let mut buttons = ButtonGPIO::new([
        ("key_1", p.PIN_2.into()),
        ("key_2", p.PIN_3.into()),
        ("key_3", p.PIN_4.into()),
        ("start", p.PIN_5.into()),
    ]);

    let engine = unwrap!(ButtonEngine::new(
        &mut buttons,
        &SINGLES,
        &COMBINED,
        &BUTTON_EVENTS,
        &BUTTON_WAKE,
    ));

    unwrap!(spawner.spawn(button_task(engine)));
    unwrap!(spawner.spawn(event_task(&BUTTON_EVENTS)));
}
