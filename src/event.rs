//! Event kinds, the queued result record, and the compact notification id.

/// Event id layout: `[index:8][kind:8]`.
const ID_KIND_SHIFT: u16 = 0;
const ID_INDEX_SHIFT: u16 = 8;
const ID_FIELD_MASK: u16 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ButtonEvent {
    Pressed = 0,
    LongPressStart = 1,
    LongPressHold = 2,
    Released = 3,
    /// The click window closed. Carries the full click history.
    ClickFinish = 4,
}

impl ButtonEvent {
    pub const ALL: [ButtonEvent; 5] = [
        ButtonEvent::Pressed,
        ButtonEvent::LongPressStart,
        ButtonEvent::LongPressHold,
        ButtonEvent::Released,
        ButtonEvent::ClickFinish,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

/// One emitted event, as stored in the outbound queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEventResult {
    pub alias: &'static str,
    pub event: ButtonEvent,
    /// Click history, newest transition in bit 0 (1 = active, 0 = released).
    pub history: u32,
    pub hold_count: u16,
    /// Tick (ms) at which the event was generated.
    pub tick: u32,
}

impl ButtonEventResult {
    /// Number of completed press/release cycles recorded in `history`.
    ///
    /// Every release shifts in exactly one `0`, so this is the count of zero
    /// bits below the oldest recorded transition. `0b1010` is a double click.
    pub fn click_count(&self) -> u32 {
        let significant = u32::BITS - self.history.leading_zeros();
        significant - self.history.count_ones()
    }
}

/// Build the notification id published for `(index, kind)`.
pub fn make_event_id(index: u8, kind: ButtonEvent) -> u16 {
    ((u16::from(index) & ID_FIELD_MASK) << ID_INDEX_SHIFT)
        | ((kind as u16 & ID_FIELD_MASK) << ID_KIND_SHIFT)
}

/// Recover `(index, kind)` from an id built by [`make_event_id`].
pub fn split_event_id(id: u16) -> Option<(u8, ButtonEvent)> {
    let index = ((id >> ID_INDEX_SHIFT) & ID_FIELD_MASK) as u8;
    let kind = ButtonEvent::from_u8(((id >> ID_KIND_SHIFT) & ID_FIELD_MASK) as u8)?;
    Some((index, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_INPUTS;

    #[test]
    fn event_id_round_trips() {
        for index in 0..MAX_INPUTS as u8 {
            for kind in ButtonEvent::ALL {
                assert_eq!(split_event_id(make_event_id(index, kind)), Some((index, kind)));
            }
        }
    }

    #[test]
    fn event_id_layout() {
        assert_eq!(make_event_id(3, ButtonEvent::Released), 0x0303);
        assert_eq!(make_event_id(0x2F, ButtonEvent::Pressed), 0x2F00);
        assert_eq!(split_event_id(0x0107), None);
    }

    #[test]
    fn click_count_from_history() {
        let result = |history| ButtonEventResult {
            alias: "btn",
            event: ButtonEvent::ClickFinish,
            history,
            hold_count: 0,
            tick: 0,
        };

        assert_eq!(result(0b10).click_count(), 1);
        assert_eq!(result(0b1010).click_count(), 2);
        assert_eq!(result(0b101010).click_count(), 3);
        // press, long press start, two holds, release
        assert_eq!(result(0b11110).click_count(), 1);
        assert_eq!(result(0).click_count(), 0);
    }
}
