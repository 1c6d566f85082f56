//! Outbound event queue and listener notification.
//!
//! The tick task is the only producer. Any number of consumers may `pop`,
//! `peek` or `wait`. A full queue drops its oldest record so the producer
//! never blocks.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use heapless::Deque;

use crate::config::EVENT_QUEUE_CAPACITY;
use crate::event::{ButtonEventResult, make_event_id};

pub struct EventSink {
    queue: Mutex<CriticalSectionRawMutex, RefCell<Deque<ButtonEventResult, EVENT_QUEUE_CAPACITY>>>,
    notify: Signal<CriticalSectionRawMutex, u16>,
    dropped: AtomicU32,
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
            notify: Signal::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue `result` and raise the id of `(index, result.event)`.
    pub fn emit(&self, index: u8, result: ButtonEventResult) {
        let overflowed = self.queue.lock(|q| {
            let mut q = q.borrow_mut();
            let overflowed = q.is_full() && q.pop_front().is_some();
            // Cannot fail: a slot was freed above if needed.
            let _ = q.push_back(result);
            overflowed
        });

        if overflowed {
            // No atomic RMW on thumbv6m; only the tick task writes this.
            let dropped = self.dropped.load(Ordering::Relaxed) + 1;
            self.dropped.store(dropped, Ordering::Relaxed);
            warn!("event queue full, dropped oldest ({} total)", dropped);
        }

        debug!(
            "{} {} history={:b} holds={}",
            result.alias, result.event, result.history, result.hold_count
        );
        self.notify.signal(make_event_id(index, result.event));
    }

    /// Remove and return the oldest queued event.
    pub fn pop(&self) -> Option<ButtonEventResult> {
        self.queue.lock(|q| q.borrow_mut().pop_front())
    }

    /// Return the oldest queued event without removing it.
    pub fn peek(&self) -> Option<ButtonEventResult> {
        self.queue.lock(|q| q.borrow().front().copied())
    }

    pub fn len(&self) -> usize {
        self.queue.lock(|q| q.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of events lost to overflow since startup.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Wait for the next notification id. Only the latest id is kept if
    /// several events fire before the listener runs; the queue holds them all.
    pub async fn wait(&self) -> u16 {
        self.notify.wait().await
    }

    /// Take a pending notification id without waiting.
    pub fn try_notification(&self) -> Option<u16> {
        self.notify.try_take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ButtonEvent, split_event_id};

    fn result(tick: u32, event: ButtonEvent) -> ButtonEventResult {
        ButtonEventResult {
            alias: "btn",
            event,
            history: 1,
            hold_count: 0,
            tick,
        }
    }

    #[test]
    fn peek_does_not_consume() {
        let sink = EventSink::new();
        sink.emit(2, result(10, ButtonEvent::Pressed));
        sink.emit(2, result(20, ButtonEvent::Released));

        assert_eq!(sink.peek().map(|r| r.tick), Some(10));
        assert_eq!(sink.peek().map(|r| r.tick), Some(10));
        assert_eq!(sink.pop().map(|r| r.tick), Some(10));
        assert_eq!(sink.pop().map(|r| r.tick), Some(20));
        assert_eq!(sink.pop(), None);
        assert_eq!(sink.peek(), None);
    }

    #[test]
    fn full_queue_drops_oldest() {
        let sink = EventSink::new();
        let total = EVENT_QUEUE_CAPACITY as u32 + 3;
        for tick in 0..total {
            sink.emit(0, result(tick, ButtonEvent::LongPressHold));
        }

        assert_eq!(sink.len(), EVENT_QUEUE_CAPACITY);
        assert_eq!(sink.dropped(), 3);
        assert_eq!(sink.pop().map(|r| r.tick), Some(3));
    }

    #[test]
    fn notification_carries_index_and_kind() {
        let sink = EventSink::new();
        assert_eq!(sink.try_notification(), None);

        sink.emit(5, result(0, ButtonEvent::Pressed));
        sink.emit(7, result(0, ButtonEvent::ClickFinish));

        let id = sink.try_notification().unwrap();
        assert_eq!(split_event_id(id), Some((7, ButtonEvent::ClickFinish)));
        assert_eq!(sink.try_notification(), None);
    }
}
