use core::cell::Cell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embassy_time::Instant;
use esp_hal::{uart::Uart, Async};
use wavewatch::face::TimeSyncCommand;

pub(crate) type SerialUart = Uart<'static, Async>;

#[derive(Clone, Copy, Debug)]
pub(crate) struct ToneRequest {
    pub(crate) frequency_hz: u16,
    pub(crate) duration_ms: u16,
}

/// Last `TIMESET` and the uptime at which it arrived.
#[derive(Clone, Copy)]
pub(crate) struct ClockAnchor {
    pub(crate) sync: TimeSyncCommand,
    pub(crate) received_at: Instant,
}

pub(crate) struct ClockAnchorCell {
    inner: Mutex<CriticalSectionRawMutex, Cell<Option<ClockAnchor>>>,
}

impl ClockAnchorCell {
    pub(crate) const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(None)),
        }
    }

    pub(crate) fn get(&self) -> Option<ClockAnchor> {
        self.inner.lock(Cell::get)
    }

    pub(crate) fn set(&self, anchor: ClockAnchor) {
        self.inner.lock(|cell| cell.set(Some(anchor)));
    }
}
