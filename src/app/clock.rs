use embassy_time::Instant;
use wavewatch::{event_engine::LocalDateTime, face::WallClock};

use super::config::{CLOCK_ANCHOR, CLOCK_EPOCH_LOCAL_SECONDS};

/// Local time from uptime, re-anchored whenever a TIMESET is received.
pub(crate) struct UptimeClock {
    boot: Instant,
}

impl UptimeClock {
    pub(crate) fn new() -> Self {
        Self {
            boot: Instant::now(),
        }
    }
}

impl WallClock for UptimeClock {
    fn now(&mut self) -> LocalDateTime {
        let now = Instant::now();
        match CLOCK_ANCHOR.get() {
            Some(anchor) => {
                let elapsed = now.saturating_duration_since(anchor.received_at).as_secs();
                anchor.sync.local_time(elapsed)
            }
            None => {
                let uptime = now.saturating_duration_since(self.boot).as_secs();
                LocalDateTime::from_local_seconds(CLOCK_EPOCH_LOCAL_SECONDS.saturating_add(uptime))
            }
        }
    }
}
