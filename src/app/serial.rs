use embassy_time::Instant;
use wavewatch::face::{parse_timeset_command, LineEvent, LineReader};

use super::{
    config::{CLOCK_ANCHOR, TIMESET_CMD_BUF_LEN},
    types::{ClockAnchor, SerialUart},
};

#[embassy_executor::task]
pub(crate) async fn time_sync_task(mut uart: SerialUart) {
    let mut reader = LineReader::<TIMESET_CMD_BUF_LEN>::new();
    let mut rx = [0u8; 1];

    loop {
        if !matches!(uart.read_async(&mut rx).await, Ok(1)) {
            continue;
        }
        match reader.push(rx[0]) {
            LineEvent::Pending => {}
            LineEvent::Overlong => {
                log::warn!("serial line longer than {} bytes dropped", TIMESET_CMD_BUF_LEN)
            }
            LineEvent::Line(line) => match parse_timeset_command(line) {
                Some(sync) => {
                    CLOCK_ANCHOR.set(ClockAnchor {
                        sync,
                        received_at: Instant::now(),
                    });
                    log::info!(
                        "time synced: utc={} tz={}min",
                        sync.unix_epoch_utc_seconds,
                        sync.tz_offset_minutes
                    );
                }
                None => log::warn!("ignored serial line ({} bytes)", line.len()),
            },
        }
    }
}
