//! Wall-clock bookkeeping for hosts without a calendar RTC: a `TIMESET`
//! line received over serial anchors local time, uptime advances it.

use crate::event_engine::types::LocalDateTime;

const TIMESET: &[u8] = b"TIMESET";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeSyncCommand {
    pub unix_epoch_utc_seconds: u64,
    pub tz_offset_minutes: i32,
}

impl TimeSyncCommand {
    /// Local seconds since the epoch, `elapsed_seconds` after the sync.
    pub fn local_seconds(&self, elapsed_seconds: u64) -> u64 {
        let utc_now = self.unix_epoch_utc_seconds.saturating_add(elapsed_seconds);
        let offset_seconds = i64::from(self.tz_offset_minutes) * 60;
        let local = i64::try_from(utc_now)
            .unwrap_or(i64::MAX)
            .saturating_add(offset_seconds);
        u64::try_from(local).unwrap_or(0)
    }

    pub fn local_time(&self, elapsed_seconds: u64) -> LocalDateTime {
        LocalDateTime::from_local_seconds(self.local_seconds(elapsed_seconds))
    }
}

/// Parses `TIMESET <unix_utc_seconds> <tz_offset_minutes>`.
pub fn parse_timeset_command(line: &[u8]) -> Option<TimeSyncCommand> {
    let line = trim_ascii_whitespace(line);
    let rest = line.strip_prefix(TIMESET)?;
    if !rest.first().is_some_and(u8::is_ascii_whitespace) {
        return None;
    }

    let mut i = skip_whitespace(rest, 0);
    let (unix_epoch_utc_seconds, next) = parse_u64_ascii(rest, i)?;
    i = skip_whitespace(rest, next);
    let (tz_offset_minutes, next) = parse_i32_ascii(rest, i)?;
    if skip_whitespace(rest, next) != rest.len() {
        return None;
    }
    if !(-720..=840).contains(&tz_offset_minutes) {
        return None;
    }

    Some(TimeSyncCommand {
        unix_epoch_utc_seconds,
        tz_offset_minutes,
    })
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn trim_ascii_whitespace(line: &[u8]) -> &[u8] {
    let start = skip_whitespace(line, 0);
    let mut end = line.len();
    while end > start && line[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    &line[start..end]
}

fn parse_u64_ascii(bytes: &[u8], mut i: usize) -> Option<(u64, usize)> {
    let start = i;
    let mut value = 0u64;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        value = value
            .checked_mul(10)?
            .checked_add(u64::from(bytes[i] - b'0'))?;
        i += 1;
    }
    (i != start).then_some((value, i))
}

fn parse_i32_ascii(bytes: &[u8], mut i: usize) -> Option<(i32, usize)> {
    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    let (magnitude, next) = parse_u64_ascii(bytes, i)?;
    let magnitude = i64::try_from(magnitude).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    Some((i32::try_from(value).ok()?, next))
}
