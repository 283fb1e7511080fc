use heapless::Vec;

/// Monotonic tick counter value. Wraps; compare with [`ticks_between`].
pub type Tick = u32;

pub const fn ticks_between(earlier: Tick, later: Tick) -> u32 {
    later.wrapping_sub(earlier)
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RawSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl RawSample {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Euclidean magnitude in sensor units, integer square root.
    pub fn magnitude(self) -> i32 {
        let x = i64::from(self.x);
        let y = i64::from(self.y);
        let z = i64::from(self.z);
        let sum = (x * x + y * y + z * z) as u64;
        sum.isqrt() as i32
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct CalendarDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl CalendarDate {
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LocalDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl LocalDateTime {
    /// Breaks seconds since 1970-01-01 00:00 local time into calendar fields.
    pub fn from_local_seconds(seconds: u64) -> Self {
        let days = (seconds / 86_400) as i64;
        let of_day = seconds % 86_400;

        // Civil-from-days over 400-year eras, March-based years.
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self {
            year: year.clamp(0, i64::from(u16::MAX)) as u16,
            month: month as u8,
            day: day as u8,
            hour: (of_day / 3_600) as u8,
            minute: (of_day % 3_600 / 60) as u8,
            second: (of_day % 60) as u8,
        }
    }

    pub const fn date(self) -> CalendarDate {
        CalendarDate {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum RejectReason {
    #[default]
    None = 0,
    Gated = 1,
    NoTransition = 2,
    Refractory = 3,
    GapTooShort = 4,
    GapTooLong = 5,
    WindowExpired = 6,
    MotionStopped = 7,
    SensorFault = 8,
}

impl RejectReason {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum EngineStateId {
    #[default]
    Idle = 0,
    Accumulating = 1,
    NoSensor = 2,
}

impl EngineStateId {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EngineAction {
    CycleCounted { count: u8 },
    Trigger,
    CounterReset { reason: RejectReason },
}

const ACTION_SLOTS: usize = 4;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ActionBuffer {
    slots: Vec<EngineAction, ACTION_SLOTS>,
}

impl ActionBuffer {
    pub const MAX: usize = ACTION_SLOTS;

    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Drops the action when full; a tick never produces more than `MAX`.
    pub fn push(&mut self, action: EngineAction) {
        let _ = self.slots.push(action);
    }

    pub fn extend(&mut self, other: &ActionBuffer) {
        for action in other.iter() {
            self.push(*action);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EngineAction> {
        self.slots.iter()
    }

    pub fn contains_trigger(&self) -> bool {
        self.iter()
            .any(|action| matches!(action, EngineAction::Trigger))
    }

    pub fn reset_reason(&self) -> Option<RejectReason> {
        self.iter().find_map(|action| match action {
            EngineAction::CounterReset { reason } => Some(*reason),
            _ => None,
        })
    }
}

/// Accepted cycles inside the current time window.
///
/// `count == 0` exactly when `first_event_time` is unset.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CycleWindow {
    pub count: u8,
    pub first_event_time: Option<LocalDateTime>,
    pub first_event_tick: Option<Tick>,
}

impl CycleWindow {
    pub const fn new() -> Self {
        Self {
            count: 0,
            first_event_time: None,
            first_event_tick: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn start(&mut self, tick: Tick, now: LocalDateTime) {
        self.count = 1;
        self.first_event_time = Some(now);
        self.first_event_tick = Some(tick);
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Ticks elapsed since the window opened, wrap-safe.
    pub fn elapsed_ticks(&self, tick: Tick) -> Option<u32> {
        self.first_event_tick.map(|first| ticks_between(first, tick))
    }
}

#[cfg(test)]
mod tests;
