use core::fmt;

use crate::event_engine::types::{LocalDateTime, RawSample};

pub mod clock;
pub mod daily;
pub mod feedback;
pub mod line_reader;
pub mod wave_face;

pub use clock::{parse_timeset_command, TimeSyncCommand};
pub use daily::{DailyCountRecord, DailyCountStore, DailyCounter, NullStore};
pub use feedback::FeedbackTimer;
pub use line_reader::{LineEvent, LineReader};
pub use wave_face::WaveFace;

/// Lifecycle driven by the host scheduler. Only one call runs at a time.
pub trait WatchFace {
    /// Creates persistent state once. Calling it again is a no-op.
    fn setup(&mut self);
    fn activate(&mut self);
    /// Returns true when the display needs a redraw.
    fn tick(&mut self, event: FaceEvent) -> bool;
    fn resign(&mut self);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Button {
    Light,
    Alarm,
    Mode,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FaceEventKind {
    Activate,
    Tick,
    LowEnergyTick,
    ButtonPress(Button),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FaceEvent {
    pub kind: FaceEventKind,
    /// Phase within the current second, `0..tick_hz`.
    pub subsecond: u8,
}

impl FaceEvent {
    pub const fn tick(subsecond: u8) -> Self {
        Self {
            kind: FaceEventKind::Tick,
            subsecond,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SensorError {
    Bus,
    NotResponding,
    UnsupportedRate(u16),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "accelerometer bus error"),
            Self::NotResponding => write!(f, "accelerometer not responding"),
            Self::UnsupportedRate(hz) => write!(f, "unsupported sample rate {hz} Hz"),
        }
    }
}

/// Background sample source. At most one unread sample is assumed to be held.
pub trait Accelerometer {
    fn configure(&mut self, sample_rate_hz: u16) -> Result<(), SensorError>;
    fn disable(&mut self);
    /// Whether an unread sample is waiting. A failed poll is a sensor fault.
    fn has_new_data(&mut self) -> Result<bool, SensorError>;
    fn read_sample(&mut self) -> Result<RawSample, SensorError>;
}

pub trait WallClock {
    fn now(&mut self) -> LocalDateTime;
}

pub trait FeedbackSink {
    fn play_tone(&mut self, frequency_hz: u16, duration_ms: u16);
    fn set_indicator(&mut self, on: bool);
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DetectionStatus {
    NoSensor,
    #[default]
    Still,
    Active,
    Detected,
}

/// What the renderer shows. The face never draws text itself.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FaceStatus {
    pub detection: DetectionStatus,
    pub hit_count: u8,
    pub today_count: Option<u16>,
}

impl FaceStatus {
    /// Hit count clamped to a single display digit.
    pub fn hit_digit(&self) -> u8 {
        self.hit_count.min(9)
    }
}
