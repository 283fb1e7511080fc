pub mod config;
pub mod cycle;
pub mod filters;
pub mod gesture_hsm;
pub mod trace;
pub mod types;

pub use config::{active_config, CycleStrategy, DetectorConfig, GestureConfig};
pub use cycle::{CycleAssessment, CycleDetector};
pub use filters::{FilterState, NoiseGate, Oscillation};
pub use gesture_hsm::{EngineOutput, GestureEngine};
pub use trace::EngineTraceSample;
pub use types::{
    ticks_between, ActionBuffer, CalendarDate, CycleWindow, EngineAction, EngineStateId,
    LocalDateTime, RawSample, RejectReason, Tick,
};
