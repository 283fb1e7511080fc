#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CycleStrategy {
    /// Negative-to-positive crossing of the smoothed oscillation.
    ZeroCrossing,
    /// Oscillation amplitude rising through the gate threshold, with refractory ticks.
    ThresholdCrossing,
}

#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    pub tick_hz: u8,
    pub sample_rate_hz: u16,
    pub samples_per_tick: u8,
    pub strategy: CycleStrategy,
    pub amp_threshold: i32,
    pub min_cycle_ticks: u16,
    pub max_cycle_ticks: u16,
    pub refractory_ticks: u16,
    pub required_cycles: u8,
    pub window_seconds: u16,
    pub still_reset_ticks: u16,
}

impl DetectorConfig {
    pub const fn window_ticks(&self) -> u32 {
        self.window_seconds as u32 * self.tick_hz as u32
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FeedbackConfig {
    pub led_on_ticks: u16,
    pub tone_hz: u16,
    pub tone_ms: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct DailyCounterConfig {
    pub enabled: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct GestureConfig {
    pub detector: DetectorConfig,
    pub feedback: FeedbackConfig,
    pub daily_counter: DailyCounterConfig,
}

include!(concat!(env!("OUT_DIR"), "/gesture_config.rs"));

pub fn active_config() -> &'static GestureConfig {
    &GESTURE_CONFIG
}
