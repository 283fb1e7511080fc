use crate::event_engine::{
    config::{active_config, GestureConfig},
    gesture_hsm::GestureEngine,
    types::{EngineStateId, Tick},
};

use super::{
    daily::{DailyCountRecord, DailyCountStore, DailyCounter, NullStore},
    feedback::FeedbackTimer,
    Accelerometer, DetectionStatus, FaceEvent, FaceEventKind, FaceStatus, FeedbackSink, WallClock,
    WatchFace,
};

/// State created once by `setup` and reused across activations.
struct FaceState {
    engine: GestureEngine,
    feedback: FeedbackTimer,
    daily: DailyCounter,
    tick: Tick,
    motion: bool,
}

/// The repeated-motion face: counts wave cycles, acknowledges a completed
/// gesture with a tone and the indicator, and keeps today's total.
pub struct WaveFace<A, C, F, S = NullStore>
where
    A: Accelerometer,
    C: WallClock,
    F: FeedbackSink,
    S: DailyCountStore,
{
    config: GestureConfig,
    sensor: A,
    clock: C,
    sink: F,
    store: S,
    state: Option<FaceState>,
    active: bool,
}

impl<A, C, F> WaveFace<A, C, F, NullStore>
where
    A: Accelerometer,
    C: WallClock,
    F: FeedbackSink,
{
    pub fn new(sensor: A, clock: C, sink: F) -> Self {
        Self::with_store(*active_config(), sensor, clock, sink, NullStore)
    }
}

impl<A, C, F, S> WaveFace<A, C, F, S>
where
    A: Accelerometer,
    C: WallClock,
    F: FeedbackSink,
    S: DailyCountStore,
{
    pub fn with_store(config: GestureConfig, sensor: A, clock: C, sink: F, store: S) -> Self {
        Self {
            config,
            sensor,
            clock,
            sink,
            store,
            state: None,
            active: false,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Tick rate the host should deliver while this face is visible.
    pub fn tick_hz(&self) -> u8 {
        self.config.detector.tick_hz
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn engine(&self) -> Option<&GestureEngine> {
        self.state.as_ref().map(|state| &state.engine)
    }

    pub fn sensor(&self) -> &A {
        &self.sensor
    }

    pub fn sink(&self) -> &F {
        &self.sink
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current view for the renderer. Rolls the daily counter first so a
    /// stale total from yesterday is never shown.
    pub fn status(&mut self) -> FaceStatus {
        self.roll_day();
        let Some(state) = self.state.as_ref() else {
            return FaceStatus::default();
        };

        let detection = if state.engine.state_id() == EngineStateId::NoSensor {
            DetectionStatus::NoSensor
        } else if state.feedback.is_active() {
            DetectionStatus::Detected
        } else if state.motion {
            DetectionStatus::Active
        } else {
            DetectionStatus::Still
        };

        FaceStatus {
            detection,
            hit_count: state.engine.window().count,
            today_count: self
                .config
                .daily_counter
                .enabled
                .then_some(state.daily.count()),
        }
    }

    fn roll_day(&mut self) {
        if !self.config.daily_counter.enabled {
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let today = self.clock.now().date();
        if state.daily.maybe_roll_day(today) {
            log::info!(
                "wave face: daily counter now {} for {:?}",
                state.daily.count(),
                today
            );
            if let Some(record) = DailyCountRecord::from_counter(&state.daily) {
                self.store.save(record);
            }
        }
    }

    fn restart_detection(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.feedback.is_active() {
            self.sink.set_indicator(false);
        }
        state.feedback.cancel();
        state.motion = false;
        if state.engine.state_id() != EngineStateId::NoSensor {
            state.engine.reset();
        }
    }

    fn run_tick(&mut self) {
        self.roll_day();
        let now = self.clock.now();
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if state.feedback.on_tick() {
            self.sink.set_indicator(false);
        }

        let tick = state.tick;
        let mut triggered = false;
        state.motion = false;

        if state.engine.state_id() != EngineStateId::NoSensor {
            for _ in 0..self.config.detector.samples_per_tick {
                match self.sensor.has_new_data() {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(err) => {
                        log::warn!("wave face: sensor status poll failed: {}", err);
                        let _ = state.engine.sensor_fault(tick);
                        break;
                    }
                }
                match self.sensor.read_sample() {
                    Ok(sample) => {
                        let output = state.engine.process_sample(sample, tick, now);
                        state.motion |= output.trace.gate_open != 0;
                        triggered |= output.actions.contains_trigger();
                    }
                    Err(err) => {
                        log::warn!("wave face: sample read failed: {}", err);
                        let _ = state.engine.sensor_fault(tick);
                        break;
                    }
                }
            }
        }

        let _ = state.engine.end_tick(tick);
        state.tick = tick.wrapping_add(1);

        if triggered {
            self.on_trigger();
        }
    }

    fn on_trigger(&mut self) {
        let feedback = self.config.feedback;
        self.sink.play_tone(feedback.tone_hz, feedback.tone_ms);
        self.sink.set_indicator(true);

        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.feedback.arm(feedback.led_on_ticks);

        if self.config.daily_counter.enabled {
            state.daily.increment();
            if let Some(record) = DailyCountRecord::from_counter(&state.daily) {
                self.store.save(record);
            }
        }
    }
}

impl<A, C, F, S> WatchFace for WaveFace<A, C, F, S>
where
    A: Accelerometer,
    C: WallClock,
    F: FeedbackSink,
    S: DailyCountStore,
{
    fn setup(&mut self) {
        if self.state.is_some() {
            return;
        }
        let daily = if self.config.daily_counter.enabled {
            self.store
                .load()
                .map(DailyCountRecord::into_counter)
                .unwrap_or_default()
        } else {
            DailyCounter::new()
        };
        self.state = Some(FaceState {
            engine: GestureEngine::new(self.config.detector),
            feedback: FeedbackTimer::new(),
            daily,
            tick: 0,
            motion: false,
        });
    }

    fn activate(&mut self) {
        self.setup();
        self.restart_detection();
        self.active = true;

        let configured = self.sensor.configure(self.config.detector.sample_rate_hz);
        let Some(state) = self.state.as_mut() else {
            return;
        };
        match configured {
            Ok(()) => {
                if state.engine.state_id() == EngineStateId::NoSensor {
                    let _ = state.engine.sensor_recovered(state.tick);
                }
                log::info!(
                    "wave face: active, {} Hz ticks, sensor at {} Hz",
                    self.config.detector.tick_hz,
                    self.config.detector.sample_rate_hz
                );
            }
            Err(err) => {
                log::warn!("wave face: sensor setup failed: {}", err);
                let _ = state.engine.sensor_fault(state.tick);
            }
        }
        self.roll_day();
    }

    fn tick(&mut self, event: FaceEvent) -> bool {
        if self.state.is_none() {
            return false;
        }
        match event.kind {
            FaceEventKind::Activate => {
                self.restart_detection();
                true
            }
            FaceEventKind::Tick => {
                self.run_tick();
                true
            }
            FaceEventKind::LowEnergyTick => {
                self.roll_day();
                if let Some(state) = self.state.as_mut() {
                    if state.feedback.on_tick() {
                        self.sink.set_indicator(false);
                    }
                }
                true
            }
            FaceEventKind::ButtonPress(_) => false,
        }
    }

    fn resign(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.feedback.cancel();
            state.motion = false;
        }
        self.sink.set_indicator(false);
        self.sensor.disable();
        self.active = false;
        log::info!("wave face: resigned");
    }
}

impl<A, C, F, S> Drop for WaveFace<A, C, F, S>
where
    A: Accelerometer,
    C: WallClock,
    F: FeedbackSink,
    S: DailyCountStore,
{
    fn drop(&mut self) {
        if self.active {
            self.resign();
        }
    }
}

#[cfg(test)]
mod tests;
