use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use super::*;
use crate::event_engine::{
    config::{CycleStrategy, DailyCounterConfig, DetectorConfig, FeedbackConfig},
    types::{CalendarDate, LocalDateTime, RawSample},
};
use crate::face::{Button, SensorError};

#[derive(Default)]
struct SensorLog {
    queue: VecDeque<Result<RawSample, SensorError>>,
    configure_result: Option<SensorError>,
    status_error: Option<SensorError>,
    configured_hz: Vec<u16>,
    reads: usize,
    enabled: bool,
}

#[derive(Clone, Default)]
struct FakeSensor(Rc<RefCell<SensorLog>>);

impl FakeSensor {
    fn push(&self, mag: i16) {
        self.0
            .borrow_mut()
            .queue
            .push_back(Ok(RawSample::new(0, 0, mag)));
    }

    fn push_error(&self, err: SensorError) {
        self.0.borrow_mut().queue.push_back(Err(err));
    }
}

impl Accelerometer for FakeSensor {
    fn configure(&mut self, sample_rate_hz: u16) -> Result<(), SensorError> {
        let mut log = self.0.borrow_mut();
        log.configured_hz.push(sample_rate_hz);
        match log.configure_result {
            Some(err) => Err(err),
            None => {
                log.enabled = true;
                Ok(())
            }
        }
    }

    fn disable(&mut self) {
        self.0.borrow_mut().enabled = false;
    }

    fn has_new_data(&mut self) -> Result<bool, SensorError> {
        let log = self.0.borrow();
        match log.status_error {
            Some(err) => Err(err),
            None => Ok(!log.queue.is_empty()),
        }
    }

    fn read_sample(&mut self) -> Result<RawSample, SensorError> {
        let mut log = self.0.borrow_mut();
        log.reads += 1;
        log.queue.pop_front().unwrap_or(Err(SensorError::NotResponding))
    }
}

#[derive(Clone)]
struct FakeClock(Rc<RefCell<LocalDateTime>>);

impl FakeClock {
    fn new() -> Self {
        Self(Rc::new(RefCell::new(LocalDateTime {
            year: 2024,
            month: 3,
            day: 9,
            hour: 23,
            minute: 59,
            second: 50,
        })))
    }

    fn set_day(&self, day: u8) {
        self.0.borrow_mut().day = day;
    }
}

impl WallClock for FakeClock {
    fn now(&mut self) -> LocalDateTime {
        *self.0.borrow()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Cue {
    Tone(u16, u16),
    Indicator(bool),
}

#[derive(Clone, Default)]
struct FakeSink(Rc<RefCell<Vec<Cue>>>);

impl FakeSink {
    fn cues(&self) -> Vec<Cue> {
        self.0.borrow().clone()
    }

    fn tones(&self) -> usize {
        self.cues()
            .iter()
            .filter(|cue| matches!(cue, Cue::Tone(..)))
            .count()
    }

    fn indicator(&self) -> Option<bool> {
        self.cues().iter().rev().find_map(|cue| match cue {
            Cue::Indicator(on) => Some(*on),
            Cue::Tone(..) => None,
        })
    }
}

impl FeedbackSink for FakeSink {
    fn play_tone(&mut self, frequency_hz: u16, duration_ms: u16) {
        self.0
            .borrow_mut()
            .push(Cue::Tone(frequency_hz, duration_ms));
    }

    fn set_indicator(&mut self, on: bool) {
        self.0.borrow_mut().push(Cue::Indicator(on));
    }
}

#[derive(Default)]
struct StoreLog {
    stored: Option<DailyCountRecord>,
    loads: usize,
    saves: usize,
}

#[derive(Clone, Default)]
struct MemoryStore(Rc<RefCell<StoreLog>>);

impl DailyCountStore for MemoryStore {
    fn load(&mut self) -> Option<DailyCountRecord> {
        let mut log = self.0.borrow_mut();
        log.loads += 1;
        log.stored
    }

    fn save(&mut self, record: DailyCountRecord) {
        let mut log = self.0.borrow_mut();
        log.saves += 1;
        log.stored = Some(record);
    }
}

fn config() -> GestureConfig {
    GestureConfig {
        detector: DetectorConfig {
            tick_hz: 4,
            sample_rate_hz: 25,
            samples_per_tick: 6,
            strategy: CycleStrategy::ThresholdCrossing,
            amp_threshold: 48,
            min_cycle_ticks: 2,
            max_cycle_ticks: 16,
            refractory_ticks: 1,
            required_cycles: 4,
            window_seconds: 4,
            still_reset_ticks: 8,
        },
        feedback: FeedbackConfig {
            led_on_ticks: 4,
            tone_hz: 880,
            tone_ms: 120,
        },
        daily_counter: DailyCounterConfig { enabled: true },
    }
}

struct Rig {
    face: WaveFace<FakeSensor, FakeClock, FakeSink, MemoryStore>,
    sensor: FakeSensor,
    clock: FakeClock,
    sink: FakeSink,
    store: MemoryStore,
    ticks: u32,
}

impl Rig {
    fn new(config: GestureConfig) -> Self {
        let sensor = FakeSensor::default();
        let clock = FakeClock::new();
        let sink = FakeSink::default();
        let store = MemoryStore::default();
        let face = WaveFace::with_store(
            config,
            sensor.clone(),
            clock.clone(),
            sink.clone(),
            store.clone(),
        );
        Self {
            face,
            sensor,
            clock,
            sink,
            store,
            ticks: 0,
        }
    }

    /// One processing tick; a wave stroke on `stroke` ticks, rest otherwise.
    fn tick(&mut self, stroke: bool) -> bool {
        if self.ticks == 0 {
            self.sensor.push(1_000);
        }
        let samples: &[i16] = if stroke {
            &[1_000, 1_346, 1_346, 1_000, 654, 654]
        } else {
            &[1_000, 1_000]
        };
        for &mag in samples {
            self.sensor.push(mag);
        }
        let subsecond = (self.ticks % 4) as u8;
        self.ticks += 1;
        self.face.tick(FaceEvent::tick(subsecond))
    }

    fn run(&mut self, count: u32, strokes: &[u32]) {
        for _ in 0..count {
            let stroke = strokes.contains(&self.ticks);
            let _ = self.tick(stroke);
        }
    }
}

#[test]
fn setup_is_idempotent() {
    let mut rig = Rig::new(config());
    rig.face.setup();
    rig.face.setup();
    rig.face.activate();
    assert_eq!(rig.store.0.borrow().loads, 1);
}

#[test]
fn tick_before_setup_does_nothing() {
    let mut rig = Rig::new(config());
    assert!(!rig.face.tick(FaceEvent::tick(0)));
    assert_eq!(rig.sensor.0.borrow().reads, 0);
}

#[test]
fn activate_configures_sensor_rate() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    assert_eq!(rig.sensor.0.borrow().configured_hz, [25]);
    assert!(rig.sensor.0.borrow().enabled);
    assert_eq!(rig.face.tick_hz(), 4);
}

#[test]
fn completed_gesture_plays_tone_and_lights_indicator() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    rig.run(8, &[0, 2, 5]);
    assert_eq!(rig.sink.tones(), 0);
    assert_eq!(rig.face.status().hit_count, 3);

    assert!(rig.tick(true));
    assert_eq!(rig.sink.cues(), [Cue::Tone(880, 120), Cue::Indicator(true)]);

    let status = rig.face.status();
    assert_eq!(status.detection, DetectionStatus::Detected);
    assert_eq!(status.hit_count, 0);
    assert_eq!(status.today_count, Some(1));
    assert_eq!(rig.store.0.borrow().stored.map(|record| record.count), Some(1));
}

#[test]
fn indicator_goes_off_after_feedback_ticks_exactly_once() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    rig.run(9, &[0, 2, 5, 8]);
    assert_eq!(rig.sink.indicator(), Some(true));

    rig.run(3, &[]);
    assert_eq!(rig.sink.indicator(), Some(true));
    rig.run(1, &[]);
    assert_eq!(rig.sink.indicator(), Some(false));
    rig.run(6, &[]);

    let offs = rig
        .sink
        .cues()
        .iter()
        .filter(|cue| **cue == Cue::Indicator(false))
        .count();
    assert_eq!(offs, 1);
    assert_eq!(rig.face.status().detection, DetectionStatus::Still);
}

#[test]
fn late_cycle_does_not_trigger() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    rig.run(21, &[0, 2, 5, 20]);
    assert_eq!(rig.sink.tones(), 0);
    assert_eq!(rig.face.status().hit_count, 1);
}

#[test]
fn drains_bounded_batch_per_tick() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    for _ in 0..10 {
        rig.sensor.push(1_000);
    }
    let _ = rig.face.tick(FaceEvent::tick(0));
    assert_eq!(rig.sensor.0.borrow().reads, 6);
    assert_eq!(rig.sensor.0.borrow().queue.len(), 4);

    let _ = rig.face.tick(FaceEvent::tick(1));
    assert_eq!(rig.sensor.0.borrow().reads, 10);
}

#[test]
fn sensor_setup_failure_degrades_to_no_sensor() {
    let mut rig = Rig::new(config());
    rig.sensor.0.borrow_mut().configure_result = Some(SensorError::UnsupportedRate(25));
    rig.face.activate();
    assert_eq!(rig.face.status().detection, DetectionStatus::NoSensor);

    assert!(rig.tick(true));
    assert_eq!(rig.sensor.0.borrow().reads, 0);

    rig.sensor.0.borrow_mut().configure_result = None;
    rig.sensor.0.borrow_mut().queue.clear();
    rig.face.resign();
    rig.face.activate();
    assert_eq!(rig.face.status().detection, DetectionStatus::Still);
}

#[test]
fn read_failure_suspends_detection() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    rig.run(3, &[0, 2]);
    assert_eq!(rig.face.status().hit_count, 2);

    rig.sensor.push_error(SensorError::Bus);
    let _ = rig.face.tick(FaceEvent::tick(3));
    let status = rig.face.status();
    assert_eq!(status.detection, DetectionStatus::NoSensor);
    assert_eq!(status.hit_count, 0);
}

#[test]
fn status_poll_failure_suspends_detection() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    rig.run(3, &[0, 2]);
    assert_eq!(rig.face.status().hit_count, 2);

    rig.sensor.0.borrow_mut().status_error = Some(SensorError::Bus);
    let reads = rig.sensor.0.borrow().reads;
    let _ = rig.tick(true);
    assert_eq!(rig.sensor.0.borrow().reads, reads);
    let status = rig.face.status();
    assert_eq!(status.detection, DetectionStatus::NoSensor);
    assert_eq!(status.hit_count, 0);

    rig.sensor.0.borrow_mut().status_error = None;
    rig.face.resign();
    rig.face.activate();
    assert_eq!(rig.face.status().detection, DetectionStatus::Still);
}

#[test]
fn reactivation_resets_hits_but_keeps_daily_count() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    rig.run(9, &[0, 2, 5, 8]);
    rig.run(5, &[10, 12]);
    assert_eq!(rig.face.status().hit_count, 2);

    rig.face.resign();
    rig.face.activate();
    let status = rig.face.status();
    assert_eq!(status.hit_count, 0);
    assert_eq!(status.today_count, Some(1));
}

#[test]
fn resign_turns_everything_off() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    rig.run(9, &[0, 2, 5, 8]);
    assert_eq!(rig.sink.indicator(), Some(true));

    rig.face.resign();
    assert_eq!(rig.sink.indicator(), Some(false));
    assert!(!rig.sensor.0.borrow().enabled);
    assert!(!rig.face.is_active());
}

#[test]
fn dropping_active_face_releases_sensor() {
    let rig = Rig::new(config());
    let sensor = rig.sensor.clone();
    let sink = rig.sink.clone();
    let mut face = rig.face;
    face.activate();
    drop(face);
    assert!(!sensor.0.borrow().enabled);
    assert_eq!(sink.indicator(), Some(false));
}

#[test]
fn status_rolls_daily_count_at_midnight() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    rig.run(9, &[0, 2, 5, 8]);
    assert_eq!(rig.face.status().today_count, Some(1));

    rig.clock.set_day(10);
    assert_eq!(rig.face.status().today_count, Some(0));
    let stored = rig.store.0.borrow().stored;
    assert_eq!(
        stored,
        Some(DailyCountRecord {
            date: CalendarDate::new(2024, 3, 10),
            count: 0,
        })
    );
}

#[test]
fn setup_restores_stored_count_for_today() {
    let mut rig = Rig::new(config());
    rig.store.0.borrow_mut().stored = Some(DailyCountRecord {
        date: CalendarDate::new(2024, 3, 9),
        count: 5,
    });
    rig.face.activate();
    assert_eq!(rig.face.status().today_count, Some(5));
    assert_eq!(rig.store.0.borrow().saves, 0);
}

#[test]
fn disabled_daily_counter_is_hidden() {
    let mut cfg = config();
    cfg.daily_counter.enabled = false;
    let mut rig = Rig::new(cfg);
    rig.face.activate();
    rig.run(9, &[0, 2, 5, 8]);
    assert_eq!(rig.sink.tones(), 1);
    assert_eq!(rig.face.status().today_count, None);
    assert_eq!(rig.store.0.borrow().saves, 0);
}

#[test]
fn buttons_and_low_energy_ticks_skip_detection() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    rig.sensor.push(1_000);

    let press = FaceEvent {
        kind: FaceEventKind::ButtonPress(Button::Alarm),
        subsecond: 0,
    };
    assert!(!rig.face.tick(press));

    let low_energy = FaceEvent {
        kind: FaceEventKind::LowEnergyTick,
        subsecond: 0,
    };
    assert!(rig.face.tick(low_energy));
    assert_eq!(rig.sensor.0.borrow().reads, 0);
}

#[test]
fn active_status_follows_motion() {
    let mut rig = Rig::new(config());
    rig.face.activate();
    let _ = rig.tick(true);
    assert_eq!(rig.face.status().detection, DetectionStatus::Active);
    rig.run(3, &[]);
    assert_eq!(rig.face.status().detection, DetectionStatus::Still);
}
