use super::*;

#[derive(Clone, Debug, Default)]
pub struct EngineOutput {
    pub actions: ActionBuffer,
    pub trace: EngineTraceSample,
}

/// Conditioning, cycle detection and the windowed counter behind one handle.
///
/// Feed every sample of a tick through [`GestureEngine::process_sample`], then
/// close the tick with [`GestureEngine::end_tick`].
pub struct GestureEngine {
    config: DetectorConfig,
    machine: statig::blocking::StateMachine<GestureHsm>,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(active_config().detector)
    }
}

impl GestureEngine {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            machine: GestureHsm::new(config).state_machine(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Back to a freshly activated engine: filters unseeded, window empty.
    pub fn reset(&mut self) {
        self.machine = GestureHsm::new(self.config).state_machine();
    }

    pub fn process_sample(
        &mut self,
        sample: RawSample,
        tick: Tick,
        now: LocalDateTime,
    ) -> EngineOutput {
        self.dispatch(GestureHsmEvent::Sample(SampleInput {
            signal: Signal::Magnitude(sample.magnitude()),
            tick,
            now,
        }))
    }

    /// Feeds an already conditioned oscillation value, bypassing the
    /// baseline and smoothing filters. The crossing reference still comes
    /// from the previous value fed.
    pub fn feed_oscillation(
        &mut self,
        oscillation: i32,
        tick: Tick,
        now: LocalDateTime,
    ) -> EngineOutput {
        self.dispatch(GestureHsmEvent::Sample(SampleInput {
            signal: Signal::Oscillation(oscillation),
            tick,
            now,
        }))
    }

    pub fn end_tick(&mut self, tick: Tick) -> EngineOutput {
        self.dispatch(GestureHsmEvent::EndTick { tick })
    }

    pub fn sensor_fault(&mut self, tick: Tick) -> EngineOutput {
        log::warn!("gesture: sensor fault at tick {}, detection suspended", tick);
        self.dispatch(GestureHsmEvent::SensorFault { tick })
    }

    pub fn sensor_recovered(&mut self, tick: Tick) -> EngineOutput {
        log::info!("gesture: sensor recovered at tick {}", tick);
        self.dispatch(GestureHsmEvent::SensorRecovered { tick })
    }

    pub fn window(&self) -> &CycleWindow {
        &self.machine.inner().window
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.machine.inner().filters
    }

    pub fn detector(&self) -> &CycleDetector {
        &self.machine.inner().detector
    }

    pub fn state_id(&self) -> EngineStateId {
        self.machine.inner().last_trace.state_id
    }

    pub fn last_trace(&self) -> EngineTraceSample {
        self.machine.inner().last_trace
    }

    fn dispatch(&mut self, event: GestureHsmEvent) -> EngineOutput {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        EngineOutput {
            actions: context.actions,
            trace: self.machine.inner().last_trace,
        }
    }
}
