use super::*;

impl GestureHsm {
    pub(super) fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            filters: FilterState::new(),
            gate: NoiseGate::new(config.amp_threshold),
            detector: CycleDetector::new(&config),
            window: CycleWindow::new(),
            motion_this_tick: false,
            quiet_ticks: 0,
            last_trace: EngineTraceSample {
                state_id: EngineStateId::Idle,
                ..EngineTraceSample::default()
            },
        }
    }

    pub(super) fn window_complete(&self) -> bool {
        self.window.count >= self.config.required_cycles
    }

    pub(super) fn clear_detection(&mut self) {
        self.filters = FilterState::new();
        self.detector.reset();
        self.window.clear();
        self.motion_this_tick = false;
        self.quiet_ticks = 0;
    }

    pub(super) fn reject_with_reason(&mut self, reason: RejectReason) {
        self.last_trace.reject_reason = reason;
    }

    pub(super) fn push_counter_reset(context: &mut DispatchContext, reason: RejectReason) {
        context.actions.push(EngineAction::CounterReset { reason });
    }

    pub(super) fn note_counted(&mut self, context: &mut DispatchContext) {
        let count = self.window.count;
        self.last_trace.cycle_count = count;
        log::debug!(
            "gesture: cycle {}/{} at tick {}",
            count,
            self.config.required_cycles,
            self.last_trace.tick
        );
        context.actions.push(EngineAction::CycleCounted { count });
    }

    pub(super) fn fire_trigger(&mut self, context: &mut DispatchContext, tick: Tick) {
        log::info!(
            "gesture: detected at tick {} after {} cycles",
            tick,
            self.window.count
        );
        self.window.clear();
        self.last_trace.state_id = EngineStateId::Idle;
        context.actions.push(EngineAction::Trigger);
    }

    pub(super) fn condition(&mut self, signal: Signal) -> Oscillation {
        match signal {
            Signal::Magnitude(mag) => self.filters.step(mag),
            Signal::Oscillation(signed) => {
                let previous = self.filters.last_hp_filt;
                self.filters.hp_filt = signed;
                self.filters.last_hp_filt = signed;
                Oscillation {
                    signed,
                    previous,
                    abs: signed.abs(),
                }
            }
        }
    }

    pub(super) fn evaluate_sample(
        &mut self,
        state_id: EngineStateId,
        input: SampleInput,
    ) -> CycleAssessment {
        let osc = self.condition(input.signal);
        let gate_open = self.gate.accept(osc.abs);
        if gate_open {
            self.motion_this_tick = true;
        }
        let enforce_ceiling = state_id == EngineStateId::Accumulating;
        let assessment = self
            .detector
            .observe(osc, gate_open, input.tick, enforce_ceiling);

        self.last_trace = EngineTraceSample {
            tick: input.tick,
            state_id,
            reject_reason: assessment.reason,
            cycle_count: self.window.count,
            candidate: u8::from(assessment.candidate),
            gate_open: u8::from(gate_open),
            baseline: self.filters.baseline,
            hp_filt: osc.signed,
            hp_abs: osc.abs,
            dt_ticks: assessment.dt_ticks.unwrap_or(0),
            quiet_ticks: self.quiet_ticks,
        };

        if assessment.candidate && !assessment.accepted {
            log::debug!(
                "gesture: candidate rejected at tick {}: {:?}",
                input.tick,
                assessment.reason
            );
        }
        assessment
    }

    /// Closes one processing tick. Returns true when the stillness limit
    /// has been reached.
    pub(super) fn close_tick(&mut self, state_id: EngineStateId, tick: Tick) -> bool {
        self.detector.on_tick();
        if self.motion_this_tick {
            self.quiet_ticks = 0;
        } else {
            self.quiet_ticks = self.quiet_ticks.saturating_add(1);
        }
        self.motion_this_tick = false;

        self.last_trace.tick = tick;
        self.last_trace.state_id = state_id;
        self.last_trace.quiet_ticks = self.quiet_ticks;

        self.config.still_reset_ticks > 0 && self.quiet_ticks >= self.config.still_reset_ticks
    }

    pub(super) fn update_fault_trace(&mut self, tick: Tick) {
        self.last_trace = EngineTraceSample {
            tick,
            state_id: EngineStateId::NoSensor,
            reject_reason: RejectReason::SensorFault,
            ..EngineTraceSample::default()
        };
    }
}
