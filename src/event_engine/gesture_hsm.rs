use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::{
    config::{active_config, DetectorConfig},
    cycle::{CycleAssessment, CycleDetector},
    filters::{FilterState, NoiseGate, Oscillation},
    trace::EngineTraceSample,
    types::{
        ActionBuffer, CycleWindow, EngineAction, EngineStateId, LocalDateTime, RawSample,
        RejectReason, Tick,
    },
};

mod engine;
mod helpers;

pub use engine::{EngineOutput, GestureEngine};

#[derive(Clone, Copy, Debug)]
enum Signal {
    Magnitude(i32),
    Oscillation(i32),
}

#[derive(Clone, Copy, Debug)]
struct SampleInput {
    signal: Signal,
    tick: Tick,
    now: LocalDateTime,
}

#[derive(Clone, Copy, Debug)]
enum GestureHsmEvent {
    Sample(SampleInput),
    EndTick { tick: Tick },
    SensorFault { tick: Tick },
    SensorRecovered { tick: Tick },
}

#[derive(Default)]
struct DispatchContext {
    actions: ActionBuffer,
}

struct GestureHsm {
    config: DetectorConfig,
    filters: FilterState,
    gate: NoiseGate,
    detector: CycleDetector,
    window: CycleWindow,
    motion_this_tick: bool,
    quiet_ticks: u16,
    last_trace: EngineTraceSample,
}

#[state_machine(initial = "State::idle()")]
impl GestureHsm {
    #[state(superstate = "active")]
    fn idle(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(input) => {
                let assessment = self.evaluate_sample(EngineStateId::Idle, *input);
                if !assessment.accepted {
                    return Handled;
                }

                self.window.start(input.tick, input.now);
                self.note_counted(context);
                if self.window_complete() {
                    self.fire_trigger(context, input.tick);
                    return Handled;
                }
                self.last_trace.state_id = EngineStateId::Accumulating;
                Transition(State::accumulating())
            }
            GestureHsmEvent::EndTick { tick } => {
                self.close_tick(EngineStateId::Idle, *tick);
                Handled
            }
            _ => Super,
        }
    }

    #[state(superstate = "active")]
    fn accumulating(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(input) => {
                let assessment = self.evaluate_sample(EngineStateId::Accumulating, *input);
                if !assessment.accepted {
                    return Handled;
                }

                let expired = self
                    .window
                    .elapsed_ticks(input.tick)
                    .is_some_and(|elapsed| elapsed > self.config.window_ticks());
                if expired {
                    self.window.start(input.tick, input.now);
                    self.reject_with_reason(RejectReason::WindowExpired);
                    Self::push_counter_reset(context, RejectReason::WindowExpired);
                } else {
                    self.window.count = self.window.count.saturating_add(1);
                }
                self.note_counted(context);

                if self.window_complete() {
                    self.fire_trigger(context, input.tick);
                    return Transition(State::idle());
                }
                Handled
            }
            GestureHsmEvent::EndTick { tick } => {
                if self.close_tick(EngineStateId::Accumulating, *tick) {
                    log::debug!(
                        "gesture: motion stopped after {} ticks, dropping {} cycles",
                        self.quiet_ticks,
                        self.window.count
                    );
                    self.window.clear();
                    self.reject_with_reason(RejectReason::MotionStopped);
                    self.last_trace.state_id = EngineStateId::Idle;
                    self.last_trace.cycle_count = 0;
                    Self::push_counter_reset(context, RejectReason::MotionStopped);
                    return Transition(State::idle());
                }
                Handled
            }
            _ => Super,
        }
    }

    #[state(superstate = "suppressed")]
    fn no_sensor(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        let _ = context;
        match event {
            GestureHsmEvent::Sample(input) => {
                self.update_fault_trace(input.tick);
                Handled
            }
            GestureHsmEvent::EndTick { tick } | GestureHsmEvent::SensorFault { tick } => {
                self.update_fault_trace(*tick);
                Handled
            }
            GestureHsmEvent::SensorRecovered { .. } => Super,
        }
    }

    #[superstate]
    fn active(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::SensorFault { tick } => {
                if !self.window.is_empty() {
                    Self::push_counter_reset(context, RejectReason::SensorFault);
                }
                self.clear_detection();
                self.update_fault_trace(*tick);
                Transition(State::no_sensor())
            }
            _ => Super,
        }
    }

    #[superstate]
    fn suppressed(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        let _ = context;
        match event {
            GestureHsmEvent::SensorRecovered { tick } => {
                self.clear_detection();
                self.last_trace = EngineTraceSample {
                    tick: *tick,
                    state_id: EngineStateId::Idle,
                    ..EngineTraceSample::default()
                };
                Transition(State::idle())
            }
            _ => Handled,
        }
    }
}
