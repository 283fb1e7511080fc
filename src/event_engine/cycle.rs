use super::{
    config::{CycleStrategy, DetectorConfig},
    filters::Oscillation,
    types::{ticks_between, RejectReason, Tick},
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CycleAssessment {
    pub candidate: bool,
    pub accepted: bool,
    pub reason: RejectReason,
    pub dt_ticks: Option<u32>,
}

impl CycleAssessment {
    const fn rejected(candidate: bool, reason: RejectReason, dt_ticks: Option<u32>) -> Self {
        Self {
            candidate,
            accepted: false,
            reason,
            dt_ticks,
        }
    }
}

/// Turns conditioned samples into discrete cycle events and applies the
/// inter-event period band.
///
/// One physical cycle is one positive and one negative lobe. A candidate is
/// only possible while the detector is armed, and only a gate-passing
/// negative lobe re-arms it, so each cycle yields at most one candidate and
/// samples below the gate never change what the detector sees.
#[derive(Clone, Copy, Debug)]
pub struct CycleDetector {
    strategy: CycleStrategy,
    min_cycle_ticks: u32,
    max_cycle_ticks: u32,
    refractory_ticks: u16,
    armed: bool,
    refractory_remaining: u16,
    last_event_tick: Option<Tick>,
}

impl CycleDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            strategy: config.strategy,
            min_cycle_ticks: u32::from(config.min_cycle_ticks),
            max_cycle_ticks: u32::from(config.max_cycle_ticks),
            refractory_ticks: config.refractory_ticks,
            armed: Self::armed_at_start(config.strategy),
            refractory_remaining: 0,
            last_event_tick: None,
        }
    }

    // A threshold crossing can fire on the first positive lobe; a zero
    // crossing needs a negative lobe to cross out of.
    const fn armed_at_start(strategy: CycleStrategy) -> bool {
        matches!(strategy, CycleStrategy::ThresholdCrossing)
    }

    pub fn reset(&mut self) {
        self.armed = Self::armed_at_start(self.strategy);
        self.refractory_remaining = 0;
        self.last_event_tick = None;
    }

    pub fn last_event_tick(&self) -> Option<Tick> {
        self.last_event_tick
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn refractory_remaining(&self) -> u16 {
        self.refractory_remaining
    }

    pub fn on_tick(&mut self) {
        self.refractory_remaining = self.refractory_remaining.saturating_sub(1);
    }

    /// Classifies one sample. `enforce_ceiling` is false while no window is
    /// open: a slow first cycle then starts a new gesture instead of being
    /// rejected against a reference left over from the previous one.
    pub fn observe(
        &mut self,
        osc: Oscillation,
        gate_open: bool,
        tick: Tick,
        enforce_ceiling: bool,
    ) -> CycleAssessment {
        if gate_open && osc.signed < 0 {
            self.armed = true;
        }
        let candidate = self.armed
            && match self.strategy {
                CycleStrategy::ZeroCrossing => osc.previous < 0 && osc.signed >= 0,
                CycleStrategy::ThresholdCrossing => gate_open && osc.signed > 0,
            };

        if !candidate {
            let reason = if gate_open {
                RejectReason::NoTransition
            } else {
                RejectReason::Gated
            };
            return CycleAssessment::rejected(false, reason, None);
        }

        self.armed = false;
        let dt_ticks = self.last_event_tick.map(|last| ticks_between(last, tick));

        if self.refractory_remaining > 0 {
            return CycleAssessment::rejected(true, RejectReason::Refractory, dt_ticks);
        }

        match dt_ticks {
            // Too fast: the reference stays on the last accepted event.
            Some(dt) if dt < self.min_cycle_ticks => {
                CycleAssessment::rejected(true, RejectReason::GapTooShort, dt_ticks)
            }
            // Too slow: re-anchor so the next cycle is measured from here.
            Some(dt) if enforce_ceiling && dt > self.max_cycle_ticks => {
                self.last_event_tick = Some(tick);
                CycleAssessment::rejected(true, RejectReason::GapTooLong, dt_ticks)
            }
            _ => {
                self.last_event_tick = Some(tick);
                self.refractory_remaining = self.refractory_ticks;
                CycleAssessment {
                    candidate: true,
                    accepted: true,
                    reason: RejectReason::None,
                    dt_ticks,
                }
            }
        }
    }
}
