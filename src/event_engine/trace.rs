use super::types::{EngineStateId, RejectReason, Tick};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EngineTraceSample {
    pub tick: Tick,
    pub state_id: EngineStateId,
    pub reject_reason: RejectReason,
    pub cycle_count: u8,
    pub candidate: u8,
    pub gate_open: u8,
    pub baseline: i32,
    pub hp_filt: i32,
    pub hp_abs: i32,
    pub dt_ticks: u32,
    pub quiet_ticks: u16,
}
