/// Tick countdown for the acknowledgment indicator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FeedbackTimer {
    remaining_ticks: u16,
}

impl FeedbackTimer {
    pub const fn new() -> Self {
        Self { remaining_ticks: 0 }
    }

    pub fn arm(&mut self, ticks: u16) {
        self.remaining_ticks = ticks;
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ticks > 0
    }

    pub fn remaining_ticks(&self) -> u16 {
        self.remaining_ticks
    }

    /// Advances one tick. Returns true on the tick the indicator must go off.
    pub fn on_tick(&mut self) -> bool {
        if self.remaining_ticks == 0 {
            return false;
        }
        self.remaining_ticks -= 1;
        self.remaining_ticks == 0
    }

    pub fn cancel(&mut self) {
        self.remaining_ticks = 0;
    }
}
