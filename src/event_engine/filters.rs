//! Fixed-point signal conditioning: gravity baseline, smoothed oscillation and
//! the amplitude gate. Shifts stand in for the `/16` and `/4` decay divisors so
//! tuning carries over bit-for-bit between builds.

const BASELINE_SHIFT: u32 = 4;
const OSCILLATION_SHIFT: u32 = 2;

/// One conditioned sample as seen by the cycle detector.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Oscillation {
    pub signed: i32,
    pub previous: i32,
    pub abs: i32,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FilterState {
    pub baseline: i32,
    pub hp_filt: i32,
    pub last_hp_filt: i32,
    seeded: bool,
}

impl FilterState {
    pub const fn new() -> Self {
        Self {
            baseline: 0,
            hp_filt: 0,
            last_hp_filt: 0,
            seeded: false,
        }
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn update_baseline(&mut self, mag: i32) -> i32 {
        if !self.seeded {
            self.baseline = mag;
            self.seeded = true;
        } else {
            self.baseline += (mag - self.baseline) >> BASELINE_SHIFT;
        }
        self.baseline
    }

    pub fn update_oscillation(&mut self, mag: i32, baseline: i32) -> (i32, i32) {
        let hp = mag - baseline;
        self.hp_filt += (hp - self.hp_filt) >> OSCILLATION_SHIFT;
        (self.hp_filt, self.hp_filt.abs())
    }

    /// Runs both filters and advances `last_hp_filt` unconditionally, so a
    /// gated sample can never leave a stale crossing reference behind.
    pub fn step(&mut self, mag: i32) -> Oscillation {
        let baseline = self.update_baseline(mag);
        let (signed, abs) = self.update_oscillation(mag, baseline);
        let previous = self.last_hp_filt;
        self.last_hp_filt = signed;
        Oscillation {
            signed,
            previous,
            abs,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NoiseGate {
    threshold: i32,
}

impl NoiseGate {
    pub const fn new(threshold: i32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    pub fn accept(&self, hp_abs: i32) -> bool {
        hp_abs >= self.threshold
    }
}
