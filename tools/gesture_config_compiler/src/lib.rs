use std::{fmt, fs, path::Path};

use serde::Deserialize;

#[derive(Debug)]
pub enum ConfigCompilerError {
    Io(String),
    Parse(String),
    Validation(String),
}

impl fmt::Display for ConfigCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigCompilerError {}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyFile {
    ZeroCrossing,
    ThresholdCrossing,
}

impl StrategyFile {
    fn rust_path(self) -> &'static str {
        match self {
            Self::ZeroCrossing => "CycleStrategy::ZeroCrossing",
            Self::ThresholdCrossing => "CycleStrategy::ThresholdCrossing",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorFile {
    pub tick_hz: u8,
    pub sample_rate_hz: u16,
    pub samples_per_tick: u8,
    pub strategy: StrategyFile,
    pub amp_threshold: i32,
    pub min_cycle_ticks: u16,
    pub max_cycle_ticks: u16,
    pub refractory_ticks: u16,
    pub required_cycles: u8,
    pub window_seconds: u16,
    pub still_reset_ticks: u16,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackFile {
    pub led_on_ticks: u16,
    pub tone_hz: u16,
    pub tone_ms: u16,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DailyCounterFile {
    pub enabled: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GestureFile {
    pub detector: DetectorFile,
    pub feedback: FeedbackFile,
    pub daily_counter: DailyCounterFile,
}

pub fn parse_gesture_file(path: &Path) -> Result<GestureFile, ConfigCompilerError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ConfigCompilerError::Io(format!("{}: {e}", path.display())))?;
    parse_gesture_str(&raw)
}

pub fn parse_gesture_str(raw: &str) -> Result<GestureFile, ConfigCompilerError> {
    toml::from_str(raw).map_err(|e| ConfigCompilerError::Parse(e.to_string()))
}

pub fn validate_config(config: &GestureFile) -> Result<(), ConfigCompilerError> {
    let detector = &config.detector;

    if detector.tick_hz == 0 || detector.tick_hz > 128 || !detector.tick_hz.is_power_of_two() {
        return Err(validation("detector.tick_hz must be a power of two in 1..=128"));
    }
    if detector.sample_rate_hz == 0 {
        return Err(validation("detector.sample_rate_hz must be > 0"));
    }
    if detector.samples_per_tick == 0 || detector.samples_per_tick > 16 {
        return Err(validation("detector.samples_per_tick must be in 1..=16"));
    }
    if detector.amp_threshold <= 0 {
        return Err(validation("detector.amp_threshold must be > 0"));
    }
    if detector.min_cycle_ticks == 0 {
        return Err(validation("detector.min_cycle_ticks must be > 0"));
    }
    if detector.max_cycle_ticks < detector.min_cycle_ticks {
        return Err(validation(
            "detector.max_cycle_ticks must be >= detector.min_cycle_ticks",
        ));
    }
    if detector.required_cycles == 0 {
        return Err(validation("detector.required_cycles must be > 0"));
    }
    if detector.window_seconds == 0 {
        return Err(validation("detector.window_seconds must be > 0"));
    }
    if config.feedback.led_on_ticks == 0 {
        return Err(validation("feedback.led_on_ticks must be > 0"));
    }
    if config.feedback.tone_hz == 0 || config.feedback.tone_ms == 0 {
        return Err(validation("feedback.tone_hz and feedback.tone_ms must be > 0"));
    }

    Ok(())
}

pub fn render_generated_config(config: &GestureFile) -> String {
    let d = &config.detector;
    let fb = &config.feedback;

    let mut out = String::new();
    out.push_str("// @generated by gesture_config_compiler. Do not edit by hand.\n");
    out.push_str("pub static GESTURE_CONFIG: GestureConfig = GestureConfig {\n");
    out.push_str("    detector: DetectorConfig {\n");
    out.push_str(&format!("        tick_hz: {},\n", d.tick_hz));
    out.push_str(&format!("        sample_rate_hz: {},\n", d.sample_rate_hz));
    out.push_str(&format!("        samples_per_tick: {},\n", d.samples_per_tick));
    out.push_str(&format!("        strategy: {},\n", d.strategy.rust_path()));
    out.push_str(&format!("        amp_threshold: {},\n", d.amp_threshold));
    out.push_str(&format!("        min_cycle_ticks: {},\n", d.min_cycle_ticks));
    out.push_str(&format!("        max_cycle_ticks: {},\n", d.max_cycle_ticks));
    out.push_str(&format!("        refractory_ticks: {},\n", d.refractory_ticks));
    out.push_str(&format!("        required_cycles: {},\n", d.required_cycles));
    out.push_str(&format!("        window_seconds: {},\n", d.window_seconds));
    out.push_str(&format!("        still_reset_ticks: {},\n", d.still_reset_ticks));
    out.push_str("    },\n");
    out.push_str("    feedback: FeedbackConfig {\n");
    out.push_str(&format!("        led_on_ticks: {},\n", fb.led_on_ticks));
    out.push_str(&format!("        tone_hz: {},\n", fb.tone_hz));
    out.push_str(&format!("        tone_ms: {},\n", fb.tone_ms));
    out.push_str("    },\n");
    out.push_str("    daily_counter: DailyCounterConfig {\n");
    out.push_str(&format!(
        "        enabled: {},\n",
        config.daily_counter.enabled
    ));
    out.push_str("    },\n");
    out.push_str("};\n");
    out
}

pub fn generate_from_path(path: &Path) -> Result<String, ConfigCompilerError> {
    let config = parse_gesture_file(path)?;
    validate_config(&config)?;
    Ok(render_generated_config(&config))
}

fn validation(msg: &str) -> ConfigCompilerError {
    ConfigCompilerError::Validation(msg.to_string())
}
