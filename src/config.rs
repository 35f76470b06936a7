use std::time::Duration;

use thiserror::Error;

pub const RENDER_HZ: f32 = 30.0;
pub const SIM_HZ: f32 = 60.0;

pub const SEED_ITEMS: usize = 80;
pub const POPULATION_CAP: usize = 120;

pub const GROW_INTERVAL: Duration = Duration::from_millis(200);
pub const FLASH_INTERVAL: Duration = Duration::from_millis(500);
pub const FLASH_HOLD: Duration = Duration::from_millis(100);

pub const SYMBOL_THRESHOLD: f64 = 0.6;
pub const BILL_SPLIT: f64 = 0.5;
pub const FLASH_THRESHOLD: f64 = 0.7;

pub const SYMBOL_SIZE_MIN: f64 = 20.0;
pub const EMOJI_SIZE_MIN: f64 = 30.0;
pub const SIZE_MAX: f64 = 80.0;
pub const FALL_DURATION_MIN: f64 = 2.0;
pub const FALL_DURATION_MAX: f64 = 8.0;
pub const START_DELAY_MIN: f64 = -10.0;
pub const SPIN_RANGE: f64 = 720.0;

/// Items at or above this size are drawn bold.
pub const BOLD_SIZE: f64 = 55.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("{name} interval must be non-zero")]
    ZeroInterval { name: &'static str },
    #[error("seed count {seed} exceeds population cap {cap}")]
    SeedExceedsCap { seed: usize, cap: usize },
    #[error("render rate must be a positive frame rate with a representable interval, got {0}")]
    RenderRate(f32),
}

/// Runtime knobs for the effect. Defaults reproduce the stock behaviour.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    pub seed_items: usize,
    pub population_cap: usize,
    pub grow_interval: Duration,
    pub flash_interval: Duration,
    pub flash_hold: Duration,
    pub symbol_threshold: f64,
    pub bill_split: f64,
    pub flash_threshold: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed_items: SEED_ITEMS,
            population_cap: POPULATION_CAP,
            grow_interval: GROW_INTERVAL,
            flash_interval: FLASH_INTERVAL,
            flash_hold: FLASH_HOLD,
            symbol_threshold: SYMBOL_THRESHOLD,
            bill_split: BILL_SPLIT,
            flash_threshold: FLASH_THRESHOLD,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("symbol_threshold", self.symbol_threshold),
            ("bill_split", self.bill_split),
            ("flash_threshold", self.flash_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        for (name, interval) in [
            ("grow", self.grow_interval),
            ("flash", self.flash_interval),
            ("flash hold", self.flash_hold),
        ] {
            if interval.is_zero() {
                return Err(ConfigError::ZeroInterval { name });
            }
        }
        if self.seed_items > self.population_cap {
            return Err(ConfigError::SeedExceedsCap {
                seed: self.seed_items,
                cap: self.population_cap,
            });
        }
        Ok(())
    }
}

/// Frame interval for a render rate. Rates too slow for a `Duration` are rejected.
pub fn render_interval(hz: f32) -> Result<Duration, ConfigError> {
    if !(hz.is_finite() && hz > 0.0) {
        return Err(ConfigError::RenderRate(hz));
    }
    Duration::try_from_secs_f32(1.0 / hz).map_err(|_| ConfigError::RenderRate(hz))
}
