// src/config.rs

//! Engine-wide settings.
//!
//! Plain structs with `Default`; with the `serde` feature they also
//! (de)serialize, and missing fields fall back to their defaults.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::ConfigError;
use crate::optimizer::DescentConfig;

pub const DEFAULT_UNLOCK_GRACE_MS: u64 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Solver constants applied to every challenge registered in a chain.
    pub descent: DescentConfig,
    /// How long an explicit unlock keeps a solved challenge from re-locking.
    pub unlock_grace_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            descent: DescentConfig::default(),
            unlock_grace_ms: DEFAULT_UNLOCK_GRACE_MS,
        }
    }
}

#[cfg(feature = "serde")]
impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.check()?;
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let d = &self.descent;
        if !(d.probe_epsilon > 0.0 && d.probe_epsilon.is_finite()) {
            return Err(ConfigError::Invalid(format!("probe_epsilon must be positive, got {}", d.probe_epsilon)));
        }
        if !(d.initial_step > 0.0 && d.initial_step.is_finite()) {
            return Err(ConfigError::Invalid(format!("initial_step must be positive, got {}", d.initial_step)));
        }
        // Factors below 1 would grow the step and the cheat factor.
        for (name, v) in [("step_shrink", d.step_shrink), ("cheat_shrink", d.cheat_shrink)] {
            if !(v >= 1.0 && v.is_finite()) {
                return Err(ConfigError::Invalid(format!("{name} must be at least 1, got {v}")));
            }
        }
        Ok(())
    }
}
