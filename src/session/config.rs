use std::path::Path;

use anyhow::Context;

use crate::animation::config::AnimationConfig;
use crate::effects::params::EffectParams;
use crate::encode::sink::{DEFAULT_BITRATE_BPS, DEFAULT_CODEC};
use crate::foundation::core::Canvas;
use crate::foundation::error::{AbstrakError, AbstrakResult};

/// Video export settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output frame rate, `> 0`.
    pub fps: u32,
    /// Exported length in seconds. `None` exports one loop of the animation.
    pub duration_secs: Option<f64>,
    /// Primary encoder codec string.
    pub codec: String,
    /// Primary encoder target bitrate.
    pub bitrate_bps: u64,
    /// Frames allowed in flight between capture and encode (at least 1).
    pub channel_capacity: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            duration_secs: None,
            codec: DEFAULT_CODEC.to_string(),
            bitrate_bps: DEFAULT_BITRATE_BPS,
            channel_capacity: 4,
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> AbstrakResult<()> {
        if self.fps == 0 {
            return Err(AbstrakError::invalid_config("export fps must be > 0"));
        }
        if let Some(d) = self.duration_secs
            && (!d.is_finite() || d <= 0.0)
        {
            return Err(AbstrakError::invalid_config(format!(
                "export duration must be finite and > 0, got {d}"
            )));
        }
        if self.bitrate_bps == 0 {
            return Err(AbstrakError::invalid_config("export bitrate must be > 0"));
        }
        Ok(())
    }

    /// Export length: the explicit duration, or `animation_duration` when unset.
    pub fn resolved_duration(&self, animation_duration: f64) -> f64 {
        self.duration_secs.unwrap_or(animation_duration)
    }
}

/// Everything needed to build an animation session and export it, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub canvas: Canvas,
    pub animation: AnimationConfig,
    pub effect: EffectParams,
    /// Seed for image generation and stochastic effects. `None` draws one from the OS.
    pub seed: Option<u64>,
    pub export: ExportConfig,
}

impl SessionConfig {
    pub fn from_json_str(s: &str) -> AbstrakResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| AbstrakError::invalid_config(format!("session config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> AbstrakResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read session config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> AbstrakResult<()> {
        self.canvas.validate()?;
        self.animation.validate()?;
        self.effect.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
