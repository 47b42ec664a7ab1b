use rand::Rng;

use crate::foundation::error::{AbstrakError, AbstrakResult};

/// Per-frame motion transform applied by the compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionEffect {
    /// Triangular opacity envelope.
    Fade,
    /// Oscillating isotropic scale about the center.
    Zoom,
    /// One full turn about the center per loop.
    Rotate,
    /// Circular offset of radius 50.
    Translate,
}

impl MotionEffect {
    /// Every motion effect, in declaration order.
    pub const ALL: [MotionEffect; 4] = [Self::Fade, Self::Zoom, Self::Rotate, Self::Translate];
}

impl std::str::FromStr for MotionEffect {
    type Err = AbstrakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fade" => Ok(Self::Fade),
            "zoom" => Ok(Self::Zoom),
            "rotate" => Ok(Self::Rotate),
            "translate" => Ok(Self::Translate),
            other => Err(AbstrakError::invalid_config(format!(
                "unknown motion effect '{other}'"
            ))),
        }
    }
}

/// How the processed image is projected onto the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Largest aspect-preserving size that fits inside the canvas.
    #[default]
    Fit,
    /// Stretch to the canvas, ignoring aspect.
    Fill,
    /// `max(canvas side) * zoom_scale` wide, aspect-preserving.
    Zoom,
}

impl std::str::FromStr for ScaleMode {
    type Err = AbstrakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(Self::Fit),
            "fill" => Ok(Self::Fill),
            "zoom" => Ok(Self::Zoom),
            other => Err(AbstrakError::invalid_config(format!(
                "unknown scale mode '{other}'"
            ))),
        }
    }
}

/// Playback and motion parameters of an animation session.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Loop length in seconds, `> 0`.
    pub duration_secs: f64,
    /// Playback rate multiplier, `> 0`.
    pub speed: f64,
    /// Motion effects in application order. Duplicates are ignored.
    pub effects: Vec<MotionEffect>,
    /// Image projection mode.
    pub scale_mode: ScaleMode,
    /// Multiplier used by [`ScaleMode::Zoom`], `> 0`.
    pub zoom_scale: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_secs: 10.0,
            speed: 1.0,
            effects: vec![MotionEffect::Fade],
            scale_mode: ScaleMode::Fit,
            zoom_scale: 1.0,
        }
    }
}

impl AnimationConfig {
    /// Random playback parameters for a freshly generated image: duration in `[5, 15)`, speed in
    /// `[0.5, 2)`, one to four motion effects and `Fill` projection.
    pub fn randomized<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let duration_secs = rng.gen_range(5.0..15.0);
        let speed = rng.gen_range(0.5..2.0);
        let picks = rng.gen_range(1..=MotionEffect::ALL.len());
        let drawn: Vec<MotionEffect> = (0..picks)
            .map(|_| MotionEffect::ALL[rng.gen_range(0..MotionEffect::ALL.len())])
            .collect();
        Self {
            duration_secs,
            speed,
            effects: dedup_effects(&drawn),
            scale_mode: ScaleMode::Fill,
            zoom_scale: 1.0,
        }
    }

    /// Reject non-positive or non-finite durations, speeds and zoom scales.
    pub fn validate(&self) -> AbstrakResult<()> {
        validate_duration(self.duration_secs)?;
        validate_speed(self.speed)?;
        validate_zoom_scale(self.zoom_scale)?;
        Ok(())
    }

    /// Effects in application order with later duplicates dropped.
    pub fn active_effects(&self) -> Vec<MotionEffect> {
        dedup_effects(&self.effects)
    }
}

/// Keep the first occurrence of each effect, preserving order.
pub fn dedup_effects(effects: &[MotionEffect]) -> Vec<MotionEffect> {
    let mut out = Vec::with_capacity(effects.len().min(MotionEffect::ALL.len()));
    for &e in effects {
        if !out.contains(&e) {
            out.push(e);
        }
    }
    out
}

pub(crate) fn validate_duration(v: f64) -> AbstrakResult<()> {
    positive_finite("duration_secs", v)
}

pub(crate) fn validate_speed(v: f64) -> AbstrakResult<()> {
    positive_finite("speed", v)
}

pub(crate) fn validate_zoom_scale(v: f64) -> AbstrakResult<()> {
    positive_finite("zoom_scale", v)
}

fn positive_finite(name: &str, v: f64) -> AbstrakResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(AbstrakError::invalid_config(format!(
            "{name} must be finite and > 0, got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/config.rs"]
mod tests;
