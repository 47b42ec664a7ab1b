use rand::Rng;

use crate::effects::{glitch, oil_paint, randomize, water};
use crate::foundation::error::{AbstrakError, AbstrakResult};
use crate::foundation::pixels::PixelBuffer;

/// Which pixel-space kernel to run over the source raster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Pass-through.
    #[default]
    None,
    /// Per-pixel random RGB replacement.
    Randomize,
    /// Neighbourhood average followed by colour quantization.
    #[serde(alias = "oil_paint")]
    Oil,
    /// Sinusoidal coordinate displacement (square rasters only).
    Water,
    /// Horizontal tear bands.
    Glitch,
}

impl EffectKind {
    /// `true` for kernels that consume randomness.
    pub fn is_stochastic(self) -> bool {
        matches!(self, Self::Randomize | Self::Glitch)
    }
}

impl std::str::FromStr for EffectKind {
    type Err = AbstrakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "randomize" | "random" => Ok(Self::Randomize),
            "oil" | "oil_paint" | "oil-paint" | "oilpaint" => Ok(Self::Oil),
            "water" => Ok(Self::Water),
            "glitch" => Ok(Self::Glitch),
            other => Err(AbstrakError::invalid_config(format!(
                "unknown effect kind '{other}'"
            ))),
        }
    }
}

/// Kernel selection plus its intensity in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EffectParams {
    /// Kernel to run.
    pub kind: EffectKind,
    /// Strength in `[0, 1]`.
    pub intensity: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            kind: EffectKind::None,
            intensity: 0.5,
        }
    }
}

impl EffectParams {
    /// Create validated params.
    pub fn new(kind: EffectKind, intensity: f32) -> AbstrakResult<Self> {
        let params = Self { kind, intensity };
        params.validate()?;
        Ok(params)
    }

    /// Reject intensities outside `[0, 1]` (including NaN).
    pub fn validate(&self) -> AbstrakResult<()> {
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(AbstrakError::invalid_config(format!(
                "effect intensity must be within [0, 1], got {}",
                self.intensity
            )));
        }
        Ok(())
    }

    /// Run the selected kernel over `src`, producing a new raster.
    ///
    /// `src` is only read; on error nothing has been written anywhere. `rng` is consumed only by
    /// the stochastic kernels, so a fixed seed reproduces the output exactly.
    #[tracing::instrument(skip(src, rng), fields(width = src.width(), height = src.height()))]
    pub fn apply<R: Rng + ?Sized>(
        &self,
        src: &PixelBuffer,
        rng: &mut R,
    ) -> AbstrakResult<PixelBuffer> {
        self.validate()?;
        src.validate()?;
        match self.kind {
            EffectKind::None => Ok(src.clone()),
            EffectKind::Randomize => randomize::randomize(src, self.intensity, rng),
            EffectKind::Oil => oil_paint::oil_paint(src, self.intensity),
            EffectKind::Water => water::water(src, self.intensity),
            EffectKind::Glitch => glitch::glitch(src, self.intensity, rng),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/params.rs"]
mod tests;
