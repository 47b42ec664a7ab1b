use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animation::clock::{AnimationClock, PlaybackState, SystemTimeSource, TimeSource};
use crate::animation::config::{
    AnimationConfig, MotionEffect, ScaleMode, dedup_effects, validate_zoom_scale,
};
use crate::animation::geometry::Geometry;
use crate::animation::scheduler::{FrameScheduler, TickId, TickQueue};
use crate::effects::params::EffectParams;
use crate::foundation::core::Canvas;
use crate::foundation::error::AbstrakResult;
use crate::foundation::pixels::PixelBuffer;
use crate::render::compositor::{AppliedMotion, Compositor};
use crate::render::cpu::CpuSurface;
use crate::render::surface::Surface;

/// Interactive animation controller.
///
/// Owns the drawing surface, the unprocessed source image and its processed copy, the playback
/// clock and the frame scheduler. All state is touched from one thread; every render call
/// completes before the next tick can be requested.
pub struct AnimationSession {
    surface: Box<dyn Surface>,
    source: PixelBuffer,
    processed: PixelBuffer,
    effect: EffectParams,
    config: AnimationConfig,
    geometry: Geometry,
    clock: AnimationClock,
    compositor: Compositor,
    scheduler: Box<dyn FrameScheduler>,
    pending_tick: Option<TickId>,
    time: Box<dyn TimeSource>,
    rng: StdRng,
    last_motion: Option<AppliedMotion>,
}

impl std::fmt::Debug for AnimationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSession")
            .field("canvas", &self.canvas())
            .field("source", &self.source)
            .field("effect", &self.effect)
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("pending_tick", &self.pending_tick)
            .finish_non_exhaustive()
    }
}

impl AnimationSession {
    /// Build a session over `surface`, processing `source` once with `effect`.
    ///
    /// `seed` drives the stochastic effects. The session starts Stopped at time 0 with a wall-clock
    /// time source and a 60 Hz tick queue.
    pub fn new(
        surface: Box<dyn Surface>,
        source: PixelBuffer,
        config: AnimationConfig,
        effect: EffectParams,
        seed: u64,
    ) -> AbstrakResult<Self> {
        config.validate()?;
        effect.validate()?;
        source.validate()?;
        let canvas = Canvas::new(surface.width(), surface.height())?;

        let mut rng = StdRng::seed_from_u64(seed);
        let processed = effect.apply(&source, &mut rng)?;
        let geometry = Geometry::for_config(canvas, source.width(), source.height(), &config);
        let clock = AnimationClock::new(config.duration_secs, config.speed)?;
        let config = AnimationConfig {
            effects: dedup_effects(&config.effects),
            ..config
        };

        Ok(Self {
            surface,
            source,
            processed,
            effect,
            config,
            geometry,
            clock,
            compositor: Compositor,
            scheduler: Box::new(TickQueue::default()),
            pending_tick: None,
            time: Box::new(SystemTimeSource::new()),
            rng,
            last_motion: None,
        })
    }

    /// Session drawing onto a fresh [`CpuSurface`] of `canvas` size.
    pub fn with_cpu_surface(
        canvas: Canvas,
        source: PixelBuffer,
        config: AnimationConfig,
        effect: EffectParams,
        seed: u64,
    ) -> AbstrakResult<Self> {
        Self::new(
            Box::new(CpuSurface::new(canvas)?),
            source,
            config,
            effect,
            seed,
        )
    }

    /// Replace the time source (e.g. with a [`ManualTimeSource`](crate::ManualTimeSource)).
    pub fn with_time_source(mut self, time: Box<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    /// Replace the scheduler. Any pending tick on the old one is dropped.
    pub fn with_scheduler(mut self, scheduler: Box<dyn FrameScheduler>) -> Self {
        self.scheduler = scheduler;
        self.pending_tick = None;
        self
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.surface.width(),
            height: self.surface.height(),
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn effect(&self) -> EffectParams {
        self.effect
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn state(&self) -> PlaybackState {
        self.clock.state()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    pub fn current_time(&self) -> f64 {
        self.clock.current_time()
    }

    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    pub fn processed(&self) -> &PixelBuffer {
        &self.processed
    }

    /// Tick waiting on the scheduler, if any.
    pub fn pending_tick(&self) -> Option<TickId> {
        self.pending_tick
    }

    /// Motion applied by the most recent render.
    pub fn last_motion(&self) -> Option<AppliedMotion> {
        self.last_motion
    }

    /// Current time from the session's time source.
    pub fn now(&self) -> Duration {
        self.time.now()
    }

    /// Sleep on the session's time source.
    pub fn sleep(&self, d: Duration) {
        self.time.sleep(d);
    }

    /// Copy of the surface raster.
    pub fn read_pixels(&self) -> PixelBuffer {
        self.surface.read_pixels()
    }

    /// Start or resume playback, render immediately and request the next tick.
    pub fn play(&mut self) -> AbstrakResult<()> {
        if self.clock.is_playing() {
            return Ok(());
        }
        let now = self.time.now();
        self.clock.play(now);
        self.clock.tick(now);
        self.render_current()?;
        self.request_tick(now);
        tracing::debug!(time = self.clock.current_time(), "playback started");
        Ok(())
    }

    /// Freeze playback and cancel the scheduled continuation. Safe in any state.
    pub fn pause(&mut self) {
        self.clock.pause();
        if let Some(id) = self.pending_tick.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Stop, rewind to 0 and render that frame synchronously.
    pub fn reset(&mut self) -> AbstrakResult<AppliedMotion> {
        self.pause();
        self.clock.reset();
        self.render_current()
    }

    /// Jump to `time_secs` (wrapped into the loop) and render it, keeping the playback state.
    pub fn seek(&mut self, time_secs: f64) -> AbstrakResult<AppliedMotion> {
        self.clock.seek(time_secs, self.time.now());
        self.render_current()
    }

    /// Render the frame at an exact loop time, bypassing the wall clock.
    ///
    /// Used for deterministic offline capture; the clock is left positioned at `time_secs`.
    pub fn render_at_time(&mut self, time_secs: f64) -> AbstrakResult<AppliedMotion> {
        self.seek(time_secs)
    }

    /// Handle one scheduler tick. Stale or foreign ids are ignored.
    ///
    /// Returns `true` when a frame was rendered.
    pub fn on_tick(&mut self, id: TickId) -> AbstrakResult<bool> {
        if self.pending_tick != Some(id) {
            return Ok(false);
        }
        self.pending_tick = None;
        if !self.clock.is_playing() {
            return Ok(false);
        }
        let now = self.time.now();
        self.clock.tick(now);
        self.render_current()?;
        self.request_tick(now);
        Ok(true)
    }

    /// Handle the pending tick if it is due. Returns `true` when a frame was rendered.
    pub fn run_pending(&mut self) -> AbstrakResult<bool> {
        match self.scheduler.take_due(self.time.now()) {
            Some(id) => self.on_tick(id),
            None => Ok(false),
        }
    }

    /// Change the loop length. Geometry is unaffected.
    pub fn update_duration(&mut self, duration_secs: f64) -> AbstrakResult<()> {
        self.clock.set_duration(duration_secs)?;
        self.config.duration_secs = duration_secs;
        Ok(())
    }

    pub fn update_speed(&mut self, speed: f64) -> AbstrakResult<()> {
        self.clock.set_speed(speed)?;
        self.config.speed = speed;
        Ok(())
    }

    /// Replace the motion effect list (duplicates dropped).
    pub fn update_effects(&mut self, effects: &[MotionEffect]) {
        self.config.effects = dedup_effects(effects);
    }

    /// Change the scale mode and optionally the zoom scale, recomputing geometry.
    pub fn update_scale_mode(
        &mut self,
        scale_mode: ScaleMode,
        zoom_scale: Option<f64>,
    ) -> AbstrakResult<()> {
        if let Some(z) = zoom_scale {
            validate_zoom_scale(z)?;
            self.config.zoom_scale = z;
        }
        self.config.scale_mode = scale_mode;
        self.recompute_geometry();
        Ok(())
    }

    pub fn update_zoom_scale(&mut self, zoom_scale: f64) -> AbstrakResult<()> {
        validate_zoom_scale(zoom_scale)?;
        self.config.zoom_scale = zoom_scale;
        self.recompute_geometry();
        Ok(())
    }

    /// Re-run the effect kernel over the unprocessed source.
    ///
    /// On error the previous effect and processed image stay in place.
    pub fn update_effect(&mut self, effect: EffectParams) -> AbstrakResult<()> {
        let processed = effect.apply(&self.source, &mut self.rng)?;
        self.effect = effect;
        self.processed = processed;
        Ok(())
    }

    /// Same kernel, new intensity.
    pub fn update_intensity(&mut self, intensity: f32) -> AbstrakResult<()> {
        self.update_effect(EffectParams {
            kind: self.effect.kind,
            intensity,
        })
    }

    /// Resize the drawing surface and recompute geometry.
    pub fn resize(&mut self, canvas: Canvas) -> AbstrakResult<()> {
        self.surface.resize(canvas)?;
        self.recompute_geometry();
        Ok(())
    }

    /// Clear the surface and composite the processed image at the clock's current progress.
    pub fn render_current(&mut self) -> AbstrakResult<AppliedMotion> {
        self.surface.clear();
        let motion = self.compositor.render(
            self.surface.as_mut(),
            &self.processed,
            &self.geometry,
            self.clock.progress(),
            &self.config.effects,
        )?;
        self.last_motion = Some(motion);
        Ok(motion)
    }

    fn request_tick(&mut self, now: Duration) {
        if let Some(old) = self.pending_tick.take() {
            self.scheduler.cancel(old);
        }
        self.pending_tick = Some(self.scheduler.request_tick(now));
    }

    fn recompute_geometry(&mut self) {
        self.geometry = Geometry::for_config(
            self.canvas(),
            self.processed.width(),
            self.processed.height(),
            &self.config,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/animation_session.rs"]
mod tests;
