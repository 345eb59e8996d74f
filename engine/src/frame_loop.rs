//! Frame Loop
//!
//! The per-frame scheduling primitive. The driver owns the scene state
//! (starfield layers and the reveal overlay) and, once per display refresh:
//!
//! 1. advances the starfield at the shared frame time
//! 2. services the fade timer, then the glow tick when glowing
//! 3. lets the collaborator update camera controls
//! 4. lets the collaborator render one frame
//!
//! The loop itself never stops; its lifetime is the hosting window's.

use std::time::{Duration, Instant};

use crate::config::SceneConfig;
use crate::reveal::{RevealOverlay, RevealPhase, TriggerOutcome};
use crate::starfield::Starfield;

/// Everything the frame loop mutates.
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub starfield: Starfield,
    pub overlay: RevealOverlay,
}

impl SceneContext {
    pub fn new(starfield: Starfield, overlay: RevealOverlay) -> Self {
        Self { starfield, overlay }
    }

    /// Build the starfield and a hidden overlay from a scene config.
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            starfield: Starfield::from_config(&config.star_layers, config.star_seed),
            overlay: RevealOverlay::new(config.reveal.clone()),
        }
    }
}

/// External per-frame work: camera controls and the actual draw.
pub trait FrameCollaborator {
    type Error;

    fn update_controls(&mut self);

    fn render(&mut self, scene: &SceneContext) -> Result<(), Self::Error>;
}

/// Frame-rate bookkeeping, refreshed once per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames_total: u64,
    pub fps: f32,
}

/// Owns the scene and runs one frame at a time.
pub struct FrameDriver {
    scene: SceneContext,
    start: Instant,
    stats: FrameStats,
    fps_frames: u32,
    fps_window_start: Duration,
}

impl FrameDriver {
    pub fn new(scene: SceneContext) -> Self {
        Self {
            scene,
            start: Instant::now(),
            stats: FrameStats::default(),
            fps_frames: 0,
            fps_window_start: Duration::ZERO,
        }
    }

    /// Monotonic time since the driver was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn scene(&self) -> &SceneContext {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneContext {
        &mut self.scene
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Forward the asset-ready notification to the overlay.
    pub fn overlay_asset_ready(&mut self) {
        self.scene.overlay.on_asset_ready();
    }

    /// Forward the external reveal event to the overlay.
    pub fn trigger_reveal(&mut self) -> TriggerOutcome {
        let now = self.elapsed();
        self.trigger_reveal_at(now)
    }

    pub fn trigger_reveal_at(&mut self, now: Duration) -> TriggerOutcome {
        self.scene.overlay.trigger(now)
    }

    /// Run one frame at the current clock time.
    pub fn frame<C: FrameCollaborator>(&mut self, collaborator: &mut C) -> Result<(), C::Error> {
        let now = self.elapsed();
        self.frame_at(now, collaborator)
    }

    /// Run one frame at clock time `now`. `now` must not go backwards.
    pub fn frame_at<C: FrameCollaborator>(
        &mut self,
        now: Duration,
        collaborator: &mut C,
    ) -> Result<(), C::Error> {
        let now_ms = now.as_secs_f64() * 1000.0;
        self.scene.starfield.advance(now_ms);

        // Fade timer first: the frame that completes the fade hands the
        // opacity straight to the glow.
        self.scene.overlay.poll_fade_timer(now);
        if self.scene.overlay.phase() == RevealPhase::Glowing {
            self.scene.overlay.glow_tick();
        }

        collaborator.update_controls();
        self.track_fps(now);
        collaborator.render(&self.scene)
    }

    fn track_fps(&mut self, now: Duration) {
        self.stats.frames_total += 1;
        self.fps_frames += 1;

        let window = now.saturating_sub(self.fps_window_start).as_secs_f32();
        if window >= 1.0 {
            self.stats.fps = self.fps_frames as f32 / window;
            self.fps_frames = 0;
            self.fps_window_start = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::starfield::ParticleLayer;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        seen_opacity: Vec<f32>,
    }

    impl FrameCollaborator for Recorder {
        type Error = ();

        fn update_controls(&mut self) {
            self.calls.push("controls");
        }

        fn render(&mut self, scene: &SceneContext) -> Result<(), ()> {
            self.calls.push("render");
            self.seen_opacity.push(scene.overlay.opacity());
            Ok(())
        }
    }

    fn small_scene() -> SceneContext {
        let layer =
            ParticleLayer::from_parts(vec![[0.0, 0.0, 0.0]], vec![0.02], [1.0; 3], 0.04, 40.0, 0)
                .unwrap();
        SceneContext::new(Starfield::new(vec![layer], 5), RevealOverlay::default())
    }

    #[test]
    fn test_controls_before_render() {
        let mut driver = FrameDriver::new(small_scene());
        let mut recorder = Recorder::default();
        driver.frame_at(Duration::ZERO, &mut recorder).unwrap();
        assert_eq!(recorder.calls, vec!["controls", "render"]);
        assert_eq!(driver.stats().frames_total, 1);
    }

    #[test]
    fn test_render_sees_advanced_starfield() {
        let mut driver = FrameDriver::new(small_scene());
        driver.frame_at(Duration::ZERO, &mut Recorder::default()).unwrap();
        let z = driver.scene().starfield.layers()[0].positions()[0][2];
        assert!((z - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_fps_window() {
        let mut driver = FrameDriver::new(small_scene());
        let mut recorder = Recorder::default();
        for i in 0..=60u64 {
            driver
                .frame_at(Duration::from_micros(i * 16_667), &mut recorder)
                .unwrap();
        }
        let fps = driver.stats().fps;
        assert!(fps > 55.0 && fps < 65.0, "fps = {fps}");
    }
}
