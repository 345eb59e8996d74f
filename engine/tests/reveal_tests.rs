//! Reveal Tests - Gating, Fade-In, Glow and Frame Driving
//!
//! Drives the highlight overlay directly and through the frame driver.

use std::convert::Infallible;
use std::time::Duration;

use star_globe_engine::config::{RevealConfig, SceneConfig};
use star_globe_engine::frame_loop::{FrameCollaborator, FrameDriver, SceneContext};
use star_globe_engine::reveal::{
    GlowDirection, OpacityDriver, RevealOverlay, RevealPhase, TriggerOutcome,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn ready_overlay() -> RevealOverlay {
    let mut overlay = RevealOverlay::new(RevealConfig::default());
    overlay.on_asset_ready();
    overlay
}

/// Overlay that has just finished fading in.
fn glowing_overlay() -> RevealOverlay {
    let mut overlay = ready_overlay();
    overlay.trigger(ms(0));
    for _ in 0..34 {
        overlay.fade_tick();
    }
    overlay
}

// ============================================================================
// Gating
// ============================================================================

#[test]
fn test_trigger_before_asset_ready_is_ignored() {
    let mut overlay = RevealOverlay::new(RevealConfig::default());

    assert_eq!(overlay.trigger(ms(0)), TriggerOutcome::AssetNotReady);
    assert_eq!(overlay.phase(), RevealPhase::Hidden);
    assert_eq!(overlay.opacity(), 0.0);
    assert!(!overlay.visible());
    assert!(!overlay.fade_timer_active());
}

#[test]
fn test_trigger_after_asset_ready_starts_fade() {
    let mut overlay = ready_overlay();

    assert_eq!(overlay.trigger(ms(0)), TriggerOutcome::Started);
    assert_eq!(overlay.phase(), RevealPhase::FadingIn);
    assert_eq!(overlay.driver(), OpacityDriver::FadeTimer);
    assert!(overlay.visible());
    assert!(overlay.fade_timer_active());
    assert_eq!(overlay.opacity(), 0.0);
}

#[test]
fn test_double_trigger_matches_single() {
    let mut once = ready_overlay();
    once.trigger(ms(0));

    let mut twice = ready_overlay();
    twice.trigger(ms(0));
    assert_eq!(twice.trigger(ms(0)), TriggerOutcome::AlreadyRevealed);

    for _ in 0..10 {
        once.fade_tick();
        twice.fade_tick();
    }
    assert_eq!(once.opacity(), twice.opacity());
    assert_eq!(once.phase(), twice.phase());
}

// ============================================================================
// Fade-in
// ============================================================================

#[test]
fn test_33_fade_ticks_still_fading() {
    let mut overlay = ready_overlay();
    overlay.trigger(ms(0));
    for _ in 0..33 {
        overlay.fade_tick();
    }
    assert_eq!(overlay.phase(), RevealPhase::FadingIn);
    assert!((overlay.opacity() - 0.99).abs() < 1e-4);
}

#[test]
fn test_34_fade_ticks_reach_glowing() {
    let overlay = glowing_overlay();

    assert_eq!(overlay.phase(), RevealPhase::Glowing);
    assert_eq!(overlay.driver(), OpacityDriver::Frame);
    assert_eq!(overlay.opacity(), 1.0);
    assert_eq!(overlay.glow_direction(), Some(GlowDirection::Falling));
    assert!(!overlay.fade_timer_active());
}

#[test]
fn test_lowered_glow_ceiling_keeps_full_fade() {
    let config = RevealConfig {
        glow_floor: 0.8,
        glow_ceiling: 0.95,
        ..RevealConfig::default()
    };
    let mut overlay = RevealOverlay::new(config);
    overlay.on_asset_ready();
    overlay.trigger(ms(0));

    for _ in 0..33 {
        overlay.fade_tick();
    }
    assert_eq!(overlay.phase(), RevealPhase::FadingIn);
    assert!(overlay.opacity() > 0.95);

    overlay.fade_tick();
    assert_eq!(overlay.phase(), RevealPhase::Glowing);
    assert_eq!(overlay.opacity(), 1.0);

    for _ in 0..100 {
        overlay.glow_tick();
        assert!((0.8..=0.95).contains(&overlay.opacity()));
    }
}

#[test]
fn test_fade_tick_ignored_when_hidden() {
    let mut overlay = ready_overlay();
    overlay.fade_tick();
    assert_eq!(overlay.opacity(), 0.0);
    assert_eq!(overlay.phase(), RevealPhase::Hidden);
}

// ============================================================================
// Glow
// ============================================================================

#[test]
fn test_glow_falls_to_floor_then_rises() {
    let mut overlay = glowing_overlay();

    for _ in 0..14 {
        overlay.glow_tick();
    }
    assert_eq!(overlay.glow_direction(), Some(GlowDirection::Falling));
    assert!(overlay.opacity() > 0.85);

    overlay.glow_tick();
    assert_eq!(overlay.opacity(), 0.85);
    assert_eq!(overlay.glow_direction(), Some(GlowDirection::Rising));
}

#[test]
fn test_glow_stays_in_band() {
    let mut overlay = glowing_overlay();
    for _ in 0..1000 {
        overlay.glow_tick();
        assert!((0.85..=1.0).contains(&overlay.opacity()));
    }
}

#[test]
fn test_glow_tick_ignored_while_fading() {
    let mut overlay = ready_overlay();
    overlay.trigger(ms(0));
    overlay.glow_tick();
    assert_eq!(overlay.opacity(), 0.0);
}

// ============================================================================
// Fade timer
// ============================================================================

#[test]
fn test_fade_timer_follows_interval() {
    let mut overlay = ready_overlay();
    overlay.trigger(ms(1000));

    overlay.poll_fade_timer(ms(1059));
    assert_eq!(overlay.opacity(), 0.0);

    overlay.poll_fade_timer(ms(1060));
    assert!((overlay.opacity() - 0.03).abs() < 1e-6);

    // Three more intervals in one long frame.
    overlay.poll_fade_timer(ms(1240));
    assert!((overlay.opacity() - 0.12).abs() < 1e-5);
}

#[test]
fn test_fade_timer_stops_on_completion() {
    let mut overlay = ready_overlay();
    overlay.trigger(ms(0));

    // Far more intervals than needed; the surplus is discarded.
    overlay.poll_fade_timer(ms(60 * 100));
    assert_eq!(overlay.phase(), RevealPhase::Glowing);
    assert_eq!(overlay.opacity(), 1.0);
    assert!(!overlay.fade_timer_active());
}

// ============================================================================
// Frame driver
// ============================================================================

#[derive(Default)]
struct Counter {
    controls: u32,
    renders: u32,
    last_opacity: f32,
}

impl FrameCollaborator for Counter {
    type Error = Infallible;

    fn update_controls(&mut self) {
        self.controls += 1;
    }

    fn render(&mut self, scene: &SceneContext) -> Result<(), Infallible> {
        self.renders += 1;
        self.last_opacity = scene.overlay.opacity();
        Ok(())
    }
}

fn driver() -> FrameDriver {
    FrameDriver::new(SceneContext::from_config(&SceneConfig::default()))
}

#[test]
fn test_driver_drops_trigger_until_asset_ready() {
    let mut driver = driver();
    let mut counter = Counter::default();

    assert_eq!(driver.trigger_reveal_at(ms(0)), TriggerOutcome::AssetNotReady);
    driver.frame_at(ms(100), &mut counter).unwrap();
    assert_eq!(driver.scene().overlay.phase(), RevealPhase::Hidden);

    driver.overlay_asset_ready();
    assert_eq!(driver.trigger_reveal_at(ms(100)), TriggerOutcome::Started);
}

#[test]
fn test_driver_runs_full_reveal() {
    let mut driver = driver();
    let mut counter = Counter::default();
    driver.overlay_asset_ready();
    driver.trigger_reveal_at(ms(0));

    // 60 fps frames; the fade needs 34 intervals of 60 ms.
    let mut t = 0;
    while driver.scene().overlay.phase() != RevealPhase::Glowing {
        t += 16;
        driver.frame_at(ms(t), &mut counter).unwrap();
        assert!(t < 5000, "fade never completed");
    }
    assert!(t >= 34 * 60);

    // The completion frame already applied one glow step.
    assert!((counter.last_opacity - 0.99).abs() < 1e-5);
    assert_eq!(counter.renders, counter.controls);

    for _ in 0..200 {
        t += 16;
        driver.frame_at(ms(t), &mut counter).unwrap();
        assert!((0.85..=1.0).contains(&counter.last_opacity));
    }
}

#[test]
fn test_driver_advances_starfield_every_frame() {
    let mut driver = driver();
    let mut counter = Counter::default();

    for frame in 1..=10 {
        driver.frame_at(ms(frame * 16), &mut counter).unwrap();
    }
    let rotation = driver.scene().starfield.layers()[0].rotation();
    assert!((rotation.y - 0.004).abs() < 1e-6);
    assert_eq!(driver.stats().frames_total, 10);
}
