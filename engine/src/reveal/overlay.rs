//! Reveal Overlay State Machine
//!
//! `Hidden -> FadingIn -> Glowing`, with `Glowing` terminal.
//!
//! The overlay opacity has exactly one driver at a time: nothing while
//! hidden, the fade timer while fading in, the frame loop while glowing.
//! The fade timer lives inside the `FadingIn` phase, so leaving that phase
//! drops the timer and no fade tick can touch opacity afterwards.

use std::time::Duration;

use super::fade_timer::FadeTicker;
use crate::config::RevealConfig;

/// Opacity within this distance of a bound snaps onto it.
const SNAP_EPSILON: f32 = 1e-4;

/// The fade-in always runs to full opacity, whatever the glow band.
const FADE_TARGET: f32 = 1.0;

/// Public view of the reveal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Hidden,
    FadingIn,
    Glowing,
}

/// Direction of the glow oscillation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlowDirection {
    Rising,
    Falling,
}

impl GlowDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            GlowDirection::Rising => 1.0,
            GlowDirection::Falling => -1.0,
        }
    }
}

/// Which clock currently owns the overlay opacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpacityDriver {
    None,
    FadeTimer,
    Frame,
}

/// Result of a reveal trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The fade-in started.
    Started,
    /// The overlay asset has not loaded yet; the trigger was dropped.
    AssetNotReady,
    /// The reveal is already running or finished; the trigger was ignored.
    AlreadyRevealed,
}

#[derive(Debug, Clone)]
enum Phase {
    Hidden,
    FadingIn { timer: FadeTicker },
    Glowing { direction: GlowDirection },
}

/// The highlighted overlay and its reveal animation.
#[derive(Debug, Clone)]
pub struct RevealOverlay {
    config: RevealConfig,
    phase: Phase,
    opacity: f32,
    visible: bool,
    asset_ready: bool,
}

impl Default for RevealOverlay {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

impl RevealOverlay {
    /// Create a hidden, fully transparent overlay.
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            phase: Phase::Hidden,
            opacity: 0.0,
            visible: false,
            asset_ready: false,
        }
    }

    /// Mark the overlay asset as loaded. Triggers are dropped until this runs.
    pub fn on_asset_ready(&mut self) {
        if !self.asset_ready {
            tracing::debug!("reveal overlay asset ready");
        }
        self.asset_ready = true;
    }

    /// Handle the external reveal event at clock time `now`.
    pub fn trigger(&mut self, now: Duration) -> TriggerOutcome {
        if !self.asset_ready {
            tracing::debug!("reveal trigger dropped: overlay asset not loaded");
            return TriggerOutcome::AssetNotReady;
        }
        if !matches!(self.phase, Phase::Hidden) {
            return TriggerOutcome::AlreadyRevealed;
        }

        let interval = Duration::from_millis(self.config.fade_interval_ms);
        self.visible = true;
        self.opacity = 0.0;
        self.phase = Phase::FadingIn {
            timer: FadeTicker::armed(interval, now),
        };
        tracing::info!(interval_ms = self.config.fade_interval_ms, "reveal fade-in started");
        TriggerOutcome::Started
    }

    /// One fade step. No-op outside `FadingIn`.
    pub fn fade_tick(&mut self) {
        if !matches!(self.phase, Phase::FadingIn { .. }) {
            return;
        }

        self.opacity += self.config.fade_step;
        if self.opacity >= FADE_TARGET - SNAP_EPSILON {
            self.opacity = FADE_TARGET;
            self.phase = Phase::Glowing {
                direction: GlowDirection::Falling,
            };
            tracing::info!("reveal fade-in complete, glowing");
        }
    }

    /// Apply every fade tick that fell due up to `now`.
    ///
    /// Ticks still pending when the fade completes are discarded along with
    /// the timer.
    pub fn poll_fade_timer(&mut self, now: Duration) {
        let due = match &mut self.phase {
            Phase::FadingIn { timer } => timer.poll(now),
            _ => return,
        };
        for _ in 0..due {
            self.fade_tick();
            if !matches!(self.phase, Phase::FadingIn { .. }) {
                break;
            }
        }
    }

    /// One glow step. No-op outside `Glowing`.
    pub fn glow_tick(&mut self) {
        let Phase::Glowing { direction } = &mut self.phase else {
            return;
        };

        let RevealConfig {
            glow_step,
            glow_floor,
            glow_ceiling,
            ..
        } = self.config;

        let next = self.opacity + direction.sign() * glow_step;
        if next >= glow_ceiling - SNAP_EPSILON {
            self.opacity = glow_ceiling;
            *direction = GlowDirection::Falling;
        } else if next <= glow_floor + SNAP_EPSILON {
            self.opacity = glow_floor;
            *direction = GlowDirection::Rising;
        } else {
            self.opacity = next;
        }
    }

    pub fn phase(&self) -> RevealPhase {
        match self.phase {
            Phase::Hidden => RevealPhase::Hidden,
            Phase::FadingIn { .. } => RevealPhase::FadingIn,
            Phase::Glowing { .. } => RevealPhase::Glowing,
        }
    }

    pub fn driver(&self) -> OpacityDriver {
        match self.phase {
            Phase::Hidden => OpacityDriver::None,
            Phase::FadingIn { .. } => OpacityDriver::FadeTimer,
            Phase::Glowing { .. } => OpacityDriver::Frame,
        }
    }

    /// Glow direction; `None` unless glowing.
    pub fn glow_direction(&self) -> Option<GlowDirection> {
        match self.phase {
            Phase::Glowing { direction } => Some(direction),
            _ => None,
        }
    }

    /// Whether the fade timer is currently armed.
    pub fn fade_timer_active(&self) -> bool {
        matches!(self.phase, Phase::FadingIn { .. })
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn asset_ready(&self) -> bool {
        self.asset_ready
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }
}
