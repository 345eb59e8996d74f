//! Star Globe Viewer
//!
//! Run with: `cargo run --bin globe-viewer [config.json]`
//!
//! A textured globe in front of a drifting three-layer starfield. The region
//! highlight stays hidden until its texture has loaded and the reveal is
//! triggered, then fades in and keeps glowing.
//!
//! Controls:
//! - Space / Enter: Reveal the highlighted region
//! - Left-drag: Orbit the globe
//! - ESC: Exit
//!
//! The scene config is read from the first argument or `STAR_GLOBE_CONFIG`;
//! without either the built-in defaults are used. Log level follows
//! `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use star_globe_engine::assets::{AssetEvent, AssetLoader, AssetRequest, LoadedTexture, OverlayKind};
use star_globe_engine::camera::OrbitControls;
use star_globe_engine::config::SceneConfig;
use star_globe_engine::error::RenderError;
use star_globe_engine::frame_loop::{FrameCollaborator, FrameDriver, SceneContext};
use star_globe_engine::render::SceneRenderer;

const CONFIG_ENV: &str = "STAR_GLOBE_CONFIG";

/// Shown in place of an overlay texture that failed to load.
const PLACEHOLDER_RGBA: [u8; 4] = [0, 170, 255, 200];

// ============================================================================
// VIEW (camera + GPU)
// ============================================================================

/// The frame driver's collaborator: orbit controls and the renderer.
struct View {
    renderer: SceneRenderer,
    controls: OrbitControls,
}

impl FrameCollaborator for View {
    type Error = RenderError;

    fn update_controls(&mut self) {
        self.controls.update();
    }

    fn render(&mut self, scene: &SceneContext) -> Result<(), RenderError> {
        self.renderer.render(scene, &self.controls)
    }
}

// ============================================================================
// INPUT MAPPING
// ============================================================================

/// What a key or button does in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputAction {
    Reveal,
    /// Start (`true`) or stop an orbit drag.
    Rotate(bool),
}

fn key_action(key: KeyCode, pressed: bool) -> Option<InputAction> {
    match key {
        KeyCode::Space | KeyCode::Enter | KeyCode::NumpadEnter if pressed => {
            Some(InputAction::Reveal)
        }
        _ => None,
    }
}

/// The left button only orbits; the reveal is keyboard-driven.
fn mouse_action(button: MouseButton, pressed: bool) -> Option<InputAction> {
    match button {
        MouseButton::Left => Some(InputAction::Rotate(pressed)),
        _ => None,
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct AppState {
    window: Arc<Window>,
    driver: FrameDriver,
    view: View,
    assets: Option<AssetLoader>,
    last_fps_shown: f32,
}

impl AppState {
    fn new(window: Arc<Window>, config: &SceneConfig) -> Result<Self, RenderError> {
        let scene = SceneContext::from_config(config);
        let renderer = SceneRenderer::new(window.clone(), config, &scene)?;

        let size = window.inner_size();
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let controls = OrbitControls::new(&config.camera, aspect);

        let mut state = Self {
            window,
            driver: FrameDriver::new(scene),
            view: View { renderer, controls },
            assets: None,
            last_fps_shown: -1.0,
        };
        state.request_overlays(config);
        Ok(state)
    }

    /// Start decoding both overlay textures in the background.
    fn request_overlays(&mut self, config: &SceneConfig) {
        let loader = match AssetLoader::spawn() {
            Ok(loader) => loader,
            Err(e) => {
                tracing::error!("{e}; overlays fall back to placeholders");
                self.use_placeholder(OverlayKind::Outline);
                self.use_placeholder(OverlayKind::Highlight);
                return;
            }
        };

        for (kind, overlay) in [
            (OverlayKind::Outline, &config.outline),
            (OverlayKind::Highlight, &config.highlight),
        ] {
            let request = AssetRequest {
                kind,
                path: PathBuf::from(&overlay.texture),
            };
            if let Err(e) = loader.request(request) {
                tracing::error!(?kind, "{e}");
                self.use_placeholder(kind);
            }
        }
        self.assets = Some(loader);
    }

    fn use_placeholder(&mut self, kind: OverlayKind) {
        self.install_texture(kind, &LoadedTexture::placeholder(PLACEHOLDER_RGBA));
    }

    fn install_texture(&mut self, kind: OverlayKind, texture: &LoadedTexture) {
        self.view.renderer.set_overlay_texture(kind, texture);
        if kind == OverlayKind::Highlight {
            self.driver.overlay_asset_ready();
        }
    }

    /// Apply finished texture loads. Never blocks.
    fn drain_asset_events(&mut self) {
        let mut events = Vec::new();
        if let Some(loader) = &self.assets {
            while let Some(event) = loader.try_recv() {
                events.push(event);
            }
        }

        for event in events {
            match event {
                AssetEvent::Loaded { kind, texture } => {
                    tracing::info!(?kind, width = texture.width, height = texture.height, "overlay texture loaded");
                    self.install_texture(kind, &texture);
                }
                AssetEvent::Failed { kind, error } => {
                    tracing::warn!(?kind, "{error}; using placeholder");
                    self.use_placeholder(kind);
                }
            }
        }
    }

    fn trigger_reveal(&mut self) {
        let outcome = self.driver.trigger_reveal();
        tracing::debug!(?outcome, "reveal requested");
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.view.renderer.resize(new_size.width, new_size.height);
        self.view.controls.resize(new_size.width, new_size.height);
    }

    fn apply(&mut self, action: Option<InputAction>) {
        match action {
            Some(InputAction::Reveal) => self.trigger_reveal(),
            Some(InputAction::Rotate(pressed)) => self.view.controls.handle_rotate_button(pressed),
            None => {}
        }
    }

    fn redraw(&mut self) -> Result<(), RenderError> {
        self.drain_asset_events();
        let result = self.driver.frame(&mut self.view);
        self.update_title();
        result
    }

    fn update_title(&mut self) {
        let fps = self.driver.stats().fps;
        if fps == self.last_fps_shown {
            return;
        }
        self.last_fps_shown = fps;

        let overlay = &self.driver.scene().overlay;
        self.window.set_title(&format!(
            "Star Globe | FPS: {:.0} | Stars: {} | Reveal: {:?}",
            fps,
            self.driver.scene().starfield.total_particles(),
            overlay.phase(),
        ));
    }
}

// ============================================================================
// APPLICATION HANDLER
// ============================================================================

struct App {
    config: SceneConfig,
    state: Option<AppState>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title("Star Globe - Space to reveal, drag to orbit")
            .with_inner_size(PhysicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match AppState::new(window, &self.config) {
            Ok(state) => {
                tracing::info!(
                    stars = state.driver.scene().starfield.total_particles(),
                    "viewer ready: Space/Enter to reveal, drag to orbit, ESC to exit"
                );
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                tracing::error!("failed to initialize renderer: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                state.resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;

                if key == KeyCode::Escape && pressed {
                    event_loop.exit();
                    return;
                }

                state.apply(key_action(key, pressed));
            }
            WindowEvent::MouseInput { button, state: btn_state, .. } => {
                state.apply(mouse_action(button, btn_state == ElementState::Pressed));
            }
            WindowEvent::CursorMoved { position, .. } => {
                state
                    .view
                    .controls
                    .handle_mouse_move(position.x as f32, position.y as f32);
            }
            WindowEvent::RedrawRequested => {
                match state.redraw() {
                    Ok(()) => {}
                    Err(RenderError::Surface(wgpu::SurfaceError::Lost)) => {
                        state.resize(state.window.inner_size())
                    }
                    Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                        tracing::error!("GPU out of memory");
                        event_loop.exit();
                    }
                    Err(e) => tracing::warn!("render error: {e}"),
                }

                state.window.request_redraw();
            }
            _ => {}
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// CLI argument first, then the environment variable, then defaults.
fn load_config() -> SceneConfig {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let Some(path) = path else {
        return SceneConfig::default();
    };

    match SceneConfig::load(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "loaded scene config");
            config
        }
        Err(e) => {
            tracing::warn!("{e}; using default scene config");
            SceneConfig::default()
        }
    }
}

fn main() {
    init_tracing();
    let config = load_config();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        config,
        state: None,
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("event loop error: {e}");
        std::process::exit(1);
    }
}
