//! Error Types
//!
//! One error enum per concern. Steady-state animation has no failure modes;
//! these cover the collaborators around it (config files, texture loading,
//! GPU setup) and explicit layer construction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::config::SceneConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid JSON for the scene schema.
    #[error("invalid scene config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A value parsed but is outside its allowed range.
    #[error("invalid scene config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised by the background asset loader.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The asset file could not be read.
    #[error("failed to read asset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The asset bytes could not be decoded as an image.
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The worker thread is gone.
    #[error("asset worker disconnected")]
    WorkerDisconnected,
    /// The worker thread could not be started.
    #[error("failed to spawn asset worker: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Errors raised when building a particle layer from explicit parts.
#[derive(Debug, Error, PartialEq)]
pub enum StarfieldError {
    /// `positions` and `speeds` disagree on the particle count.
    #[error("layer has {positions} positions but {speeds} speeds")]
    LengthMismatch { positions: usize, speeds: usize },
}

/// Errors raised while creating or driving the GPU renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The window surface could not be created.
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    /// No adapter is compatible with the surface.
    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    /// The adapter refused to create a device.
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    /// The surface reports no supported formats for this adapter.
    #[error("surface has no supported texture formats")]
    NoSurfaceFormat,
    /// Acquiring the next frame failed.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
