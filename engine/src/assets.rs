//! Asset Loader
//!
//! Decodes overlay textures on a background thread. The frame thread sends
//! load requests and drains completion events with [`AssetLoader::try_recv`];
//! the worker never touches scene state.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::error::AssetError;

/// Which overlay an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Country outline, shown as soon as it loads.
    Outline,
    /// Region highlight, shown by the reveal.
    Highlight,
}

/// A decoded RGBA8 image.
#[derive(Clone, PartialEq, Eq)]
pub struct LoadedTexture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for LoadedTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedTexture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgba_len", &self.rgba.len())
            .finish()
    }
}

impl LoadedTexture {
    /// Solid-color stand-in used when an image fails to load.
    pub fn placeholder(rgba: [u8; 4]) -> Self {
        const SIZE: u32 = 4;
        Self {
            width: SIZE,
            height: SIZE,
            rgba: rgba.repeat((SIZE * SIZE) as usize),
        }
    }
}

/// Read and decode an image file into RGBA8.
pub fn decode_texture(path: &Path) -> Result<LoadedTexture, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(LoadedTexture {
        width,
        height,
        rgba: decoded.into_raw(),
    })
}

/// A texture to load for an overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub kind: OverlayKind,
    pub path: PathBuf,
}

/// Completion of one request.
#[derive(Debug)]
pub enum AssetEvent {
    Loaded {
        kind: OverlayKind,
        texture: LoadedTexture,
    },
    Failed {
        kind: OverlayKind,
        error: AssetError,
    },
}

enum WorkerCommand {
    Load(AssetRequest),
    Shutdown,
}

/// Handle to the background decode thread.
pub struct AssetLoader {
    tx_cmd: Sender<WorkerCommand>,
    rx_evt: Receiver<AssetEvent>,
    thread: Option<JoinHandle<()>>,
}

impl AssetLoader {
    pub fn spawn() -> Result<Self, AssetError> {
        let (tx_cmd, rx_cmd) = mpsc::channel::<WorkerCommand>();
        let (tx_evt, rx_evt) = mpsc::channel::<AssetEvent>();

        let thread = thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || worker_loop(rx_cmd, tx_evt))
            .map_err(AssetError::Spawn)?;

        Ok(Self {
            tx_cmd,
            rx_evt,
            thread: Some(thread),
        })
    }

    /// Queue a load. Completion arrives later through [`Self::try_recv`].
    pub fn request(&self, request: AssetRequest) -> Result<(), AssetError> {
        tracing::debug!(kind = ?request.kind, path = %request.path.display(), "asset requested");
        self.tx_cmd
            .send(WorkerCommand::Load(request))
            .map_err(|_| AssetError::WorkerDisconnected)
    }

    /// Next finished load, if any. Never blocks.
    pub fn try_recv(&self) -> Option<AssetEvent> {
        self.rx_evt.try_recv().ok()
    }

    /// Block until the next load finishes.
    #[cfg(test)]
    fn recv(&self) -> Result<AssetEvent, AssetError> {
        self.rx_evt.recv().map_err(|_| AssetError::WorkerDisconnected)
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(WorkerCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn worker_loop(rx_cmd: Receiver<WorkerCommand>, tx_evt: Sender<AssetEvent>) {
    while let Ok(cmd) = rx_cmd.recv() {
        let request = match cmd {
            WorkerCommand::Load(request) => request,
            WorkerCommand::Shutdown => break,
        };

        let event = match decode_texture(&request.path) {
            Ok(texture) => AssetEvent::Loaded {
                kind: request.kind,
                texture,
            },
            Err(error) => AssetEvent::Failed {
                kind: request.kind,
                error,
            },
        };

        if tx_evt.send(event).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_size() {
        let tex = LoadedTexture::placeholder([255, 0, 0, 255]);
        assert_eq!(tex.rgba.len(), (tex.width * tex.height * 4) as usize);
        assert_eq!(&tex.rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_missing_file_reports_io() {
        let err = decode_texture(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn test_worker_reports_failure() {
        let loader = AssetLoader::spawn().unwrap();
        loader
            .request(AssetRequest {
                kind: OverlayKind::Highlight,
                path: PathBuf::from("missing/karnataka.png"),
            })
            .unwrap();

        match loader.recv().unwrap() {
            AssetEvent::Failed { kind, error } => {
                assert_eq!(kind, OverlayKind::Highlight);
                assert!(matches!(error, AssetError::Io { .. }));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
