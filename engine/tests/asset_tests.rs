//! Asset Tests - Image Decoding and the Loader Thread

use std::path::PathBuf;
use std::time::{Duration, Instant};

use star_globe_engine::assets::{AssetEvent, AssetLoader, AssetRequest, OverlayKind, decode_texture};
use star_globe_engine::error::AssetError;

fn write_test_png(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("star_globe_{}_{name}", std::process::id()));
    let image = image::RgbaImage::from_fn(8, 4, |x, _| {
        if x < 4 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 0])
        }
    });
    image.save(&path).unwrap();
    path
}

/// Poll the loader until an event arrives or five seconds pass.
fn next_event(loader: &AssetLoader) -> AssetEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(event) = loader.try_recv() {
            return event;
        }
        assert!(Instant::now() < deadline, "asset loader produced no event");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_decode_png() {
    let path = write_test_png("decode.png");
    let texture = decode_texture(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!((texture.width, texture.height), (8, 4));
    assert_eq!(texture.rgba.len(), 8 * 4 * 4);
    assert_eq!(&texture.rgba[0..4], &[255, 0, 0, 255]);
    assert_eq!(&texture.rgba[16..20], &[0, 0, 255, 0]);
}

#[test]
fn test_decode_garbage_fails() {
    let path = std::env::temp_dir().join(format!("star_globe_{}_garbage.png", std::process::id()));
    std::fs::write(&path, b"definitely not an image").unwrap();
    let err = decode_texture(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(matches!(err, AssetError::Decode { .. }));
}

#[test]
fn test_loader_delivers_decoded_texture() {
    let path = write_test_png("worker.png");
    let loader = AssetLoader::spawn().unwrap();
    loader
        .request(AssetRequest {
            kind: OverlayKind::Highlight,
            path: path.clone(),
        })
        .unwrap();

    let event = next_event(&loader);
    std::fs::remove_file(&path).ok();

    match event {
        AssetEvent::Loaded { kind, texture } => {
            assert_eq!(kind, OverlayKind::Highlight);
            assert_eq!((texture.width, texture.height), (8, 4));
        }
        AssetEvent::Failed { error, .. } => panic!("load failed: {error}"),
    }
}

#[test]
fn test_loader_reports_requests_in_order() {
    let path = write_test_png("order.png");
    let loader = AssetLoader::spawn().unwrap();
    loader
        .request(AssetRequest {
            kind: OverlayKind::Outline,
            path: std::env::temp_dir().join("star_globe_missing_outline.png"),
        })
        .unwrap();
    loader
        .request(AssetRequest {
            kind: OverlayKind::Highlight,
            path: path.clone(),
        })
        .unwrap();

    let first = next_event(&loader);
    let second = next_event(&loader);
    std::fs::remove_file(&path).ok();

    assert!(matches!(
        first,
        AssetEvent::Failed {
            kind: OverlayKind::Outline,
            ..
        }
    ));
    assert!(matches!(
        second,
        AssetEvent::Loaded {
            kind: OverlayKind::Highlight,
            ..
        }
    ));
}
