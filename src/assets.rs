//! Background and icon images.
//!
//! Everything is decoded up front so a missing or broken file stops the
//! launcher before a window exists.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gpui::{RenderImage, SharedString};
use image::imageops::FilterType;
use image::{Frame, RgbaImage};
use thiserror::Error;

use crate::config::LauncherConfig;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// One icon + label pair, ready to render.
#[derive(Clone)]
pub struct Tile {
    pub key: char,
    pub label: SharedString,
    pub icon: Arc<RenderImage>,
}

/// Decoded images for a launcher window.
#[derive(Clone)]
pub struct Assets {
    pub background: Arc<RenderImage>,
    /// Same order as the configured entries.
    pub tiles: Vec<Tile>,
}

impl Assets {
    /// Load the background and every tile icon from `dir`.
    pub fn load(dir: &Path, config: &LauncherConfig) -> Result<Self, AssetError> {
        let background = load_image(&dir.join(&config.background))?;
        tracing::debug!(
            "Background {}x{}",
            background.width(),
            background.height()
        );

        let size = config.layout.icon_size;
        let tiles = config
            .entries
            .iter()
            .map(|entry| {
                let icon = load_icon(&dir.join(&entry.icon), size)?;
                Ok(Tile {
                    key: entry.key,
                    label: entry.key.to_uppercase().collect::<String>().into(),
                    icon: to_render_image(icon),
                })
            })
            .collect::<Result<Vec<_>, AssetError>>()?;

        Ok(Self {
            background: to_render_image(background),
            tiles,
        })
    }
}

/// `<directory of the running executable>/<assets_dir>`, or `assets_dir` as-is
/// when it is already absolute.
pub fn resolve_dir(assets_dir: &Path) -> std::io::Result<PathBuf> {
    if assets_dir.is_absolute() {
        return Ok(assets_dir.to_path_buf());
    }
    let exe = std::env::current_exe()?;
    let base = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(base.join(assets_dir))
}

fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    image::open(path)
        .map(|img| img.into_rgba8())
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })
}

/// Decode an icon and resample it to `size`×`size` with Lanczos3.
pub fn load_icon(path: &Path, size: u32) -> Result<RgbaImage, AssetError> {
    let img = load_image(path)?;
    Ok(image::imageops::resize(&img, size, size, FilterType::Lanczos3))
}

/// gpui render images are BGRA.
fn to_render_image(mut buffer: RgbaImage) -> Arc<RenderImage> {
    for pixel in buffer.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
    Arc::new(RenderImage::new(vec![Frame::new(buffer)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) {
        RgbaImage::from_pixel(w, h, Rgba([200, 10, 10, 255]))
            .save(dir.join(name))
            .unwrap();
    }

    fn config() -> LauncherConfig {
        LauncherConfig::from_toml(
            r#"
            [[tiles]]
            key = "w"
            name = "WhatsApp"
            [[tiles]]
            key = "m"
            name = "Messages"
            [commands]
            m = ["open", "-a", "Messages"]
            w = ["open", "-a", "WhatsApp"]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_load_icon_resamples() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "big.png", 256, 128);
        let icon = load_icon(&dir.path().join("big.png"), 84).unwrap();
        assert_eq!(icon.dimensions(), (84, 84));
    }

    #[test]
    fn test_load_keeps_entry_order() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "Background2.png", 64, 16);
        write_png(dir.path(), "WhatsApp.png", 32, 32);
        write_png(dir.path(), "Messages.png", 32, 32);

        let assets = Assets::load(dir.path(), &config()).unwrap();
        let keys: Vec<_> = assets.tiles.iter().map(|t| t.key).collect();
        let labels: Vec<_> = assets.tiles.iter().map(|t| t.label.to_string()).collect();
        assert_eq!(keys, vec!['w', 'm']);
        assert_eq!(labels, vec!["W", "M"]);
    }

    #[test]
    fn test_missing_icon_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "Background2.png", 64, 16);
        write_png(dir.path(), "WhatsApp.png", 32, 32);

        match Assets::load(dir.path(), &config()) {
            Err(AssetError::Image { path, .. }) => {
                assert_eq!(path, dir.path().join("Messages.png"))
            }
            Ok(_) => panic!("expected missing icon error"),
        }
    }

    #[test]
    fn test_missing_background_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "WhatsApp.png", 32, 32);
        write_png(dir.path(), "Messages.png", 32, 32);
        assert!(Assets::load(dir.path(), &config()).is_err());
    }

    #[test]
    fn test_corrupt_icon_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "Background2.png", 64, 16);
        write_png(dir.path(), "WhatsApp.png", 32, 32);
        std::fs::write(dir.path().join("Messages.png"), b"not a png").unwrap();
        assert!(Assets::load(dir.path(), &config()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_absolute_dir() {
        let dir = Path::new("/opt/quicklaunch/icons");
        assert_eq!(resolve_dir(dir).unwrap(), dir);
    }
}
