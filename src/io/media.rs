// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image decoding.
//!
//! Images are decoded to RGBA8 so they can be uploaded as egui textures
//! without further conversion.

use anyhow::{Context, Result};
use std::path::Path;

/// Extensions offered by the open dialog.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// A decoded image.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Decode an image file.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let decoded = image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Whether a path looks like an image we can open.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_png() {
        let path = std::env::temp_dir().join("boxmark-media-test.png");
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.size(), (4, 3));
        assert_eq!(loaded.pixels.len(), 4 * 3 * 4);
        assert_eq!(&loaded.pixels[..4], &[10, 20, 30, 255]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = std::env::temp_dir().join("boxmark-no-such-image.png");
        assert!(load_image(&path).is_err());
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("/a/photo.JPG")));
        assert!(is_image_file(Path::new("b.png")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("noext")));
    }
}
