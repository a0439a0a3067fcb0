// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewport controller: zoom scale and pan offset of the displayed image.

use crate::config::EditorConfig;
use crate::util::geometry::{self, ScaleBounds, ScreenPoint, ScreenRect, Size};

/// Scale and pan of the image inside the canvas.
///
/// After an image change the view stays hidden until the image's natural
/// size and the canvas size are both known and the first fit has run.
#[derive(Debug, Clone)]
pub struct Viewport {
    scale: f64,
    pan: ScreenPoint,
    viewport_size: Size,
    image_size: Option<Size>,
    fitted: bool,
    bounds: ScaleBounds,
    padding: f64,
    wheel_factor: f64,
    button_factor: f64,
}

impl Viewport {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            scale: 1.0,
            pan: ScreenPoint::default(),
            viewport_size: Size::default(),
            image_size: None,
            fitted: false,
            bounds: config.scale_bounds(),
            padding: config.fit_padding,
            wheel_factor: config.wheel_zoom_factor,
            button_factor: config.button_zoom_factor,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan(&self) -> ScreenPoint {
        self.pan
    }

    pub fn image_size(&self) -> Option<Size> {
        self.image_size
    }

    /// Whether the image may be drawn.
    pub fn is_visible(&self) -> bool {
        self.fitted
    }

    /// Rectangle the image occupies in viewport pixels.
    pub fn image_rect(&self) -> Option<ScreenRect> {
        let image = self.image_size?;
        Some(ScreenRect::new(
            self.pan.x,
            self.pan.y,
            image.width * self.scale,
            image.height * self.scale,
        ))
    }

    /// Forget the current image: neutral transform, hidden until the next fit.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.pan = ScreenPoint::default();
        self.image_size = None;
        self.fitted = false;
    }

    /// The image finished decoding; fit it once the canvas size is known.
    pub fn image_ready(&mut self, natural: Size) {
        self.image_size = Some(natural);
        self.fitted = false;
        self.fit_to_screen();
    }

    /// Record the canvas size. Runs a pending first fit.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
        if !self.fitted {
            self.fit_to_screen();
        }
    }

    /// Scale and center the image to fit the canvas.
    ///
    /// Returns `false` while the image or canvas size is unknown.
    pub fn fit_to_screen(&mut self) -> bool {
        let Some(image) = self.image_size else {
            return false;
        };
        if image.is_empty() || self.viewport_size.is_empty() {
            return false;
        }

        let (scale, pan) = geometry::fit_to_screen(image, self.viewport_size, self.padding, self.bounds);
        self.scale = scale;
        self.pan = pan;
        if !self.fitted {
            log::debug!("Fitted image at scale {:.3}", scale);
        }
        self.fitted = true;
        true
    }

    pub fn reset_view(&mut self) -> bool {
        self.fit_to_screen()
    }

    /// Zoom in by the button factor; pan is left as is.
    pub fn zoom_in(&mut self) {
        self.scale = self.bounds.clamp(self.scale * self.button_factor);
    }

    /// Zoom out by the button factor; pan is left as is.
    pub fn zoom_out(&mut self) {
        self.scale = self.bounds.clamp(self.scale / self.button_factor);
    }

    /// Zoom one wheel notch around `cursor`.
    ///
    /// `delta_y` follows the usual wheel convention: negative scrolls up and
    /// zooms in. Zero is ignored.
    pub fn on_wheel(&mut self, cursor: ScreenPoint, delta_y: f64) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y < 0.0 {
            self.wheel_factor
        } else {
            1.0 / self.wheel_factor
        };
        let (scale, pan) = geometry::zoom_around_cursor(self.scale, self.pan, cursor, factor, self.bounds);
        self.scale = scale;
        self.pan = pan;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Zoom level as a whole percentage, for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let mut viewport = Viewport::new(&EditorConfig::default());
        viewport.set_viewport_size(Size::new(1000.0, 800.0));
        viewport
    }

    #[test]
    fn test_image_ready_fits_and_shows() {
        let mut v = viewport();
        assert!(!v.is_visible());
        v.image_ready(Size::new(800.0, 600.0));
        assert!(v.is_visible());
        assert_eq!(v.scale(), 1.0);
        assert_eq!(v.pan(), ScreenPoint::new(100.0, 100.0));
        assert_eq!(v.image_rect(), Some(ScreenRect::new(100.0, 100.0, 800.0, 600.0)));
    }

    #[test]
    fn test_fit_waits_for_viewport_size() {
        let mut v = Viewport::new(&EditorConfig::default());
        v.image_ready(Size::new(800.0, 600.0));
        assert!(!v.is_visible());
        v.set_viewport_size(Size::new(1000.0, 800.0));
        assert!(v.is_visible());
        assert_eq!(v.pan(), ScreenPoint::new(100.0, 100.0));
    }

    #[test]
    fn test_resize_after_fit_keeps_transform() {
        let mut v = viewport();
        v.image_ready(Size::new(800.0, 600.0));
        v.set_viewport_size(Size::new(400.0, 300.0));
        assert_eq!(v.scale(), 1.0);
        assert_eq!(v.pan(), ScreenPoint::new(100.0, 100.0));
    }

    #[test]
    fn test_reset_hides_and_neutralizes() {
        let mut v = viewport();
        v.image_ready(Size::new(4000.0, 3000.0));
        v.pan_by(10.0, 10.0);
        v.reset();
        assert!(!v.is_visible());
        assert_eq!(v.scale(), 1.0);
        assert_eq!(v.pan(), ScreenPoint::default());
        assert!(v.image_rect().is_none());
    }

    #[test]
    fn test_fit_twice_is_identical() {
        let mut v = viewport();
        v.image_ready(Size::new(1920.0, 1080.0));
        let first = (v.scale(), v.pan());
        v.fit_to_screen();
        assert_eq!(first, (v.scale(), v.pan()));
    }

    #[test]
    fn test_zoom_buttons_keep_pan_and_clamp() {
        let mut v = viewport();
        v.image_ready(Size::new(800.0, 600.0));
        let pan = v.pan();
        v.zoom_in();
        assert!((v.scale() - 1.2).abs() < 1e-12);
        assert_eq!(v.pan(), pan);
        for _ in 0..100 {
            v.zoom_in();
        }
        assert_eq!(v.scale(), 20.0);
        for _ in 0..200 {
            v.zoom_out();
        }
        assert_eq!(v.scale(), 0.1);
    }

    #[test]
    fn test_wheel_direction() {
        let mut v = viewport();
        v.image_ready(Size::new(800.0, 600.0));
        v.on_wheel(ScreenPoint::new(500.0, 400.0), -120.0);
        assert!((v.scale() - 1.1).abs() < 1e-12);
        v.on_wheel(ScreenPoint::new(500.0, 400.0), 120.0);
        assert!((v.scale() - 1.0).abs() < 1e-12);
        v.on_wheel(ScreenPoint::new(500.0, 400.0), 0.0);
        assert!((v.scale() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_view_refits_after_zoom() {
        let mut v = viewport();
        v.image_ready(Size::new(800.0, 600.0));
        v.on_wheel(ScreenPoint::new(10.0, 10.0), -1.0);
        v.pan_by(-50.0, 20.0);
        assert!(v.reset_view());
        assert_eq!(v.scale(), 1.0);
        assert_eq!(v.pan(), ScreenPoint::new(100.0, 100.0));
    }
}
