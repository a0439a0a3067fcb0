// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for coordinate transformations between
//! screen pixels, viewport pixels and normalized image coordinates, along
//! with the fit-to-screen and zoom-around-cursor transforms.
//!
//! Viewport coordinates are pixels relative to the top-left corner of the
//! canvas widget. The displayed image occupies the rectangle starting at
//! `pan` with size `image_size * scale`.

use crate::models::annotation::Point;

/// A position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for ScreenPoint {
    type Output = ScreenPoint;

    fn sub(self, rhs: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for ScreenPoint {
    type Output = ScreenPoint;

    fn add(self, rhs: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Allowed range of the zoom scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self { min: 0.1, max: 20.0 }
    }
}

impl ScaleBounds {
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

/// Convert pixel coordinates to normalized coordinates (0.0 to 1.0).
pub fn normalize_coordinates(pixel_x: f64, pixel_y: f64, width: u32, height: u32) -> Point {
    Point {
        x: pixel_x / width as f64,
        y: pixel_y / height as f64,
    }
}

/// Convert normalized coordinates to pixel coordinates.
pub fn denormalize_coordinates(point: &Point, width: u32, height: u32) -> (f64, f64) {
    (point.x * width as f64, point.y * height as f64)
}

/// Convert a viewport point to normalized coordinates of the displayed image.
///
/// The result is clamped to `[0, 1]` so a drag that leaves the image still
/// produces an in-bounds point.
pub fn screen_to_normalized(point: ScreenPoint, container: ScreenRect) -> Point {
    if container.width <= 0.0 || container.height <= 0.0 {
        return Point::new(0.0, 0.0);
    }
    Point {
        x: ((point.x - container.left) / container.width).clamp(0.0, 1.0),
        y: ((point.y - container.top) / container.height).clamp(0.0, 1.0),
    }
}

/// Convert normalized image coordinates to a viewport point (unclamped).
pub fn normalized_to_screen(point: Point, container: ScreenRect) -> ScreenPoint {
    ScreenPoint {
        x: container.left + point.x * container.width,
        y: container.top + point.y * container.height,
    }
}

/// Scale and pan that show the whole image centered in the viewport.
///
/// The image is never upscaled past 1x. The scale is floored at
/// `bounds.min` so tiny viewports still yield a positive scale.
pub fn fit_to_screen(image: Size, viewport: Size, padding: f64, bounds: ScaleBounds) -> (f64, ScreenPoint) {
    let scale_x = (viewport.width - padding) / image.width;
    let scale_y = (viewport.height - padding) / image.height;
    let scale = scale_x.min(scale_y).min(1.0).max(bounds.min);

    let pan = ScreenPoint {
        x: (viewport.width - image.width * scale) / 2.0,
        y: (viewport.height - image.height * scale) / 2.0,
    };
    (scale, pan)
}

/// Rescale by `factor` while keeping the point under `cursor` fixed.
pub fn zoom_around_cursor(
    old_scale: f64,
    old_pan: ScreenPoint,
    cursor: ScreenPoint,
    factor: f64,
    bounds: ScaleBounds,
) -> (f64, ScreenPoint) {
    // Image-local (unscaled) position currently under the cursor.
    let local_x = (cursor.x - old_pan.x) / old_scale;
    let local_y = (cursor.y - old_pan.y) / old_scale;

    let new_scale = bounds.clamp(old_scale * factor);
    let new_pan = ScreenPoint {
        x: cursor.x - local_x * new_scale,
        y: cursor.y - local_y * new_scale,
    };
    (new_scale, new_pan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(scale: f64, pan: ScreenPoint) -> ScreenRect {
        ScreenRect::new(pan.x, pan.y, 800.0 * scale, 600.0 * scale)
    }

    #[test]
    fn test_normalize_denormalize_roundtrip() {
        let width = 1920;
        let height = 1080;
        let pixel_x = 960.0;
        let pixel_y = 540.0;

        let normalized = normalize_coordinates(pixel_x, pixel_y, width, height);
        let (denorm_x, denorm_y) = denormalize_coordinates(&normalized, width, height);

        assert!((denorm_x - pixel_x).abs() < 0.0001);
        assert!((denorm_y - pixel_y).abs() < 0.0001);
    }

    #[test]
    fn test_screen_to_normalized_clamps() {
        let rect = ScreenRect::new(100.0, 50.0, 400.0, 200.0);

        let inside = screen_to_normalized(ScreenPoint::new(300.0, 100.0), rect);
        assert!((inside.x - 0.5).abs() < 1e-9);
        assert!((inside.y - 0.25).abs() < 1e-9);

        let outside = screen_to_normalized(ScreenPoint::new(-20.0, 900.0), rect);
        assert_eq!(outside.x, 0.0);
        assert_eq!(outside.y, 1.0);
    }

    #[test]
    fn test_screen_to_normalized_empty_rect() {
        let p = screen_to_normalized(ScreenPoint::new(5.0, 5.0), ScreenRect::default());
        assert_eq!(p, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_fit_never_upscales() {
        // 936/800 and 736/600 are both above 1.
        let (scale, pan) = fit_to_screen(
            Size::new(800.0, 600.0),
            Size::new(1000.0, 800.0),
            64.0,
            ScaleBounds::default(),
        );
        assert_eq!(scale, 1.0);
        assert!((pan.x - 100.0).abs() < 1e-9);
        assert!((pan.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_downscales_large_image() {
        let (scale, pan) = fit_to_screen(
            Size::new(4000.0, 2000.0),
            Size::new(1064.0, 800.0),
            64.0,
            ScaleBounds::default(),
        );
        assert!((scale - 0.25).abs() < 1e-9);
        assert!((pan.x - 32.0).abs() < 1e-9);
        assert!((pan.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_is_idempotent() {
        let image = Size::new(1234.0, 777.0);
        let viewport = Size::new(900.0, 640.0);
        let first = fit_to_screen(image, viewport, 64.0, ScaleBounds::default());
        let second = fit_to_screen(image, viewport, 64.0, ScaleBounds::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_zoom_keeps_point_under_cursor() {
        let bounds = ScaleBounds::default();
        let starts = [
            (1.0, ScreenPoint::new(100.0, 100.0)),
            (0.37, ScreenPoint::new(-40.0, 12.5)),
            (7.5, ScreenPoint::new(-2000.0, -900.0)),
        ];
        let cursors = [ScreenPoint::new(0.0, 0.0), ScreenPoint::new(420.0, 333.0), ScreenPoint::new(999.0, 5.0)];
        let factors = [1.1, 1.0 / 1.1, 1.2, 0.5];

        for (scale, pan) in starts {
            for cursor in cursors {
                for factor in factors {
                    let before = container(scale, pan);
                    let (new_scale, new_pan) = zoom_around_cursor(scale, pan, cursor, factor, bounds);
                    let after = container(new_scale, new_pan);

                    // Same image location maps back to the cursor (unclamped).
                    let u = (cursor.x - before.left) / before.width;
                    let v = (cursor.y - before.top) / before.height;
                    let back = normalized_to_screen(Point::new(u, v), after);
                    assert!((back.x - cursor.x).abs() < 0.5);
                    assert!((back.y - cursor.y).abs() < 0.5);
                }
            }
        }
    }

    #[test]
    fn test_zoom_clamps_scale() {
        let bounds = ScaleBounds::default();
        let (scale, _) = zoom_around_cursor(19.0, ScreenPoint::default(), ScreenPoint::default(), 1.1, bounds);
        assert_eq!(scale, 20.0);
        let (scale, _) = zoom_around_cursor(0.105, ScreenPoint::default(), ScreenPoint::default(), 0.5, bounds);
        assert_eq!(scale, 0.1);
    }
}
