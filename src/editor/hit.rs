// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hit-testing of boxes and their resize handles.
//!
//! Handle tolerance is a pixel distance measured against the box as it is
//! currently displayed, so grabbing an edge feels the same at every zoom
//! level.

use crate::models::annotation::{BoundingBox, Point};
use crate::util::geometry::{normalized_to_screen, ScreenRect};

/// One of the eight resize handles of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    N,
    S,
    E,
    W,
    Nw,
    Ne,
    Sw,
    Se,
}

impl Handle {
    /// Whether dragging this handle moves the top edge.
    pub fn moves_top(self) -> bool {
        matches!(self, Handle::N | Handle::Nw | Handle::Ne)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Handle::S | Handle::Sw | Handle::Se)
    }

    pub fn moves_left(self) -> bool {
        matches!(self, Handle::W | Handle::Nw | Handle::Sw)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Handle::E | Handle::Ne | Handle::Se)
    }
}

/// Zone of a box under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Handle(Handle),
    Inside,
}

/// Find the handle of `bbox` within `tolerance_px` of `point`.
///
/// Corners win over single edges. Edges only count inside a band of
/// `tolerance_px` around the box, so the extension of an edge line far away
/// from the box does not grab it.
pub fn handle_at(point: Point, bbox: &BoundingBox, container: ScreenRect, tolerance_px: f64) -> Option<Handle> {
    let top_left = normalized_to_screen(Point::new(bbox.x, bbox.y), container);
    let bottom_right = normalized_to_screen(Point::new(bbox.right(), bbox.bottom()), container);
    let pointer = normalized_to_screen(point, container);

    let in_band_x = pointer.x >= top_left.x - tolerance_px && pointer.x <= bottom_right.x + tolerance_px;
    let in_band_y = pointer.y >= top_left.y - tolerance_px && pointer.y <= bottom_right.y + tolerance_px;
    if !in_band_x || !in_band_y {
        return None;
    }

    let near_left = (pointer.x - top_left.x).abs() <= tolerance_px;
    let near_right = (pointer.x - bottom_right.x).abs() <= tolerance_px;
    let near_top = (pointer.y - top_left.y).abs() <= tolerance_px;
    let near_bottom = (pointer.y - bottom_right.y).abs() <= tolerance_px;

    match (near_top, near_bottom, near_left, near_right) {
        (true, _, true, _) => Some(Handle::Nw),
        (true, _, _, true) => Some(Handle::Ne),
        (_, true, true, _) => Some(Handle::Sw),
        (_, true, _, true) => Some(Handle::Se),
        (true, _, _, _) => Some(Handle::N),
        (_, true, _, _) => Some(Handle::S),
        (_, _, true, _) => Some(Handle::W),
        (_, _, _, true) => Some(Handle::E),
        _ => None,
    }
}

/// Classify `point` against a box: a handle, the interior, or nothing.
pub fn zone_at(point: Point, bbox: &BoundingBox, container: ScreenRect, tolerance_px: f64) -> Option<Zone> {
    if let Some(handle) = handle_at(point, bbox, container, tolerance_px) {
        return Some(Zone::Handle(handle));
    }
    bbox.contains(point).then_some(Zone::Inside)
}

/// Top-most box containing `point`; later boxes are drawn above earlier ones.
pub fn topmost_box_at(point: Point, boxes: &[BoundingBox]) -> Option<&BoundingBox> {
    boxes.iter().rev().find(|b| b.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1000x1000 px image drawn at 1x from the viewport origin: 1 px = 0.001.
    fn container() -> ScreenRect {
        ScreenRect::new(0.0, 0.0, 1000.0, 1000.0)
    }

    fn bbox() -> BoundingBox {
        BoundingBox::new(0.2, 0.2, 0.4, 0.3, 0)
    }

    #[test]
    fn test_corner_beats_edges() {
        let handle = handle_at(Point::new(0.205, 0.195), &bbox(), container(), 8.0);
        assert_eq!(handle, Some(Handle::Nw));
        let handle = handle_at(Point::new(0.6, 0.5), &bbox(), container(), 8.0);
        assert_eq!(handle, Some(Handle::Se));
    }

    #[test]
    fn test_single_edges() {
        let b = bbox();
        assert_eq!(handle_at(Point::new(0.4, 0.203), &b, container(), 8.0), Some(Handle::N));
        assert_eq!(handle_at(Point::new(0.4, 0.5), &b, container(), 8.0), Some(Handle::S));
        assert_eq!(handle_at(Point::new(0.195, 0.3), &b, container(), 8.0), Some(Handle::W));
        assert_eq!(handle_at(Point::new(0.607, 0.3), &b, container(), 8.0), Some(Handle::E));
    }

    #[test]
    fn test_tolerance_is_in_screen_pixels() {
        let b = bbox();
        let point = Point::new(0.4, 0.212);
        // 12 px away at 1x, 3 px away when the image is shown 4x smaller.
        assert_eq!(handle_at(point, &b, container(), 8.0), None);
        let zoomed_out = ScreenRect::new(0.0, 0.0, 250.0, 250.0);
        assert_eq!(handle_at(point, &b, zoomed_out, 8.0), Some(Handle::N));
    }

    #[test]
    fn test_edge_line_outside_band_is_ignored() {
        let handle = handle_at(Point::new(0.9, 0.2), &bbox(), container(), 8.0);
        assert_eq!(handle, None);
    }

    #[test]
    fn test_zone_inside_and_outside() {
        let b = bbox();
        assert_eq!(zone_at(Point::new(0.4, 0.35), &b, container(), 8.0), Some(Zone::Inside));
        assert_eq!(zone_at(Point::new(0.9, 0.9), &b, container(), 8.0), None);
    }

    #[test]
    fn test_topmost_prefers_later_boxes() {
        let lower = BoundingBox::new(0.0, 0.0, 0.5, 0.5, 0);
        let upper = BoundingBox::new(0.25, 0.25, 0.5, 0.5, 1);
        let upper_id = upper.id;
        let boxes = vec![lower, upper];
        assert_eq!(topmost_box_at(Point::new(0.3, 0.3), &boxes).map(|b| b.id), Some(upper_id));
        assert_eq!(topmost_box_at(Point::new(0.1, 0.1), &boxes).map(|b| b.id), Some(boxes[0].id));
        assert!(topmost_box_at(Point::new(0.9, 0.1), &boxes).is_none());
    }

    #[test]
    fn test_handle_edge_flags() {
        assert!(Handle::Nw.moves_top() && Handle::Nw.moves_left());
        assert!(!Handle::N.moves_left() && !Handle::N.moves_right());
        assert!(Handle::Se.moves_bottom() && Handle::Se.moves_right());
    }
}
