// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer gesture state and the geometry each gesture produces.
//!
//! Every intermediate frame of a move or resize is computed from the box as
//! it was when the gesture started plus the total pointer delta, never from
//! the previous frame.

use super::hit::Handle;
use crate::models::annotation::{BoundingBox, Point};
use crate::util::geometry::ScreenPoint;

/// Mouse button of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Resize modifier.
    pub shift: bool,
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Delete,
    Backspace,
    /// Pan modifier.
    Space,
    Escape,
}

/// Current interaction mode, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Drawing,
    Moving,
    Resizing,
    Panning,
}

/// State of the active pointer gesture.
#[derive(Debug, Clone, Default)]
pub enum Interaction {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging out a new box from `anchor`.
    Drawing { anchor: Point, current: Point },
    /// Moving a box; `snapshot` is the box at pointer-down.
    Moving { anchor: Point, snapshot: BoundingBox },
    /// Resizing a box by one of its handles.
    Resizing { handle: Handle, snapshot: BoundingBox },
    /// Dragging the view; `last_screen` is the previous pointer position.
    Panning { last_screen: ScreenPoint },
}

impl Interaction {
    pub fn mode(&self) -> Mode {
        match self {
            Interaction::Idle => Mode::Idle,
            Interaction::Drawing { .. } => Mode::Drawing,
            Interaction::Moving { .. } => Mode::Moving,
            Interaction::Resizing { .. } => Mode::Resizing,
            Interaction::Panning { .. } => Mode::Panning,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// Box geometry at gesture start, for move and resize.
    pub fn snapshot(&self) -> Option<&BoundingBox> {
        match self {
            Interaction::Moving { snapshot, .. } | Interaction::Resizing { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }
}

/// Translate `snapshot` by the pointer delta since `anchor`. Size is kept.
pub fn moved_box(snapshot: &BoundingBox, anchor: Point, current: Point) -> BoundingBox {
    BoundingBox {
        x: snapshot.x + (current.x - anchor.x),
        y: snapshot.y + (current.y - anchor.y),
        ..snapshot.clone()
    }
}

/// Resize `snapshot` by dragging `handle` to `current`.
///
/// The edges opposite the handle stay fixed and no dimension drops below
/// `min_size`, so a handle dragged past the opposite edge stops there.
pub fn resized_box(snapshot: &BoundingBox, handle: Handle, current: Point, min_size: f64) -> BoundingBox {
    let mut resized = snapshot.clone();

    if handle.moves_top() {
        let bottom = snapshot.bottom();
        let top = (bottom - min_size).min(current.y);
        resized.y = top;
        resized.height = bottom - top;
    }
    if handle.moves_bottom() {
        resized.height = (current.y - snapshot.y).max(min_size);
    }
    if handle.moves_left() {
        let right = snapshot.right();
        let left = (right - min_size).min(current.x);
        resized.x = left;
        resized.width = right - left;
    }
    if handle.moves_right() {
        resized.width = (current.x - snapshot.x).max(min_size);
    }

    resized
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 0.005;

    fn snapshot() -> BoundingBox {
        BoundingBox::new(0.2, 0.2, 0.4, 0.3, 0)
    }

    #[test]
    fn test_move_preserves_size() {
        let s = snapshot();
        let anchor = Point::new(0.3, 0.3);
        for current in [Point::new(0.0, 0.0), Point::new(0.35, 0.9), Point::new(1.0, 0.31)] {
            let moved = moved_box(&s, anchor, current);
            assert_eq!(moved.width, s.width);
            assert_eq!(moved.height, s.height);
            assert_eq!(moved.id, s.id);
            assert!((moved.x - (s.x + current.x - anchor.x)).abs() < 1e-12);
            assert!((moved.y - (s.y + current.y - anchor.y)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_resize_north_keeps_bottom() {
        let s = snapshot();
        let r = resized_box(&s, Handle::N, Point::new(0.9, 0.1), EPS);
        assert!((r.y - 0.1).abs() < 1e-12);
        assert!((r.bottom() - s.bottom()).abs() < 1e-12);
        assert_eq!(r.x, s.x);
        assert_eq!(r.width, s.width);
    }

    #[test]
    fn test_resize_north_past_bottom_is_floored() {
        let s = snapshot();
        for y in [0.5, 0.6, 0.99, 1.0] {
            let r = resized_box(&s, Handle::N, Point::new(0.3, y), EPS);
            assert!(r.height >= EPS - 1e-12);
            assert!((r.bottom() - s.bottom()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_resize_south_and_east_floor() {
        let s = snapshot();
        let r = resized_box(&s, Handle::Se, Point::new(0.0, 0.0), EPS);
        assert_eq!(r.x, s.x);
        assert_eq!(r.y, s.y);
        assert_eq!(r.width, EPS);
        assert_eq!(r.height, EPS);
    }

    #[test]
    fn test_resize_west_keeps_right() {
        let s = snapshot();
        let r = resized_box(&s, Handle::W, Point::new(0.1, 0.0), EPS);
        assert!((r.x - 0.1).abs() < 1e-12);
        assert!((r.right() - s.right()).abs() < 1e-12);
        assert_eq!(r.y, s.y);
        assert_eq!(r.height, s.height);
    }

    #[test]
    fn test_resize_corner_moves_both_axes() {
        let s = snapshot();
        let r = resized_box(&s, Handle::Ne, Point::new(0.7, 0.1), EPS);
        assert!((r.y - 0.1).abs() < 1e-12);
        assert!((r.bottom() - s.bottom()).abs() < 1e-12);
        assert_eq!(r.x, s.x);
        assert!((r.width - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_interaction_mode() {
        assert_eq!(Interaction::default().mode(), Mode::Idle);
        let moving = Interaction::Moving {
            anchor: Point::new(0.0, 0.0),
            snapshot: snapshot(),
        };
        assert_eq!(moving.mode(), Mode::Moving);
        assert!(moving.snapshot().is_some());
        let panning = Interaction::Panning {
            last_screen: ScreenPoint::default(),
        };
        assert!(panning.snapshot().is_none());
    }
}
