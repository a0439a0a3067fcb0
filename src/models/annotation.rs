// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the bounding box annotation and the immutable
//! collection type the canvas hands back to the dataset on every edit.

use super::classes::ClassId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A 2D point with normalized coordinates (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Stable identifier of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(Uuid);

impl BoxId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BoxId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BoxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rectangular region of interest in normalized image coordinates.
///
/// The geometry is a fraction of the image's natural size. It is not clamped
/// to `[0, 1]` while being edited; only its size is kept positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub id: BoxId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Class the box belongs to. Name and color are looked up at render time.
    pub class_id: ClassId,
}

impl BoundingBox {
    /// Create a box with a fresh identifier.
    pub fn new(x: f64, y: f64, width: f64, height: f64, class_id: ClassId) -> Self {
        Self {
            id: BoxId::new(),
            x,
            y,
            width,
            height,
            class_id,
        }
    }

    /// Create the box spanning two corner points, in any order.
    pub fn spanning(a: Point, b: Point, class_id: ClassId) -> Self {
        Self::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (b.x - a.x).abs(),
            (b.y - a.y).abs(),
            class_id,
        )
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check whether a normalized point lies inside the box (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// Ordered box collection of one image.
///
/// Collections are never edited in place: every mutation produces a new
/// `Arc`, so holders of an older value can compare with `Arc::ptr_eq`.
pub type BoxCollection = Arc<Vec<BoundingBox>>;

/// Return a new collection with `boxed` appended.
pub fn with_added(boxes: &BoxCollection, boxed: BoundingBox) -> BoxCollection {
    let mut next = Vec::with_capacity(boxes.len() + 1);
    next.extend(boxes.iter().cloned());
    next.push(boxed);
    Arc::new(next)
}

/// Return a new collection where the box with the same id is replaced.
pub fn with_replaced(boxes: &BoxCollection, updated: &BoundingBox) -> BoxCollection {
    Arc::new(
        boxes
            .iter()
            .map(|b| if b.id == updated.id { updated.clone() } else { b.clone() })
            .collect(),
    )
}

/// Return a new collection without the box `id`.
pub fn without(boxes: &BoxCollection, id: BoxId) -> BoxCollection {
    Arc::new(boxes.iter().filter(|b| b.id != id).cloned().collect())
}

/// Find a box by identifier.
pub fn find(boxes: &[BoundingBox], id: BoxId) -> Option<&BoundingBox> {
    boxes.iter().find(|b| b.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BoxCollection {
        Arc::new(vec![
            BoundingBox::new(0.1, 0.1, 0.2, 0.2, 0),
            BoundingBox::new(0.5, 0.5, 0.1, 0.3, 1),
        ])
    }

    #[test]
    fn test_spanning_normalizes_corners() {
        let b = BoundingBox::spanning(Point::new(0.4, 0.5), Point::new(0.1, 0.1), 2);
        assert!((b.x - 0.1).abs() < 1e-9);
        assert!((b.y - 0.1).abs() < 1e-9);
        assert!((b.width - 0.3).abs() < 1e-9);
        assert!((b.height - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_contains_includes_edges() {
        let b = BoundingBox::new(0.2, 0.2, 0.2, 0.2, 0);
        assert!(b.contains(Point::new(0.2, 0.3)));
        assert!(b.contains(Point::new(0.3, 0.3)));
        assert!(!b.contains(Point::new(0.41, 0.3)));
    }

    #[test]
    fn test_replace_leaves_previous_collection_untouched() {
        let before = sample();
        let mut moved = before[0].clone();
        moved.x = 0.7;

        let after = with_replaced(&before, &moved);

        assert!(!Arc::ptr_eq(&before, &after));
        assert!((before[0].x - 0.1).abs() < 1e-9);
        assert!((after[0].x - 0.7).abs() < 1e-9);
        assert_eq!(after[1], before[1]);
    }

    #[test]
    fn test_add_and_remove_produce_new_collections() {
        let before = sample();
        let extra = BoundingBox::new(0.0, 0.0, 0.5, 0.5, 3);
        let extra_id = extra.id;

        let added = with_added(&before, extra);
        assert_eq!(before.len(), 2);
        assert_eq!(added.len(), 3);
        assert_eq!(added[2].id, extra_id);

        let removed = without(&added, extra_id);
        assert_eq!(added.len(), 3);
        assert_eq!(removed.len(), 2);
        assert!(find(&removed, extra_id).is_none());
    }
}
