// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! What the canvas should draw, derived from editor state.
//!
//! Painting in `ui::canvas` is a thin loop over [`RenderState`]; everything
//! that decides geometry, colors and captions lives here where it can be
//! tested.

use super::interaction::Interaction;
use super::Editor;
use crate::models::annotation::{BoundingBox, BoxId, Point};
use crate::models::classes::ClassList;
use crate::util::geometry::{normalized_to_screen, ScreenRect};

pub const STROKE_WIDTH: f32 = 2.0;
pub const SELECTED_STROKE_WIDTH: f32 = 3.0;
pub const FILL_ALPHA: f32 = 0.15;
pub const SELECTED_FILL_ALPHA: f32 = 0.3;

/// One box as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxView {
    pub id: BoxId,
    /// Screen rectangle in viewport pixels.
    pub rect: ScreenRect,
    pub color: egui::Color32,
    pub caption: String,
    pub selected: bool,
    pub stroke_width: f32,
    pub fill_alpha: f32,
}

/// Everything needed to paint one frame of the canvas.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub image_rect: Option<ScreenRect>,
    pub visible: bool,
    pub boxes: Vec<BoxView>,
    /// Dashed outline of the box being drawn.
    pub preview: Option<ScreenRect>,
}

/// Screen rectangle spanned by two normalized corners, in any order.
fn span_rect(a: Point, b: Point, container: ScreenRect) -> ScreenRect {
    let top_left = normalized_to_screen(Point::new(a.x.min(b.x), a.y.min(b.y)), container);
    let bottom_right = normalized_to_screen(Point::new(a.x.max(b.x), a.y.max(b.y)), container);
    ScreenRect::new(
        top_left.x,
        top_left.y,
        bottom_right.x - top_left.x,
        bottom_right.y - top_left.y,
    )
}

fn screen_rect(bbox: &BoundingBox, container: ScreenRect) -> ScreenRect {
    span_rect(
        Point::new(bbox.x, bbox.y),
        Point::new(bbox.right(), bbox.bottom()),
        container,
    )
}

/// Derive the frame to paint. Nothing is shown until the image is fitted.
pub fn derive(editor: &Editor, boxes: &[BoundingBox], classes: &ClassList) -> RenderState {
    let viewport = editor.viewport();
    let image_rect = viewport.image_rect();
    let (true, Some(container)) = (viewport.is_visible(), image_rect) else {
        return RenderState {
            image_rect,
            ..RenderState::default()
        };
    };

    let selected = editor.selection(boxes);
    let views = boxes
        .iter()
        .map(|bbox| {
            let class = classes.resolve(bbox.class_id);
            let is_selected = selected == Some(bbox.id);
            BoxView {
                id: bbox.id,
                rect: screen_rect(bbox, container),
                color: class.color(),
                caption: class.caption(),
                selected: is_selected,
                stroke_width: if is_selected { SELECTED_STROKE_WIDTH } else { STROKE_WIDTH },
                fill_alpha: if is_selected { SELECTED_FILL_ALPHA } else { FILL_ALPHA },
            }
        })
        .collect();

    let preview = match editor.interaction() {
        Interaction::Drawing { anchor, current } => Some(span_rect(*anchor, *current, container)),
        _ => None,
    };

    RenderState {
        image_rect,
        visible: true,
        boxes: views,
        preview,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::editor::interaction::{Modifiers, PointerButton};
    use crate::models::annotation::BoxCollection;
    use crate::models::classes::{LabelClass, PALETTE, UNKNOWN_COLOR};
    use crate::models::project::ImageId;
    use crate::util::geometry::{ScreenPoint, Size};
    use std::sync::Arc;

    fn shown_editor() -> Editor {
        let mut editor = Editor::new(EditorConfig::default());
        editor.set_image(Some(ImageId::new()));
        editor.set_viewport_size(Size::new(1000.0, 800.0));
        editor.image_ready(800, 600);
        editor
    }

    #[test]
    fn test_hidden_until_fitted() {
        let mut editor = Editor::new(EditorConfig::default());
        editor.set_image(Some(ImageId::new()));
        editor.image_ready(800, 600);
        let boxes = vec![BoundingBox::new(0.1, 0.1, 0.2, 0.2, 0)];
        let state = derive(&editor, &boxes, &ClassList::default());
        assert!(!state.visible);
        assert!(state.boxes.is_empty());
    }

    #[test]
    fn test_box_rects_follow_transform() {
        let editor = shown_editor();
        let boxes = vec![BoundingBox::new(0.5, 0.5, 0.25, 0.5, 0)];
        let state = derive(&editor, &boxes, &ClassList::default());
        // 800x600 image at 1x, centered in 1000x800: origin (100, 100).
        assert_eq!(state.image_rect, Some(ScreenRect::new(100.0, 100.0, 800.0, 600.0)));
        assert_eq!(state.boxes[0].rect, ScreenRect::new(500.0, 400.0, 200.0, 300.0));
    }

    #[test]
    fn test_colors_and_captions() {
        let mut editor = shown_editor();
        let classes = ClassList::from(vec![LabelClass::new(0, "person"), LabelClass::new(2, "dog")]);
        let dog = BoundingBox::new(0.1, 0.1, 0.2, 0.2, 2);
        let orphan = BoundingBox::new(0.5, 0.5, 0.2, 0.2, 7);
        let boxes = Arc::new(vec![dog.clone(), orphan]);
        editor.select(Some(dog.id), &boxes);

        let state = derive(&editor, &boxes, &classes);
        assert_eq!(state.boxes[0].caption, "2: dog");
        assert_eq!(state.boxes[0].color, PALETTE[1]);
        assert!(state.boxes[0].selected);
        assert_eq!(state.boxes[0].stroke_width, SELECTED_STROKE_WIDTH);
        assert_eq!(state.boxes[0].fill_alpha, SELECTED_FILL_ALPHA);

        assert_eq!(state.boxes[1].caption, "?: unknown");
        assert_eq!(state.boxes[1].color, UNKNOWN_COLOR);
        assert_eq!(state.boxes[1].stroke_width, STROKE_WIDTH);
    }

    #[test]
    fn test_preview_while_drawing() {
        let mut editor = shown_editor();
        let boxes: BoxCollection = Arc::new(Vec::new());
        assert!(derive(&editor, &boxes, &ClassList::default()).preview.is_none());

        editor.pointer_down(ScreenPoint::new(500.0, 400.0), PointerButton::Primary, Modifiers::default(), &boxes);
        editor.pointer_move(ScreenPoint::new(300.0, 200.0), &boxes);
        let state = derive(&editor, &boxes, &ClassList::default());
        let preview = state.preview.unwrap();
        assert!((preview.left - 300.0).abs() < 1e-6);
        assert!((preview.top - 200.0).abs() < 1e-6);
        assert!((preview.width - 200.0).abs() < 1e-6);
        assert!((preview.height - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_span_rect_ignores_corner_order() {
        let container = ScreenRect::new(100.0, 100.0, 800.0, 600.0);
        let forward = span_rect(Point::new(0.25, 0.5), Point::new(0.75, 1.0), container);
        let backward = span_rect(Point::new(0.75, 1.0), Point::new(0.25, 0.5), container);
        assert_eq!(forward, ScreenRect::new(300.0, 400.0, 400.0, 300.0));
        assert_eq!(backward, forward);
    }
}
