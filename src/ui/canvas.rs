// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation canvas.
//!
//! Translates egui input on the canvas area into editor events, in the order
//! egui received them, and paints the frame the editor describes.

use crate::editor::interaction::{EditorKey, Modifiers, PointerButton};
use crate::editor::render::{self, BoxView};
use crate::editor::{CursorKind, Editor, EditorAction};
use crate::models::annotation::BoxCollection;
use crate::models::classes::ClassList;
use crate::util::geometry::{ScreenPoint, ScreenRect, Size};

const HANDLE_SIZE: f32 = 6.0;

fn pointer_button(button: egui::PointerButton) -> PointerButton {
    match button {
        egui::PointerButton::Primary => PointerButton::Primary,
        egui::PointerButton::Middle => PointerButton::Middle,
        _ => PointerButton::Secondary,
    }
}

fn editor_key(key: egui::Key) -> Option<EditorKey> {
    match key {
        egui::Key::Delete => Some(EditorKey::Delete),
        egui::Key::Backspace => Some(EditorKey::Backspace),
        egui::Key::Space => Some(EditorKey::Space),
        egui::Key::Escape => Some(EditorKey::Escape),
        _ => None,
    }
}

fn cursor_icon(cursor: CursorKind) -> egui::CursorIcon {
    match cursor {
        CursorKind::Default => egui::CursorIcon::Default,
        CursorKind::Crosshair => egui::CursorIcon::Crosshair,
        CursorKind::Move => egui::CursorIcon::Move,
        CursorKind::Grab => egui::CursorIcon::Grab,
        CursorKind::Grabbing => egui::CursorIcon::Grabbing,
        CursorKind::ResizeVertical => egui::CursorIcon::ResizeVertical,
        CursorKind::ResizeHorizontal => egui::CursorIcon::ResizeHorizontal,
        CursorKind::ResizeNwSe => egui::CursorIcon::ResizeNwSe,
        CursorKind::ResizeNeSw => egui::CursorIcon::ResizeNeSw,
    }
}

/// Text shown while no image is drawn.
fn placeholder_text(has_image: bool, load_error: Option<&str>) -> String {
    match (has_image, load_error) {
        (true, Some(error)) => format!("Could not load image: {}", error),
        (true, None) => "Loading image...".to_string(),
        (false, _) => "Open images to begin annotating (File → Open Images...)".to_string(),
    }
}

fn to_egui_rect(rect: ScreenRect, origin: egui::Pos2) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(rect.left as f32, rect.top as f32),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

/// Collects box replacements while events are fed to the editor; each event
/// sees the collection produced by the previous one.
struct Pending {
    boxes: BoxCollection,
    changed: bool,
}

impl Pending {
    fn apply(&mut self, action: EditorAction) {
        if let EditorAction::ReplaceBoxes(boxes) = action {
            self.boxes = boxes;
            self.changed = true;
        }
    }
}

/// Display the canvas and feed this frame's input to the editor.
///
/// Returns the replacement box collection, if any event changed it.
pub fn show(
    ui: &mut egui::Ui,
    editor: &mut Editor,
    boxes: &BoxCollection,
    classes: &ClassList,
    texture: Option<&egui::TextureHandle>,
    load_error: Option<&str>,
) -> EditorAction {
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    editor.set_viewport_size(Size::new(rect.width() as f64, rect.height() as f64));

    let to_local = |pos: egui::Pos2| ScreenPoint::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
    let mut pending = Pending {
        boxes: boxes.clone(),
        changed: false,
    };

    let ctx = ui.ctx().clone();
    let events = ctx.input(|i| i.events.clone());
    let keyboard_free = !ctx.wants_keyboard_input();
    let mut last_pos = response.hover_pos().map(to_local);

    for event in events {
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed: true,
                modifiers,
            } => {
                if rect.contains(pos) {
                    let action = editor.pointer_down(
                        to_local(pos),
                        pointer_button(button),
                        Modifiers { shift: modifiers.shift },
                        &pending.boxes,
                    );
                    pending.apply(action);
                }
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed: false,
                ..
            } => {
                let action = editor.pointer_release(to_local(pos), pointer_button(button), &pending.boxes, classes);
                pending.apply(action);
            }
            egui::Event::PointerMoved(pos) => {
                let local = to_local(pos);
                last_pos = Some(local);
                let action = if rect.contains(pos) {
                    editor.pointer_move(local, &pending.boxes)
                } else {
                    editor.pointer_leave(local, &pending.boxes, classes)
                };
                pending.apply(action);
            }
            egui::Event::PointerGone => {
                if let Some(pos) = last_pos {
                    let action = editor.pointer_leave(pos, &pending.boxes, classes);
                    pending.apply(action);
                }
            }
            egui::Event::Key {
                key, pressed, repeat, ..
            } => {
                let Some(key) = editor_key(key) else {
                    continue;
                };
                if !pressed {
                    editor.key_up(key);
                } else if keyboard_free && !repeat && (response.hovered() || !editor.interaction().is_idle()) {
                    let action = editor.key_down(key, &pending.boxes);
                    pending.apply(action);
                }
            }
            _ => {}
        }
    }

    if response.hovered() {
        let delta_y = ctx.input(|i| i.raw_scroll_delta.y);
        if let (true, Some(pos)) = (delta_y != 0.0, response.hover_pos()) {
            // egui reports scrolling up as positive.
            editor.on_wheel(to_local(pos), -delta_y as f64);
        }

        let shift = ctx.input(|i| i.modifiers.shift);
        let cursor = editor.cursor(response.hover_pos().map(to_local), shift, &pending.boxes);
        ctx.set_cursor_icon(cursor_icon(cursor));
    }

    paint(ui, rect, editor, &pending.boxes, classes, texture, load_error);

    if pending.changed {
        EditorAction::ReplaceBoxes(pending.boxes)
    } else {
        EditorAction::None
    }
}

fn paint(
    ui: &egui::Ui,
    rect: egui::Rect,
    editor: &Editor,
    boxes: &BoxCollection,
    classes: &ClassList,
    texture: Option<&egui::TextureHandle>,
    load_error: Option<&str>,
) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(40));

    let state = render::derive(editor, boxes, classes);
    let (true, Some(image_rect), Some(texture)) = (state.visible, state.image_rect, texture) else {
        let message = placeholder_text(editor.image().is_some(), load_error);
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            message,
            egui::FontId::proportional(16.0),
            egui::Color32::from_gray(180),
        );
        return;
    };

    painter.image(
        texture.id(),
        to_egui_rect(image_rect, rect.min),
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    for view in &state.boxes {
        draw_box(&painter, view, rect.min);
    }

    if let Some(preview) = state.preview {
        let r = to_egui_rect(preview, rect.min);
        let outline = [r.left_top(), r.right_top(), r.right_bottom(), r.left_bottom(), r.left_top()];
        painter.extend(egui::Shape::dashed_line(
            &outline,
            egui::Stroke::new(2.0, egui::Color32::WHITE),
            6.0,
            4.0,
        ));
    }
}

fn draw_box(painter: &egui::Painter, view: &BoxView, origin: egui::Pos2) {
    let r = to_egui_rect(view.rect, origin);
    painter.rect_filled(r, 0.0, view.color.gamma_multiply(view.fill_alpha));
    painter.rect_stroke(r, 0.0, egui::Stroke::new(view.stroke_width, view.color));

    let galley = painter.layout_no_wrap(
        view.caption.clone(),
        egui::FontId::proportional(12.0),
        egui::Color32::WHITE,
    );
    let label_rect = egui::Rect::from_min_size(
        r.left_top() - egui::vec2(0.0, galley.size().y + 4.0),
        galley.size() + egui::vec2(8.0, 4.0),
    );
    painter.rect_filled(label_rect, 2.0, view.color);
    painter.galley(label_rect.min + egui::vec2(4.0, 2.0), galley, egui::Color32::WHITE);

    if view.selected {
        for corner in [r.left_top(), r.right_top(), r.left_bottom(), r.right_bottom()] {
            let handle = egui::Rect::from_center_size(corner, egui::vec2(HANDLE_SIZE, HANDLE_SIZE));
            painter.rect_filled(handle, 0.0, egui::Color32::WHITE);
            painter.rect_stroke(handle, 0.0, egui::Stroke::new(1.0, view.color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_and_key_mapping() {
        assert_eq!(pointer_button(egui::PointerButton::Middle), PointerButton::Middle);
        assert_eq!(pointer_button(egui::PointerButton::Extra1), PointerButton::Secondary);
        assert_eq!(editor_key(egui::Key::Space), Some(EditorKey::Space));
        assert_eq!(editor_key(egui::Key::A), None);
    }

    #[test]
    fn test_screen_rect_offset_by_canvas_origin() {
        let r = to_egui_rect(ScreenRect::new(10.0, 20.0, 30.0, 40.0), egui::pos2(100.0, 50.0));
        assert_eq!(r.min, egui::pos2(110.0, 70.0));
        assert_eq!(r.size(), egui::vec2(30.0, 40.0));
    }

    #[test]
    fn test_placeholder_reports_load_error() {
        assert_eq!(placeholder_text(true, None), "Loading image...");
        assert_eq!(
            placeholder_text(true, Some("unsupported format")),
            "Could not load image: unsupported format"
        );
        assert!(placeholder_text(false, Some("stale")).starts_with("Open images"));
    }
}
