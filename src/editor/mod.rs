// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bounding-box editing core.
//!
//! [`Editor`] turns pointer and keyboard events into box edits. It owns the
//! viewport, the active gesture and the selection, but never the boxes: it
//! reads the current collection and answers with an [`EditorAction`] carrying
//! a whole replacement collection, which the caller applies to its store.
//! Nothing here depends on egui input types, so the whole state machine is
//! testable without a window.

pub mod hit;
pub mod interaction;
pub mod render;
pub mod viewport;

use crate::config::EditorConfig;
use crate::models::annotation::{self, BoundingBox, BoxCollection, BoxId};
use crate::models::classes::{ClassId, ClassList, LabelClass};
use crate::models::project::ImageId;
use crate::util::geometry::{screen_to_normalized, ScreenPoint, ScreenRect, Size};
use hit::{Handle, Zone};
use interaction::{moved_box, resized_box, EditorKey, Interaction, Mode, Modifiers, PointerButton};
use viewport::Viewport;

/// Result of feeding an event to the editor.
#[derive(Debug, Clone)]
pub enum EditorAction {
    None,
    /// Replace the current image's box collection.
    ReplaceBoxes(BoxCollection),
}

/// Pointer affordance to show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Default,
    Crosshair,
    Move,
    Grab,
    Grabbing,
    ResizeVertical,
    ResizeHorizontal,
    ResizeNwSe,
    ResizeNeSw,
}

impl From<Handle> for CursorKind {
    fn from(handle: Handle) -> Self {
        match handle {
            Handle::N | Handle::S => CursorKind::ResizeVertical,
            Handle::E | Handle::W => CursorKind::ResizeHorizontal,
            Handle::Nw | Handle::Se => CursorKind::ResizeNwSe,
            Handle::Ne | Handle::Sw => CursorKind::ResizeNeSw,
        }
    }
}

/// Interactive editing state for one canvas.
pub struct Editor {
    config: EditorConfig,
    viewport: Viewport,
    interaction: Interaction,
    image: Option<ImageId>,
    selected: Option<BoxId>,
    active_class: Option<ClassId>,
    pan_key_held: bool,
    /// Button that started the active gesture.
    gesture_button: Option<PointerButton>,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            viewport: Viewport::new(&config),
            config,
            interaction: Interaction::Idle,
            image: None,
            selected: None,
            active_class: None,
            pan_key_held: false,
            gesture_button: None,
        }
    }

    // --- Image lifecycle ---

    /// Switch to another image. Resets the view and hides the image until
    /// [`Editor::image_ready`] is called.
    pub fn set_image(&mut self, image: Option<ImageId>) {
        if self.image == image {
            return;
        }
        self.image = image;
        self.viewport.reset();
        self.interaction = Interaction::Idle;
        self.selected = None;
    }

    pub fn image(&self) -> Option<ImageId> {
        self.image
    }

    /// The current image finished decoding.
    pub fn image_ready(&mut self, width: u32, height: u32) {
        self.viewport.image_ready(Size::new(width as f64, height as f64));
    }

    /// Report the canvas size in pixels.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport.set_viewport_size(size);
    }

    // --- Viewport ---

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
    }

    pub fn on_wheel(&mut self, cursor: ScreenPoint, delta_y: f64) {
        self.viewport.on_wheel(cursor, delta_y);
    }

    // --- Queries ---

    pub fn mode(&self) -> Mode {
        self.interaction.mode()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// The selected box, if it still exists in `boxes`.
    pub fn selected_box<'a>(&self, boxes: &'a [BoundingBox]) -> Option<&'a BoundingBox> {
        annotation::find(boxes, self.selected?)
    }

    /// The selected id, if it still exists in `boxes`.
    pub fn selection(&self, boxes: &[BoundingBox]) -> Option<BoxId> {
        self.selected_box(boxes).map(|b| b.id)
    }

    /// Select a box (or nothing). Selecting a box makes its class active.
    pub fn select(&mut self, id: Option<BoxId>, boxes: &[BoundingBox]) {
        let target = id.and_then(|id| annotation::find(boxes, id));
        if let Some(target) = target {
            self.active_class = Some(target.class_id);
        }
        self.selected = target.map(|b| b.id);
    }

    /// The class new boxes are drawn with: the chosen one, or the first class.
    pub fn active_class<'a>(&self, classes: &'a ClassList) -> Option<&'a LabelClass> {
        self.active_class
            .and_then(|id| classes.get(id))
            .or_else(|| classes.first())
    }

    /// Choose the active class. A selected box is relabeled to it.
    pub fn set_active_class(&mut self, class_id: ClassId, boxes: &BoxCollection) -> EditorAction {
        self.active_class = Some(class_id);

        match self.selected_box(boxes) {
            Some(selected) if selected.class_id != class_id => {
                let relabeled = BoundingBox {
                    class_id,
                    ..selected.clone()
                };
                log::info!("Relabeled box {} to class {}", relabeled.id, class_id);
                EditorAction::ReplaceBoxes(annotation::with_replaced(boxes, &relabeled))
            }
            _ => EditorAction::None,
        }
    }

    /// Make a freshly created class active without relabeling the selection.
    pub fn activate_class(&mut self, class_id: ClassId) {
        self.active_class = Some(class_id);
    }

    fn container(&self) -> Option<ScreenRect> {
        if !self.viewport.is_visible() {
            return None;
        }
        self.viewport.image_rect()
    }

    // --- Pointer input ---

    /// Start a gesture. `pos` is in viewport pixels.
    pub fn pointer_down(
        &mut self,
        pos: ScreenPoint,
        button: PointerButton,
        modifiers: Modifiers,
        boxes: &BoxCollection,
    ) -> EditorAction {
        if !self.interaction.is_idle() || button == PointerButton::Secondary {
            return EditorAction::None;
        }
        let Some(container) = self.container() else {
            return EditorAction::None;
        };
        self.gesture_button = Some(button);

        if self.pan_key_held || button == PointerButton::Middle {
            self.interaction = Interaction::Panning { last_screen: pos };
            log::debug!("Start panning");
            return EditorAction::None;
        }

        let point = screen_to_normalized(pos, container);

        if modifiers.shift {
            if let Some(selected) = self.selected_box(boxes) {
                if let Some(handle) = hit::handle_at(point, selected, container, self.config.handle_tolerance_px) {
                    log::debug!("Start resizing box {} by {:?}", selected.id, handle);
                    self.interaction = Interaction::Resizing {
                        handle,
                        snapshot: selected.clone(),
                    };
                    return EditorAction::None;
                }
            }
        }

        if let Some(target) = hit::topmost_box_at(point, boxes) {
            log::debug!("Start moving box {}", target.id);
            self.selected = Some(target.id);
            self.active_class = Some(target.class_id);
            self.interaction = Interaction::Moving {
                anchor: point,
                snapshot: target.clone(),
            };
            return EditorAction::None;
        }

        self.selected = None;
        self.interaction = Interaction::Drawing {
            anchor: point,
            current: point,
        };
        EditorAction::None
    }

    /// Continue the active gesture.
    pub fn pointer_move(&mut self, pos: ScreenPoint, boxes: &BoxCollection) -> EditorAction {
        if let Interaction::Panning { last_screen } = &mut self.interaction {
            let (dx, dy) = (pos.x - last_screen.x, pos.y - last_screen.y);
            *last_screen = pos;
            self.viewport.pan_by(dx, dy);
            return EditorAction::None;
        }

        let Some(container) = self.container() else {
            return EditorAction::None;
        };
        let point = screen_to_normalized(pos, container);

        let updated = match &mut self.interaction {
            Interaction::Idle | Interaction::Panning { .. } => return EditorAction::None,
            Interaction::Drawing { current, .. } => {
                *current = point;
                return EditorAction::None;
            }
            Interaction::Moving { anchor, snapshot } => moved_box(snapshot, *anchor, point),
            Interaction::Resizing { handle, snapshot } => {
                resized_box(snapshot, *handle, point, self.config.min_box_size)
            }
        };

        if annotation::find(boxes, updated.id).is_none() {
            log::debug!("Box {} vanished mid-gesture", updated.id);
            self.interaction = Interaction::Idle;
            return EditorAction::None;
        }
        EditorAction::ReplaceBoxes(annotation::with_replaced(boxes, &updated))
    }

    /// Finish the active gesture at `pos`.
    pub fn pointer_up(&mut self, pos: ScreenPoint, boxes: &BoxCollection, classes: &ClassList) -> EditorAction {
        let moved = self.pointer_move(pos, boxes);

        let finished = match std::mem::take(&mut self.interaction) {
            Interaction::Drawing { anchor, current } => self.finish_drawing(anchor, current, boxes, classes),
            Interaction::Panning { .. } => {
                log::debug!("Stop panning");
                EditorAction::None
            }
            _ => EditorAction::None,
        };

        match finished {
            EditorAction::None => moved,
            action => action,
        }
    }

    /// A button was released at `pos`. Only the button that started the
    /// gesture ends it.
    pub fn pointer_release(
        &mut self,
        pos: ScreenPoint,
        button: PointerButton,
        boxes: &BoxCollection,
        classes: &ClassList,
    ) -> EditorAction {
        if self.interaction.is_idle() || self.gesture_button != Some(button) {
            return EditorAction::None;
        }
        self.pointer_up(pos, boxes, classes)
    }

    /// The pointer left the canvas; ends the gesture like a release.
    pub fn pointer_leave(&mut self, pos: ScreenPoint, boxes: &BoxCollection, classes: &ClassList) -> EditorAction {
        if self.interaction.is_idle() {
            return EditorAction::None;
        }
        self.pointer_up(pos, boxes, classes)
    }

    fn finish_drawing(
        &mut self,
        anchor: annotation::Point,
        current: annotation::Point,
        boxes: &BoxCollection,
        classes: &ClassList,
    ) -> EditorAction {
        let min = self.config.min_draw_extent;
        if (current.x - anchor.x).abs() <= min || (current.y - anchor.y).abs() <= min {
            return EditorAction::None;
        }
        let Some(class) = self.active_class(classes) else {
            log::warn!("No class to label the new box with");
            return EditorAction::None;
        };

        let created = BoundingBox::spanning(anchor, current, class.id);
        log::info!(
            "Created box {} ({:.3}, {:.3}, {:.3} x {:.3}) as '{}'",
            created.id,
            created.x,
            created.y,
            created.width,
            created.height,
            class.name
        );
        self.active_class = Some(class.id);
        self.selected = Some(created.id);
        EditorAction::ReplaceBoxes(annotation::with_added(boxes, created))
    }

    // --- Keyboard input ---

    pub fn key_down(&mut self, key: EditorKey, boxes: &BoxCollection) -> EditorAction {
        match key {
            EditorKey::Delete | EditorKey::Backspace => self.delete_selected(boxes),
            EditorKey::Space => {
                self.pan_key_held = true;
                EditorAction::None
            }
            EditorKey::Escape => self.cancel(boxes),
        }
    }

    pub fn key_up(&mut self, key: EditorKey) {
        if key == EditorKey::Space {
            self.pan_key_held = false;
            if self.mode() == Mode::Panning {
                log::debug!("Pan key released, stop panning");
                self.interaction = Interaction::Idle;
            }
        }
    }

    /// Remove the selected box.
    pub fn delete_selected(&mut self, boxes: &BoxCollection) -> EditorAction {
        let Some(id) = self.selection(boxes) else {
            self.selected = None;
            return EditorAction::None;
        };
        self.selected = None;
        self.interaction = Interaction::Idle;
        log::info!("Deleted box {}", id);
        EditorAction::ReplaceBoxes(annotation::without(boxes, id))
    }

    /// Abort the active gesture. A move or resize is rolled back.
    pub fn cancel(&mut self, boxes: &BoxCollection) -> EditorAction {
        let previous = std::mem::take(&mut self.interaction);
        match previous.snapshot() {
            Some(snapshot) if annotation::find(boxes, snapshot.id).is_some() => {
                log::debug!("Cancelled {:?}, restoring box {}", previous.mode(), snapshot.id);
                EditorAction::ReplaceBoxes(annotation::with_replaced(boxes, snapshot))
            }
            _ => EditorAction::None,
        }
    }

    // --- Affordance ---

    /// Cursor to show while hovering `hover` (viewport pixels).
    pub fn cursor(&self, hover: Option<ScreenPoint>, shift: bool, boxes: &[BoundingBox]) -> CursorKind {
        match self.interaction.mode() {
            Mode::Panning => return CursorKind::Grabbing,
            Mode::Moving => return CursorKind::Move,
            Mode::Resizing => {
                if let Interaction::Resizing { handle, .. } = &self.interaction {
                    return (*handle).into();
                }
            }
            Mode::Drawing => return CursorKind::Crosshair,
            Mode::Idle => {}
        }
        if self.pan_key_held {
            return CursorKind::Grab;
        }
        let (Some(pos), Some(container)) = (hover, self.container()) else {
            return CursorKind::Default;
        };
        let point = screen_to_normalized(pos, container);

        if shift {
            if let Some(selected) = self.selected_box(boxes) {
                match hit::zone_at(point, selected, container, self.config.handle_tolerance_px) {
                    Some(Zone::Handle(handle)) => return handle.into(),
                    Some(Zone::Inside) => return CursorKind::Move,
                    None => {}
                }
            }
        }
        if hit::topmost_box_at(point, boxes).is_some() {
            CursorKind::Move
        } else {
            CursorKind::Crosshair
        }
    }
}
