// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar: zoom controls, active class selector and the add-class form.

use crate::models::classes::{color_for, ClassError, ClassId, ClassList};

/// Input state of the inline "add class" form.
#[derive(Debug, Default)]
pub struct AddClassForm {
    pub id: String,
    pub name: String,
    /// Last rejection, shown next to the form.
    pub error: Option<String>,
}

impl AddClassForm {
    /// Parse the form. An empty id means "next free id".
    pub fn parse(&self, classes: &ClassList) -> Result<(ClassId, String), String> {
        let id = match self.id.trim() {
            "" => classes.next_id().ok_or_else(|| ClassError::IdsExhausted.to_string())?,
            text => text.parse().map_err(|_| format!("'{}' is not a valid class id", text))?,
        };
        Ok((id, self.name.trim().to_string()))
    }

    pub fn clear(&mut self) {
        self.id.clear();
        self.name.clear();
        self.error = None;
    }
}

/// Result of toolbar interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    ZoomIn,
    ZoomOut,
    ResetView,
    SelectClass(ClassId),
    AddClass { id: ClassId, name: String },
}

/// Display the toolbar.
pub fn show(
    ui: &mut egui::Ui,
    zoom_percent: u32,
    classes: &ClassList,
    active_class: Option<ClassId>,
    form: &mut AddClassForm,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("−").on_hover_text("Zoom out").clicked() {
            action = ToolbarAction::ZoomOut;
        }
        ui.label(format!("{}%", zoom_percent));
        if ui.button("+").on_hover_text("Zoom in").clicked() {
            action = ToolbarAction::ZoomIn;
        }
        if ui.button("Fit").on_hover_text("Reset view").clicked() {
            action = ToolbarAction::ResetView;
        }

        ui.separator();

        ui.label("Class:");
        let selected_text = active_class
            .map(|id| classes.resolve(id).caption())
            .unwrap_or_else(|| "none".to_string());
        egui::ComboBox::from_id_source("active_class")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for class in classes.iter() {
                    let color = color_for(class.id, classes);
                    let text = egui::RichText::new(format!("{}: {}", class.id, class.name)).color(color);
                    if ui.selectable_label(active_class == Some(class.id), text).clicked() {
                        action = ToolbarAction::SelectClass(class.id);
                    }
                }
            });

        ui.separator();

        ui.label("New class:");
        ui.add(egui::TextEdit::singleline(&mut form.id).hint_text("id").desired_width(40.0));
        let name = ui.add(egui::TextEdit::singleline(&mut form.name).hint_text("name").desired_width(100.0));
        let submitted = name.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("Add").clicked() || submitted {
            match form.parse(classes) {
                Ok((id, name)) => action = ToolbarAction::AddClass { id, name },
                Err(e) => form.error = Some(e),
            }
        }

        if let Some(ref error) = form.error {
            ui.label(egui::RichText::new(error).color(egui::Color32::from_rgb(0xef, 0x44, 0x44)));
        }
    });

    action
}
