// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Properties panel: boxes of the current image and the class summary.

use crate::models::annotation::{BoundingBox, BoxId, Point};
use crate::models::classes::ClassId;
use crate::models::project::Dataset;
use crate::util::geometry::denormalize_coordinates;

/// Result of properties panel interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertiesAction {
    None,
    SelectBox(BoxId),
    DeleteBox(BoxId),
    RemoveClass(ClassId),
}

/// Box geometry in pixels, when the image size is known.
fn pixel_label(bbox: &BoundingBox, size: Option<(u32, u32)>) -> String {
    match size {
        Some((width, height)) => {
            let (x, y) = denormalize_coordinates(&Point::new(bbox.x, bbox.y), width, height);
            let (w, h) = denormalize_coordinates(&Point::new(bbox.width, bbox.height), width, height);
            format!("{:.0}, {:.0}  {:.0}×{:.0} px", x, y, w, h)
        }
        None => format!("{:.3}, {:.3}  {:.3}×{:.3}", bbox.x, bbox.y, bbox.width, bbox.height),
    }
}

/// Display the properties panel.
pub fn show(
    ui: &mut egui::Ui,
    dataset: &Dataset,
    boxes: &[BoundingBox],
    image_size: Option<(u32, u32)>,
    selected: Option<BoxId>,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Boxes");
    ui.separator();

    if boxes.is_empty() {
        ui.label(egui::RichText::new("No boxes").weak());
    }

    egui::ScrollArea::vertical()
        .id_source("boxes_scroll")
        .max_height(ui.available_height() * 0.6)
        .show(ui, |ui| {
            for bbox in boxes {
                let class = dataset.classes.resolve(bbox.class_id);
                let is_selected = selected == Some(bbox.id);

                ui.horizontal(|ui| {
                    let (swatch, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, class.color());

                    if ui.selectable_label(is_selected, class.caption()).clicked() {
                        action = PropertiesAction::SelectBox(bbox.id);
                    }
                    if ui.small_button("🗑").on_hover_text("Delete box").clicked() {
                        action = PropertiesAction::DeleteBox(bbox.id);
                    }
                });
                ui.label(egui::RichText::new(pixel_label(bbox, image_size)).small().weak());
            }
        });

    ui.add_space(12.0);
    ui.heading("Classes");
    ui.separator();

    for class in dataset.classes.iter() {
        ui.horizontal(|ui| {
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
            ui.painter().rect_filled(swatch, 2.0, dataset.classes.resolve(class.id).color());
            ui.label(format!("{}: {}", class.id, class.name));
            ui.label(egui::RichText::new(format!("({})", dataset.box_count(class.id))).weak());
            if ui.small_button("✖").on_hover_text("Remove class").clicked() {
                action = PropertiesAction::RemoveClass(class.id);
            }
        });
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_label() {
        let bbox = BoundingBox::new(0.25, 0.5, 0.5, 0.25, 0);
        assert_eq!(pixel_label(&bbox, Some((800, 600))), "200, 300  400×150 px");
        assert_eq!(pixel_label(&bbox, None), "0.250, 0.500  0.500×0.250");
    }
}
