// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image list with file name search and labeled/unlabeled filter.

use crate::models::project::{Dataset, ImageFilter, ImageId};

/// Result of image list interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageListAction {
    None,
    Open(ImageId),
    Remove(ImageId),
}

/// Display the image list.
pub fn show(
    ui: &mut egui::Ui,
    dataset: &Dataset,
    filter: &mut ImageFilter,
    search: &mut String,
    current: Option<ImageId>,
) -> ImageListAction {
    let mut action = ImageListAction::None;

    ui.heading("Images");
    ui.add(egui::TextEdit::singleline(search).hint_text("Search..."));
    ui.horizontal(|ui| {
        ui.selectable_value(filter, ImageFilter::All, "All");
        ui.selectable_value(filter, ImageFilter::Labeled, "Labeled");
        ui.selectable_value(filter, ImageFilter::Unlabeled, "Unlabeled");
    });
    ui.separator();

    let visible = dataset.visible_images(*filter, search);
    ui.label(egui::RichText::new(format!("{} of {}", visible.len(), dataset.images.len())).weak());

    egui::ScrollArea::vertical().id_source("image_list").show(ui, |ui| {
        for image in visible {
            ui.horizontal(|ui| {
                let marker = if image.is_labeled() { "●" } else { "○" };
                let text = format!("{} {} ({})", marker, image.file_name(), image.boxes.len());
                if ui.selectable_label(current == Some(image.id), text).clicked() {
                    action = ImageListAction::Open(image.id);
                }
                if ui.small_button("✖").on_hover_text("Remove image").clicked() {
                    action = ImageListAction::Remove(image.id);
                }
            });
        }
    });

    action
}
