// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns the dataset and applies every change the panels and the
//! canvas report. Image decoding and prediction loading run on background
//! threads and are polled once per frame.

use crate::config::AppConfig;
use crate::editor::{Editor, EditorAction};
use crate::io::media::{self, LoadedImage};
use crate::io::{predictions, serialization};
use crate::models::annotation::{self, BoxCollection};
use crate::models::prediction::{apply_predictions, Prediction};
use crate::models::project::{neighbor, Dataset, ImageFilter, ImageId};
use crate::ui::{canvas, image_list, properties, toolbar};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Result of background image loading, tagged with the image it belongs to.
struct LoadedImageData {
    image: ImageId,
    result: anyhow::Result<LoadedImage>,
}

/// Status bar text for whichever loaders are still running.
fn loading_text(image: Option<&str>, predictions: Option<&str>) -> Option<String> {
    match (image, predictions) {
        (Some(image), Some(predictions)) => Some(format!("{} | {}", image, predictions)),
        (Some(message), None) | (None, Some(message)) => Some(message.to_string()),
        (None, None) => None,
    }
}

/// Main application state.
pub struct BoxmarkApp {
    dataset: Dataset,

    /// Canvas editing state
    editor: Editor,

    /// Image shown in the canvas
    current_image: Option<ImageId>,

    /// Texture of the current image, once decoded
    image_texture: Option<egui::TextureHandle>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<LoadedImageData>>,

    /// Receiver for background prediction loading (target image, batch)
    prediction_loader: Option<(ImageId, Receiver<anyhow::Result<Vec<Prediction>>>)>,

    /// Spinner text while the current image decodes
    image_message: Option<String>,

    /// Spinner text while predictions load
    prediction_message: Option<String>,

    /// Why the current image could not be shown
    image_error: Option<String>,

    /// Last outcome shown in the status bar
    status: Option<String>,

    filter: ImageFilter,
    search: String,
    class_form: toolbar::AddClassForm,
}

impl BoxmarkApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            dataset: Dataset::new(config.initial_classes()),
            editor: Editor::new(config.editor),
            current_image: None,
            image_texture: None,
            image_loader: None,
            prediction_loader: None,
            image_message: None,
            prediction_message: None,
            image_error: None,
            status: None,
            filter: ImageFilter::default(),
            search: String::new(),
            class_form: toolbar::AddClassForm::default(),
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    fn report_error(&mut self, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.set_status(format!("{:#}", error));
    }

    fn current_boxes(&self) -> BoxCollection {
        self.current_image
            .and_then(|id| self.dataset.image(id))
            .map(|img| img.boxes.clone())
            .unwrap_or_else(|| Arc::new(Vec::new()))
    }

    fn replace_boxes(&mut self, boxes: BoxCollection) {
        if let Some(id) = self.current_image {
            self.dataset.update_boxes(id, boxes);
        }
    }

    fn apply_editor_action(&mut self, action: EditorAction) {
        if let EditorAction::ReplaceBoxes(boxes) = action {
            self.replace_boxes(boxes);
        }
    }

    /// Add images to the dataset and show the first one if nothing is open.
    fn add_images(&mut self, paths: Vec<PathBuf>) {
        let paths: Vec<PathBuf> = paths.into_iter().filter(|p| media::is_image_file(p)).collect();
        let ids = self.dataset.add_images(paths);
        self.set_status(format!("Added {} images", ids.len()));
        if self.current_image.is_none() {
            if let Some(&first) = ids.first() {
                self.open_image(first);
            }
        }
    }

    /// Show an image, decoding it in the background.
    fn open_image(&mut self, id: ImageId) {
        if self.current_image == Some(id) {
            return;
        }
        let Some(path) = self.dataset.image(id).map(|img| img.path.clone()) else {
            return;
        };

        self.current_image = Some(id);
        self.editor.set_image(Some(id));
        self.image_texture = None;
        self.image_error = None;

        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.image_message = Some("Loading image...".to_string());

        std::thread::spawn(move || {
            let result = media::load_image(&path);
            if let Ok(ref loaded) = result {
                log::info!("Loaded image: {} ({}x{})", path.display(), loaded.width, loaded.height);
            }
            let _ = sender.send(LoadedImageData { image: id, result });
        });
    }

    fn close_image(&mut self) {
        self.current_image = None;
        self.editor.set_image(None);
        self.image_texture = None;
        self.image_loader = None;
        self.image_message = None;
        self.image_error = None;
    }

    fn remove_image(&mut self, id: ImageId) {
        if self.current_image == Some(id) {
            self.close_image();
        }
        if let Some(removed) = self.dataset.remove_image(id) {
            log::info!("Removed image {}", removed.path.display());
        }
    }

    /// Move to the previous/next image of the filtered list.
    fn navigate(&mut self, forward: bool) {
        let visible = self.dataset.visible_images(self.filter, &self.search);
        if let Some(next) = neighbor(&visible, self.current_image, forward) {
            self.open_image(next);
        }
    }

    fn load_predictions(&mut self, path: PathBuf) {
        let Some(target) = self.current_image else {
            self.set_status("Open an image before loading predictions");
            return;
        };

        let (sender, receiver) = channel();
        self.prediction_loader = Some((target, receiver));
        self.prediction_message = Some("Loading predictions...".to_string());

        std::thread::spawn(move || {
            let _ = sender.send(predictions::read_predictions(&path));
        });
    }

    fn merge_predictions(&mut self, target: ImageId, batch: &[Prediction]) {
        let Some(boxes) = self.dataset.image(target).map(|img| img.boxes.clone()) else {
            log::warn!("Image closed before predictions arrived");
            return;
        };

        match apply_predictions(batch, &self.dataset.classes, &boxes) {
            Ok(merged) => {
                self.dataset.classes = merged.classes;
                self.dataset.update_boxes(target, merged.boxes);
                self.set_status(format!(
                    "Added {} predicted boxes ({} new classes)",
                    batch.len(),
                    merged.created_classes
                ));
            }
            Err(e) => self.report_error(e.into()),
        }
    }

    fn import_dataset(&mut self, path: PathBuf) {
        match serialization::import_dataset(&path) {
            Ok(dataset) => {
                self.close_image();
                self.dataset = dataset;
                self.set_status(format!("Imported {} images", self.dataset.images.len()));
                let first = self
                    .dataset
                    .visible_images(self.filter, &self.search)
                    .first()
                    .map(|img| img.id);
                if let Some(first) = first {
                    self.open_image(first);
                }
            }
            Err(e) => self.report_error(e),
        }
    }

    fn export_dataset(&mut self, path: PathBuf) {
        match serialization::export_dataset(&self.dataset, &path) {
            Ok(()) => self.set_status(format!("Exported dataset to {}", path.display())),
            Err(e) => self.report_error(e),
        }
    }

    /// Poll background loaders.
    fn poll_loaders(&mut self, ctx: &egui::Context) {
        if let Some(ref receiver) = self.image_loader {
            if let Ok(loaded) = receiver.try_recv() {
                self.image_loader = None;
                self.image_message = None;

                match loaded.result {
                    Ok(_) if Some(loaded.image) != self.current_image => {
                        log::debug!("Discarding decoded image that is no longer shown");
                    }
                    Ok(image) => {
                        let size = [image.width as usize, image.height as usize];
                        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &image.pixels);
                        self.image_texture = Some(ctx.load_texture("current_image", color_image, egui::TextureOptions::LINEAR));
                        self.dataset.set_image_size(loaded.image, image.size());
                        self.editor.image_ready(image.width, image.height);
                    }
                    Err(e) if Some(loaded.image) == self.current_image => {
                        self.image_error = Some(format!("{:#}", e));
                        self.report_error(e);
                    }
                    Err(e) => self.report_error(e),
                }
            }
        }

        if let Some((target, ref receiver)) = self.prediction_loader {
            if let Ok(result) = receiver.try_recv() {
                self.prediction_loader = None;
                self.prediction_message = None;

                match result {
                    Ok(batch) => self.merge_predictions(target, &batch),
                    Err(e) => self.report_error(e),
                }
            }
        }
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Images...").clicked() {
                    if let Some(paths) = rfd::FileDialog::new()
                        .add_filter("Images", &media::IMAGE_EXTENSIONS)
                        .pick_files()
                    {
                        self.add_images(paths);
                    }
                    ui.close_menu();
                }
                if ui
                    .add_enabled(self.current_image.is_some(), egui::Button::new("Load Predictions..."))
                    .clicked()
                {
                    if let Some(path) = rfd::FileDialog::new().add_filter("Predictions", &["json"]).pick_file() {
                        self.load_predictions(path);
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Import Dataset...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Dataset", &["yaml", "yml", "json"])
                        .pick_file()
                    {
                        self.import_dataset(path);
                    }
                    ui.close_menu();
                }
                ui.menu_button("Export Dataset", |ui| {
                    if ui.button("Export as YAML...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("YAML", &["yaml", "yml"])
                            .set_file_name("dataset.yaml")
                            .save_file()
                        {
                            self.export_dataset(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Export as JSON...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_file_name("dataset.json")
                            .save_file()
                        {
                            self.export_dataset(path);
                        }
                        ui.close_menu();
                    }
                });
                ui.separator();
                if ui.button("Quit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Zoom In").clicked() {
                    self.editor.zoom_in();
                    ui.close_menu();
                }
                if ui.button("Zoom Out").clicked() {
                    self.editor.zoom_out();
                    ui.close_menu();
                }
                if ui.button("Reset View").clicked() {
                    self.editor.reset_view();
                    ui.close_menu();
                }
            });
        });
    }

    fn handle_toolbar(&mut self, action: toolbar::ToolbarAction) {
        match action {
            toolbar::ToolbarAction::ZoomIn => self.editor.zoom_in(),
            toolbar::ToolbarAction::ZoomOut => self.editor.zoom_out(),
            toolbar::ToolbarAction::ResetView => self.editor.reset_view(),
            toolbar::ToolbarAction::SelectClass(id) => {
                let boxes = self.current_boxes();
                let action = self.editor.set_active_class(id, &boxes);
                self.apply_editor_action(action);
            }
            toolbar::ToolbarAction::AddClass { id, name } => match self.dataset.classes.add(id, &name) {
                Ok(_) => {
                    self.class_form.clear();
                    self.editor.activate_class(id);
                }
                Err(e) => self.class_form.error = Some(e.to_string()),
            },
            toolbar::ToolbarAction::None => {}
        }
    }

    fn handle_properties(&mut self, action: properties::PropertiesAction) {
        let boxes = self.current_boxes();
        match action {
            properties::PropertiesAction::SelectBox(id) => self.editor.select(Some(id), &boxes),
            properties::PropertiesAction::DeleteBox(id) => {
                if self.editor.selection(&boxes) == Some(id) {
                    self.editor.select(None, &boxes);
                }
                self.replace_boxes(annotation::without(&boxes, id));
                log::info!("Deleted box {} from panel", id);
            }
            properties::PropertiesAction::RemoveClass(id) => {
                if let Some(class) = self.dataset.classes.remove(id) {
                    log::info!("Removed class {}: {}", class.id, class.name);
                }
            }
            properties::PropertiesAction::None => {}
        }
    }
}

impl eframe::App for BoxmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loaders(ctx);

        // Request repaint if still loading (to update spinner)
        if self.image_message.is_some() || self.prediction_message.is_some() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.menu_bar(ui));

        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                let active = self.editor.active_class(&self.dataset.classes).map(|c| c.id);
                toolbar::show(
                    ui,
                    self.editor.viewport().zoom_percent(),
                    &self.dataset.classes,
                    active,
                    &mut self.class_form,
                )
            })
            .inner;
        self.handle_toolbar(toolbar_action);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(message) = loading_text(self.image_message.as_deref(), self.prediction_message.as_deref()) {
                    ui.spinner();
                    ui.label(message);
                } else if let Some(ref status) = self.status {
                    ui.label(status);
                } else {
                    ui.label("Ready");
                }
                ui.separator();
                ui.label(format!("Mode: {:?}", self.editor.mode()));
            });
        });

        let list_action = egui::SidePanel::left("image_list")
            .default_width(220.0)
            .show(ctx, |ui| {
                image_list::show(ui, &self.dataset, &mut self.filter, &mut self.search, self.current_image)
            })
            .inner;
        match list_action {
            image_list::ImageListAction::Open(id) => self.open_image(id),
            image_list::ImageListAction::Remove(id) => self.remove_image(id),
            image_list::ImageListAction::None => {}
        }

        let boxes = self.current_boxes();
        let image_size = self.current_image.and_then(|id| self.dataset.image(id)).and_then(|img| img.size);
        let properties_action = egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| {
                let selected = self.editor.selection(&boxes);
                properties::show(ui, &self.dataset, &boxes, image_size, selected)
            })
            .inner;
        self.handle_properties(properties_action);

        // Arrow keys step through the filtered image list
        if !ctx.wants_keyboard_input() && self.editor.interaction().is_idle() {
            if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
                self.navigate(true);
            } else if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
                self.navigate(false);
            }
        }

        let boxes = self.current_boxes();
        let canvas_action = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                canvas::show(
                    ui,
                    &mut self.editor,
                    &boxes,
                    &self.dataset.classes,
                    self.image_texture.as_ref(),
                    self.image_error.as_deref(),
                )
            })
            .inner;
        self.apply_editor_action(canvas_action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_text_tracks_each_loader() {
        let both = loading_text(Some("Loading image..."), Some("Loading predictions..."));
        assert_eq!(both.as_deref(), Some("Loading image... | Loading predictions..."));
        // The image finishing first leaves the prediction spinner up.
        assert_eq!(
            loading_text(None, Some("Loading predictions...")).as_deref(),
            Some("Loading predictions...")
        );
        assert_eq!(loading_text(Some("Loading image..."), None).as_deref(), Some("Loading image..."));
        assert_eq!(loading_text(None, None), None);
    }
}
