// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Dataset state management.
//!
//! The dataset is the single owner of every image's box collection and of
//! the class list. The canvas never edits it directly; it hands back whole
//! replacement collections which are applied here.

use super::annotation::BoxCollection;
use super::classes::{ClassId, ClassList};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Stable identifier of an image in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

/// One image and its annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetImage {
    pub id: ImageId,
    pub path: PathBuf,
    /// Natural size in pixels, known once the image has been decoded.
    #[serde(default)]
    pub size: Option<(u32, u32)>,
    #[serde(default)]
    pub boxes: BoxCollection,
}

impl DatasetImage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            id: ImageId::new(),
            path,
            size: None,
            boxes: Arc::new(Vec::new()),
        }
    }

    /// File name shown in the image list.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn is_labeled(&self) -> bool {
        !self.boxes.is_empty()
    }
}

/// Which images the image list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFilter {
    #[default]
    All,
    Labeled,
    Unlabeled,
}

/// Complete dataset for serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub classes: ClassList,
    pub images: Vec<DatasetImage>,
}

impl Dataset {
    /// Create an empty dataset with the given classes.
    pub fn new(classes: ClassList) -> Self {
        Self {
            classes,
            images: Vec::new(),
        }
    }

    pub fn image(&self, id: ImageId) -> Option<&DatasetImage> {
        self.images.iter().find(|img| img.id == id)
    }

    /// Add images by path, returning their new ids.
    pub fn add_images<I>(&mut self, paths: I) -> Vec<ImageId>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let added: Vec<DatasetImage> = paths.into_iter().map(DatasetImage::new).collect();
        let ids = added.iter().map(|img| img.id).collect();
        self.images.extend(added);
        log::info!("Dataset now has {} images", self.images.len());
        ids
    }

    /// Replace the box collection of an image.
    ///
    /// Returns `false` if the image no longer exists.
    pub fn update_boxes(&mut self, id: ImageId, boxes: BoxCollection) -> bool {
        match self.images.iter_mut().find(|img| img.id == id) {
            Some(image) => {
                image.boxes = boxes;
                true
            }
            None => {
                log::warn!("Dropped box update for missing image {:?}", id);
                false
            }
        }
    }

    /// Record the decoded size of an image.
    pub fn set_image_size(&mut self, id: ImageId, size: (u32, u32)) {
        if let Some(image) = self.images.iter_mut().find(|img| img.id == id) {
            image.size = Some(size);
        }
    }

    /// Remove an image together with its boxes.
    pub fn remove_image(&mut self, id: ImageId) -> Option<DatasetImage> {
        let pos = self.images.iter().position(|img| img.id == id)?;
        Some(self.images.remove(pos))
    }

    /// Images matching a filter and a case-insensitive file name search,
    /// sorted by file name.
    pub fn visible_images(&self, filter: ImageFilter, search: &str) -> Vec<&DatasetImage> {
        let needle = search.to_lowercase();
        let mut visible: Vec<&DatasetImage> = self
            .images
            .iter()
            .filter(|img| img.file_name().to_lowercase().contains(&needle))
            .filter(|img| match filter {
                ImageFilter::All => true,
                ImageFilter::Labeled => img.is_labeled(),
                ImageFilter::Unlabeled => !img.is_labeled(),
            })
            .collect();
        visible.sort_by_key(|img| img.file_name().to_lowercase());
        visible
    }

    /// Number of boxes per class id across all images.
    pub fn box_count(&self, class_id: ClassId) -> usize {
        self.images
            .iter()
            .flat_map(|img| img.boxes.iter())
            .filter(|b| b.class_id == class_id)
            .count()
    }

    /// Rewrite relative image paths against the directory of a dataset file.
    pub fn resolve_paths(&mut self, base: &Path) {
        for image in &mut self.images {
            if image.path.is_relative() {
                image.path = base.join(&image.path);
            }
        }
    }
}

/// Step through a sorted image list, as the arrow keys do.
///
/// With no current image (or one filtered out) the first image is chosen.
pub fn neighbor(visible: &[&DatasetImage], current: Option<ImageId>, forward: bool) -> Option<ImageId> {
    let index = current.and_then(|id| visible.iter().position(|img| img.id == id));
    match index {
        None => visible.first().map(|img| img.id),
        Some(i) if forward => visible.get(i + 1).map(|img| img.id),
        Some(i) => i.checked_sub(1).and_then(|j| visible.get(j)).map(|img| img.id),
    }
}
