// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Dataset serialization and deserialization.
//!
//! Datasets are written as YAML or JSON, picked by file extension. Image
//! paths are stored as given; relative paths are resolved against the
//! dataset file's directory on import.

use crate::models::project::Dataset;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// On-disk dataset format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            other => bail!("Unsupported file extension: {:?}", other),
        }
    }
}

/// Export a dataset to YAML format.
pub fn export_yaml(data: &Dataset, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export a dataset to JSON format.
pub fn export_json(data: &Dataset, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn import_yaml(path: &Path) -> Result<Dataset> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

pub fn import_json(path: &Path) -> Result<Dataset> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Export in the format matching the file extension.
pub fn export_dataset(data: &Dataset, path: &Path) -> Result<()> {
    match Format::from_path(path)? {
        Format::Yaml => export_yaml(data, path),
        Format::Json => export_json(data, path),
    }
    .with_context(|| format!("Failed to export dataset to {}", path.display()))?;

    log::info!("Exported {} images to {}", data.images.len(), path.display());
    Ok(())
}

/// Import in the format matching the file extension.
pub fn import_dataset(path: &Path) -> Result<Dataset> {
    let mut data = match Format::from_path(path)? {
        Format::Yaml => import_yaml(path),
        Format::Json => import_json(path),
    }
    .with_context(|| format!("Failed to import dataset from {}", path.display()))?;

    if let Some(base) = path.parent() {
        data.resolve_paths(base);
    }
    log::info!("Imported {} images from {}", data.images.len(), path.display());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::BoundingBox;
    use crate::models::classes::{ClassList, LabelClass};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn sample() -> Dataset {
        let mut dataset = Dataset::new(ClassList::from(vec![LabelClass::new(0, "car"), LabelClass::new(4, "dog")]));
        let ids = dataset.add_images(vec![PathBuf::from("street.jpg"), PathBuf::from("/abs/park.png")]);
        dataset.update_boxes(ids[0], Arc::new(vec![BoundingBox::new(0.1, 0.2, 0.3, 0.4, 4)]));
        dataset.set_image_size(ids[0], (640, 480));
        dataset
    }

    fn check_imported(original: &Dataset, imported: &Dataset, dir: &Path) {
        assert_eq!(imported.classes, original.classes);
        assert_eq!(imported.images.len(), 2);
        assert_eq!(imported.images[0].id, original.images[0].id);
        assert_eq!(imported.images[0].path, dir.join("street.jpg"));
        assert_eq!(imported.images[0].size, Some((640, 480)));
        assert_eq!(*imported.images[0].boxes, *original.images[0].boxes);
        assert_eq!(imported.images[1].path, PathBuf::from("/abs/park.png"));
        assert!(imported.images[1].boxes.is_empty());
    }

    #[test]
    fn test_yaml_export_import() {
        let dir = std::env::temp_dir();
        let path = dir.join("boxmark-dataset-test.yaml");
        let dataset = sample();

        export_dataset(&dataset, &path).unwrap();
        let imported = import_dataset(&path).unwrap();
        check_imported(&dataset, &imported, &dir);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_json_export_import() {
        let dir = std::env::temp_dir();
        let path = dir.join("boxmark-dataset-test.json");
        let dataset = sample();

        export_dataset(&dataset, &path).unwrap();
        let imported = import_dataset(&path).unwrap();
        check_imported(&dataset, &imported, &dir);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join("boxmark-dataset-test.xml");
        assert!(export_dataset(&sample(), &path).is_err());
        assert!(Format::from_path(Path::new("a.yml")).is_ok());
    }
}
