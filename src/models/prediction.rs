// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Detections produced by an external model.
//!
//! Predictions arrive as a JSON array of `{label, xmin, ymin, xmax, ymax,
//! score?}` objects in normalized coordinates. The payload is validated as a
//! whole before anything is merged, so a malformed batch never touches the
//! dataset.

use super::annotation::{BoundingBox, BoxCollection};
use super::classes::{ClassError, ClassList};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// One detection in normalized `[0, 1]` coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Prediction {
    /// Convert into a box of the given class.
    ///
    /// Corner ordering is trusted as delivered by the source.
    pub fn to_box(&self, class_id: u32) -> BoundingBox {
        BoundingBox::new(
            self.xmin,
            self.ymin,
            self.xmax - self.xmin,
            self.ymax - self.ymin,
            class_id,
        )
    }
}

/// Why a prediction payload was rejected.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("predictions must be a JSON array of objects")]
    NotAnArray,
    #[error("prediction {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },
    #[error("prediction {index} is malformed: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Class(#[from] ClassError),
}

const REQUIRED_FIELDS: [&str; 5] = ["label", "xmin", "ymin", "xmax", "ymax"];

/// Parse and validate a prediction payload.
pub fn parse_predictions(json: &str) -> Result<Vec<Prediction>, PredictionError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(items) = value else {
        return Err(PredictionError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let Some(object) = item.as_object() else {
                return Err(PredictionError::NotAnArray);
            };
            if let Some(field) = REQUIRED_FIELDS.iter().find(|f| !object.contains_key(**f)) {
                return Err(PredictionError::MissingField { index, field: *field });
            }
            serde_json::from_value(item).map_err(|source| PredictionError::Malformed { index, source })
        })
        .collect()
}

/// Outcome of merging a prediction batch.
#[derive(Debug, Clone)]
pub struct MergedPredictions {
    pub classes: ClassList,
    pub boxes: BoxCollection,
    pub created_classes: usize,
}

/// Merge predictions into an image's boxes.
///
/// Unseen labels (trimmed, case-sensitive) become new classes with ids
/// counting up from `max(existing) + 1`. New boxes are appended after the
/// existing ones. The inputs are left untouched.
pub fn apply_predictions(
    predictions: &[Prediction],
    classes: &ClassList,
    boxes: &BoxCollection,
) -> Result<MergedPredictions, PredictionError> {
    let mut classes = classes.clone();
    let before = classes.len();

    let mut merged = Vec::with_capacity(boxes.len() + predictions.len());
    merged.extend(boxes.iter().cloned());
    for prediction in predictions {
        let class_id = classes.ensure(&prediction.label)?;
        merged.push(prediction.to_box(class_id));
    }

    let created_classes = classes.len() - before;
    if created_classes > 0 {
        log::info!("Created {} classes from predictions", created_classes);
    }

    Ok(MergedPredictions {
        classes,
        boxes: Arc::new(merged),
        created_classes,
    })
}
