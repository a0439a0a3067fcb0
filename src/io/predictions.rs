// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Prediction files.

use crate::models::prediction::{parse_predictions, Prediction};
use anyhow::{Context, Result};
use std::path::Path;

/// Read and validate a JSON prediction batch.
pub fn read_predictions(path: &Path) -> Result<Vec<Prediction>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read predictions {}", path.display()))?;
    let predictions = parse_predictions(&json)
        .with_context(|| format!("Invalid predictions in {}", path.display()))?;
    log::info!("Read {} predictions from {}", predictions.len(), path.display());
    Ok(predictions)
}
