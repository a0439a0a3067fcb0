// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: boxes, classes, predictions and the dataset that owns them.

pub mod annotation;
pub mod classes;
pub mod prediction;
pub mod project;
