// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! File I/O: images, datasets and prediction batches.

pub mod media;
pub mod predictions;
pub mod serialization;
