// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! BOXMARK - bounding box annotation tool
//!
//! A cross-platform desktop application for drawing, moving and resizing
//! labeled bounding boxes over a set of images, and for merging model
//! predictions into them.

mod app;
mod config;
mod editor;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::BoxmarkApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([800.0, 600.0])
            .with_title("BOXMARK"),
        ..Default::default()
    };

    eframe::run_native(
        "BOXMARK",
        options,
        Box::new(|_cc| Ok(Box::new(BoxmarkApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
