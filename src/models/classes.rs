// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label classes and their display colors.
//!
//! Boxes only store a class id. Names and colors are resolved through the
//! class list whenever they are displayed, so renaming or reordering classes
//! never leaves stale data on the boxes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Caller-assigned class identifier (unique, not necessarily contiguous).
pub type ClassId = u32;

/// Display palette, cycled by a class's position in the sorted class list.
pub const PALETTE: [egui::Color32; 10] = [
    egui::Color32::from_rgb(0xef, 0x44, 0x44), // red
    egui::Color32::from_rgb(0x3b, 0x82, 0xf6), // blue
    egui::Color32::from_rgb(0x22, 0xc5, 0x5e), // green
    egui::Color32::from_rgb(0xea, 0xb3, 0x08), // yellow
    egui::Color32::from_rgb(0xa8, 0x55, 0xf7), // purple
    egui::Color32::from_rgb(0xec, 0x48, 0x99), // pink
    egui::Color32::from_rgb(0xf9, 0x73, 0x16), // orange
    egui::Color32::from_rgb(0x06, 0xb6, 0xd4), // cyan
    egui::Color32::from_rgb(0x14, 0xb8, 0xa6), // teal
    egui::Color32::from_rgb(0x8b, 0x5c, 0xf6), // violet
];

/// Color used for boxes whose class no longer exists.
pub const UNKNOWN_COLOR: egui::Color32 = egui::Color32::from_rgb(0x99, 0x99, 0x99);

/// A named label class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelClass {
    pub id: ClassId,
    pub name: String,
}

impl LabelClass {
    pub fn new(id: ClassId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Reasons a class cannot be added.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassError {
    #[error("class id {0} already exists")]
    DuplicateId(ClassId),
    #[error("class name '{0}' already exists")]
    DuplicateName(String),
    #[error("class name must not be empty")]
    EmptyName,
    #[error("every class id is already taken")]
    IdsExhausted,
}

/// How a box's class resolves against the current class list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClassRef<'a> {
    Known {
        class: &'a LabelClass,
        color: egui::Color32,
    },
    Unknown,
}

impl ClassRef<'_> {
    pub fn color(&self) -> egui::Color32 {
        match self {
            ClassRef::Known { color, .. } => *color,
            ClassRef::Unknown => UNKNOWN_COLOR,
        }
    }

    /// Caption shown next to a box, e.g. `2: dog`.
    pub fn caption(&self) -> String {
        match self {
            ClassRef::Known { class, .. } => format!("{}: {}", class.id, class.name),
            ClassRef::Unknown => "?: unknown".to_string(),
        }
    }
}

/// Class list kept sorted by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LabelClass>", into = "Vec<LabelClass>")]
pub struct ClassList {
    classes: Vec<LabelClass>,
}

impl From<Vec<LabelClass>> for ClassList {
    fn from(mut classes: Vec<LabelClass>) -> Self {
        classes.sort_by_key(|c| c.id);
        classes.dedup_by_key(|c| c.id);
        Self { classes }
    }
}

impl From<ClassList> for Vec<LabelClass> {
    fn from(list: ClassList) -> Self {
        list.classes
    }
}

impl ClassList {
    pub fn iter(&self) -> impl Iterator<Item = &LabelClass> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn first(&self) -> Option<&LabelClass> {
        self.classes.first()
    }

    pub fn get(&self, id: ClassId) -> Option<&LabelClass> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&LabelClass> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Smallest id strictly greater than every existing id (0 when empty).
    ///
    /// `None` once a class already uses `ClassId::MAX`.
    pub fn next_id(&self) -> Option<ClassId> {
        match self.classes.last() {
            Some(last) => last.id.checked_add(1),
            None => Some(0),
        }
    }

    /// Add a class, rejecting id or name collisions.
    pub fn add(&mut self, id: ClassId, name: &str) -> Result<&LabelClass, ClassError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClassError::EmptyName);
        }
        if self.get(id).is_some() {
            return Err(ClassError::DuplicateId(id));
        }
        if self.by_name(name).is_some() {
            return Err(ClassError::DuplicateName(name.to_string()));
        }

        let pos = self.classes.partition_point(|c| c.id < id);
        self.classes.insert(pos, LabelClass::new(id, name));
        log::info!("Added class {}: {}", id, name);
        Ok(&self.classes[pos])
    }

    /// Return the class named `name`, creating it with the next free id if needed.
    pub fn ensure(&mut self, name: &str) -> Result<ClassId, ClassError> {
        let name = name.trim();
        if let Some(existing) = self.by_name(name) {
            return Ok(existing.id);
        }

        let id = self.next_id().ok_or(ClassError::IdsExhausted)?;
        self.add(id, name).map(|class| class.id)
    }

    /// Remove a class. Boxes referring to it will resolve as unknown.
    pub fn remove(&mut self, id: ClassId) -> Option<LabelClass> {
        let pos = self.classes.iter().position(|c| c.id == id)?;
        Some(self.classes.remove(pos))
    }

    /// Resolve a class id to its entry and display color.
    pub fn resolve(&self, id: ClassId) -> ClassRef<'_> {
        match self.classes.iter().position(|c| c.id == id) {
            Some(index) => ClassRef::Known {
                class: &self.classes[index],
                color: PALETTE[index % PALETTE.len()],
            },
            None => ClassRef::Unknown,
        }
    }
}

/// Display color of a class, derived from its position in the sorted list.
pub fn color_for(id: ClassId, classes: &ClassList) -> egui::Color32 {
    classes.resolve(id).color()
}
