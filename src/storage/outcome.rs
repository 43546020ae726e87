//! Result values returned by store mutations.
//!
//! None of these are errors: "already there" and "nothing to remove" are
//! normal outcomes the caller reports back as a status message.

use serde::Serialize;

use crate::entity::{Category, TenantId};

pub const TASKS_SAVED: &str = "Datos guardados en JSON";
pub const TASK_DELETED: &str = "Tarea eliminada exitosamente.";
pub const NO_TASKS: &str = "No se encontraron tareas.";
pub const CATEGORY_ADDED: &str = "Categoría añadida exitosamente.";
pub const CATEGORY_EXISTS: &str = "La categoría ya existe.";
pub const CATEGORY_DELETED: &str = "Categoría eliminada exitosamente.";
pub const NO_CATEGORIES: &str = "No se encontraron categorías.";
pub const CATEGORY_REQUIRED: &str = "La categoría es requerida.";

/// Outcome of `JsonStore::add_category`.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryAdded {
    /// Stored under its display form
    Added(Category),
    /// A category with the same normalized name was already present
    AlreadyExists(Category),
}

impl CategoryAdded {
    pub fn message(&self) -> &'static str {
        match self {
            CategoryAdded::Added(_) => CATEGORY_ADDED,
            CategoryAdded::AlreadyExists(_) => CATEGORY_EXISTS,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, CategoryAdded::Added(_))
    }
}

/// Outcome of deleting tasks or categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The collection existed; `count` entries matched (possibly zero)
    Removed { count: usize },
    /// The document had no such collection at all
    NothingStored,
}

impl Removal {
    pub fn task_message(&self) -> &'static str {
        match self {
            Removal::Removed { .. } => TASK_DELETED,
            Removal::NothingStored => NO_TASKS,
        }
    }

    pub fn category_message(&self) -> &'static str {
        match self {
            Removal::Removed { .. } => CATEGORY_DELETED,
            Removal::NothingStored => NO_CATEGORIES,
        }
    }
}

/// Summary of folding one tenant into another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeReport {
    pub source: TenantId,
    pub destination: TenantId,
    /// Tasks in the destination after the merge
    pub task_count: usize,
    /// Destination tasks whose id was taken over by a source task
    pub tasks_replaced: usize,
    pub categories_added: usize,
    /// False when the source had no backing file left to delete
    pub source_deleted: bool,
}

impl MergeReport {
    pub fn message(&self) -> String {
        format!(
            "Archivo {} unido a {} y eliminado.",
            self.source, self.destination
        )
    }
}
