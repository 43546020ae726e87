use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

use super::outcome::{CategoryAdded, MergeReport, Removal};
use crate::config::StoreConfig;
use crate::entity::{Category, Document, Task, TaskPayload, TenantId};
use crate::error::{Result, StoreError};
use crate::normalize::{comparison_key, display_name};

const DOCUMENT_EXT: &str = "json";
const INDENT: &[u8] = b"    ";

/// Why a tenant document could not be loaded.
#[derive(Error, Debug)]
enum LoadError {
    #[error("document file does not exist")]
    Missing,

    #[error("could not read document: {0}")]
    Io(io::Error),

    #[error("document is not valid JSON: {0}")]
    Syntax(serde_json::Error),

    #[error("document does not have the expected shape: {0}")]
    Shape(serde_json::Error),
}

/// Identity of a task during a merge. Tasks without an id never collide.
#[derive(Debug, PartialEq, Eq, Hash)]
enum MergeKey {
    Id(String),
    Anonymous(usize),
}

/// Directory of per-tenant JSON documents.
///
/// Every operation goes straight to disk: read the whole document, change it
/// in memory, write the whole document back. Mutations on one tenant are
/// serialized through a per-tenant lock held for the full cycle.
///
/// A file that is valid JSON but does not fit [`Document`] reads as the empty
/// default, while mutations refuse to write over it.
pub struct JsonStore {
    base: PathBuf,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl JsonStore {
    /// Open the store rooted at `config.data_dir`, creating the directory if needed.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;
        tracing::debug!(data_dir = %config.data_dir.display(), "opened document store");

        Ok(Self {
            base: config.data_dir.clone(),
            locks: DashMap::new(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Path of the backing file for a tenant
    pub fn document_path(&self, tenant: &TenantId) -> PathBuf {
        self.base.join(format!("{}.{}", tenant, DOCUMENT_EXT))
    }

    /// Make sure a backing file exists, seeding it if absent.
    ///
    /// Returns `true` when a new document was written. An existing file is
    /// never touched, whatever its content.
    pub fn ensure(&self, tenant: &TenantId) -> Result<bool> {
        self.with_lock(tenant, || self.ensure_unlocked(tenant))
    }

    /// Load a tenant's document.
    ///
    /// Never fails: a missing or unreadable document yields `Document::empty()`
    /// (which, unlike a seeded document, has no categories).
    pub fn read(&self, tenant: &TenantId) -> Document {
        self.with_lock(tenant, || self.read_unlocked(tenant))
    }

    /// Append one or more tasks at the end of the tenant's task list.
    ///
    /// No deduplication happens here; repeated ids accumulate.
    pub fn append_tasks(&self, tenant: &TenantId, payload: impl Into<TaskPayload>) -> Result<usize> {
        let tasks = payload.into().into_tasks();
        let added = tasks.len();

        self.with_lock(tenant, || {
            let mut doc = self.load_for_update(tenant)?;
            doc.tasks.get_or_insert_with(Vec::new).extend(tasks);
            self.write(tenant, &doc)?;

            tracing::debug!(%tenant, added, total = doc.tasks().len(), "appended tasks");
            Ok(added)
        })
    }

    /// Remove every task whose `id` equals `task_id` exactly.
    ///
    /// A miss is not an error. `Removal::NothingStored` means the document has
    /// no `tasks` key at all.
    pub fn delete_task(&self, tenant: &TenantId, task_id: &Value) -> Result<Removal> {
        self.with_lock(tenant, || {
            let mut doc = self.load_for_update(tenant)?;
            let Some(tasks) = doc.tasks.as_mut() else {
                return Ok(Removal::NothingStored);
            };

            let before = tasks.len();
            tasks.retain(|task| task.id() != Some(task_id));
            let count = before - tasks.len();

            self.write(tenant, &doc)?;
            tracing::debug!(%tenant, %task_id, count, "deleted tasks");
            Ok(Removal::Removed { count })
        })
    }

    pub fn list_categories(&self, tenant: &TenantId) -> Vec<Category> {
        self.read(tenant).categories.unwrap_or_default()
    }

    /// Add a category unless one with the same normalized name exists.
    ///
    /// Comparison ignores case, accents and surrounding whitespace; the stored
    /// name is the trimmed, capitalized input.
    pub fn add_category(&self, tenant: &TenantId, name: &str) -> Result<CategoryAdded> {
        let shown = display_name(name);
        if shown.is_empty() {
            return Err(StoreError::MissingField("name"));
        }
        let key = comparison_key(name);

        self.with_lock(tenant, || {
            let mut doc = self.load_for_update(tenant)?;
            let categories = doc.categories.get_or_insert_with(Vec::new);

            let existing = categories
                .iter()
                .find(|c| c.name().is_some_and(|n| comparison_key(n) == key));
            if let Some(existing) = existing {
                return Ok(CategoryAdded::AlreadyExists(existing.clone()));
            }

            let category = Category::new(shown.as_str());
            categories.push(category.clone());
            self.write(tenant, &doc)?;

            tracing::debug!(%tenant, category = %shown, "added category");
            Ok(CategoryAdded::Added(category))
        })
    }

    /// Remove categories whose stored name equals `name` literally.
    pub fn delete_category(&self, tenant: &TenantId, name: &str) -> Result<Removal> {
        self.with_lock(tenant, || {
            let mut doc = self.load_for_update(tenant)?;
            let Some(categories) = doc.categories.as_mut() else {
                return Ok(Removal::NothingStored);
            };

            let before = categories.len();
            categories.retain(|c| c.name() != Some(name));
            let count = before - categories.len();

            self.write(tenant, &doc)?;
            tracing::debug!(%tenant, category = name, count, "deleted categories");
            Ok(Removal::Removed { count })
        })
    }

    /// Tasks whose `category` field equals `name` literally.
    pub fn tasks_by_category(&self, tenant: &TenantId, name: &str) -> Vec<Task> {
        self.read(tenant)
            .tasks
            .unwrap_or_default()
            .into_iter()
            .filter(|task| task.category() == Some(name))
            .collect()
    }

    /// Fold `source` into `destination`, then delete the source's file.
    ///
    /// On task id collisions the source task replaces the destination one in
    /// place. Source categories are appended unless a category with the same
    /// literal name is already present.
    pub fn merge_and_delete(&self, source: &TenantId, destination: &TenantId) -> Result<MergeReport> {
        if source == destination {
            return Err(StoreError::SameTenant(source.to_string()));
        }

        // Fixed lock order so two opposite merges cannot deadlock.
        let (first, second) = if source < destination {
            (source, destination)
        } else {
            (destination, source)
        };
        self.with_lock(first, || {
            self.with_lock(second, || self.merge_unlocked(source, destination))
        })
    }

    /// Number of tenants with a lock entry, held or idle.
    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.len()
    }

    fn merge_unlocked(&self, source: &TenantId, destination: &TenantId) -> Result<MergeReport> {
        self.ensure_unlocked(source)?;
        self.ensure_unlocked(destination)?;

        let src = self.load_for_update(source)?;
        let mut dest = self.load_for_update(destination)?;

        let (tasks, tasks_replaced) = merge_tasks(
            dest.tasks.take().unwrap_or_default(),
            src.tasks.unwrap_or_default(),
        );

        let mut categories = dest.categories.take().unwrap_or_default();
        let mut categories_added = 0;
        for category in src.categories.unwrap_or_default() {
            if category.name.is_none() || !categories.iter().any(|c| c.name == category.name) {
                categories.push(category);
                categories_added += 1;
            }
        }

        let task_count = tasks.len();
        dest.tasks = Some(tasks);
        dest.categories = Some(categories);
        self.write(destination, &dest)?;

        let source_deleted = match fs::remove_file(self.document_path(source)) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            %source,
            %destination,
            task_count,
            tasks_replaced,
            categories_added,
            source_deleted,
            "merged tenant documents"
        );

        Ok(MergeReport {
            source: source.clone(),
            destination: destination.clone(),
            task_count,
            tasks_replaced,
            categories_added,
            source_deleted,
        })
    }

    fn ensure_unlocked(&self, tenant: &TenantId) -> Result<bool> {
        if self.document_path(tenant).exists() {
            return Ok(false);
        }

        self.write(tenant, &Document::seeded())?;
        tracing::info!(%tenant, "created seeded document");
        Ok(true)
    }

    fn read_unlocked(&self, tenant: &TenantId) -> Document {
        if let Err(e) = self.ensure_unlocked(tenant) {
            tracing::warn!(%tenant, error = %e, "could not create document");
        }

        self.load(tenant).unwrap_or_else(|e| fallback(tenant, e))
    }

    /// Load a document that is about to be rewritten.
    ///
    /// Missing and syntactically broken files start over from the empty
    /// default. Read failures and valid JSON of the wrong shape are errors,
    /// so the caller never replaces content it could not understand.
    fn load_for_update(&self, tenant: &TenantId) -> Result<Document> {
        self.ensure_unlocked(tenant)?;

        match self.load(tenant) {
            Ok(doc) => Ok(doc),
            Err(LoadError::Io(e)) => Err(e.into()),
            Err(LoadError::Shape(e)) => Err(StoreError::IncompatibleDocument {
                tenant: tenant.to_string(),
                reason: e.to_string(),
            }),
            Err(e) => Ok(fallback(tenant, e)),
        }
    }

    fn load(&self, tenant: &TenantId) -> std::result::Result<Document, LoadError> {
        let path = self.document_path(tenant);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(LoadError::Missing),
            Err(e) => return Err(LoadError::Io(e)),
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            if e.is_data() {
                LoadError::Shape(e)
            } else {
                LoadError::Syntax(e)
            }
        })
    }

    /// Replace the tenant's file atomically (temp file in the same directory, then rename).
    fn write(&self, tenant: &TenantId, doc: &Document) -> Result<()> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        doc.serialize(&mut ser)?;

        fs::create_dir_all(&self.base)?;
        let mut file = NamedTempFile::new_in(&self.base)?;
        file.write_all(&buf)?;
        file.as_file().sync_all()?;

        let path = self.document_path(tenant);
        file.persist(&path).map_err(|e| e.error)?;

        tracing::trace!(%tenant, path = %path.display(), bytes = buf.len(), "wrote document");
        Ok(())
    }

    /// Run `f` holding the tenant's lock.
    ///
    /// The entry is dropped from the table once nobody else holds or waits on
    /// it, so the table only tracks tenants that are in use.
    fn with_lock<T>(&self, tenant: &TenantId, f: impl FnOnce() -> T) -> T {
        let lock = Arc::clone(&self.locks.entry(tenant.to_string()).or_default());
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        drop(lock);

        self.locks
            .remove_if(tenant.as_str(), |_, lock| Arc::strong_count(lock) == 1);
        result
    }
}

/// The single place where load failures collapse into the empty default.
fn fallback(tenant: &TenantId, err: LoadError) -> Document {
    match err {
        LoadError::Missing => {
            tracing::debug!(%tenant, "no document on disk, using empty default");
        }
        e => {
            tracing::warn!(%tenant, error = %e, "unreadable document, using empty default");
        }
    }
    Document::empty()
}

/// Overlay `source` tasks on `destination` tasks keyed by id.
///
/// Returns the merged list and how many existing entries were replaced.
fn merge_tasks(destination: Vec<Task>, source: Vec<Task>) -> (Vec<Task>, usize) {
    let mut merged: IndexMap<MergeKey, Task> = IndexMap::new();
    let mut anonymous = 0;
    let mut replaced = 0;

    for task in destination.into_iter().chain(source) {
        let key = match task.id_key() {
            Some(id) => MergeKey::Id(id),
            None => {
                anonymous += 1;
                MergeKey::Anonymous(anonymous)
            }
        };
        if merged.insert(key, task).is_some() {
            replaced += 1;
        }
    }

    (merged.into_values().collect(), replaced)
}
