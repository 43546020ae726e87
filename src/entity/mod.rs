mod task;

pub use task::{Task, TaskPayload};

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Categories every freshly created tenant starts with.
pub const SEED_CATEGORIES: [&str; 3] = ["General", "Trabajo", "Personal"];

const MAX_TENANT_LEN: usize = 128;

/// The persisted `{tasks, categories}` aggregate for one tenant.
///
/// Both collections are optional on disk: a document written by hand (or by
/// an older client) may lack either key, and operations distinguish "absent"
/// from "empty". Unknown top-level keys are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// The fallback returned when a document cannot be loaded. No seed categories.
    pub fn empty() -> Self {
        Self {
            tasks: Some(Vec::new()),
            categories: Some(Vec::new()),
            extra: Map::new(),
        }
    }

    /// What a brand-new tenant gets on first access.
    pub fn seeded() -> Self {
        Self {
            tasks: Some(Vec::new()),
            categories: Some(SEED_CATEGORIES.iter().map(|n| Category::new(*n)).collect()),
            extra: Map::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.as_deref().unwrap_or_default()
    }

    pub fn categories(&self) -> &[Category] {
        self.categories.as_deref().unwrap_or_default()
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories().iter().filter_map(Category::name).collect()
    }
}

/// A named bucket tasks can be filed under.
///
/// Entries written by other clients may lack a `name`; they are kept as-is
/// and never match a lookup by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            extra: Map::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A validated tenant identifier.
///
/// Tenant ids become file names, so only ASCII alphanumerics, `-`, `_` and `.`
/// are accepted, and the special names `.` and `..` are refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_TENANT_LEN
            && raw != "."
            && raw != ".."
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(StoreError::InvalidTenant(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantId {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

impl std::str::FromStr for TenantId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
