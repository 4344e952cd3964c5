//! Saved projects behind an injected key-value store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BreakevenError;
use crate::worksheet::Worksheet;
use crate::BreakevenResult;

const KEY_PREFIX: &str = "project:";

/// Minimal string store. Hosts provide browser storage, files, a database...
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> BreakevenResult<Option<String>>;
    fn put(&self, key: &str, value: String) -> BreakevenResult<()>;
    /// Returns whether the key existed.
    fn delete(&self, key: &str) -> BreakevenResult<bool>;
    fn keys(&self) -> BreakevenResult<Vec<String>>;
}

/// In-process store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> BreakevenError {
    BreakevenError::Storage("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BreakevenResult<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> BreakevenResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> BreakevenResult<bool> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        Ok(entries.remove(key).is_some())
    }

    fn keys(&self) -> BreakevenResult<Vec<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

/// A named worksheet snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub worksheet: Worksheet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct ProjectRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProjectRepository<S> {
    pub fn new(store: S) -> Self {
        ProjectRepository { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Insert or overwrite. An existing project keeps its `created_at`.
    pub fn save(&self, name: &str, worksheet: &Worksheet) -> BreakevenResult<Project> {
        let name = validate_name(name)?;
        let key = project_key(name);
        let now = Utc::now();

        let created_at = match self.store.get(&key)? {
            Some(raw) => serde_json::from_str::<Project>(&raw)
                .map(|existing| existing.created_at)
                .unwrap_or(now),
            None => now,
        };

        let project = Project {
            name: name.to_string(),
            worksheet: worksheet.clone(),
            created_at,
            updated_at: now,
        };
        self.store.put(&key, serde_json::to_string(&project)?)?;
        info!(project = name, "saved project");
        Ok(project)
    }

    pub fn load(&self, name: &str) -> BreakevenResult<Project> {
        let name = validate_name(name)?;
        let raw = self
            .store
            .get(&project_key(name))?
            .ok_or_else(|| BreakevenError::NotFound(format!("project '{}'", name)))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Project names in ascending order.
    pub fn list(&self) -> BreakevenResult<Vec<String>> {
        let mut names: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(KEY_PREFIX).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> BreakevenResult<()> {
        let name = validate_name(name)?;
        if self.store.delete(&project_key(name))? {
            info!(project = name, "deleted project");
            Ok(())
        } else {
            Err(BreakevenError::NotFound(format!("project '{}'", name)))
        }
    }
}

fn project_key(name: &str) -> String {
    format!("{}{}", KEY_PREFIX, name)
}

fn validate_name(name: &str) -> BreakevenResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BreakevenError::InvalidInput {
            field: "name".to_string(),
            reason: "Project name cannot be empty".to_string(),
        });
    }
    Ok(trimmed)
}
