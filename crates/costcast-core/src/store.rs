//! Best-effort local storage of saved views.
//!
//! Two backends: a mutex-guarded in-memory list and a single JSON file.
//! The file backend treats a missing or corrupt file as an empty store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{self, CostcastError};
use crate::view::View;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ViewStore: Send + Sync {
    /// All saved views in save order.
    async fn list(&self) -> error::Result<Vec<View>>;

    async fn get(&self, id: &str) -> error::Result<Option<View>>;

    /// Insert or replace by id, stamping `last_modified`. Returns the stored copy.
    async fn save(&self, view: View) -> error::Result<View>;

    /// Returns whether a view was removed.
    async fn delete(&self, id: &str) -> error::Result<bool>;
}

fn upsert(views: &mut Vec<View>, mut view: View) -> View {
    view.touch();
    match views.iter_mut().find(|v| v.id == view.id) {
        Some(existing) => *existing = view.clone(),
        None => views.push(view.clone()),
    }
    view
}

// ---------------------------------------------------------------------------
// In-Memory Backend
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryViewStore {
    views: Mutex<Vec<View>>,
}

impl InMemoryViewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ViewStore for InMemoryViewStore {
    async fn list(&self) -> error::Result<Vec<View>> {
        Ok(self.views.lock().await.clone())
    }

    async fn get(&self, id: &str) -> error::Result<Option<View>> {
        Ok(self.views.lock().await.iter().find(|v| v.id == id).cloned())
    }

    async fn save(&self, view: View) -> error::Result<View> {
        Ok(upsert(&mut *self.views.lock().await, view))
    }

    async fn delete(&self, id: &str) -> error::Result<bool> {
        let mut views = self.views.lock().await;
        let before = views.len();
        views.retain(|v| v.id != id);
        Ok(views.len() != before)
    }
}

// ---------------------------------------------------------------------------
// JSON File Backend
// ---------------------------------------------------------------------------

/// All views in one JSON array file.
#[derive(Debug)]
pub struct FileViewStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileViewStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Vec<View> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read view store");
                return Vec::new();
            }
        };
        if content.trim().is_empty() {
            return Vec::new();
        }
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "View store is corrupt, ignoring it");
            Vec::new()
        })
    }

    async fn persist(&self, views: &[View]) -> error::Result<()> {
        let json = serde_json::to_string_pretty(views)
            .map_err(|e| CostcastError::internal(format!("Failed to serialize views: {e}")))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(&self.path, e))?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| storage_error(&self.path, e))
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> CostcastError {
    CostcastError::Storage {
        message: format!("{}: {e}", path.display()),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl ViewStore for FileViewStore {
    async fn list(&self) -> error::Result<Vec<View>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await)
    }

    async fn get(&self, id: &str) -> error::Result<Option<View>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await.into_iter().find(|v| v.id == id))
    }

    async fn save(&self, view: View) -> error::Result<View> {
        let _guard = self.lock.lock().await;
        let mut views = self.load().await;
        let saved = upsert(&mut views, view);
        self.persist(&views).await?;
        info!(id = %saved.id, name = %saved.name, "Saved view");
        Ok(saved)
    }

    async fn delete(&self, id: &str) -> error::Result<bool> {
        let _guard = self.lock.lock().await;
        let mut views = self.load().await;
        let before = views.len();
        views.retain(|v| v.id != id);
        if views.len() == before {
            return Ok(false);
        }
        self.persist(&views).await?;
        info!(id, "Deleted view");
        Ok(true)
    }
}
