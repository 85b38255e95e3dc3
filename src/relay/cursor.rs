//! On-disk relay cursors, one per workspace.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::Cursor;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    sent_at: Option<i64>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Stored {
    #[serde(default)]
    workspaces: BTreeMap<String, Entry>,
}

/// JSON file mapping workspace names to their cursor.
#[derive(Debug, Clone)]
pub struct CursorStore {
    path: PathBuf,
    stored: Stored,
}

impl CursorStore {
    /// Open the store at `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let stored = if path.exists() {
            let raw = fs_err::read(&path).map_err(|e| Error::io(e, path.clone()))?;
            serde_json::from_slice(&raw).map_err(|e| Error::parse(e.to_string(), path.clone()))?
        } else {
            Stored::default()
        };
        Ok(Self { path, stored })
    }

    /// Cursor for a workspace.
    pub fn get(&self, workspace: &str) -> Cursor {
        Cursor(self.stored.workspaces.get(workspace).and_then(|e| e.sent_at))
    }

    /// Record a cursor and write the file.
    pub fn set(&mut self, workspace: &str, cursor: Cursor) -> Result<()> {
        self.stored.workspaces.insert(
            workspace.to_string(),
            Entry { sent_at: cursor.0, updated_at: Utc::now() },
        );
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs_err::create_dir_all(dir).map_err(|e| Error::io(e, dir.to_path_buf()))?;
        }
        let json = serde_json::to_string_pretty(&self.stored)?;
        fs_err::write(&self.path, json).map_err(|e| Error::io(e, self.path.clone()))
    }
}
