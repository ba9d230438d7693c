//! Per-session conversation memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::types::ModelMessage;

/// What a session remembers between requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_csv: Option<PathBuf>,
    #[serde(default)]
    pub messages: Vec<ModelMessage>,
}

/// In-memory session map shared by all requests.
///
/// The lock is held only for the duration of each operation, so two requests
/// for the same id interleave at load/save granularity; the later save wins.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionData>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored data for `id`, or a fresh session.
    pub async fn load(&self, id: &str) -> SessionData {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn save(&self, id: &str, data: SessionData) {
        self.sessions.write().await.insert(id.to_string(), data);
    }

    /// Drop the session's CSV file and reference; keep the conversation.
    pub async fn clear_csv(&self, id: &str) {
        let csv = {
            let mut sessions = self.sessions.write().await;
            sessions.get_mut(id).and_then(|data| data.input_csv.take())
        };
        if let Some(path) = csv {
            remove_file(&path).await;
        }
        info!(session_id = id, "cleared CSV");
    }

    /// Remove the session entirely, deleting its CSV file.
    pub async fn clear(&self, id: &str) {
        let removed = self.sessions.write().await.remove(id);
        if let Some(path) = removed.and_then(|data| data.input_csv) {
            remove_file(&path).await;
        }
        info!(session_id = id, "cleared session");
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

async fn remove_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "failed to delete CSV file");
    }
}
