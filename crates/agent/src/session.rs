use std::collections::HashMap;

use statusbot_core::QueryDialog;
use tokio::sync::Mutex;

/// In-progress dialogs keyed by the transport's conversation id. Each
/// conversation owns its dialog exclusively; the take/put protocol keeps the
/// lock from being held across collaborator awaits.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, QueryDialog>>,
}

impl SessionStore {
    /// Remove and return the conversation's suspended dialog, if any. The
    /// caller puts it back after feeding it the reply (unless it finished).
    pub async fn take(&self, conversation_id: &str) -> Option<QueryDialog> {
        self.sessions.lock().await.remove(conversation_id)
    }

    pub async fn put(&self, conversation_id: &str, dialog: QueryDialog) {
        self.sessions.lock().await.insert(conversation_id.to_string(), dialog);
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
