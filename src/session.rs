use crate::error::{AppError, Result};
use crate::models::UserSession;
use std::collections::HashMap;
use std::sync::Mutex;

const SESSION_KEY: &str = "user";
const LANGUAGE_KEY: &str = "preferredLanguage";

/// Client-side key-value persistence, e.g. the browser's local storage.
/// The core only ever stores a session blob and the language preference
/// through this seam.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);

    fn save_session(&self, session: &UserSession) -> Result<()> {
        let blob = serde_json::to_string(session)
            .map_err(|e| AppError::Session(format!("Failed to encode session: {}", e)))?;
        self.set(SESSION_KEY, &blob);
        Ok(())
    }

    /// A corrupt blob is treated as no session and removed.
    fn load_session(&self) -> Option<UserSession> {
        let blob = self.get(SESSION_KEY)?;
        match serde_json::from_str(&blob) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Discarding unreadable session blob: {}", e);
                self.remove(SESSION_KEY);
                None
            }
        }
    }

    fn clear_session(&self) {
        self.remove(SESSION_KEY);
    }

    fn save_language(&self, lang: &str) {
        self.set(LANGUAGE_KEY, lang);
    }

    fn load_language(&self) -> Option<String> {
        self.get(LANGUAGE_KEY)
    }
}

/// In-memory store used by tests and the demo binary.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}
