use crate::models::Song;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in the append-only chat transcript. Messages are never edited
/// after creation; the whole history is dropped only on logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
    /// Songs attached to an assistant reply in the recommendation branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub songs: Option<Vec<Song>>,
}

impl ChatMessage {
    pub fn from_user(content: impl Into<String>) -> Self {
        ChatMessage {
            content: content.into(),
            is_user: true,
            timestamp: Utc::now(),
            songs: None,
        }
    }

    pub fn from_assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            content: content.into(),
            is_user: false,
            timestamp: Utc::now(),
            songs: None,
        }
    }

    pub fn with_songs(mut self, songs: Vec<Song>) -> Self {
        self.songs = Some(songs);
        self
    }
}
