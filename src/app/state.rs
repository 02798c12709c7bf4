use crate::emotion::EmotionResult;
use crate::game::GameResults;
use crate::models::{ChatMessage, Notification, Recommendation, Song, Tab, UserSession};
use serde::Serialize;

/// The whole client-side application state. One instance exists per
/// controller; the rendering layer only ever sees cloned snapshots, never
/// a mutable reference.
#[derive(Debug, Clone, Serialize)]
pub struct AppState {
    pub current_tab: Tab,
    pub session: UserSession,
    pub songs: Vec<Song>,
    pub recommendations: Vec<Recommendation>,
    pub chat_history: Vec<ChatMessage>,
    pub notifications: Vec<Notification>,
    pub user_emotion: Option<EmotionResult>,
    pub game_results: Option<GameResults>,
    pub language: String,

    pub login_error: Option<String>,
    pub register_error: Option<String>,

    pub is_loading: bool,
    pub is_loading_recommendations: bool,
    pub is_chat_loading: bool,

    /// Bumped on logout and tab changes. Async transitions capture the
    /// value at entry and discard their result if it moved, so a stale
    /// response can never be applied after navigation.
    pub epoch: u64,
}

impl AppState {
    pub fn new(initial_tab: Tab) -> Self {
        AppState {
            current_tab: initial_tab,
            session: UserSession::default(),
            songs: Vec::new(),
            recommendations: Vec::new(),
            chat_history: Vec::new(),
            notifications: Vec::new(),
            user_emotion: None,
            game_results: None,
            language: "zh".to_string(),
            login_error: None,
            register_error: None,
            is_loading: false,
            is_loading_recommendations: false,
            is_chat_loading: false,
            epoch: 0,
        }
    }

    pub fn rated_count(&self) -> usize {
        self.songs.iter().filter(|s| s.is_rated()).count()
    }

    /// Recommendations become computable once at least 5 distinct songs
    /// carry a rating.
    pub fn has_rated_enough_songs(&self) -> bool {
        self.rated_count() >= 5
    }
}
