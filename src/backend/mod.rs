pub mod http;

pub use http::HttpBackend;

use crate::error::Result;
use crate::models::{ChatMessage, Recommendation, Song, UserRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Auth payload returned by login/register. The two source endpoints spell
/// the id field differently (`id` vs `user_id`); tolerate both.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "id", alias = "user_id")]
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_developer: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmotionAnalysis {
    pub emotion: String,
    #[serde(default)]
    pub intensity: f32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub music_suggestion: String,
    #[serde(default)]
    pub response: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    Like,
    Dislike,
}

/// Everything the application core needs from the HTTP backend. The
/// controller only ever talks to this trait; tests script a mock, the demo
/// binary wires [`HttpBackend`].
#[async_trait]
pub trait MusicBackend: Send + Sync {
    async fn login(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse>;

    async fn register(&self, username: &str, email: &str, password: &str)
        -> Result<AuthResponse>;

    async fn sample_songs(&self) -> Result<Vec<Song>>;

    /// Previously stored ratings, keyed by track id.
    async fn user_ratings(&self, user_id: &str) -> Result<HashMap<u32, u8>>;

    async fn rate_song(&self, user_id: &str, track_id: u32, rating: u8) -> Result<()>;

    async fn personalized_recommendations(
        &self,
        user_id: &str,
        genres: &[String],
    ) -> Result<Vec<Recommendation>>;

    async fn chat(&self, user_id: &str, message: &str) -> Result<String>;

    async fn chat_history(&self, user_id: &str) -> Result<Vec<ChatMessage>>;

    async fn analyze_emotion(&self, user_id: &str, message: &str) -> Result<EmotionAnalysis>;

    async fn emotion_music(&self, user_id: &str, emotion: &str) -> Result<Vec<Recommendation>>;

    async fn submit_feedback(
        &self,
        user_id: &str,
        track_id: u32,
        feedback_type: FeedbackType,
    ) -> Result<()>;

    async fn submit_evaluation(
        &self,
        user_id: &str,
        responses: &HashMap<String, u8>,
        comment: &str,
    ) -> Result<()>;

    // Admin CRUD, developer accounts only.
    async fn list_users(&self) -> Result<Vec<UserRecord>>;

    async fn delete_user(&self, user_id: &str) -> Result<()>;
}
