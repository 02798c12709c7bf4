use super::{AuthResponse, EmotionAnalysis, FeedbackType, MusicBackend};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{ChatMessage, Recommendation, Song, UserRecord};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

#[derive(Debug, serde::Deserialize)]
struct RecommendationsEnvelope {
    #[serde(default)]
    recommendations: Vec<Recommendation>,
}

#[derive(Debug, serde::Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Debug, serde::Deserialize)]
struct ChatHistoryEnvelope {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Backend API error: {} - {}", status, body);
            return Err(AppError::Backend(format!(
                "API returned status: {} - {}",
                status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to parse response: {}", e)))
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Backend API error: {} - {}", status, body);
            return Err(AppError::Backend(format!(
                "API returned status: {} - {}",
                status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to parse response: {}", e)))
    }

    async fn post_ack(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Backend API error: {} - {}", status, body);
            return Err(AppError::Backend(format!(
                "API returned status: {} - {}",
                status, body
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl MusicBackend for HttpBackend {
    async fn login(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse> {
        self.post_json(
            "/api/user/login",
            &json!({ "username": username, "email": email, "password": password }),
        )
        .await
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        self.post_json(
            "/api/user/register",
            &json!({ "username": username, "email": email, "password": password }),
        )
        .await
    }

    async fn sample_songs(&self) -> Result<Vec<Song>> {
        self.get_json("/api/songs/sample", &[]).await
    }

    async fn user_ratings(&self, user_id: &str) -> Result<HashMap<u32, u8>> {
        // Keys arrive as JSON strings; convert to track ids.
        let raw: HashMap<String, u8> = self
            .get_json(&format!("/api/user_ratings/{}", user_id), &[])
            .await?;

        Ok(raw
            .into_iter()
            .filter_map(|(k, v)| k.parse::<u32>().ok().map(|id| (id, v)))
            .collect())
    }

    async fn rate_song(&self, user_id: &str, track_id: u32, rating: u8) -> Result<()> {
        self.post_ack(
            "/api/rate_song",
            &json!({ "user_id": user_id, "track_id": track_id, "rating": rating }),
        )
        .await
    }

    async fn personalized_recommendations(
        &self,
        user_id: &str,
        genres: &[String],
    ) -> Result<Vec<Recommendation>> {
        let envelope: RecommendationsEnvelope = self
            .get_json(
                "/api/recommendations/personalized",
                &[
                    ("user_id", user_id.to_string()),
                    ("genres", genres.join(",")),
                ],
            )
            .await?;
        Ok(envelope.recommendations)
    }

    async fn chat(&self, user_id: &str, message: &str) -> Result<String> {
        let response: ChatResponse = self
            .post_json(
                "/api/chat",
                &json!({ "user_id": user_id, "message": message }),
            )
            .await?;
        Ok(response.response)
    }

    async fn chat_history(&self, user_id: &str) -> Result<Vec<ChatMessage>> {
        let envelope: ChatHistoryEnvelope = self
            .get_json("/api/chat/history", &[("user_id", user_id.to_string())])
            .await?;
        Ok(envelope.messages)
    }

    async fn analyze_emotion(&self, user_id: &str, message: &str) -> Result<EmotionAnalysis> {
        self.post_json(
            "/api/emotion/analyze",
            &json!({ "user_id": user_id, "message": message }),
        )
        .await
    }

    async fn emotion_music(&self, user_id: &str, emotion: &str) -> Result<Vec<Recommendation>> {
        self.get_json(
            "/api/emotion/music",
            &[
                ("user_id", user_id.to_string()),
                ("emotion", emotion.to_string()),
            ],
        )
        .await
    }

    async fn submit_feedback(
        &self,
        user_id: &str,
        track_id: u32,
        feedback_type: FeedbackType,
    ) -> Result<()> {
        self.post_ack(
            "/api/feedback",
            &json!({
                "user_id": user_id,
                "track_id": track_id,
                "feedback_type": feedback_type,
            }),
        )
        .await
    }

    async fn submit_evaluation(
        &self,
        user_id: &str,
        responses: &HashMap<String, u8>,
        comment: &str,
    ) -> Result<()> {
        self.post_ack(
            "/api/evaluation",
            &json!({ "user_id": user_id, "responses": responses, "comment": comment }),
        )
        .await
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        self.get_json("/api/user/all", &[]).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let url = self.url("/api/user/delete");
        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .json(&json!({ "user_id": user_id }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Backend(format!(
                "API returned status: {}",
                status
            )));
        }

        Ok(())
    }
}
