pub mod replies;
mod state;

pub use replies::{ChatRoute, CHAT_WELCOME};
pub use state::AppState;

use crate::backend::{FeedbackType, MusicBackend};
use crate::catalog;
use crate::config::Config;
use crate::emotion::{classify, map_genre_to_emotion, reason_for, EmotionLabel, EmotionResult};
use crate::error::{AppError, Result};
use crate::game::{dominant_genre, GameHooks, GameResults, NoopGame};
use crate::models::{
    ChatMessage, LoginRequest, Notification, Provenance, Recommendation, RegisterRequest,
    Severity, Song, Tab, UserRecord, UserSession,
};
use crate::session::SessionStore;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::RwLock;
use validator::Validate;

/// Owns the single [`AppState`] instance and exposes every transition the
/// rendering layer can trigger. All mutation goes through these methods;
/// readers get cloned snapshots.
///
/// Failure policy: backend failures surface as danger notifications and
/// never propagate to the caller. Validation and precondition failures are
/// returned as errors (and usually notified as well) so callers can react.
#[derive(Clone)]
pub struct AppController {
    config: Config,
    backend: Arc<dyn MusicBackend>,
    store: Arc<dyn SessionStore>,
    game: Arc<dyn GameHooks>,
    state: Arc<RwLock<AppState>>,
    notification_seq: Arc<AtomicU64>,
    auth_gate: Arc<AtomicBool>,
    recommend_gate: Arc<AtomicBool>,
    rng: Arc<Mutex<StdRng>>,
}

impl AppController {
    pub fn new(
        config: Config,
        backend: Arc<dyn MusicBackend>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let initial_tab = config.default_tab;
        Self {
            config,
            backend,
            store,
            game: Arc::new(NoopGame),
            state: Arc::new(RwLock::new(AppState::new(initial_tab))),
            notification_seq: Arc::new(AtomicU64::new(0)),
            auth_gate: Arc::new(AtomicBool::new(false)),
            recommend_gate: Arc::new(AtomicBool::new(false)),
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    pub fn with_game(mut self, game: Arc<dyn GameHooks>) -> Self {
        self.game = game;
        self
    }

    /// Replace the RNG, e.g. with a seeded one in tests.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Arc::new(Mutex::new(rng));
        self
    }

    /// Immutable snapshot for the rendering layer.
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    pub async fn has_rated_enough_songs(&self) -> bool {
        self.state.read().await.has_rated_enough_songs()
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn pick_reason(&self, label: EmotionLabel) -> String {
        reason_for(label, &mut *self.rng())
    }

    fn shuffle_pick(&self, pool: &[Song], n: usize) -> Vec<Song> {
        let mut songs = pool.to_vec();
        songs.shuffle(&mut *self.rng());
        songs.truncate(n);
        songs
    }

    // ---- Notifications ----------------------------------------------------

    pub async fn add_notification(&self, message: &str, severity: Severity) -> u64 {
        self.notify(message.to_string(), severity).await
    }

    async fn notify(&self, message: String, severity: Severity) -> u64 {
        let id = self.notification_seq.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!("Notification {} [{:?}]: {}", id, severity, message);
        self.state
            .write()
            .await
            .notifications
            .push(Notification::new(id, message, severity));

        // Exactly one removal is scheduled per notification; removing an
        // already-removed id is a no-op.
        let controller = self.clone();
        let ttl = self.config.notification_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            controller.remove_notification(id).await;
        });

        id
    }

    pub async fn remove_notification(&self, id: u64) {
        self.state.write().await.notifications.retain(|n| n.id != id);
    }

    // ---- Session ----------------------------------------------------------

    /// Authenticate against the backend. Backend failures become a danger
    /// notification plus an inline form error; they are not returned.
    /// Concurrent duplicate submissions are rejected before any backend
    /// call is made.
    pub async fn login(&self, username: &str, email: &str, password: &str) -> Result<()> {
        if self.auth_gate.swap(true, Ordering::SeqCst) {
            tracing::warn!("Rejecting duplicate login while one is in flight");
            return Err(AppError::PreconditionNotMet(
                "an authentication request is already in progress".to_string(),
            ));
        }
        let result = self.login_inner(username, email, password).await;
        self.auth_gate.store(false, Ordering::SeqCst);
        result
    }

    async fn login_inner(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let request = LoginRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        if let Err(e) = request.validate() {
            let message = "请填写所有必填字段".to_string();
            self.state.write().await.login_error = Some(message.clone());
            self.notify(message, Severity::Warning).await;
            return Err(AppError::Validation(e.to_string()));
        }

        let epoch = {
            let mut s = self.state.write().await;
            s.is_loading = true;
            s.login_error = None;
            s.epoch
        };

        match self.backend.login(username, email, password).await {
            Ok(auth) => {
                let display_name = auth.username.clone();
                {
                    let mut s = self.state.write().await;
                    s.is_loading = false;
                    if s.epoch != epoch {
                        tracing::debug!("Discarding stale login response");
                        return Ok(());
                    }
                    s.session = UserSession {
                        id: auth.user_id,
                        username: auth.username,
                        email: auth.email,
                        is_logged_in: true,
                        is_developer: auth.is_developer,
                    };
                    s.current_tab = Tab::Welcome;
                    if let Err(e) = self.store.save_session(&s.session) {
                        tracing::warn!("Failed to persist session: {}", e);
                    }
                }
                tracing::info!("User {} logged in", display_name);
                self.notify(
                    format!("登录成功！欢迎回来，{}", display_name),
                    Severity::Success,
                )
                .await;
                self.load_sample_songs().await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                let message = "登录失败，请检查用户名和邮箱".to_string();
                {
                    let mut s = self.state.write().await;
                    s.is_loading = false;
                    s.login_error = Some(message.clone());
                }
                self.notify(message, Severity::Danger).await;
                Ok(())
            }
        }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        if self.auth_gate.swap(true, Ordering::SeqCst) {
            tracing::warn!("Rejecting duplicate registration while one is in flight");
            return Err(AppError::PreconditionNotMet(
                "an authentication request is already in progress".to_string(),
            ));
        }
        let result = self.register_inner(username, email, password).await;
        self.auth_gate.store(false, Ordering::SeqCst);
        result
    }

    async fn register_inner(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        if let Err(e) = request.validate() {
            let message = "请填写所有必填字段".to_string();
            self.state.write().await.register_error = Some(message.clone());
            self.notify(message, Severity::Warning).await;
            return Err(AppError::Validation(e.to_string()));
        }

        let epoch = {
            let mut s = self.state.write().await;
            s.is_loading = true;
            s.register_error = None;
            s.epoch
        };

        match self.backend.register(username, email, password).await {
            Ok(auth) => {
                let display_name = auth.username.clone();
                {
                    let mut s = self.state.write().await;
                    s.is_loading = false;
                    if s.epoch != epoch {
                        tracing::debug!("Discarding stale registration response");
                        return Ok(());
                    }
                    s.session = UserSession {
                        id: auth.user_id,
                        username: auth.username,
                        email: if auth.email.is_empty() {
                            email.to_string()
                        } else {
                            auth.email
                        },
                        is_logged_in: true,
                        is_developer: auth.is_developer,
                    };
                    s.current_tab = Tab::Welcome;
                    if let Err(e) = self.store.save_session(&s.session) {
                        tracing::warn!("Failed to persist session: {}", e);
                    }
                }
                tracing::info!("User {} registered", display_name);
                self.notify(format!("注册成功！欢迎，{}", display_name), Severity::Success)
                    .await;
                self.load_sample_songs().await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Registration failed: {}", e);
                let message = "注册失败，请稍后再试".to_string();
                {
                    let mut s = self.state.write().await;
                    s.is_loading = false;
                    s.register_error = Some(message.clone());
                }
                self.notify(message, Severity::Danger).await;
                Ok(())
            }
        }
    }

    /// Restore a persisted session, if any. Returns whether one was found.
    pub async fn restore_session(&self) -> bool {
        if let Some(lang) = self.store.load_language() {
            self.state.write().await.language = lang;
        }

        match self.store.load_session() {
            Some(mut session) => {
                session.is_logged_in = true;
                let username = session.username.clone();
                {
                    let mut s = self.state.write().await;
                    s.session = session;
                    s.current_tab = Tab::Welcome;
                }
                tracing::info!("Restored session for {}", username);
                self.load_sample_songs().await;
                true
            }
            None => false,
        }
    }

    pub async fn logout(&self) {
        self.game.stop();
        {
            let mut s = self.state.write().await;
            s.epoch += 1;
            s.session.clear();
            s.chat_history.clear();
            s.recommendations.clear();
            s.user_emotion = None;
            s.game_results = None;
            for song in &mut s.songs {
                song.rating = None;
            }
            s.current_tab = self.config.default_tab;
            s.is_loading = false;
            s.is_loading_recommendations = false;
            s.is_chat_loading = false;
        }
        self.store.clear_session();
        tracing::info!("User logged out");
        self.notify("您已成功登出".to_string(), Severity::Info).await;
    }

    pub async fn switch_language(&self, lang: &str) {
        self.state.write().await.language = lang.to_string();
        self.store.save_language(lang);
        let message = if lang == "zh" {
            "已切换到中文"
        } else {
            "Switched to English"
        };
        self.notify(message.to_string(), Severity::Success).await;
    }

    // ---- Songs and ratings ------------------------------------------------

    /// Load the song catalog plus any stored ratings. Falls back to the
    /// built-in catalog when the backend is unreachable, so the rating
    /// flow keeps working offline.
    pub async fn load_sample_songs(&self) {
        let epoch = {
            let mut s = self.state.write().await;
            s.is_loading = true;
            s.epoch
        };

        let songs = match self.backend.sample_songs().await {
            Ok(songs) if !songs.is_empty() => songs,
            Ok(_) => catalog::sample_songs(),
            Err(e) => {
                tracing::warn!("Falling back to built-in catalog: {}", e);
                catalog::sample_songs()
            }
        };

        let (logged_in, user_id) = {
            let s = self.state.read().await;
            (s.session.is_logged_in, s.session.id.clone())
        };
        let ratings = if logged_in {
            match self.backend.user_ratings(&user_id).await {
                Ok(ratings) => ratings,
                Err(e) => {
                    tracing::debug!("No stored ratings: {}", e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        let mut s = self.state.write().await;
        s.is_loading = false;
        if s.epoch != epoch {
            tracing::debug!("Discarding stale song catalog");
            return;
        }
        s.songs = songs
            .into_iter()
            .map(|mut song| {
                if let Some(rating) = ratings.get(&song.id) {
                    song.rating = Some(*rating);
                }
                song
            })
            .collect();
        tracing::debug!("Loaded {} songs", s.songs.len());
    }

    /// Overwrite the rating for a song. Re-rating is idempotent: only the
    /// latest value is retained. Does not recompute recommendations.
    pub async fn rate_song(&self, song_id: u32, rating: u8) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                rating
            )));
        }

        let (user_id, title) = {
            let mut s = self.state.write().await;
            if !s.session.is_logged_in {
                drop(s);
                self.notify("请先登录后再评分".to_string(), Severity::Warning)
                    .await;
                return Err(AppError::PreconditionNotMet(
                    "rating requires a logged-in session".to_string(),
                ));
            }
            let user_id = s.session.id.clone();
            let song = s
                .songs
                .iter_mut()
                .find(|song| song.id == song_id)
                .ok_or_else(|| AppError::NotFound(format!("song {} not found", song_id)))?;
            song.rating = Some(rating);
            (user_id, song.title.clone())
        };

        self.notify(
            format!("已为 \"{}\" 评分 {} 星", title, rating),
            Severity::Success,
        )
        .await;

        if let Err(e) = self.backend.rate_song(&user_id, song_id, rating).await {
            // Local state keeps the rating; persistence is best-effort.
            tracing::warn!("Failed to persist rating for track {}: {}", song_id, e);
        }
        Ok(())
    }

    // ---- Recommendations --------------------------------------------------

    /// Replace the recommendation list from the backend. Requires at least
    /// 5 rated songs; below that threshold no backend call is made.
    pub async fn get_recommendations(&self) -> Result<()> {
        if self.recommend_gate.swap(true, Ordering::SeqCst) {
            tracing::debug!("Recommendation request already in flight, coalescing");
            return Err(AppError::PreconditionNotMet(
                "a recommendation request is already in progress".to_string(),
            ));
        }
        let result = self.get_recommendations_inner().await;
        self.recommend_gate.store(false, Ordering::SeqCst);
        result
    }

    async fn get_recommendations_inner(&self) -> Result<()> {
        let (user_id, genres, epoch) = {
            let mut s = self.state.write().await;
            if !s.has_rated_enough_songs() {
                drop(s);
                self.notify("请至少对5首歌曲进行评分".to_string(), Severity::Warning)
                    .await;
                return Err(AppError::PreconditionNotMet(
                    "fewer than 5 rated songs".to_string(),
                ));
            }
            s.is_loading_recommendations = true;
            let genres: Vec<String> = s
                .game_results
                .as_ref()
                .map(|results| {
                    let mut entries: Vec<_> = results.iter().collect();
                    entries.sort_by(|(ga, sa), (gb, sb)| sb.cmp(sa).then_with(|| ga.cmp(gb)));
                    entries.into_iter().map(|(g, _)| g.clone()).collect()
                })
                .unwrap_or_default();
            (s.session.id.clone(), genres, s.epoch)
        };

        match self
            .backend
            .personalized_recommendations(&user_id, &genres)
            .await
        {
            Ok(recommendations) => {
                {
                    let mut s = self.state.write().await;
                    s.is_loading_recommendations = false;
                    if s.epoch != epoch {
                        tracing::debug!("Discarding stale recommendations");
                        return Ok(());
                    }
                    tracing::info!("Received {} recommendations", recommendations.len());
                    s.recommendations = recommendations;
                }
                self.notify("根据您的评分生成了推荐".to_string(), Severity::Success)
                    .await;
                Ok(())
            }
            Err(e) => {
                self.state.write().await.is_loading_recommendations = false;
                tracing::error!("Recommendation request failed: {}", e);
                self.notify("推荐失败，请稍后再试".to_string(), Severity::Danger)
                    .await;
                Ok(())
            }
        }
    }

    /// Set the detected emotion from free text and chain into
    /// emotion-based recommendations.
    pub async fn detect_emotion(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            self.notify("请输入您当前的心情".to_string(), Severity::Warning)
                .await;
            return Err(AppError::Validation("emotion text must not be empty".to_string()));
        }

        self.notify("正在分析您的情绪...".to_string(), Severity::Info)
            .await;
        let result = classify(text);
        self.state.write().await.user_emotion = Some(result);
        self.notify(
            format!("检测到您当前的情绪: {}", result.label),
            Severity::Success,
        )
        .await;

        self.recommend_by_emotion().await
    }

    /// Recommendations framed by the detected emotion. Prefers the
    /// backend's emotion playlist; falls back to sampling the local
    /// catalog with generated reasons.
    pub async fn recommend_by_emotion(&self) -> Result<()> {
        let (emotion, user_id, logged_in, epoch) = {
            let mut s = self.state.write().await;
            let Some(emotion) = s.user_emotion else {
                drop(s);
                self.notify("请先输入您的心情".to_string(), Severity::Warning)
                    .await;
                return Err(AppError::PreconditionNotMet(
                    "no detected emotion".to_string(),
                ));
            };
            s.is_loading_recommendations = true;
            (
                emotion,
                s.session.id.clone(),
                s.session.is_logged_in,
                s.epoch,
            )
        };

        let from_backend = if logged_in {
            match self
                .backend
                .emotion_music(&user_id, emotion.label.as_str())
                .await
            {
                Ok(recommendations) if !recommendations.is_empty() => Some(recommendations),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("Emotion playlist unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let recommendations = match from_backend {
            Some(recommendations) => recommendations,
            None => {
                let pool = {
                    let s = self.state.read().await;
                    if s.songs.is_empty() {
                        catalog::sample_songs()
                    } else {
                        s.songs.clone()
                    }
                };
                self.shuffle_pick(&pool, 6)
                    .iter()
                    .map(|song| {
                        Recommendation::from_song(
                            song,
                            self.pick_reason(emotion.label),
                            Some(Provenance::Emotion(emotion.label.to_string())),
                        )
                    })
                    .collect()
            }
        };

        {
            let mut s = self.state.write().await;
            s.is_loading_recommendations = false;
            if s.epoch != epoch {
                tracing::debug!("Discarding stale emotion recommendations");
                return Ok(());
            }
            s.recommendations = recommendations;
        }
        self.notify("根据您的情绪推荐了新音乐".to_string(), Severity::Success)
            .await;
        Ok(())
    }

    // ---- Chat -------------------------------------------------------------

    /// Append the user's message and produce the assistant's reply (or
    /// replies) for this turn. The chat loading flag stays set until the
    /// last reply of the turn has been appended.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("message must not be empty".to_string()));
        }

        let epoch = {
            let mut s = self.state.write().await;
            s.chat_history.push(ChatMessage::from_user(text));
            s.is_chat_loading = true;
            s.epoch
        };

        let emotion = classify(text);
        let outcome = match replies::route(text) {
            ChatRoute::Recommend => self.chat_recommend(emotion, epoch).await,
            ChatRoute::Support => self.chat_support(emotion, epoch).await,
            ChatRoute::Generic => self.chat_generic(text, emotion, epoch).await,
        };

        // Finally-semantics: the flag drops on success, failure and
        // stale-epoch discard alike.
        self.state.write().await.is_chat_loading = false;
        outcome
    }

    async fn chat_recommend(&self, emotion: EmotionResult, epoch: u64) -> Result<()> {
        {
            let mut s = self.state.write().await;
            s.user_emotion = Some(emotion);
            s.chat_history
                .push(ChatMessage::from_assistant(replies::recommend_ack(
                    emotion.label,
                )));
        }

        let pool = {
            let s = self.state.read().await;
            if s.songs.is_empty() {
                catalog::sample_songs()
            } else {
                s.songs.clone()
            }
        };
        let picked = self.shuffle_pick(&pool, 3);

        let mut body = String::from("根据你的心情，我推荐这些歌曲：\n\n");
        for (i, song) in picked.iter().enumerate() {
            body.push_str(&format!(
                "{}. {} - {}\n   {}\n\n",
                i + 1,
                song.title,
                song.artist,
                self.pick_reason(emotion.label)
            ));
        }
        body.push_str("你可以点击\"试听\"按钮来收听这些歌曲。希望这些音乐能够陪伴你度过这段时光。");

        tokio::time::sleep(self.config.chat_followup_delay).await;

        let recommendations: Vec<Recommendation> = picked
            .iter()
            .map(|song| {
                Recommendation::from_song(
                    song,
                    self.pick_reason(emotion.label),
                    Some(Provenance::Emotion(emotion.label.to_string())),
                )
            })
            .collect();

        let mut s = self.state.write().await;
        if s.epoch != epoch {
            tracing::debug!("Discarding stale chat recommendation reply");
            return Ok(());
        }
        s.chat_history
            .push(ChatMessage::from_assistant(body).with_songs(picked));
        s.recommendations = recommendations;
        Ok(())
    }

    async fn chat_support(&self, emotion: EmotionResult, epoch: u64) -> Result<()> {
        let reply = {
            let mut rng = self.rng();
            replies::therapist_reply(emotion.label, &mut *rng)
        };
        self.state
            .write()
            .await
            .chat_history
            .push(ChatMessage::from_assistant(reply));

        tokio::time::sleep(self.config.chat_support_delay).await;

        let mut s = self.state.write().await;
        if s.epoch != epoch {
            tracing::debug!("Discarding stale support follow-up");
            return Ok(());
        }
        s.chat_history
            .push(ChatMessage::from_assistant(replies::THERAPEUTIC_FOLLOWUP));
        Ok(())
    }

    async fn chat_generic(&self, text: &str, emotion: EmotionResult, epoch: u64) -> Result<()> {
        let (logged_in, user_id) = {
            let s = self.state.read().await;
            (s.session.is_logged_in, s.session.id.clone())
        };

        let reply = if logged_in {
            match self.backend.chat(&user_id, text).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!("Chat backend unavailable: {}", e);
                    replies::generic_reply(emotion.label, &mut *self.rng())
                }
            }
        } else {
            replies::generic_reply(emotion.label, &mut *self.rng())
        };

        let mut s = self.state.write().await;
        if s.epoch != epoch {
            tracing::debug!("Discarding stale chat reply");
            return Ok(());
        }
        s.chat_history.push(ChatMessage::from_assistant(reply));
        Ok(())
    }

    /// Populate the transcript when entering the chat tab. Backend history
    /// wins; an empty history gets the assistant's welcome line.
    pub async fn load_chat_history(&self) {
        let (logged_in, user_id, empty) = {
            let s = self.state.read().await;
            (
                s.session.is_logged_in,
                s.session.id.clone(),
                s.chat_history.is_empty(),
            )
        };
        if !logged_in || !empty {
            return;
        }

        let history = match self.backend.chat_history(&user_id).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::debug!("No chat history: {}", e);
                Vec::new()
            }
        };

        let mut s = self.state.write().await;
        if !s.chat_history.is_empty() {
            return;
        }
        if history.is_empty() {
            s.chat_history.push(ChatMessage::from_assistant(CHAT_WELCOME));
        } else {
            s.chat_history = history;
        }
    }

    // ---- Mini-game --------------------------------------------------------

    /// Record the finished game's genre scores and derive an emotion from
    /// the dominant genre.
    pub async fn handle_game_complete(&self, results: GameResults) {
        let Some(genre) = dominant_genre(&results).map(str::to_string) else {
            tracing::debug!("Game finished without collecting anything");
            return;
        };
        let emotion = map_genre_to_emotion(&genre);
        {
            let mut s = self.state.write().await;
            s.game_results = Some(results);
            s.user_emotion = Some(emotion);
        }
        self.notify(
            format!(
                "根据您喜欢的{}音乐，分析出您可能的情绪是: {}",
                genre, emotion.label
            ),
            Severity::Info,
        )
        .await;
    }

    /// Turn stored game results into recommendations.
    pub async fn use_game_results(&self) -> Result<()> {
        let (genre, emotion, epoch) = {
            let mut s = self.state.write().await;
            let Some(genre) = s
                .game_results
                .as_ref()
                .and_then(|r| dominant_genre(r))
                .map(str::to_string)
            else {
                drop(s);
                self.notify("请先完成音乐游戏".to_string(), Severity::Warning)
                    .await;
                return Err(AppError::PreconditionNotMet(
                    "no game results available".to_string(),
                ));
            };
            s.current_tab = Tab::Recommend;
            s.is_loading_recommendations = true;
            (genre, s.user_emotion, s.epoch)
        };

        let pool = {
            let s = self.state.read().await;
            if s.songs.is_empty() {
                catalog::sample_songs()
            } else {
                s.songs.clone()
            }
        };
        let recommendations: Vec<Recommendation> = self
            .shuffle_pick(&pool, 6)
            .iter()
            .map(|song| {
                let explanation = match emotion {
                    Some(emotion) => format!(
                        "根据您在游戏中喜欢的{}音乐，以及检测到的\"{}\"情绪，{}",
                        genre,
                        emotion.label,
                        self.pick_reason(emotion.label)
                    ),
                    None => format!("根据您在游戏中喜欢的{}音乐推荐", genre),
                };
                Recommendation::from_song(
                    song,
                    explanation,
                    Some(Provenance::Genre(genre.clone())),
                )
            })
            .collect();

        {
            let mut s = self.state.write().await;
            s.is_loading_recommendations = false;
            if s.epoch != epoch {
                tracing::debug!("Discarding stale game recommendations");
                return Ok(());
            }
            s.recommendations = recommendations;
        }
        self.notify("根据游戏结果生成了新推荐".to_string(), Severity::Success)
            .await;
        Ok(())
    }

    // ---- Feedback and evaluation ------------------------------------------

    pub async fn like_song(&self, song_id: u32) -> Result<()> {
        let (user_id, logged_in, title) = self.feedback_target(song_id).await?;
        self.notify(
            format!("已添加 \"{}\" 到我喜欢的音乐", title),
            Severity::Success,
        )
        .await;
        if logged_in {
            if let Err(e) = self
                .backend
                .submit_feedback(&user_id, song_id, FeedbackType::Like)
                .await
            {
                tracing::warn!("Failed to submit like feedback: {}", e);
            }
        }
        Ok(())
    }

    /// Dislike also removes the song from the current recommendation list.
    pub async fn dislike_song(&self, song_id: u32) -> Result<()> {
        let (user_id, logged_in, title) = self.feedback_target(song_id).await?;
        self.state
            .write()
            .await
            .recommendations
            .retain(|r| r.id != song_id);
        self.notify(
            format!("已将 \"{}\" 标记为不喜欢", title),
            Severity::Warning,
        )
        .await;
        if logged_in {
            if let Err(e) = self
                .backend
                .submit_feedback(&user_id, song_id, FeedbackType::Dislike)
                .await
            {
                tracing::warn!("Failed to submit dislike feedback: {}", e);
            }
        }
        Ok(())
    }

    async fn feedback_target(&self, song_id: u32) -> Result<(String, bool, String)> {
        let s = self.state.read().await;
        let title = s
            .songs
            .iter()
            .find(|song| song.id == song_id)
            .map(|song| song.title.clone())
            .or_else(|| {
                s.recommendations
                    .iter()
                    .find(|r| r.id == song_id)
                    .map(|r| r.title.clone())
            })
            .ok_or_else(|| AppError::NotFound(format!("song {} not found", song_id)))?;
        Ok((s.session.id.clone(), s.session.is_logged_in, title))
    }

    pub async fn submit_evaluation(
        &self,
        responses: HashMap<String, u8>,
        comment: &str,
    ) -> Result<()> {
        let (logged_in, user_id) = {
            let s = self.state.read().await;
            (s.session.is_logged_in, s.session.id.clone())
        };
        if !logged_in {
            return Err(AppError::PreconditionNotMet(
                "evaluation requires a logged-in session".to_string(),
            ));
        }

        match self
            .backend
            .submit_evaluation(&user_id, &responses, comment)
            .await
        {
            Ok(()) => {
                self.notify("感谢您的反馈！".to_string(), Severity::Success)
                    .await;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Evaluation submission failed: {}", e);
                self.notify("提交失败，请稍后再试".to_string(), Severity::Danger)
                    .await;
                Ok(())
            }
        }
    }

    // ---- Admin ------------------------------------------------------------

    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        self.require_developer().await?;
        self.backend.list_users().await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.require_developer().await?;
        self.backend.delete_user(user_id).await?;
        self.notify("用户已删除".to_string(), Severity::Success).await;
        Ok(())
    }

    /// Create an account on behalf of another user. Goes through the
    /// registration endpoint but never touches the local session.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord> {
        self.require_developer().await?;
        let auth = self.backend.register(username, email, password).await?;
        self.notify("用户已创建".to_string(), Severity::Success).await;
        Ok(UserRecord {
            user_id: auth.user_id,
            username: auth.username,
            email: auth.email,
            is_developer: auth.is_developer,
        })
    }

    async fn require_developer(&self) -> Result<()> {
        let s = self.state.read().await;
        if s.session.is_logged_in && s.session.is_developer {
            Ok(())
        } else {
            Err(AppError::PreconditionNotMet(
                "admin operations require a developer session".to_string(),
            ))
        }
    }

    // ---- Navigation -------------------------------------------------------

    /// Direct tab assignment with the login gate on `Rate` and the
    /// side-effecting entries (game start/stop, auto recommendations,
    /// chat history load). Every change bumps the epoch so responses from
    /// before the navigation are discarded.
    pub async fn set_tab(&self, tab: Tab) -> Result<()> {
        let previous = {
            let mut s = self.state.write().await;
            if tab == Tab::Rate && !s.session.is_logged_in {
                drop(s);
                self.notify("请先登录".to_string(), Severity::Warning).await;
                return Err(AppError::PreconditionNotMet(
                    "rate tab requires a logged-in session".to_string(),
                ));
            }
            let previous = s.current_tab;
            if previous == tab {
                return Ok(());
            }
            s.current_tab = tab;
            s.epoch += 1;
            previous
        };

        tracing::debug!("Tab change: {} -> {}", previous, tab);

        if previous == Tab::Game {
            self.game.stop();
        }
        match tab {
            Tab::Game => self.game.start(),
            Tab::Recommend => {
                if self.state.read().await.has_rated_enough_songs() {
                    // Outcome lands in state and notifications.
                    let _ = self.get_recommendations().await;
                }
            }
            Tab::Chat => self.load_chat_history().await,
            _ => {}
        }
        Ok(())
    }
}
