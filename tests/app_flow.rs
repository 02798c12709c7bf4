use async_trait::async_trait;
use moodtunes::app::replies;
use moodtunes::backend::{AuthResponse, EmotionAnalysis, FeedbackType, MusicBackend};
use moodtunes::models::{ChatMessage, Recommendation, Severity, Song, Tab, UserRecord};
use moodtunes::{catalog, AppController, AppError, Config, MemoryStore, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Scripted backend: fixed data, per-endpoint call counters, optional
/// artificial latency so tests can interleave concurrent transitions.
#[derive(Default)]
struct MockBackend {
    login_count: AtomicUsize,
    recommendation_count: AtomicUsize,
    login_delay: Option<Duration>,
    recommendation_delay: Option<Duration>,
    fail_login: bool,
}

fn mock_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation {
            id: 201,
            title: "November Rain".to_string(),
            artist: "Guns N' Roses".to_string(),
            album_image_url: None,
            preview_url: None,
            explanation: "因为你喜欢摇滚音乐".to_string(),
            provenance: None,
        },
        Recommendation {
            id: 202,
            title: "Hello".to_string(),
            artist: "Adele".to_string(),
            album_image_url: None,
            preview_url: None,
            explanation: "基于你对Adele的高评分".to_string(),
            provenance: None,
        },
    ]
}

#[async_trait]
impl MusicBackend for MockBackend {
    async fn login(&self, username: &str, email: &str, _password: &str) -> Result<AuthResponse> {
        self.login_count.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.login_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_login {
            return Err(AppError::Backend("invalid credentials".to_string()));
        }
        Ok(AuthResponse {
            user_id: "user-123".to_string(),
            username: username.to_string(),
            email: email.to_string(),
            is_developer: true,
        })
    }

    async fn register(&self, username: &str, email: &str, _password: &str) -> Result<AuthResponse> {
        Ok(AuthResponse {
            user_id: "user-456".to_string(),
            username: username.to_string(),
            email: email.to_string(),
            is_developer: false,
        })
    }

    async fn sample_songs(&self) -> Result<Vec<Song>> {
        Ok(catalog::sample_songs())
    }

    async fn user_ratings(&self, _user_id: &str) -> Result<HashMap<u32, u8>> {
        Ok(HashMap::new())
    }

    async fn rate_song(&self, _user_id: &str, _track_id: u32, _rating: u8) -> Result<()> {
        Ok(())
    }

    async fn personalized_recommendations(
        &self,
        _user_id: &str,
        _genres: &[String],
    ) -> Result<Vec<Recommendation>> {
        self.recommendation_count.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.recommendation_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(mock_recommendations())
    }

    async fn chat(&self, _user_id: &str, _message: &str) -> Result<String> {
        Ok("好的，告诉我更多吧！".to_string())
    }

    async fn chat_history(&self, _user_id: &str) -> Result<Vec<ChatMessage>> {
        Ok(Vec::new())
    }

    async fn analyze_emotion(&self, _user_id: &str, _message: &str) -> Result<EmotionAnalysis> {
        Err(AppError::Backend("not available".to_string()))
    }

    async fn emotion_music(&self, _user_id: &str, _emotion: &str) -> Result<Vec<Recommendation>> {
        Ok(Vec::new())
    }

    async fn submit_feedback(
        &self,
        _user_id: &str,
        _track_id: u32,
        _feedback_type: FeedbackType,
    ) -> Result<()> {
        Ok(())
    }

    async fn submit_evaluation(
        &self,
        _user_id: &str,
        _responses: &HashMap<String, u8>,
        _comment: &str,
    ) -> Result<()> {
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        Ok(vec![UserRecord {
            user_id: "user-123".to_string(),
            username: "test".to_string(),
            email: "test@example.com".to_string(),
            is_developer: true,
        }])
    }

    async fn delete_user(&self, _user_id: &str) -> Result<()> {
        Ok(())
    }
}

fn test_config() -> Config {
    Config {
        notification_ttl: Duration::from_secs(5),
        chat_followup_delay: Duration::from_millis(1000),
        chat_support_delay: Duration::from_millis(2000),
        ..Config::default()
    }
}

fn controller_with(backend: Arc<MockBackend>) -> AppController {
    AppController::new(test_config(), backend, Arc::new(MemoryStore::new()))
        .with_rng(StdRng::seed_from_u64(7))
}

async fn logged_in_controller(backend: Arc<MockBackend>) -> AppController {
    let controller = controller_with(backend);
    controller
        .login("test", "test@example.com", "password")
        .await
        .unwrap();
    assert!(controller.snapshot().await.session.is_logged_in);
    controller
}

#[tokio::test(start_paused = true)]
async fn login_populates_session_and_loads_catalog() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;
    let state = controller.snapshot().await;
    assert_eq!(state.session.id, "user-123");
    assert_eq!(state.current_tab, Tab::Welcome);
    assert_eq!(state.songs.len(), 10);
    assert!(!state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn failed_login_leaves_session_logged_out() {
    let backend = Arc::new(MockBackend {
        fail_login: true,
        ..Default::default()
    });
    let controller = controller_with(backend);
    controller
        .login("test", "test@example.com", "wrong")
        .await
        .unwrap();

    let state = controller.snapshot().await;
    assert!(!state.session.is_logged_in);
    assert!(state.login_error.is_some());
    assert!(!state.is_loading);
    assert!(state
        .notifications
        .iter()
        .any(|n| n.severity == Severity::Danger));
}

#[tokio::test(start_paused = true)]
async fn rerating_retains_only_latest_value() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;

    controller.rate_song(101, 2).await.unwrap();
    controller.rate_song(101, 5).await.unwrap();

    let state = controller.snapshot().await;
    let song = state.songs.iter().find(|s| s.id == 101).unwrap();
    assert_eq!(song.rating, Some(5));
    assert_eq!(state.rated_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn rated_enough_flips_at_exactly_five_songs() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;

    for id in [101, 102, 103, 104] {
        controller.rate_song(id, 3).await.unwrap();
    }
    assert!(!controller.has_rated_enough_songs().await);

    controller.rate_song(105, 3).await.unwrap();
    assert!(controller.has_rated_enough_songs().await);
}

#[tokio::test(start_paused = true)]
async fn recommendations_blocked_below_threshold() {
    let backend = Arc::new(MockBackend::default());
    let controller = logged_in_controller(backend.clone()).await;

    for id in [101, 102, 103, 104] {
        controller.rate_song(id, 5).await.unwrap();
    }

    let result = controller.get_recommendations().await;
    assert!(matches!(result, Err(AppError::PreconditionNotMet(_))));

    let state = controller.snapshot().await;
    assert!(state.recommendations.is_empty());
    assert_eq!(backend.recommendation_count.load(Ordering::SeqCst), 0);
    assert!(!state.is_loading_recommendations);
}

#[tokio::test(start_paused = true)]
async fn rating_five_songs_unlocks_recommendations() {
    let backend = Arc::new(MockBackend::default());
    let controller = logged_in_controller(backend.clone()).await;

    for (id, rating) in [(101, 5), (102, 4), (103, 5), (104, 4), (105, 5)] {
        controller.rate_song(id, rating).await.unwrap();
    }
    assert!(controller.has_rated_enough_songs().await);

    controller.get_recommendations().await.unwrap();

    let state = controller.snapshot().await;
    assert!(!state.recommendations.is_empty());
    for rec in &state.recommendations {
        assert!(!rec.title.is_empty());
        assert!(!rec.artist.is_empty());
    }
    assert_eq!(backend.recommendation_count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn entering_recommend_tab_auto_triggers_fetch() {
    let backend = Arc::new(MockBackend::default());
    let controller = logged_in_controller(backend.clone()).await;

    for id in [101, 102, 103, 104, 105] {
        controller.rate_song(id, 4).await.unwrap();
    }
    controller.set_tab(Tab::Recommend).await.unwrap();

    let state = controller.snapshot().await;
    assert_eq!(state.current_tab, Tab::Recommend);
    assert!(!state.recommendations.is_empty());
    assert_eq!(backend.recommendation_count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn sad_message_routes_to_support_branch() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;

    controller.send_message("我今天很难过").await.unwrap();

    let state = controller.snapshot().await;
    // User message, therapist reply, therapeutic follow-up.
    assert_eq!(state.chat_history.len(), 3);
    assert!(state.chat_history[0].is_user);
    assert!(!state.chat_history[1].is_user);
    assert!(state.chat_history[1].songs.is_none());
    assert_eq!(state.chat_history[2].content, replies::THERAPEUTIC_FOLLOWUP);
    assert!(!state.is_chat_loading);
    // The support branch does not touch the recommendation list.
    assert!(state.recommendations.is_empty());
}

#[tokio::test(start_paused = true)]
async fn recommendation_message_attaches_songs() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;

    controller.send_message("推荐一些歌").await.unwrap();

    let state = controller.snapshot().await;
    let with_songs: Vec<_> = state
        .chat_history
        .iter()
        .filter(|m| !m.is_user && m.songs.is_some())
        .collect();
    assert_eq!(with_songs.len(), 1);
    assert_eq!(with_songs[0].songs.as_ref().unwrap().len(), 3);
    // The recommendation page is updated as part of the same turn.
    assert_eq!(state.recommendations.len(), 3);
    assert!(!state.is_chat_loading);
    assert!(state.user_emotion.is_some());
}

#[tokio::test(start_paused = true)]
async fn empty_message_is_rejected() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;
    let result = controller.send_message("   ").await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(controller.snapshot().await.chat_history.is_empty());
}

#[tokio::test(start_paused = true)]
async fn logout_resets_session_and_blocks_rating() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;
    controller.send_message("你好").await.unwrap();

    controller.logout().await;

    let state = controller.snapshot().await;
    assert!(!state.session.is_logged_in);
    assert_eq!(state.current_tab, Tab::Login);
    assert!(state.chat_history.is_empty());

    let result = controller.rate_song(101, 4).await;
    assert!(matches!(result, Err(AppError::PreconditionNotMet(_))));
}

#[tokio::test(start_paused = true)]
async fn notification_expires_after_configured_delay() {
    let controller = controller_with(Arc::new(MockBackend::default()));

    let id = controller.add_notification("测试通知", Severity::Info).await;
    assert!(controller
        .snapshot()
        .await
        .notifications
        .iter()
        .any(|n| n.id == id));

    // Just before expiry the notification is still present.
    tokio::time::sleep(Duration::from_millis(4_900)).await;
    assert!(controller
        .snapshot()
        .await
        .notifications
        .iter()
        .any(|n| n.id == id));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!controller
        .snapshot()
        .await
        .notifications
        .iter()
        .any(|n| n.id == id));

    // Removing an already-removed id is a no-op.
    controller.remove_notification(id).await;
}

#[tokio::test(start_paused = true)]
async fn duplicate_login_is_coalesced() {
    let backend = Arc::new(MockBackend {
        login_delay: Some(Duration::from_millis(100)),
        ..Default::default()
    });
    let controller = controller_with(backend.clone());

    let first = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.login("test", "test@example.com", "pw").await })
    };
    // Let the first login reach the backend call.
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    let second = controller.login("test", "test@example.com", "pw").await;
    assert!(matches!(second, Err(AppError::PreconditionNotMet(_))));

    first.await.unwrap().unwrap();
    assert_eq!(backend.login_count.load(Ordering::SeqCst), 1);
    assert!(controller.snapshot().await.session.is_logged_in);
}

#[tokio::test(start_paused = true)]
async fn stale_recommendation_response_is_discarded_after_logout() {
    let backend = Arc::new(MockBackend {
        recommendation_delay: Some(Duration::from_millis(100)),
        ..Default::default()
    });
    let controller = logged_in_controller(backend.clone()).await;

    for id in [101, 102, 103, 104, 105] {
        controller.rate_song(id, 5).await.unwrap();
    }

    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.get_recommendations().await })
    };
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert_eq!(backend.recommendation_count.load(Ordering::SeqCst), 1);

    // Navigation happens while the response is in flight.
    controller.logout().await;

    pending.await.unwrap().unwrap();
    let state = controller.snapshot().await;
    assert!(state.recommendations.is_empty());
    assert!(!state.is_loading_recommendations);
}

#[tokio::test(start_paused = true)]
async fn session_restore_lands_on_welcome() {
    let backend = Arc::new(MockBackend::default());
    let store = Arc::new(MemoryStore::new());
    let controller = AppController::new(test_config(), backend.clone(), store.clone());
    controller
        .login("test", "test@example.com", "pw")
        .await
        .unwrap();

    // A fresh controller over the same store picks the session back up.
    let restored = AppController::new(test_config(), backend.clone(), store.clone());
    assert!(restored.restore_session().await);
    let state = restored.snapshot().await;
    assert!(state.session.is_logged_in);
    assert_eq!(state.current_tab, Tab::Welcome);
    assert_eq!(state.songs.len(), 10);

    // Without a stored blob nothing is restored.
    let empty = AppController::new(
        test_config(),
        backend,
        Arc::new(MemoryStore::new()),
    );
    assert!(!empty.restore_session().await);
    let state = empty.snapshot().await;
    assert!(!state.session.is_logged_in);
    assert_eq!(state.current_tab, Tab::Login);
}

#[tokio::test(start_paused = true)]
async fn rate_tab_requires_login() {
    let controller = controller_with(Arc::new(MockBackend::default()));
    let result = controller.set_tab(Tab::Rate).await;
    assert!(matches!(result, Err(AppError::PreconditionNotMet(_))));
    assert_eq!(controller.snapshot().await.current_tab, Tab::Login);
}

#[tokio::test(start_paused = true)]
async fn game_results_drive_emotion_and_recommendations() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;

    let mut results = HashMap::new();
    results.insert("摇滚".to_string(), 8);
    results.insert("流行".to_string(), 3);
    controller.handle_game_complete(results).await;

    let state = controller.snapshot().await;
    let emotion = state.user_emotion.unwrap();
    assert_eq!(emotion.label.as_str(), "愤怒");

    controller.use_game_results().await.unwrap();
    let state = controller.snapshot().await;
    assert_eq!(state.current_tab, Tab::Recommend);
    assert_eq!(state.recommendations.len(), 6);
    for rec in &state.recommendations {
        assert!(rec.explanation.contains("摇滚"));
    }
}

#[tokio::test(start_paused = true)]
async fn use_game_results_requires_a_finished_game() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;
    let result = controller.use_game_results().await;
    assert!(matches!(result, Err(AppError::PreconditionNotMet(_))));
}

#[tokio::test(start_paused = true)]
async fn detect_emotion_chains_into_recommendations() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;

    controller.detect_emotion("我今天很开心，非常快乐").await.unwrap();

    let state = controller.snapshot().await;
    assert_eq!(state.user_emotion.unwrap().label.as_str(), "高兴");
    assert_eq!(state.recommendations.len(), 6);
    assert!(!state.is_loading_recommendations);
}

#[tokio::test(start_paused = true)]
async fn dislike_removes_recommendation() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;

    for id in [101, 102, 103, 104, 105] {
        controller.rate_song(id, 5).await.unwrap();
    }
    controller.get_recommendations().await.unwrap();
    let before = controller.snapshot().await.recommendations.len();
    assert!(before > 0);

    controller.dislike_song(201).await.unwrap();
    let state = controller.snapshot().await;
    assert_eq!(state.recommendations.len(), before - 1);
    assert!(state.recommendations.iter().all(|r| r.id != 201));
}

#[tokio::test(start_paused = true)]
async fn admin_surface_requires_developer_session() {
    let controller = controller_with(Arc::new(MockBackend::default()));
    assert!(matches!(
        controller.list_users().await,
        Err(AppError::PreconditionNotMet(_))
    ));

    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;
    let users = controller.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    controller.delete_user("user-999").await.unwrap();

    // Creating an account for someone else leaves the own session alone.
    let created = controller
        .create_user("newbie", "newbie@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(created.user_id, "user-456");
    assert_eq!(controller.snapshot().await.session.id, "user-123");
}

#[tokio::test(start_paused = true)]
async fn entering_chat_seeds_welcome_message() {
    let controller = logged_in_controller(Arc::new(MockBackend::default())).await;
    controller.set_tab(Tab::Chat).await.unwrap();

    let state = controller.snapshot().await;
    assert_eq!(state.chat_history.len(), 1);
    assert!(!state.chat_history[0].is_user);
}
