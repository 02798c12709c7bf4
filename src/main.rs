use moodtunes::backend::HttpBackend;
use moodtunes::models::Tab;
use moodtunes::session::MemoryStore;
use moodtunes::{AppController, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Headless demo driver: logs in against the configured backend, rates
/// the catalog and walks the recommendation and chat flows, printing the
/// resulting state. Useful for poking at a running backend without the
/// browser frontend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,moodtunes=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded, backend at {}", config.backend_url);

    let backend = Arc::new(HttpBackend::new(&config));
    let store = Arc::new(MemoryStore::new());
    let controller = AppController::new(config, backend, store);

    let username = std::env::var("DEMO_USERNAME").unwrap_or_else(|_| "test".to_string());
    let email = std::env::var("DEMO_EMAIL").unwrap_or_else(|_| "test@example.com".to_string());
    let password = std::env::var("DEMO_PASSWORD").unwrap_or_else(|_| "password".to_string());

    controller.login(&username, &email, &password).await?;

    let state = controller.snapshot().await;
    if !state.session.is_logged_in {
        tracing::error!("Login failed, see notifications above");
        return Ok(());
    }

    // Rate the first five songs so recommendations unlock.
    let song_ids: Vec<u32> = state.songs.iter().take(5).map(|s| s.id).collect();
    for (i, id) in song_ids.iter().enumerate() {
        controller.rate_song(*id, if i % 2 == 0 { 5 } else { 4 }).await?;
    }

    controller.set_tab(Tab::Recommend).await?;
    let state = controller.snapshot().await;
    tracing::info!("Got {} recommendations", state.recommendations.len());
    for rec in &state.recommendations {
        println!("{} - {} ({})", rec.title, rec.artist, rec.explanation);
    }

    controller.set_tab(Tab::Chat).await?;
    controller.send_message("推荐一些歌").await?;
    let state = controller.snapshot().await;
    for message in &state.chat_history {
        let who = if message.is_user { "you" } else { "assistant" };
        println!("[{}] {}", who, message.content);
    }

    Ok(())
}
