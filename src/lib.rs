pub mod app;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod emotion;
pub mod error;
pub mod game;
pub mod models;
pub mod session;

pub use app::{AppController, AppState};
pub use backend::{HttpBackend, MusicBackend};
pub use config::Config;
pub use emotion::{classify, map_genre_to_emotion, EmotionLabel, EmotionResult};
pub use error::{AppError, Result};
pub use game::{GameHooks, GameResults, NoopGame};
pub use session::{MemoryStore, SessionStore};
