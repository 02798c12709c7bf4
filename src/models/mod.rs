pub mod chat;
pub mod notification;
pub mod song;
pub mod tab;
pub mod user;

pub use chat::ChatMessage;
pub use notification::{Notification, Severity};
pub use song::{Provenance, Recommendation, Song};
pub use tab::Tab;
pub use user::{LoginRequest, RegisterRequest, UserRecord, UserSession};
