use serde::{Deserialize, Serialize};

/// Top-level view state of the application. Navigation is a direct
/// assignment; the only gated transition is `Rate`, which requires a
/// logged-in session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Welcome,
    Login,
    Register,
    Rate,
    Recommend,
    Chat,
    Survey,
    Game,
    Evaluate,
    Admin,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Welcome => "welcome",
            Tab::Login => "login",
            Tab::Register => "register",
            Tab::Rate => "rate",
            Tab::Recommend => "recommend",
            Tab::Chat => "chat",
            Tab::Survey => "survey",
            Tab::Game => "game",
            Tab::Evaluate => "evaluate",
            Tab::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
