use crate::models::Tab;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub request_timeout: Duration,
    /// How long a notification stays visible before automatic removal.
    /// The two source variants disagreed (3s vs 5s); this is the single
    /// canonical knob, defaulting to 5s.
    pub notification_ttl: Duration,
    /// Tab shown when no persisted session is found.
    pub default_tab: Tab,
    /// Delay before the follow-up chat message with attached songs.
    pub chat_followup_delay: Duration,
    /// Delay before the therapeutic follow-up in the support branch.
    pub chat_support_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let notification_ttl_ms: u64 = env::var("NOTIFICATION_TTL_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("NOTIFICATION_TTL_MS must be an integer"))?;

        let default_tab = match env::var("DEFAULT_TAB").as_deref() {
            Ok("welcome") => Tab::Welcome,
            Ok("login") | Err(_) => Tab::Login,
            Ok(other) => {
                return Err(anyhow::anyhow!("Unknown DEFAULT_TAB: {}", other));
            }
        };

        Ok(Config {
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            ),
            notification_ttl: Duration::from_millis(notification_ttl_ms),
            default_tab,
            chat_followup_delay: Duration::from_millis(
                env::var("CHAT_FOLLOWUP_DELAY_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()
                    .unwrap_or(1000),
            ),
            chat_support_delay: Duration::from_millis(
                env::var("CHAT_SUPPORT_DELAY_MS")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse()
                    .unwrap_or(2000),
            ),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(10),
            notification_ttl: Duration::from_secs(5),
            default_tab: Tab::Login,
            chat_followup_delay: Duration::from_millis(1000),
            chat_support_delay: Duration::from_millis(2000),
        }
    }
}
