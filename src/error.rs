#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Precondition not met: {0}")]
    PreconditionNotMet(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Backend(format!("Request failed: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
