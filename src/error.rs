use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("No folder loaded")]
    NoFolderLoaded,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ExplorerError {
    /// Builds the error for a non-success HTTP response.
    ///
    /// The service reports failures as `{"error": "..."}` or
    /// `{"message": "..."}`; anything else is passed through as raw text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("HTTP {status}")
                } else {
                    trimmed.to_string()
                }
            });

        if status == 404 {
            ExplorerError::NotFound(message)
        } else {
            ExplorerError::ApiError { status, message }
        }
    }

    /// True for failures raised before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ExplorerError::EmptyName
                | ExplorerError::NoFolderLoaded
                | ExplorerError::FileNotFound(_)
                | ExplorerError::InvalidConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
