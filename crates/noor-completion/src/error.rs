use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("invalid completion config: {0}")]
    Config(String),

    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse completion response: {0}")]
    Decode(#[from] serde_json::Error),
}
