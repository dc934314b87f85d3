use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("text service returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("empty completion from model")]
    EmptyCompletion,

    #[error("malformed concepts payload: {0}")]
    MalformedConcepts(String),

    #[error("API key environment variable '{0}' is not set")]
    MissingApiKey(String),
}
