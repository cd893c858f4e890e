use thiserror::Error;

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("Invalid sample request: {0}")]
    InvalidRequest(String),

    #[error("Problem has {num_variables} variables, sampler supports at most {max}")]
    TooManyVariables { num_variables: usize, max: usize },

    #[error("Missing sampler configuration: {0}")]
    MissingConfiguration(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Job failed with status: {0}")]
    JobFailed(String),

    #[error("Polling timeout after {0} attempts")]
    Timeout(u32),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Sampling was cancelled")]
    Cancelled,

    #[error("Sampler task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
