use thiserror::Error;

pub type Result<T, E = FilterError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid filter configuration: {0}")]
    InvalidConfig(String),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid context url: {0}")]
    Url(#[from] url::ParseError),
}
