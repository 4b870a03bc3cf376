#![forbid(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum BreedError {
    #[error("breed cache: {0}")]
    Cache(String),
    #[error("breed registry: {0}")]
    Registry(String),
    #[error("breed lookup timed out")]
    Timeout,
}

impl From<redis::RedisError> for BreedError {
    fn from(value: redis::RedisError) -> Self {
        if value.is_timeout() {
            return Self::Timeout;
        }
        Self::Cache(value.to_string())
    }
}

impl From<reqwest::Error> for BreedError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            return Self::Timeout;
        }
        Self::Registry(value.to_string())
    }
}
