use thiserror::Error;

use crate::control::RateLimitExceeded;

/// Why a write request was turned away. None of these mutate state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    RateLimited(#[from] RateLimitExceeded),
}

impl Error {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
