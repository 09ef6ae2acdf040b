// exchange/errors.rs - Exchange error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Upbit API error: {0}")]
    ApiError(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("failed to parse exchange response: {0}")]
    ParseError(String),

    #[error("missing required field in exchange response: {0}")]
    MissingField(&'static str),

    #[error("invalid market symbol: {0}")]
    InvalidSymbol(String),

    #[error("failed to sign exchange request: {0}")]
    SigningError(String),
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::ParseError(err.to_string())
    }
}
