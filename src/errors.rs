use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::external::market_data_provider::ProviderError;

#[derive(Debug, Error, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    MissingParameter(String),
    #[error("{0}")]
    InvalidParameter(String),
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("{0}")]
    UpstreamFormat(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_)
            | AppError::InvalidParameter(_)
            | AppError::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamUnavailable(_) | AppError::UpstreamFormat(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::Network(_) | ProviderError::NotConfigured(_) => {
                AppError::UpstreamUnavailable(value.to_string())
            }
            ProviderError::Upstream(msg) => AppError::UpstreamFormat(msg),
            ProviderError::MissingSeries(_) | ProviderError::Parse(_) => {
                AppError::UpstreamFormat(value.to_string())
            }
            ProviderError::EmptySeries(symbol) => {
                AppError::NotFound(format!("No data found for symbol {}", symbol))
            }
            ProviderError::SymbolNotFound(symbol) => {
                AppError::NotFound(format!("Symbol not found: {}", symbol))
            }
        }
    }
}
