use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::warn;

use crate::external::market_data_provider::ProviderError;
use crate::services::quote_normalizer::upstream_failure;

/// Send a request and decode the body as JSON.
///
/// Vendors report failures both through HTTP status codes and through error
/// fields in a 200 body. A non-2xx reply carrying a recognisable error field
/// is surfaced as [`ProviderError::Upstream`], an HTTP 404 as
/// [`ProviderError::SymbolNotFound`]; anything else non-2xx is a transport
/// failure.
pub async fn get_json(request: RequestBuilder) -> Result<Value, ProviderError> {
    let resp = request
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;

    interpret(status, &body)
}

fn interpret(status: StatusCode, body: &str) -> Result<Value, ProviderError> {
    let not_found = status == StatusCode::NOT_FOUND;

    match serde_json::from_str::<Value>(body) {
        Ok(value) if status.is_success() => Ok(value),
        Ok(value) => {
            warn!("Upstream returned HTTP {}", status);
            Err(match upstream_failure(&value) {
                Some(ProviderError::Upstream(msg)) if not_found => ProviderError::SymbolNotFound(msg),
                Some(err) => err,
                None if not_found => {
                    ProviderError::SymbolNotFound(format!("upstream returned HTTP {}", status))
                }
                None => ProviderError::Network(format!("upstream returned HTTP {}", status)),
            })
        }
        Err(e) if status.is_success() => Err(ProviderError::Parse(e.to_string())),
        Err(_) if not_found => Err(ProviderError::SymbolNotFound(format!(
            "upstream returned HTTP {}",
            status
        ))),
        Err(_) => Err(ProviderError::Network(format!("upstream returned HTTP {}", status))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body_is_returned() {
        let value = interpret(StatusCode::OK, r#"{"status":"OK","resultsCount":0}"#).unwrap();
        assert_eq!(value["resultsCount"], 0);

        let err = interpret(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_http_404_is_symbol_not_found() {
        let polygon = r#"{"status":"NOT_FOUND","request_id":"6a7e","message":"Ticker not found."}"#;
        assert_eq!(
            interpret(StatusCode::NOT_FOUND, polygon).unwrap_err(),
            ProviderError::SymbolNotFound("Ticker not found.".into())
        );

        assert_eq!(
            interpret(StatusCode::NOT_FOUND, r#"{"error":"Unknown symbol"}"#).unwrap_err(),
            ProviderError::SymbolNotFound("Unknown symbol".into())
        );

        assert!(matches!(
            interpret(StatusCode::NOT_FOUND, "Not Found").unwrap_err(),
            ProviderError::SymbolNotFound(_)
        ));
    }

    #[test]
    fn test_other_failures_keep_their_kind() {
        assert_eq!(
            interpret(StatusCode::UNAUTHORIZED, r#"{"error":"Invalid API key"}"#).unwrap_err(),
            ProviderError::Upstream("Invalid API key".into())
        );
        assert!(matches!(
            interpret(StatusCode::BAD_GATEWAY, "").unwrap_err(),
            ProviderError::Network(_)
        ));
    }
}
