use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::errors::AppError;
use crate::external::market_data_provider::{MarketDataProvider, ProviderError};
use crate::services::quote_normalizer::normalize_search;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolInput {
    /// Looks like an exchange ticker, used as-is (uppercased)
    Ticker(String),
    /// Free text such as a company name, resolved through symbol search
    Name(String),
}

fn ticker_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9]{1,6}([.-][A-Za-z0-9]{1,4})?$").expect("valid ticker regex"))
}

fn name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9 .,&'-]{2,64}$").expect("valid name regex"))
}

/// Mixed-case words such as "Tesla" are company names even when they fit
/// the ticker pattern; tickers are typed in one case.
fn is_mixed_case(input: &str) -> bool {
    input.chars().any(|c| c.is_ascii_uppercase()) && input.chars().any(|c| c.is_ascii_lowercase())
}

pub fn classify(input: &str) -> Result<SymbolInput, AppError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(AppError::MissingParameter("Stock parameter is required".into()));
    }
    if ticker_pattern().is_match(input) && !is_mixed_case(input) {
        return Ok(SymbolInput::Ticker(input.to_uppercase()));
    }
    if name_pattern().is_match(input) {
        return Ok(SymbolInput::Name(input.to_string()));
    }

    Err(AppError::InvalidSymbol(input.to_string()))
}

/// Turn the user's input into a ticker, searching the provider when the
/// input isn't ticker-shaped.
pub async fn resolve_symbol(
    provider: &dyn MarketDataProvider,
    input: &str,
) -> Result<String, AppError> {
    match classify(input)? {
        SymbolInput::Ticker(symbol) => Ok(symbol),
        SymbolInput::Name(name) => {
            info!("Searching {} for symbol matching '{}'", provider.kind(), name);
            let not_found = |e: ProviderError| match e {
                ProviderError::SymbolNotFound(_) => ProviderError::SymbolNotFound(name.clone()),
                other => other,
            };
            let raw = provider.search_symbol(&name).await.map_err(not_found)?;
            let symbol = normalize_search(provider.kind(), &raw)
                .map_err(not_found)?
                .ok_or(ProviderError::SymbolNotFound(name.clone()))?;
            info!("Resolved '{}' to {}", name, symbol);
            Ok(symbol.to_uppercase())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::stub::StubProvider;
    use crate::models::ProviderKind;
    use serde_json::json;

    #[test]
    fn test_classify_tickers() {
        assert_eq!(classify("aapl").unwrap(), SymbolInput::Ticker("AAPL".into()));
        assert_eq!(classify(" BRK.B ").unwrap(), SymbolInput::Ticker("BRK.B".into()));
        assert_eq!(classify("RY-TO").unwrap(), SymbolInput::Ticker("RY-TO".into()));
        assert_eq!(classify("tsla").unwrap(), SymbolInput::Ticker("TSLA".into()));
    }

    #[test]
    fn test_capitalised_words_are_names() {
        assert_eq!(classify("Tesla").unwrap(), SymbolInput::Name("Tesla".into()));
        assert_eq!(classify("Apple").unwrap(), SymbolInput::Name("Apple".into()));
        assert_eq!(classify("BRK.b").unwrap(), SymbolInput::Name("BRK.b".into()));
    }

    #[test]
    fn test_classify_names_and_rejects() {
        assert_eq!(classify("Apple Inc").unwrap(), SymbolInput::Name("Apple Inc".into()));
        assert!(matches!(classify("   "), Err(AppError::MissingParameter(_))));
        assert!(matches!(classify("AAPL; DROP"), Err(AppError::InvalidSymbol(_))));
        assert!(matches!(classify("../etc/passwd"), Err(AppError::InvalidSymbol(_))));
    }

    #[tokio::test]
    async fn test_ticker_does_not_hit_search() {
        let provider = StubProvider::new(ProviderKind::Fmp, json!({}));

        let symbol = resolve_symbol(&provider, "msft").await.unwrap();

        assert_eq!(symbol, "MSFT");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_name_resolves_through_search() {
        let provider = StubProvider::new(ProviderKind::Fmp, json!({}))
            .with_search(json!([{ "symbol": "AAPL", "name": "Apple Inc." }]));

        assert_eq!(resolve_symbol(&provider, "Apple Inc").await.unwrap(), "AAPL");
    }

    #[tokio::test]
    async fn test_capitalised_name_resolves_through_search() {
        let provider = StubProvider::new(ProviderKind::Polygon, json!({}))
            .with_search(json!({ "status": "OK", "results": [{ "ticker": "TSLA", "name": "Tesla, Inc." }] }));

        assert_eq!(resolve_symbol(&provider, "Tesla").await.unwrap(), "TSLA");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_name_without_match_is_not_found() {
        let provider = StubProvider::new(ProviderKind::Finnhub, json!({}))
            .with_search(json!({ "count": 0, "result": [] }));

        let err = resolve_symbol(&provider, "No Such Company").await.unwrap_err();
        assert_eq!(err, AppError::NotFound("Symbol not found: No Such Company".into()));
    }
}
