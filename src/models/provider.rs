use std::str::FromStr;

/// Market-data vendors the service knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    AlphaVantage,
    TwelveData,
    Polygon,
    Finnhub,
    Fmp,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::AlphaVantage => "Alpha Vantage",
            ProviderKind::TwelveData => "Twelve Data",
            ProviderKind::Polygon => "Polygon.io",
            ProviderKind::Finnhub => "Finnhub",
            ProviderKind::Fmp => "Financial Modeling Prep",
        }
    }

    /// Whether the vendor bounds a series by start/end date itself. Those
    /// that don't get trimmed locally.
    pub fn filters_dates_server_side(&self) -> bool {
        !matches!(self, ProviderKind::AlphaVantage)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alphavantage" | "alpha_vantage" => Ok(ProviderKind::AlphaVantage),
            "twelvedata" | "twelve_data" => Ok(ProviderKind::TwelveData),
            "polygon" => Ok(ProviderKind::Polygon),
            "finnhub" => Ok(ProviderKind::Finnhub),
            "fmp" | "financialmodelingprep" => Ok(ProviderKind::Fmp),
            other => Err(format!(
                "Invalid MARKET_DATA_PROVIDER: {}. Must be 'alphavantage', 'twelvedata', 'polygon', 'finnhub', or 'fmp'",
                other
            )),
        }
    }
}
