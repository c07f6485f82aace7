use serde::{Deserialize, Serialize};

/// A single close price at a point in time, as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotePoint {
    pub timestamp: String,
    pub close: f64,
}

/// Optional company metadata merged into a quote response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyProfile {
    pub company_name: Option<String>,
    pub market_cap: Option<f64>,
    pub revenue: Option<f64>,
    pub description: Option<String>,
}

/// Uniform response returned by `/api/fetch.json`, independent of which
/// provider served it. `dates` and `prices` are index-aligned, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedQuote {
    #[serde(rename = "stock")]
    pub symbol: String,
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl NormalizedQuote {
    pub fn new(symbol: String, points: Vec<QuotePoint>, profile: CompanyProfile) -> Self {
        let (dates, prices) = points
            .into_iter()
            .map(|p| (p.timestamp, p.close))
            .unzip();

        Self {
            symbol,
            dates,
            prices,
            market_cap: profile.market_cap,
            revenue: profile.revenue,
            description: profile.description,
            company_name: profile.company_name,
        }
    }
}

/// Query string accepted by `/api/fetch.json` and `/api/news.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteQueryParams {
    pub stock: Option<String>,
    pub range: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}
