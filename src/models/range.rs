use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Time window selected by the user. Drives both the upstream query shape and
/// the chart's axis granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RangeToken {
    #[default]
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "custom")]
    Custom,
}

impl RangeToken {
    /// Parse a query-string token. Unrecognised tokens fall back to the
    /// default range instead of failing.
    pub fn from_param(value: &str) -> Self {
        match value.trim() {
            "1D" => RangeToken::OneDay,
            "1W" => RangeToken::OneWeek,
            "1M" => RangeToken::OneMonth,
            "1Y" => RangeToken::OneYear,
            "ALL" => RangeToken::All,
            "custom" => RangeToken::Custom,
            _ => RangeToken::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeToken::OneDay => "1D",
            RangeToken::OneWeek => "1W",
            RangeToken::OneMonth => "1M",
            RangeToken::OneYear => "1Y",
            RangeToken::All => "ALL",
            RangeToken::Custom => "custom",
        }
    }
}

impl std::fmt::Display for RangeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provider-neutral sampling granularity. Each adapter renders it into its
/// own vocabulary ("5min", "60", "1day", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    FiveMinute,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    pub fn is_intraday(&self) -> bool {
        matches!(self, Interval::FiveMinute | Interval::Hourly)
    }
}

/// Concrete upstream query derived from a [`RangeToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    pub interval: Interval,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Cap used by providers that cannot filter by date server-side.
    /// `None` means the date window itself bounds the series.
    pub max_points: Option<usize>,
}
