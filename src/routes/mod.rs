pub(crate) mod health;
pub(crate) mod news;
pub(crate) mod quotes;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{QuoteQueryParams, RangeToken};

const REQUIRED_PARAMS: &str = "Stock and range parameters are required";

/// Validated common query parameters of the chart endpoints.
#[derive(Debug, Clone)]
pub(crate) struct ChartParams {
    pub stock: String,
    pub range: RangeToken,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    non_empty(value)
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| {
                AppError::InvalidParameter(format!("{} must be a YYYY-MM-DD date, got '{}'", name, v))
            })
        })
        .transpose()
}

impl ChartParams {
    pub fn from_query(
        query: Result<Query<QuoteQueryParams>, QueryRejection>,
    ) -> Result<Self, AppError> {
        let Query(params) =
            query.map_err(|e| AppError::InvalidParameter(e.body_text()))?;

        let (stock, range) = match (non_empty(params.stock.as_deref()), non_empty(params.range.as_deref())) {
            (Some(stock), Some(range)) => (stock.to_string(), RangeToken::from_param(range)),
            _ => return Err(AppError::MissingParameter(REQUIRED_PARAMS.to_string())),
        };

        let start_date = parse_date("startDate", params.start_date.as_deref())?;
        let end_date = parse_date("endDate", params.end_date.as_deref())?;

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(AppError::InvalidParameter(
                    "startDate must not be after endDate".to_string(),
                ));
            }
        }

        Ok(Self { stock, range, start_date, end_date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(stock: Option<&str>, range: Option<&str>, start: Option<&str>, end: Option<&str>) -> Result<ChartParams, AppError> {
        ChartParams::from_query(Ok(Query(QuoteQueryParams {
            stock: stock.map(str::to_string),
            range: range.map(str::to_string),
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        })))
    }

    #[test]
    fn test_missing_or_blank_params() {
        let expected = AppError::MissingParameter(REQUIRED_PARAMS.to_string());
        assert_eq!(params(None, Some("1M"), None, None).unwrap_err(), expected);
        assert_eq!(params(Some("AAPL"), None, None, None).unwrap_err(), expected);
        assert_eq!(params(Some("  "), Some("1M"), None, None).unwrap_err(), expected);
    }

    #[test]
    fn test_dates_are_parsed_and_ordered() {
        let ok = params(Some("AAPL"), Some("custom"), Some("2024-01-02"), Some("2024-02-01")).unwrap();
        assert_eq!(ok.range, RangeToken::Custom);
        assert_eq!(ok.start_date, NaiveDate::from_ymd_opt(2024, 1, 2));

        assert!(matches!(
            params(Some("AAPL"), Some("custom"), Some("01/02/2024"), None),
            Err(AppError::InvalidParameter(_))
        ));
        assert!(matches!(
            params(Some("AAPL"), Some("custom"), Some("2024-02-01"), Some("2024-01-02")),
            Err(AppError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_unknown_range_is_not_an_error() {
        let ok = params(Some("AAPL"), Some("10Y"), None, None).unwrap();
        assert_eq!(ok.range, RangeToken::OneDay);
    }
}
