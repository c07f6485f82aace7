use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::external::market_data_provider::ProviderError;
use crate::models::{CompanyProfile, Interval, NormalizedQuote, ProviderKind, ProviderQuery, QuotePoint};

// ==============================================================================
// Provider field tables
// ==============================================================================

#[derive(Debug, Clone, Copy)]
enum TimeField {
    /// Already an ISO date or datetime string
    Text(&'static str),
    EpochMillis(&'static str),
    EpochSeconds(&'static str),
}

impl TimeField {
    fn key(&self) -> &'static str {
        match self {
            TimeField::Text(k) | TimeField::EpochMillis(k) | TimeField::EpochSeconds(k) => *k,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SeriesLayout {
    /// Object keyed by timestamp, found under the first key containing `marker`
    Keyed { marker: &'static str, close: &'static str },
    /// Array of bar objects, under `container` or at the root
    Bars { container: &'static str, time: TimeField, close: &'static str },
    /// Parallel arrays of timestamps and closes
    Columns { time: TimeField, close: &'static str },
}

#[derive(Debug, Clone, Copy)]
enum Container {
    Root,
    Field(&'static str),
    FirstElement,
}

#[derive(Debug, Clone, Copy)]
struct ProfileLayout {
    container: Container,
    name: &'static str,
    market_cap: Option<&'static str>,
    market_cap_scale: f64,
    revenue: Option<&'static str>,
    description: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
struct SearchLayout {
    container: Container,
    symbol: &'static str,
}

fn series_layout(kind: ProviderKind) -> SeriesLayout {
    match kind {
        ProviderKind::AlphaVantage => SeriesLayout::Keyed {
            marker: "Time Series",
            close: "4. close",
        },
        ProviderKind::TwelveData => SeriesLayout::Bars {
            container: "values",
            time: TimeField::Text("datetime"),
            close: "close",
        },
        ProviderKind::Polygon => SeriesLayout::Bars {
            container: "results",
            time: TimeField::EpochMillis("t"),
            close: "c",
        },
        ProviderKind::Finnhub => SeriesLayout::Columns {
            time: TimeField::EpochSeconds("t"),
            close: "c",
        },
        // intraday endpoints answer with a bare array
        ProviderKind::Fmp => SeriesLayout::Bars {
            container: "historical",
            time: TimeField::Text("date"),
            close: "close",
        },
    }
}

fn profile_layout(kind: ProviderKind) -> ProfileLayout {
    match kind {
        ProviderKind::AlphaVantage => ProfileLayout {
            container: Container::Root,
            name: "Name",
            market_cap: Some("MarketCapitalization"),
            market_cap_scale: 1.0,
            revenue: Some("RevenueTTM"),
            description: Some("Description"),
        },
        ProviderKind::TwelveData => ProfileLayout {
            container: Container::Root,
            name: "name",
            market_cap: None,
            market_cap_scale: 1.0,
            revenue: None,
            description: Some("description"),
        },
        ProviderKind::Polygon => ProfileLayout {
            container: Container::Field("results"),
            name: "name",
            market_cap: Some("market_cap"),
            market_cap_scale: 1.0,
            revenue: None,
            description: Some("description"),
        },
        // profile2 reports market cap in millions
        ProviderKind::Finnhub => ProfileLayout {
            container: Container::Root,
            name: "name",
            market_cap: Some("marketCapitalization"),
            market_cap_scale: 1_000_000.0,
            revenue: None,
            description: None,
        },
        ProviderKind::Fmp => ProfileLayout {
            container: Container::FirstElement,
            name: "companyName",
            market_cap: Some("mktCap"),
            market_cap_scale: 1.0,
            revenue: None,
            description: Some("description"),
        },
    }
}

fn search_layout(kind: ProviderKind) -> SearchLayout {
    match kind {
        ProviderKind::AlphaVantage => SearchLayout {
            container: Container::Field("bestMatches"),
            symbol: "1. symbol",
        },
        ProviderKind::TwelveData => SearchLayout {
            container: Container::Field("data"),
            symbol: "symbol",
        },
        ProviderKind::Polygon => SearchLayout {
            container: Container::Field("results"),
            symbol: "ticker",
        },
        ProviderKind::Finnhub => SearchLayout {
            container: Container::Field("result"),
            symbol: "symbol",
        },
        ProviderKind::Fmp => SearchLayout {
            container: Container::Root,
            symbol: "symbol",
        },
    }
}

// ==============================================================================
// Error detection
// ==============================================================================

/// Message of an error-shaped upstream payload, if any.
///
/// Covers `{"Error Message": ..}` and the throttle notes from Alpha Vantage,
/// `{"status": "error", "message": ..}` from Twelve Data,
/// `{"status": "ERROR", "error": ..}` from Polygon and `{"error": ..}` from
/// Finnhub.
pub fn upstream_error(raw: &Value) -> Option<String> {
    let obj = raw.as_object()?;

    for key in ["Error Message", "error", "Note", "Information"] {
        if let Some(msg) = obj.get(key).and_then(Value::as_str) {
            return Some(msg.to_string());
        }
    }

    let status = obj.get("status").and_then(Value::as_str)?;
    if status.eq_ignore_ascii_case("error") || status == "NOT_AUTHORIZED" {
        let msg = obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("upstream returned status: {}", status));
        return Some(msg);
    }

    None
}

/// Explicit not-found answers: Twelve Data's `{"code": 404, ..}` and
/// Polygon's `{"status": "NOT_FOUND", ..}`.
fn signals_not_found(raw: &Value) -> bool {
    raw.get("code").and_then(Value::as_u64) == Some(404)
        || raw.get("status").and_then(Value::as_str) == Some("NOT_FOUND")
}

/// Classify an error-shaped payload. Not-found answers become
/// [`ProviderError::SymbolNotFound`], anything else [`ProviderError::Upstream`].
pub fn upstream_failure(raw: &Value) -> Option<ProviderError> {
    if signals_not_found(raw) {
        let msg = upstream_error(raw)
            .or_else(|| raw.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| "symbol not found".to_string());
        return Some(ProviderError::SymbolNotFound(msg));
    }
    upstream_error(raw).map(ProviderError::Upstream)
}

/// Explicit "nothing here" markers that are not errors.
fn signals_no_data(kind: ProviderKind, raw: &Value) -> bool {
    match kind {
        ProviderKind::Polygon => raw.get("resultsCount").and_then(Value::as_u64) == Some(0),
        ProviderKind::Finnhub => raw.get("s").and_then(Value::as_str) == Some("no_data"),
        ProviderKind::Fmp => match raw {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        },
        ProviderKind::AlphaVantage | ProviderKind::TwelveData => false,
    }
}

// ==============================================================================
// Value coercion
// ==============================================================================

/// Numbers arrive as JSON numbers or as numeric strings depending on the
/// vendor (and sometimes the endpoint). Alpha Vantage uses "None" for unknown.
fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn coerce_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "None")
        .map(str::to_string)
}

fn render_epoch(dt: DateTime<Utc>, interval: Interval) -> String {
    if interval.is_intraday() {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

fn read_timestamp(
    value: Option<&Value>,
    field: TimeField,
    interval: Interval,
) -> Result<String, ProviderError> {
    let rendered = match field {
        TimeField::Text(_) => value.and_then(Value::as_str).map(str::to_string),
        TimeField::EpochMillis(_) => value
            .and_then(Value::as_i64)
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| render_epoch(dt, interval)),
        TimeField::EpochSeconds(_) => value
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| render_epoch(dt, interval)),
    };
    rendered.ok_or_else(|| {
        ProviderError::Parse(format!("invalid '{}' timestamp: {:?}", field.key(), value))
    })
}

/// `Ok(None)` for a null close (the bar is skipped), `Err` for anything else
/// that is not a number.
fn read_close(value: Option<&Value>, timestamp: &str) -> Result<Option<f64>, ProviderError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => coerce_f64(v)
            .map(Some)
            .ok_or_else(|| ProviderError::Parse(format!("invalid close value {} at {}", v, timestamp))),
    }
}

// ==============================================================================
// Extraction
// ==============================================================================

fn extract_points(
    layout: SeriesLayout,
    raw: &Value,
    interval: Interval,
) -> Result<Vec<QuotePoint>, ProviderError> {
    let mut points = Vec::new();

    match layout {
        SeriesLayout::Keyed { marker, close } => {
            let series = raw
                .as_object()
                .and_then(|obj| obj.iter().find(|(key, _)| key.contains(marker)))
                .and_then(|(_, value)| value.as_object())
                .ok_or_else(|| ProviderError::MissingSeries(format!("no '{}' object in response", marker)))?;

            for (timestamp, bar) in series {
                if let Some(close) = read_close(bar.get(close), timestamp)? {
                    points.push(QuotePoint { timestamp: timestamp.clone(), close });
                }
            }
        }
        SeriesLayout::Bars { container, time, close } => {
            let bars = (if raw.is_array() { Some(raw) } else { raw.get(container) })
                .and_then(Value::as_array)
                .ok_or_else(|| ProviderError::MissingSeries(format!("no '{}' array in response", container)))?;

            for bar in bars {
                let timestamp = read_timestamp(bar.get(time.key()), time, interval)?;
                if let Some(close) = read_close(bar.get(close), &timestamp)? {
                    points.push(QuotePoint { timestamp, close });
                }
            }
        }
        SeriesLayout::Columns { time, close } => {
            let time_key = time.key();
            let (times, closes) = match (
                raw.get(time_key).and_then(Value::as_array),
                raw.get(close).and_then(Value::as_array),
            ) {
                (Some(t), Some(c)) => (t, c),
                _ => {
                    return Err(ProviderError::MissingSeries(format!(
                        "no '{}'/'{}' arrays in response",
                        time_key, close
                    )))
                }
            };

            if times.len() != closes.len() {
                return Err(ProviderError::Parse(format!(
                    "{} timestamps but {} closes",
                    times.len(),
                    closes.len()
                )));
            }

            for (ts, c) in times.iter().zip(closes) {
                let timestamp = read_timestamp(Some(ts), time, interval)?;
                if let Some(close) = read_close(Some(c), &timestamp)? {
                    points.push(QuotePoint { timestamp, close });
                }
            }
        }
    }

    Ok(points)
}

fn date_of(timestamp: &str) -> Option<NaiveDate> {
    timestamp
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// Keep the `max` chronologically newest points, in source order.
fn keep_most_recent(points: &mut Vec<QuotePoint>, max: usize, newest_first: bool) {
    if points.len() <= max {
        return;
    }
    if newest_first {
        points.truncate(max);
    } else {
        points.drain(..points.len() - max);
    }
}

fn is_chronological(points: &[QuotePoint]) -> bool {
    points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}

// ==============================================================================
// Public API
// ==============================================================================

/// Extract close prices from a provider's time-series payload, oldest first.
///
/// Providers that can't bound a series by date are trimmed here: to the
/// `max_points` most recent points, or to the custom date window when there
/// is no cap. Trimming happens before the series is put in chronological
/// order.
pub fn normalize_series(
    kind: ProviderKind,
    raw: &Value,
    query: &ProviderQuery,
) -> Result<Vec<QuotePoint>, ProviderError> {
    if let Some(err) = upstream_failure(raw) {
        return Err(err);
    }
    if signals_no_data(kind, raw) {
        return Err(ProviderError::EmptySeries(kind.name().to_string()));
    }

    let mut points = extract_points(series_layout(kind), raw, query.interval)?;

    let newest_first = match (points.first(), points.last()) {
        (Some(first), Some(last)) => first.timestamp > last.timestamp,
        _ => false,
    };

    if !kind.filters_dates_server_side() {
        match query.max_points {
            Some(max) => keep_most_recent(&mut points, max, newest_first),
            None => points.retain(|p| {
                date_of(&p.timestamp)
                    .map(|d| d >= query.start_date && d <= query.end_date)
                    .unwrap_or(false)
            }),
        }
    }

    if newest_first {
        points.reverse();
    }
    if !is_chronological(&points) {
        points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    }

    if points.is_empty() {
        return Err(ProviderError::EmptySeries(kind.name().to_string()));
    }

    Ok(points)
}

/// Pull whichever profile fields the provider offers. Missing fields are
/// simply left out.
pub fn normalize_profile(kind: ProviderKind, raw: &Value) -> Result<CompanyProfile, ProviderError> {
    if let Some(err) = upstream_failure(raw) {
        return Err(err);
    }

    let layout = profile_layout(kind);
    let Some(source) = locate(raw, layout.container) else {
        return Ok(CompanyProfile::default());
    };

    Ok(CompanyProfile {
        company_name: coerce_text(source.get(layout.name)),
        market_cap: layout
            .market_cap
            .and_then(|key| source.get(key))
            .and_then(coerce_f64)
            .map(|v| v * layout.market_cap_scale),
        revenue: layout.revenue.and_then(|key| source.get(key)).and_then(coerce_f64),
        description: layout.description.and_then(|key| coerce_text(source.get(key))),
    })
}

/// First symbol returned by a provider's search endpoint.
pub fn normalize_search(kind: ProviderKind, raw: &Value) -> Result<Option<String>, ProviderError> {
    if let Some(err) = upstream_failure(raw) {
        return Err(err);
    }

    let layout = search_layout(kind);
    let symbol = locate(raw, layout.container)
        .and_then(Value::as_array)
        .and_then(|matches| {
            matches
                .iter()
                .find_map(|m| coerce_text(m.get(layout.symbol)))
        });

    Ok(symbol)
}

fn locate(raw: &Value, container: Container) -> Option<&Value> {
    match container {
        Container::Root => Some(raw),
        Container::Field(key) => raw.get(key),
        Container::FirstElement => raw.as_array().and_then(|items| items.first()),
    }
}

/// Reshape a provider's series (and optional profile) payload into the
/// uniform response.
pub fn normalize(
    kind: ProviderKind,
    symbol: &str,
    series: &Value,
    profile: Option<&Value>,
    query: &ProviderQuery,
) -> Result<NormalizedQuote, ProviderError> {
    let points = normalize_series(kind, series, query).map_err(|e| match e {
        ProviderError::EmptySeries(_) => ProviderError::EmptySeries(symbol.to_string()),
        ProviderError::SymbolNotFound(_) => ProviderError::SymbolNotFound(symbol.to_string()),
        other => other,
    })?;

    // an unknown ticker has no profile; the series decides the outcome
    let profile = match profile.map(|raw| normalize_profile(kind, raw)) {
        Some(Ok(profile)) => profile,
        None | Some(Err(ProviderError::SymbolNotFound(_))) => CompanyProfile::default(),
        Some(Err(e)) => return Err(e),
    };

    Ok(NormalizedQuote::new(symbol.to_string(), points, profile))
}
