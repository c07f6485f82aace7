use chrono::{Duration, Months, NaiveDate};

use crate::models::{Interval, ProviderQuery, RangeToken};

/// 5-minute bars in a regular 6.5h session
pub const INTRADAY_POINTS: usize = 78;
pub const WEEK_HOURLY_POINTS: usize = 168;
pub const MONTH_DAILY_POINTS: usize = 30;
pub const YEAR_WEEKLY_POINTS: usize = 52;
pub const ALL_MONTHLY_POINTS: usize = 60;

const ALL_YEARS: u32 = 5;

fn months_back(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(today)
}

/// Map a range token to the query an upstream provider needs.
///
/// Total over every token. `Custom` uses the caller's dates verbatim when
/// both are present and otherwise falls back to the default (1D) window.
pub fn resolve(
    range: RangeToken,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
    today: NaiveDate,
) -> ProviderQuery {
    match (range, custom_start, custom_end) {
        (RangeToken::Custom, Some(start_date), Some(end_date)) => ProviderQuery {
            interval: Interval::Daily,
            start_date,
            end_date,
            max_points: None,
        },
        (RangeToken::OneWeek, _, _) => ProviderQuery {
            interval: Interval::Hourly,
            start_date: today - Duration::days(7),
            end_date: today,
            max_points: Some(WEEK_HOURLY_POINTS),
        },
        (RangeToken::OneMonth, _, _) => ProviderQuery {
            interval: Interval::Daily,
            start_date: months_back(today, 1),
            end_date: today,
            max_points: Some(MONTH_DAILY_POINTS),
        },
        (RangeToken::OneYear, _, _) => ProviderQuery {
            interval: Interval::Weekly,
            start_date: months_back(today, 12),
            end_date: today,
            max_points: Some(YEAR_WEEKLY_POINTS),
        },
        (RangeToken::All, _, _) => ProviderQuery {
            interval: Interval::Monthly,
            start_date: months_back(today, 12 * ALL_YEARS),
            end_date: today,
            max_points: Some(ALL_MONTHLY_POINTS),
        },
        _ => ProviderQuery {
            interval: Interval::FiveMinute,
            start_date: today,
            end_date: today,
            max_points: Some(INTRADAY_POINTS),
        },
    }
}

/// Date window for company news. News has no intraday or multi-year view, so
/// anything other than 1W, 1Y or a complete custom window gets one month.
pub fn news_window(
    range: RangeToken,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    match (range, custom_start, custom_end) {
        (RangeToken::Custom, Some(start), Some(end)) => (start, end),
        (RangeToken::OneWeek, _, _) => (today - Duration::days(7), today),
        (RangeToken::OneYear, _, _) => (months_back(today, 12), today),
        _ => (months_back(today, 1), today),
    }
}
