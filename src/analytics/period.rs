//! Period token resolution
//!
//! Converts symbolic periods (`today`, `last_7_days`, ...) into concrete
//! `[start, end]` instant pairs relative to an injected `now`. Boundaries are
//! computed in the time zone carried by `now`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::errors::{AnalyticsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Period {
    Today,
    Yesterday,
    #[strum(to_string = "last_7_days")]
    Last7Days,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
}

/// 一周的起始日
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    fn days_since_start(self, date: NaiveDate) -> i64 {
        let weekday = date.weekday();
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday() as i64,
            WeekStart::Monday => weekday.num_days_from_monday() as i64,
        }
    }
}

/// 闭区间 `[start, end]`
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRange<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> TimeRange<Tz> {
    pub fn to_utc(&self) -> TimeRange<Utc> {
        TimeRange {
            start: self.start.with_timezone(&Utc),
            end: self.end.with_timezone(&Utc),
        }
    }
}

impl Period {
    /// 解析 period token，大小写敏感，不做 trim
    pub fn parse(token: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(AnalyticsError::invalid_period(
                "Period must not be empty",
            ));
        }
        Period::from_str(token).map_err(|_| {
            AnalyticsError::invalid_period(format!(
                "Unsupported period: '{}'. Supported periods: {}",
                token,
                Period::supported().join(", ")
            ))
        })
    }

    pub fn supported() -> Vec<&'static str> {
        Period::iter().map(<&'static str>::from).collect()
    }

    pub fn range<Tz: TimeZone>(self, now: &DateTime<Tz>, week_start: WeekStart) -> TimeRange<Tz> {
        let tz = now.timezone();
        let today = now.date_naive();
        let up_to_now = |date: NaiveDate| TimeRange {
            start: start_of_day(&tz, date),
            end: now.clone(),
        };
        let whole_days = |first: NaiveDate, last: NaiveDate| TimeRange {
            start: start_of_day(&tz, first),
            end: end_of_day(&tz, last),
        };

        match self {
            Period::Today => up_to_now(today),
            Period::Yesterday => {
                let yesterday = today - Duration::days(1);
                whole_days(yesterday, yesterday)
            }
            Period::Last7Days => up_to_now(today - Duration::days(6)),
            Period::ThisWeek => up_to_now(week_start_of(today, week_start)),
            Period::LastWeek => {
                let this_week = week_start_of(today, week_start);
                whole_days(this_week - Duration::days(7), this_week - Duration::days(1))
            }
            Period::ThisMonth => up_to_now(first_of_month(today)),
            Period::LastMonth => {
                let last_day = first_of_month(today) - Duration::days(1);
                whole_days(first_of_month(last_day), last_day)
            }
            Period::ThisYear => up_to_now(first_of_year(today)),
            Period::LastYear => {
                let last_day = first_of_year(today) - Duration::days(1);
                whole_days(first_of_year(last_day), last_day)
            }
        }
    }
}

/// Resolves a period token against `now`.
///
/// Pure given `now`: an unknown or empty token fails with
/// [`AnalyticsError::InvalidPeriod`] before anything else happens.
pub fn resolve<Tz: TimeZone>(
    token: &str,
    now: &DateTime<Tz>,
    week_start: WeekStart,
) -> Result<TimeRange<Tz>> {
    Ok(Period::parse(token)?.range(now, week_start))
}

fn week_start_of(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    date - Duration::days(week_start.days_since_start(date))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.ordinal0() as i64)
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    // 午夜落在夏令时跳变缺口时，取之后第一个存在的整点
    (0..3)
        .find_map(|h| {
            tz.from_local_datetime(&(midnight + Duration::hours(h)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let last_ms = NaiveDateTime::new(date, last_millisecond());
    tz.from_local_datetime(&last_ms)
        .latest()
        .unwrap_or_else(|| tz.from_utc_datetime(&last_ms))
}

fn last_millisecond() -> NaiveTime {
    NaiveTime::MIN - Duration::milliseconds(1)
}
