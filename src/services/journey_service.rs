//! User journey service
//!
//! Loads a user's sessions in a date range and the events of those sessions,
//! then hands them to the journey fold.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::analytics::{JourneyResponse, build_journey};
use crate::errors::{AnalyticsError, Result};
use crate::storage::AnalyticsStore;

pub struct JourneyService {
    store: Arc<dyn AnalyticsStore>,
}

impl JourneyService {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Self {
        Self { store }
    }

    /// 解析日期，支持 RFC3339 和 YYYY-MM-DD（按 UTC 零点）格式
    pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            })
    }

    /// 严格解析 `from`/`to`，缺失、格式错误或 from > to 均返回错误
    pub fn parse_range(
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let from = Self::parse_param("from", from)?;
        let to = Self::parse_param("to", to)?;
        if from > to {
            return Err(AnalyticsError::invalid_date_range(
                "'from' must not be later than 'to'",
            ));
        }
        Ok((from, to))
    }

    fn parse_param(name: &str, value: Option<&str>) -> Result<DateTime<Utc>> {
        let value = value.map(str::trim).filter(|v| !v.is_empty()).ok_or_else(|| {
            AnalyticsError::invalid_date_range(format!("Missing required parameter '{}'", name))
        })?;
        Self::parse_date(value).ok_or_else(|| {
            AnalyticsError::invalid_date_range(format!(
                "Invalid '{}' date: '{}'. Supported formats: RFC3339 or YYYY-MM-DD",
                name, value
            ))
        })
    }

    /// 重建用户在 `[from, to]` 内的访问路径
    ///
    /// 没有匹配的 session 时返回 `Ok(None)`，由调用方渲染为空结果。
    pub async fn get_journey(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Option<JourneyResponse>> {
        if from > to {
            return Err(AnalyticsError::invalid_date_range(
                "'from' must not be later than 'to'",
            ));
        }

        info!(
            "Analytics: journey for user={}, from={}, to={}",
            user_id, from, to
        );

        let sessions = self.store.sessions_for_user(user_id, from, to).await?;
        if sessions.is_empty() {
            debug!("No sessions for user {} in range", user_id);
            return Ok(None);
        }

        let session_ids: Vec<String> = sessions.iter().map(|s| s.session_id.clone()).collect();
        let events = self.store.events_for_sessions(user_id, &session_ids).await?;
        debug!(
            "Journey input: {} sessions, {} events",
            sessions.len(),
            events.len()
        );

        Ok(build_journey(&sessions, events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let rfc = JourneyService::parse_date("2025-03-01T10:00:00+08:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2025-03-01T02:00:00+00:00");

        let day = JourneyService::parse_date("2025-03-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2025-03-01T00:00:00+00:00");

        assert!(JourneyService::parse_date("03/01/2025").is_none());
    }

    #[test]
    fn test_parse_range_rejects_reversed_bounds() {
        let err = JourneyService::parse_range(Some("2025-03-02"), Some("2025-03-01")).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidDateRange(_)));
    }

    #[test]
    fn test_parse_range_names_missing_parameter() {
        let err = JourneyService::parse_range(Some("2025-03-01"), None).unwrap_err();
        assert!(err.message().contains("'to'"));

        let err = JourneyService::parse_range(Some("soon"), Some("2025-03-01")).unwrap_err();
        assert!(err.message().contains("'from'"));
    }

    #[test]
    fn test_parse_range_accepts_equal_bounds() {
        let (from, to) =
            JourneyService::parse_range(Some("2025-03-01"), Some("2025-03-01")).unwrap();
        assert_eq!(from, to);
    }
}
