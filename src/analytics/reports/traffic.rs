use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::{by_day, rank_desc};
use crate::analytics::model::{EventRecord, EventType, SessionRecord};

/// 计入页面浏览量的事件类型
pub const PAGE_VIEW_TYPES: [EventType; 3] =
    [EventType::PageView, EventType::Search, EventType::OrderPlaced];

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficReport {
    pub total_sessions: u64,
    pub active_users: u64,
    pub page_views_by_page: Vec<PageViews>,
    pub sessions_over_time: Vec<DailySessions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageViews {
    pub page: Option<String>,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySessions {
    pub date: String,
    pub sessions: u64,
}

/// Traffic over sessions started in the window.
///
/// `events` are the events of those sessions; events belonging to other
/// sessions and non-view event types are ignored.
pub fn build_traffic(sessions: &[SessionRecord], events: &[EventRecord]) -> Option<TrafficReport> {
    if sessions.is_empty() {
        return None;
    }

    let session_ids: HashSet<&str> = sessions.iter().map(|s| s.session_id.as_str()).collect();
    let active_users = sessions
        .iter()
        .map(|s| s.user_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;

    let mut views: HashMap<Option<String>, u64> = HashMap::new();
    for event in events.iter().filter(|e| {
        PAGE_VIEW_TYPES.contains(&e.event_type) && session_ids.contains(e.session_id.as_str())
    }) {
        *views.entry(event.page.clone()).or_insert(0) += 1;
    }

    Some(TrafficReport {
        total_sessions: sessions.len() as u64,
        active_users,
        page_views_by_page: rank_desc(views)
            .into_iter()
            .map(|(page, views)| PageViews { page, views })
            .collect(),
        sessions_over_time: by_day(sessions.iter().map(|s| &s.started_at))
            .into_iter()
            .map(|(date, sessions)| DailySessions { date, sessions })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::model::Metadata;
    use chrono::{DateTime, Duration, Utc};

    fn base() -> DateTime<Utc> {
        "2025-03-01T22:00:00Z".parse().unwrap()
    }

    fn session(id: &str, user: &str, offset_hours: i64) -> SessionRecord {
        let started_at = base() + Duration::hours(offset_hours);
        SessionRecord {
            session_id: id.into(),
            user_id: user.into(),
            started_at,
            last_activity_at: started_at,
            ended_at: started_at,
            metadata: Metadata::new(),
        }
    }

    fn event(id: i64, session_id: &str, event_type: EventType, page: Option<&str>) -> EventRecord {
        EventRecord {
            id,
            user_id: "u".into(),
            session_id: session_id.into(),
            event_type,
            page: page.map(String::from),
            timestamp: base(),
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_empty_window_is_none() {
        assert_eq!(build_traffic(&[], &[]), None);
    }

    #[test]
    fn test_traffic_facets() {
        let sessions = vec![
            session("s1", "u1", 0),
            session("s2", "u1", 1),
            session("s3", "u2", 3),
        ];
        let events = vec![
            event(1, "s1", EventType::PageView, Some("/home")),
            event(2, "s1", EventType::Search, Some("/search")),
            event(3, "s2", EventType::PageView, Some("/home")),
            event(4, "s2", EventType::AddToCart, Some("/home")),
            event(5, "s3", EventType::OrderPlaced, Some("/checkout")),
            event(6, "s3", EventType::ScrollDepth, Some("/checkout")),
            event(7, "elsewhere", EventType::PageView, Some("/home")),
        ];

        let report = build_traffic(&sessions, &events).unwrap();
        assert_eq!(report.total_sessions, 3);
        assert_eq!(report.active_users, 2);
        assert_eq!(
            report.page_views_by_page,
            vec![
                PageViews { page: Some("/home".into()), views: 2 },
                PageViews { page: Some("/checkout".into()), views: 1 },
                PageViews { page: Some("/search".into()), views: 1 },
            ]
        );
        assert_eq!(
            report.sessions_over_time,
            vec![
                DailySessions { date: "2025-03-01".into(), sessions: 2 },
                DailySessions { date: "2025-03-02".into(), sessions: 1 },
            ]
        );
    }

    #[test]
    fn test_sessions_without_view_events() {
        let sessions = vec![session("s1", "u1", 0)];
        let report = build_traffic(&sessions, &[]).unwrap();
        assert_eq!(report.total_sessions, 1);
        assert!(report.page_views_by_page.is_empty());
    }
}
