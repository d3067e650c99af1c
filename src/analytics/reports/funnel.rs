use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::rank_desc;
use crate::analytics::model::{EventRecord, EventType};

/// Funnel stage. Page views and searches share the browsing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunnelStep {
    PageViewOrSearch,
    AddToCart,
    OrderPlaced,
}

impl FunnelStep {
    fn from_event_type(event_type: EventType) -> Option<Self> {
        match event_type {
            EventType::PageView | EventType::Search => Some(FunnelStep::PageViewOrSearch),
            EventType::AddToCart => Some(FunnelStep::AddToCart),
            EventType::OrderPlaced => Some(FunnelStep::OrderPlaced),
            EventType::RemoveFromCart | EventType::ScrollDepth => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FunnelReport {
    pub funnel: Vec<FunnelStage>,
    pub devices: Vec<DeviceUsers>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStage {
    pub event_type: FunnelStep,
    pub unique_users_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUsers {
    pub device: Option<String>,
    pub unique_users_count: u64,
}

/// Distinct users per funnel stage and per device over all events in the
/// window.
pub fn build_funnel(events: &[EventRecord]) -> Option<FunnelReport> {
    if events.is_empty() {
        return None;
    }

    let mut stages: HashMap<FunnelStep, HashSet<&str>> = HashMap::new();
    let mut devices: HashMap<Option<&str>, HashSet<&str>> = HashMap::new();

    for event in events {
        let user = event.user_id.as_str();
        if let Some(step) = FunnelStep::from_event_type(event.event_type) {
            stages.entry(step).or_default().insert(user);
        }
        devices
            .entry(event.metadata.text("device"))
            .or_default()
            .insert(user);
    }

    let stage_counts = stages
        .into_iter()
        .map(|(step, users)| (step, users.len() as u64))
        .collect();
    let device_counts = devices
        .into_iter()
        .map(|(device, users)| (device.map(String::from), users.len() as u64))
        .collect();

    Some(FunnelReport {
        funnel: rank_desc(stage_counts)
            .into_iter()
            .map(|(event_type, unique_users_count)| FunnelStage {
                event_type,
                unique_users_count,
            })
            .collect(),
        devices: rank_desc(device_counts)
            .into_iter()
            .map(|(device, unique_users_count)| DeviceUsers {
                device,
                unique_users_count,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use serde_json::json;

    fn event(user: &str, event_type: EventType, device: Option<&str>) -> EventRecord {
        let metadata = match device {
            Some(d) => serde_json::from_value(json!({"device": d})).unwrap(),
            None => Default::default(),
        };
        EventRecord {
            id: 0,
            user_id: user.into(),
            session_id: format!("s-{}", user),
            event_type,
            page: None,
            timestamp: "2025-03-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap(),
            metadata,
        }
    }

    fn count(report: &FunnelReport, step: FunnelStep) -> Option<u64> {
        report
            .funnel
            .iter()
            .find(|s| s.event_type == step)
            .map(|s| s.unique_users_count)
    }

    #[test]
    fn test_browse_stage_counts_union_of_users() {
        let mut events = Vec::new();
        for user in ["u1", "u2", "u3", "u4", "u5"] {
            events.push(event(user, EventType::PageView, Some("desktop")));
        }
        // u1 搜索两次，u6 只搜索
        events.push(event("u1", EventType::Search, Some("desktop")));
        events.push(event("u1", EventType::Search, Some("desktop")));
        events.push(event("u6", EventType::Search, Some("mobile")));
        for user in ["u1", "u2", "u3"] {
            events.push(event(user, EventType::AddToCart, Some("desktop")));
        }
        events.push(event("u1", EventType::OrderPlaced, Some("desktop")));
        events.push(event("u2", EventType::RemoveFromCart, Some("desktop")));

        let report = build_funnel(&events).unwrap();
        assert_eq!(count(&report, FunnelStep::PageViewOrSearch), Some(6));
        assert_eq!(count(&report, FunnelStep::AddToCart), Some(3));
        assert_eq!(count(&report, FunnelStep::OrderPlaced), Some(1));
        assert_eq!(report.funnel.len(), 3);
        let order: Vec<FunnelStep> = report.funnel.iter().map(|s| s.event_type).collect();
        assert_eq!(
            order,
            vec![FunnelStep::PageViewOrSearch, FunnelStep::AddToCart, FunnelStep::OrderPlaced]
        );

        assert_eq!(
            report.devices,
            vec![
                DeviceUsers { device: Some("desktop".into()), unique_users_count: 5 },
                DeviceUsers { device: Some("mobile".into()), unique_users_count: 1 },
            ]
        );
    }

    #[test]
    fn test_non_funnel_events_only_feed_devices() {
        let events = vec![
            event("u1", EventType::ScrollDepth, None),
            event("u2", EventType::RemoveFromCart, Some("mobile")),
        ];
        let report = build_funnel(&events).unwrap();
        assert!(report.funnel.is_empty());
        assert_eq!(report.devices.len(), 2);
        assert_eq!(report.devices[0].device, None);
    }

    #[test]
    fn test_stage_serializes_with_combined_name() {
        let report = build_funnel(&[event("u1", EventType::Search, None)]).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["funnel"][0]["eventType"], "PAGE_VIEW_OR_SEARCH");
        assert_eq!(value["funnel"][0]["uniqueUsersCount"], 1);
    }

    #[test]
    fn test_empty_window_is_none() {
        assert_eq!(build_funnel(&[]), None);
    }
}
