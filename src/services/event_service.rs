//! Event ingestion
//!
//! Validates a client-submitted event and appends it with a server-side
//! timestamp. Sessions are not touched.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use strum::IntoEnumIterator;
use tracing::info;

use crate::analytics::{Clock, EventType, Metadata, NewEvent};
use crate::errors::{AnalyticsError, Result};
use crate::storage::AnalyticsStore;

/// 客户端提交的事件（字段全部可选，由服务层校验）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEventRequest {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub event_type: Option<String>,
    pub page: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

pub struct EventService {
    store: Arc<dyn AnalyticsStore>,
    clock: Arc<dyn Clock>,
}

fn required_text(name: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AnalyticsError::validation(format!(
            "Field '{}' must be a non-empty string",
            name
        ))),
    }
}

impl EventService {
    pub fn new(store: Arc<dyn AnalyticsStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// 校验请求并转换为待写入事件，时间戳取当前时间
    pub fn validate(&self, request: RecordEventRequest) -> Result<NewEvent> {
        let user_id = required_text("userId", request.user_id)?;
        let session_id = required_text("sessionId", request.session_id)?;
        let raw_type = required_text("eventType", request.event_type)?;
        let page = required_text("page", request.page)?;

        let event_type = EventType::from_str(&raw_type).map_err(|_| {
            let allowed: Vec<String> = EventType::iter().map(|t| t.to_string()).collect();
            AnalyticsError::validation(format!(
                "Field 'eventType' must be one of {}, got '{}'",
                allowed.join(", "),
                raw_type
            ))
        })?;

        let metadata = match request.metadata {
            None | Some(Value::Null) => Metadata::new(),
            Some(Value::Object(map)) => Metadata::from(map),
            Some(_) => {
                return Err(AnalyticsError::validation(
                    "Field 'metadata' must be a JSON object",
                ));
            }
        };

        Ok(NewEvent {
            user_id,
            session_id,
            event_type,
            page: Some(page),
            timestamp: self.clock.now().with_timezone(&Utc),
            metadata,
        })
    }

    /// 写入事件并返回事件 id
    pub async fn record(&self, request: RecordEventRequest) -> Result<i64> {
        let event = self.validate(request)?;
        info!(
            "Analytics: record event, user={}, session={}, type={}",
            event.user_id, event.session_id, event.event_type
        );
        self.store.insert_event(event).await
    }
}
