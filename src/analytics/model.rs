//! Clickstream record types
//!
//! Plain data read from the store: users, sessions and events, plus the
//! free-form event metadata with typed accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, EnumIter, EnumString};

/// 事件类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    PageView,
    Search,
    AddToCart,
    RemoveFromCart,
    OrderPlaced,
    ScrollDepth,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Free-form event/user/session metadata (a JSON object).
///
/// Numeric accessors only accept JSON numbers; any other JSON type reads as
/// missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(pub Map<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从数据库中的 JSON 文本解析；空值或非对象视为空 metadata
    pub fn from_json_text(text: Option<&str>) -> serde_json::Result<Self> {
        match text.map(str::trim) {
            None | Some("") | Some("null") => Ok(Self::default()),
            Some(raw) => match serde_json::from_str::<Value>(raw)? {
                Value::Object(map) => Ok(Self(map)),
                _ => Ok(Self::default()),
            },
        }
    }

    /// 序列化为数据库存储的 JSON 文本，空 metadata 存为 NULL
    pub fn to_json_text(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            serde_json::to_string(&self.0).ok()
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Integer view of a numeric field. Whole floats (`2.0`) are accepted,
    /// fractional values truncate toward zero.
    pub fn integer(&self, key: &str) -> Option<i64> {
        let value = self.0.get(key)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f.trunc() as i64))
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub fname: String,
    pub lname: String,
    pub age: i32,
    pub country: String,
    pub language: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Store arrival order
    pub id: i64,
    pub user_id: String,
    pub session_id: String,
    pub event_type: EventType,
    pub page: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub metadata: Metadata,
}

/// Event accepted by the ingestion endpoint, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub user_id: String,
    pub session_id: String,
    pub event_type: EventType,
    pub page: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub metadata: Metadata,
}

/// Orders a session's events by timestamp, then by arrival order.
pub fn sort_events(events: &mut [EventRecord]) {
    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
}
