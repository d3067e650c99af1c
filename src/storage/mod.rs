//! Clickstream storage
//!
//! [`AnalyticsStore`] is the narrow read/ingest interface the services
//! depend on. [`SeaOrmStorage`] implements it over SQLite, MySQL/MariaDB
//! and PostgreSQL.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::analytics::{EventRecord, EventType, NewEvent, SessionRecord, UserRecord};
use crate::errors::Result;

pub mod backend;

pub use backend::SeaOrmStorage;

/// Store operations used by the analytics services.
///
/// Every failure surfaces as [`crate::errors::AnalyticsError::StoreUnavailable`];
/// implementations do not retry.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Sessions of `user_id` with `started_at` in `[from, to]`, oldest first.
    async fn sessions_for_user(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>>;

    /// Events of the given sessions that belong to `user_id`, ordered by
    /// `(timestamp, id)`.
    async fn events_for_sessions(
        &self,
        user_id: &str,
        session_ids: &[String],
    ) -> Result<Vec<EventRecord>>;

    /// Sessions with `started_at` in `[start, end]`.
    async fn sessions_started_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>>;

    /// All events of the given sessions, ordered by `(timestamp, id)`.
    async fn events_for_session_ids(&self, session_ids: &[String]) -> Result<Vec<EventRecord>>;

    /// Events with `timestamp` in `[start, end]`, optionally restricted to
    /// some event types, ordered by `(timestamp, id)`.
    async fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        event_types: Option<&[EventType]>,
    ) -> Result<Vec<EventRecord>>;

    /// Case-insensitive substring search over user id, first and last name.
    async fn search_users(&self, query: &str, limit: u64) -> Result<Vec<UserRecord>>;

    /// Case-insensitive substring search over a user's session ids, ordered
    /// by session id.
    async fn search_user_sessions(
        &self,
        user_id: &str,
        query: &str,
        limit: u64,
    ) -> Result<Vec<SessionRecord>>;

    /// Appends an event and returns its id.
    async fn insert_event(&self, event: NewEvent) -> Result<i64>;

    /// Cheap liveness query.
    async fn ping(&self) -> Result<()>;

    fn backend_name(&self) -> &str;
}

pub struct StorageFactory;

impl StorageFactory {
    /// 按全局配置创建存储并执行迁移
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
