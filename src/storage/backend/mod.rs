//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::analytics::{EventRecord, EventType, NewEvent, SessionRecord, UserRecord};
use crate::errors::{AnalyticsError, Result};
use crate::storage::AnalyticsStore;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{event_from_model, session_from_model, user_from_model};

/// `IN (...)` 列表的最大长度，超过后分批查询
pub(crate) const IN_CLAUSE_CHUNK: usize = 500;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(AnalyticsError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(AnalyticsError::database_config("database_url is not set"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 关闭连接池（进程退出时调用）
    pub async fn close(self) -> Result<()> {
        self.db
            .close()
            .await
            .map_err(|e| AnalyticsError::database_connection(format!("Failed to close database: {}", e)))
    }
}

#[async_trait]
impl AnalyticsStore for SeaOrmStorage {
    async fn sessions_for_user(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>> {
        self.find_sessions_for_user(user_id, from, to).await
    }

    async fn events_for_sessions(
        &self,
        user_id: &str,
        session_ids: &[String],
    ) -> Result<Vec<EventRecord>> {
        self.find_events_for_sessions(Some(user_id), session_ids).await
    }

    async fn sessions_started_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>> {
        self.find_sessions_started_between(start, end).await
    }

    async fn events_for_session_ids(&self, session_ids: &[String]) -> Result<Vec<EventRecord>> {
        self.find_events_for_sessions(None, session_ids).await
    }

    async fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        event_types: Option<&[EventType]>,
    ) -> Result<Vec<EventRecord>> {
        self.find_events_between(start, end, event_types).await
    }

    async fn search_users(&self, query: &str, limit: u64) -> Result<Vec<UserRecord>> {
        self.find_users_matching(query, limit).await
    }

    async fn search_user_sessions(
        &self,
        user_id: &str,
        query: &str,
        limit: u64,
    ) -> Result<Vec<SessionRecord>> {
        self.find_user_sessions_matching(user_id, query, limit).await
    }

    async fn insert_event(&self, event: NewEvent) -> Result<i64> {
        self.append_event(event).await
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| AnalyticsError::store_unavailable(format!("Database ping failed: {}", e)))
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
