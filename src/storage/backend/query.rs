//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, ExprTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func, LikeExpr},
};
use tracing::debug;

use super::converters::{event_from_model, session_from_model, user_from_model};
use super::{IN_CLAUSE_CHUNK, SeaOrmStorage};
use crate::analytics::{EventRecord, EventType, SessionRecord, UserRecord, model::sort_events};
use crate::errors::{AnalyticsError, Result};

use migration::entities::{event, session, user};

/// 构造大小写不敏感的包含匹配模式，转义 LIKE 通配符
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `LOWER(col) LIKE pattern ESCAPE '\'`
fn lower_like<C: ColumnTrait>(column: C, pattern: &str) -> Expr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn store_err(op: &str) -> impl FnOnce(sea_orm::DbErr) -> AnalyticsError + '_ {
    move |e| AnalyticsError::store_unavailable(format!("{} failed: {}", op, e))
}

impl SeaOrmStorage {
    pub(super) async fn find_sessions_for_user(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>> {
        let models = session::Entity::find()
            .filter(session::Column::UserId.eq(user_id))
            .filter(session::Column::StartedAt.between(from, to))
            .order_by_asc(session::Column::StartedAt)
            .order_by_asc(session::Column::SessionId)
            .all(&self.db)
            .await
            .map_err(store_err("sessions_for_user"))?;

        debug!("Loaded {} sessions for user {}", models.len(), user_id);
        Ok(models.into_iter().map(session_from_model).collect())
    }

    pub(super) async fn find_sessions_started_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>> {
        let models = session::Entity::find()
            .filter(session::Column::StartedAt.between(start, end))
            .order_by_asc(session::Column::StartedAt)
            .all(&self.db)
            .await
            .map_err(store_err("sessions_started_between"))?;

        debug!("Loaded {} sessions in window", models.len());
        Ok(models.into_iter().map(session_from_model).collect())
    }

    /// 按 session id 分批加载事件，可选地限定 user id
    pub(super) async fn find_events_for_sessions(
        &self,
        user_id: Option<&str>,
        session_ids: &[String],
    ) -> Result<Vec<EventRecord>> {
        if session_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut events = Vec::new();
        for chunk in session_ids.chunks(IN_CLAUSE_CHUNK) {
            let mut condition =
                Condition::all().add(event::Column::SessionId.is_in(chunk.iter().cloned()));
            if let Some(user_id) = user_id {
                condition = condition.add(event::Column::UserId.eq(user_id));
            }

            let models = event::Entity::find()
                .filter(condition)
                .order_by_asc(event::Column::Timestamp)
                .order_by_asc(event::Column::Id)
                .all(&self.db)
                .await
                .map_err(store_err("events_for_sessions"))?;
            events.extend(models.into_iter().filter_map(event_from_model));
        }

        // 多个批次各自有序，合并后重新排序
        if session_ids.len() > IN_CLAUSE_CHUNK {
            sort_events(&mut events);
        }

        debug!(
            "Loaded {} events for {} sessions",
            events.len(),
            session_ids.len()
        );
        Ok(events)
    }

    pub(super) async fn find_events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        event_types: Option<&[EventType]>,
    ) -> Result<Vec<EventRecord>> {
        let mut query = event::Entity::find().filter(event::Column::Timestamp.between(start, end));

        if let Some(types) = event_types {
            if types.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(event::Column::EventType.is_in(types.iter().map(|t| t.to_string())));
        }

        let models = query
            .order_by_asc(event::Column::Timestamp)
            .order_by_asc(event::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err("events_between"))?;

        debug!("Loaded {} events in window", models.len());
        Ok(models.into_iter().filter_map(event_from_model).collect())
    }

    pub(super) async fn find_users_matching(&self, query: &str, limit: u64) -> Result<Vec<UserRecord>> {
        let pattern = contains_pattern(query);

        let models = user::Entity::find()
            .filter(
                Condition::any()
                    .add(lower_like(user::Column::UserId, &pattern))
                    .add(lower_like(user::Column::Fname, &pattern))
                    .add(lower_like(user::Column::Lname, &pattern)),
            )
            .order_by_asc(user::Column::UserId)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(store_err("search_users"))?;

        Ok(models.into_iter().map(user_from_model).collect())
    }

    pub(super) async fn find_user_sessions_matching(
        &self,
        user_id: &str,
        query: &str,
        limit: u64,
    ) -> Result<Vec<SessionRecord>> {
        let pattern = contains_pattern(query);

        let models = session::Entity::find()
            .filter(session::Column::UserId.eq(user_id))
            .filter(lower_like(session::Column::SessionId, &pattern))
            .order_by_asc(session::Column::SessionId)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(store_err("search_user_sessions"))?;

        Ok(models.into_iter().map(session_from_model).collect())
    }

    /// 用户总数（CLI migrate 输出使用）
    pub async fn count_users(&self) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        user::Entity::find()
            .count(&self.db)
            .await
            .map_err(store_err("count_users"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Ann"), "%ann%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
