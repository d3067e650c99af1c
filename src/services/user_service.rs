//! User and session search

use std::sync::Arc;

use tracing::info;

use crate::analytics::{SessionRecord, UserRecord};
use crate::errors::{AnalyticsError, Result};
use crate::storage::AnalyticsStore;

/// 校验后的搜索参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub limit: u64,
}

pub struct UserService {
    store: Arc<dyn AnalyticsStore>,
    default_limit: u64,
    max_limit: u64,
}

impl UserService {
    pub fn new(store: Arc<dyn AnalyticsStore>, default_limit: u64, max_limit: u64) -> Self {
        Self {
            store,
            default_limit,
            max_limit: max_limit.max(1),
        }
    }

    /// 校验 `query` 与 `limit`
    ///
    /// `query` trim 后不能为空；`limit` 缺省为默认值，必须是正整数，超过上限时截断。
    pub fn validate_search(&self, query: Option<&str>, limit: Option<&str>) -> Result<SearchParams> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AnalyticsError::validation("Parameter 'query' must be a non-empty string"))?;

        let limit = match limit.map(str::trim) {
            None | Some("") => self.default_limit,
            Some(raw) => match raw.parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(AnalyticsError::validation(format!(
                        "Parameter 'limit' must be a positive integer, got '{}'",
                        raw
                    )));
                }
            },
        };

        Ok(SearchParams {
            query: query.to_string(),
            limit: limit.min(self.max_limit),
        })
    }

    pub async fn search_users(&self, params: &SearchParams) -> Result<Vec<UserRecord>> {
        info!(
            "Analytics: user search, query={:?}, limit={}",
            params.query, params.limit
        );
        self.store.search_users(&params.query, params.limit).await
    }

    pub async fn search_sessions(
        &self,
        user_id: &str,
        params: &SearchParams,
    ) -> Result<Vec<SessionRecord>> {
        if user_id.trim().is_empty() {
            return Err(AnalyticsError::validation("Parameter 'userId' must not be empty"));
        }
        info!(
            "Analytics: session search, user={}, query={:?}, limit={}",
            user_id, params.query, params.limit
        );
        self.store
            .search_user_sessions(user_id, &params.query, params.limit)
            .await
    }
}
