//! API 类型定义

use serde::{Deserialize, Serialize};

/// 统一响应信封 `{code, message, data}`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

/// KPI 查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

/// Journey 查询参数（RFC3339 或 YYYY-MM-DD）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JourneyQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// 搜索参数；limit 以字符串接收，由服务层校验
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreated {
    pub event_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}
