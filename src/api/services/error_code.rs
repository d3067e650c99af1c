//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::AnalyticsError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 6000-6099: Analytics 错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,
    MissingRequestId = 1040,

    // Analytics 错误 6000-6099
    AnalyticsQueryFailed = 6000,
    AnalyticsInvalidPeriod = 6001,
    AnalyticsInvalidDateRange = 6002,
}

impl From<&AnalyticsError> for ErrorCode {
    fn from(err: &AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidPeriod(_) => ErrorCode::AnalyticsInvalidPeriod,
            AnalyticsError::InvalidDateRange(_) => ErrorCode::AnalyticsInvalidDateRange,
            AnalyticsError::Validation(_) => ErrorCode::BadRequest,
            AnalyticsError::StoreUnavailable(_) => ErrorCode::AnalyticsQueryFailed,
            AnalyticsError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            AnalyticsError::DatabaseConfig(_)
            | AnalyticsError::Serialization(_)
            | AnalyticsError::FileOperation(_) => ErrorCode::InternalServerError,
        }
    }
}
