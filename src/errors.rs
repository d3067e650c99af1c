use std::fmt;

#[derive(Debug, Clone)]
pub enum AnalyticsError {
    InvalidPeriod(String),
    InvalidDateRange(String),
    Validation(String),
    StoreUnavailable(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    Serialization(String),
    FileOperation(String),
}

impl AnalyticsError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AnalyticsError::InvalidPeriod(_) => "E001",
            AnalyticsError::InvalidDateRange(_) => "E002",
            AnalyticsError::Validation(_) => "E003",
            AnalyticsError::StoreUnavailable(_) => "E004",
            AnalyticsError::DatabaseConfig(_) => "E005",
            AnalyticsError::DatabaseConnection(_) => "E006",
            AnalyticsError::Serialization(_) => "E007",
            AnalyticsError::FileOperation(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AnalyticsError::InvalidPeriod(_) => "Invalid Period",
            AnalyticsError::InvalidDateRange(_) => "Invalid Date Range",
            AnalyticsError::Validation(_) => "Validation Error",
            AnalyticsError::StoreUnavailable(_) => "Store Unavailable",
            AnalyticsError::DatabaseConfig(_) => "Database Configuration Error",
            AnalyticsError::DatabaseConnection(_) => "Database Connection Error",
            AnalyticsError::Serialization(_) => "Serialization Error",
            AnalyticsError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AnalyticsError::InvalidPeriod(msg) => msg,
            AnalyticsError::InvalidDateRange(msg) => msg,
            AnalyticsError::Validation(msg) => msg,
            AnalyticsError::StoreUnavailable(msg) => msg,
            AnalyticsError::DatabaseConfig(msg) => msg,
            AnalyticsError::DatabaseConnection(msg) => msg,
            AnalyticsError::Serialization(msg) => msg,
            AnalyticsError::FileOperation(msg) => msg,
        }
    }

    /// 客户端错误（参数问题）为 true，服务端错误为 false
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            AnalyticsError::InvalidPeriod(_)
                | AnalyticsError::InvalidDateRange(_)
                | AnalyticsError::Validation(_)
        )
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            AnalyticsError::InvalidPeriod(_)
            | AnalyticsError::InvalidDateRange(_)
            | AnalyticsError::Validation(_) => StatusCode::BAD_REQUEST,
            AnalyticsError::StoreUnavailable(_) | AnalyticsError::DatabaseConnection(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AnalyticsError::DatabaseConfig(_)
            | AnalyticsError::Serialization(_)
            | AnalyticsError::FileOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 面向 API 调用方的消息
    ///
    /// 服务端错误只返回通用描述，不暴露查询细节。
    pub fn public_message(&self) -> &str {
        match self {
            AnalyticsError::StoreUnavailable(_) | AnalyticsError::DatabaseConnection(_) => {
                "Storage unavailable"
            }
            _ if self.is_client_fault() => self.message(),
            _ => "Internal server error",
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AnalyticsError {}

// 便捷的构造函数
impl AnalyticsError {
    pub fn invalid_period<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::InvalidPeriod(msg.into())
    }

    pub fn invalid_date_range<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::InvalidDateRange(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::Validation(msg.into())
    }

    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::StoreUnavailable(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::DatabaseConnection(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::FileOperation(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AnalyticsError {
    fn from(err: sea_orm::DbErr) -> Self {
        AnalyticsError::StoreUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for AnalyticsError {
    fn from(err: std::io::Error) -> Self {
        AnalyticsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        AnalyticsError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for AnalyticsError {
    fn from(err: chrono::ParseError) -> Self {
        AnalyticsError::InvalidDateRange(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_client_faults_map_to_400() {
        assert_eq!(
            AnalyticsError::invalid_period("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AnalyticsError::invalid_date_range("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert!(AnalyticsError::validation("x").is_client_fault());
    }

    #[test]
    fn test_store_errors_hide_details() {
        let err = AnalyticsError::store_unavailable("SELECT * FROM events failed: disk I/O");
        assert_eq!(err.http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.public_message(), "Storage unavailable");
        assert!(!err.is_client_fault());

        let err = AnalyticsError::serialization("bad json in row 7");
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_client_message_is_passed_through() {
        let err = AnalyticsError::invalid_period("Unsupported period: 'fortnight'");
        assert_eq!(err.public_message(), "Unsupported period: 'fortnight'");
        assert_eq!(
            err.format_simple(),
            "Invalid Period: Unsupported period: 'fortnight'"
        );
    }

    #[test]
    fn test_db_err_converts_to_store_unavailable() {
        let err: AnalyticsError = sea_orm::DbErr::Custom("connection refused".into()).into();
        assert!(matches!(err, AnalyticsError::StoreUnavailable(_)));
        assert_eq!(err.code(), "E004");
    }

    #[test]
    fn test_error_codes_are_unique_and_contiguous() {
        let errors = [
            AnalyticsError::invalid_period("x"),
            AnalyticsError::invalid_date_range("x"),
            AnalyticsError::validation("x"),
            AnalyticsError::store_unavailable("x"),
            AnalyticsError::database_config("x"),
            AnalyticsError::database_connection("x"),
            AnalyticsError::serialization("x"),
            AnalyticsError::file_operation("x"),
        ];
        let codes: Vec<&str> = errors.iter().map(AnalyticsError::code).collect();
        let expected: Vec<String> = (1..=errors.len()).map(|i| format!("E{:03}", i)).collect();
        assert_eq!(codes, expected);
        // 只有参数错误属于客户端错误
        assert_eq!(errors.iter().filter(|e| e.is_client_fault()).count(), 3);
    }
}
