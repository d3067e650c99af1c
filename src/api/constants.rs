//! API 模块常量定义

/// 请求 ID 头
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 健康检查路径（不要求 request id）
pub const HEALTH_PATH: &str = "/api/health";

/// 健康检查响应中的服务名
pub const SERVICE_NAME: &str = "clickstream-analytics";

/// 健康检查中数据库 ping 的超时时间（秒）
pub const HEALTH_PING_TIMEOUT_SECS: u64 = 5;

/// JSON 请求体大小上限
pub const MAX_JSON_PAYLOAD: usize = 64 * 1024;
