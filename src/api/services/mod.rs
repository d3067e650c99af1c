pub mod analytics;
pub mod error_code;
pub mod events;
pub mod health;
mod helpers;
pub mod routes;
mod types;
pub mod users;

pub use error_code::ErrorCode;
pub use health::HealthService;
pub use helpers::{api_result, error_from_analytics, error_response, success_response};
pub use routes::api_routes;
pub use types::*;
