//! HTTP API
//!
//! actix-web handlers under `/api`, the response envelope and the request-id
//! middleware.

pub mod constants;
pub mod middleware;
pub mod services;
