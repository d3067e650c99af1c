//! Service layer for business logic
//!
//! This module composes store queries with the analytics core. Services are
//! shared between the HTTP API and the CLI.

mod analytics_service;
mod event_service;
mod journey_service;
mod user_service;

pub use analytics_service::*;
pub use event_service::*;
pub use journey_service::*;
pub use user_service::*;
