//! Clickstream Analytics - e-commerce clickstream analytics backend
//!
//! This library reconstructs per-user journeys from raw sessions and events
//! and computes time-windowed KPI reports (traffic, search, product & cart,
//! revenue & conversion, behaviour funnel).
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `analytics`: Pure computation (periods, enrichment, rollups, reports)
//! - `storage`: Store interface and SeaORM backend
//! - `services`: Business logic shared by the API and the CLI
//! - `api`: HTTP services and middleware
//! - `interfaces`: User interfaces (CLI)
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
