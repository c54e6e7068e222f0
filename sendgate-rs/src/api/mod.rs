//! REST API module for sendgate-rs
//!
//! Provides HTTP API endpoints for quota queries and account gating

pub mod admin;
pub mod auth;
pub mod handlers;
pub mod metrics;
pub mod server;

pub use metrics::Metrics;
pub use server::ApiServer;
