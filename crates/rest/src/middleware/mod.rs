//! HTTP middleware for the content REST API.
//!
//! - [`alert`] - publishes the error key of failed responses as an
//!   `X-{app}-error` header

pub mod alert;

pub use alert::error_alert_middleware;
