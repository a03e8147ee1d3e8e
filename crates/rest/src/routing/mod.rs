//! Route configuration for the content REST API.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod content_routes;

pub use content_routes::create_routes;
