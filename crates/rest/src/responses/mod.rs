//! Response helpers for the content REST API.
//!
//! - [`headers`] - response header generation (Location, pagination links,
//!   total count and alert headers)

pub mod headers;

pub use headers::{AlertAction, ResponseHeaders};
