//! Route handlers for the HTTP API.

pub mod fallback;
pub mod images;
