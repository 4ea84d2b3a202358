//! HTTP layer for request/response handling.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Rate limiting and request tracing middleware
//! - [`routes`] - Versioned API route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
