//! HTTP middleware components.
//!
//! Middleware run before route handlers and can short-circuit a request.

/// Bearer token authentication middleware
pub mod auth;
