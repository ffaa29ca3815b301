//! In-memory user registry HTTP API.
//!
//! Users are kept in a lock-guarded collection owned by [`users::UserRegistry`]
//! and served over a small JSON API together with health and metrics
//! endpoints.
//!
//! ```text
//! POST   /api/users          create  -> 201 | 400 | 409
//! GET    /api/users/:id      read    -> 200 | 400 | 404
//! PUT    /api/users/:id      update  -> 200 | 400 | 404
//! DELETE /api/users/:id      delete  -> 200 | 400 | 404
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`users`]: User records and the registry
//! - [`api`]: HTTP routes, handlers, and middleware
//! - [`metrics`]: Prometheus metric helpers
//! - [`system`]: Process diagnostics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod system;
pub mod users;
pub mod utils;

pub use config::Config;
pub use error::{AppError, RegistryError, Result};
