//! Job board API
//!
//! Employers post job listings, job seekers browse, bookmark and apply to
//! them, and employers move applications through a review pipeline.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, input parsing, the application state machine
//!   and the authorization policy
//! - **services**: Use cases, one service per aggregate
//! - **infra**: Database, migrations, repositories and the Redis cache
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create an administrator and seed categories
//! cargo run -- admin create --email admin@example.com --password change-me-please
//! cargo run -- categories seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Identity, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
