//! Sock shop - storefront backend for catalogue browsing and customer
//! accounts over JSON/HTTP.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Catalogue and customer models
//! - **services**: Application use cases
//! - **infra**: Database, repositories and the Unit of Work
//! - **api**: Handlers, middleware, routing and the server lifecycle
//! - **types**: Shared types (pagination)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! sockshop serve --port 9090
//!
//! # Run migrations
//! sockshop migrate up
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
pub use api::{AppState, Server};
pub use config::Config;
pub use domain::{Customer, Password, Sock};
pub use errors::{AppError, AppResult};
