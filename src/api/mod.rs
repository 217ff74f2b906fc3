//! API layer - HTTP handlers, middleware, routing and the server.
//!
//! - `httpkit`: request/reply types and the handler abstraction
//! - `middleware`: logging, metrics and status translation
//! - `router`: route tables and the multiplexer
//! - `server`: listener lifecycle with graceful shutdown

pub mod handlers;
pub mod httpkit;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod server;
pub mod state;

pub use routes::create_router;
pub use server::{Server, ServerError, ServerState};
pub use state::AppState;
