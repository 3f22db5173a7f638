//! API layer - HTTP handlers and routes
//!
//! The server only starts accepting requests after the bootstrap sequence
//! completed.

pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
