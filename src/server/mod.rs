//! HTTP server: handlers, routes and the builder wiring them together

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_router;
