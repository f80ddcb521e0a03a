pub mod admin;
pub mod auth;
pub mod extract;
pub mod middleware;
pub mod orders;
pub mod products;
pub mod rest;
pub mod routes;
pub mod state;

// Re-export the router builder so the binary and the tests share one wiring.
pub use routes::build_router;
pub use state::AppState;
