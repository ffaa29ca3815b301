//! HTTP API module for user, health, and metrics endpoints.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod users;

pub use error::ApiError;
pub use handlers::AppState;
pub use response::ApiResponse;
pub use routes::create_router;
