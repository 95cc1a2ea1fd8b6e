pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod rate_limit;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::Server;
pub use state::AppState;
