pub mod security;

pub use security::{cors_layer, global_rate_limit, security_headers_middleware};
