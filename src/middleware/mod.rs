pub mod auth;

pub use auth::{extract_bearer_token, jwt_auth_middleware};
