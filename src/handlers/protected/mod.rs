// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here runs behind jwt_auth_middleware and receives the
// request's Principal through an Extension. Handlers validate their own query
// parameters before touching the store, and turn store failures into a
// generic 500 via ApiError::upstream.

pub mod analytics;
pub mod data;
