use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthError, TokenVerifier};
use crate::error::ApiError;

/// JWT authentication middleware that validates tokens and attaches the principal.
///
/// Outcomes:
/// - no usable bearer credential: 401, the handler never runs
/// - credential fails signature / expiry / decoding: 403
/// - otherwise the [`Principal`](crate::auth::Principal) is inserted into the
///   request extensions and the next stage runs
///
/// Verification is local; no store query is issued here.
pub async fn jwt_auth_middleware(
    State(verifier): State<TokenVerifier>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).ok_or(AuthError::MissingToken)?;

    let principal = verifier.verify(token)?;
    tracing::debug!(user_id = %principal.user_id, "Authenticated request");

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
/// A missing header, a non-Bearer scheme or an empty token all count as absent.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;

    let (scheme, token) = auth_str.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
