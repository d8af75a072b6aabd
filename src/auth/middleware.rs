use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;
use tracing::warn;

use super::jwt::JwtKeys;
use crate::error::AppError;

/// Name of the cookie carrying the bearer token.
pub const TOKEN_COOKIE: &str = "token";

/// Identity proven by a verified token, inserted by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: i64,
}

/// Gate for the protected route group. Rejects missing, invalid or expired
/// tokens with 401 before any handler runs.
pub async fn require_auth(
    State(keys): State<JwtKeys>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = cookies
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .or_else(|| bearer_token(req.headers()))
        .ok_or(AppError::Unauthorized("missing token"))?;

    let claims = keys.verify(&token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AppError::Unauthorized("invalid or expired token")
    })?;

    req.extensions_mut().insert(AuthenticatedIdentity {
        user_id: claims.user_id,
    });
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::to_owned)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .copied()
            .ok_or(AppError::Unauthorized("missing token"))
    }
}
