use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::instrument;

use super::dto::{LoginRequest, SignUpRequest, UserResponse};
use super::middleware::TOKEN_COOKIE;
use super::services::AuthService;
use crate::{config::AppConfig, error::AppError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[instrument(skip_all)]
pub async fn sign_up(
    State(auth): State<AuthService>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(req) = payload?;
    let user = auth.sign_up(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip_all)]
pub async fn login(
    State(auth): State<AuthService>,
    State(config): State<Arc<AppConfig>>,
    cookies: Cookies,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(req) = payload?;
    let token = auth.login(req).await?;
    cookies.add(token_cookie(token, &config));
    Ok(StatusCode::OK)
}

#[instrument(skip_all)]
pub async fn logout(State(config): State<Arc<AppConfig>>, cookies: Cookies) -> StatusCode {
    let mut cookie = token_cookie(String::new(), &config);
    cookie.make_removal();
    cookies.add(cookie);
    StatusCode::OK
}

fn token_cookie(value: String, config: &AppConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(config.cookie.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(config.jwt.ttl_minutes))
        .build();
    if let Some(domain) = &config.cookie.domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}
