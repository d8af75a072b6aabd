use axum::{middleware, Router};

use crate::auth::{jwt::JwtKeys, middleware::require_auth};
use crate::state::AppState;

pub mod dto;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod repo_types;
pub mod services;

/// `/products` routes; every one of them sits behind [`require_auth`].
pub fn router(keys: JwtKeys) -> Router<AppState> {
    handlers::product_routes().route_layer(middleware::from_fn_with_state(keys, require_auth))
}
