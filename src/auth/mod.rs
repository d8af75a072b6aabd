use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod dto;
pub mod handlers;
pub mod jwt;
#[cfg(test)]
pub mod memory;
pub mod middleware;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

/// Public routes: `/signup`, `/login`, `/logout`.
pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
