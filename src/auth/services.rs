use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, instrument, warn};

use super::dto::{LoginRequest, SignUpRequest, UserResponse};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use super::repo::UserRepository;
use super::repo_types::NewUser;
use crate::error::{AppError, RepoError};
use crate::state::AppState;
use crate::validation::{validate_login, validate_sign_up};

/// Sign-up and login: the only operations that hash passwords or sign tokens.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn sign_up(&self, mut req: SignUpRequest) -> Result<UserResponse, AppError> {
        req.email = normalize_email(&req.email);
        validate_sign_up(&req)?;

        let password_hash = hash_password(&req.password)?;
        let user = self
            .users
            .create(NewUser {
                email: req.email,
                password_hash,
                name: req.name,
            })
            .await
            .map_err(|e| {
                if matches!(e, RepoError::Duplicate(_)) {
                    warn!("email already registered");
                }
                AppError::from(e)
            })?;

        info!(user_id = user.id, "user signed up");
        Ok(user.into())
    }

    /// Returns a signed token valid for the configured TTL.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, mut req: LoginRequest) -> Result<String, AppError> {
        req.email = normalize_email(&req.email);
        validate_login(&req)?;

        let user = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!("login unknown email");
                AppError::UserNotFound
            })?;

        if !verify_password(&req.password, &user.password_hash)? {
            warn!(user_id = user.id, "login invalid password");
            return Err(AppError::InvalidPassword);
        }

        let token = self.keys.sign(user.id)?;
        info!(user_id = user.id, "user logged in");
        Ok(token)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::memory::InMemoryUserRepository;
    use crate::config::JwtConfig;

    fn keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: "test-secret".into(),
            ttl_minutes: 60 * 24,
        })
    }

    fn service() -> AuthService {
        AuthService::new(Arc::new(InMemoryUserRepository::new()), keys())
    }

    fn sign_up_req(email: &str) -> SignUpRequest {
        SignUpRequest {
            email: email.into(),
            password: "password123".into(),
            name: "tester".into(),
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn sign_up_returns_public_projection() {
        let user = service().sign_up(sign_up_req("Test@Example.com ")).await.unwrap();
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.name, "tester");
        assert!(user.id > 0);
    }

    #[tokio::test]
    async fn sign_up_rejects_invalid_input() {
        let err = service().sign_up(sign_up_req("invalid-email")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "email: is not valid email format.");
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_email() {
        let svc = service();
        svc.sign_up(sign_up_req("dup@example.com")).await.unwrap();
        let err = svc.sign_up(sign_up_req("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn login_issues_token_for_the_user() {
        let svc = service();
        let user = svc.sign_up(sign_up_req("login@example.com")).await.unwrap();
        let token = svc
            .login(login_req("login@example.com", "password123"))
            .await
            .unwrap();
        let claims = keys().verify(&token).unwrap();
        assert_eq!(claims.user_id, user.id);
    }

    #[tokio::test]
    async fn login_unknown_email() {
        let err = service()
            .login(login_req("nobody@example.com", "password123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
        assert_eq!(err.to_string(), "user not found");
    }

    #[tokio::test]
    async fn login_wrong_password() {
        let svc = service();
        svc.sign_up(sign_up_req("wrong@example.com")).await.unwrap();
        let err = svc
            .login(login_req("wrong@example.com", "password1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPassword));
        assert_eq!(err.to_string(), "invalid password");
    }

    #[tokio::test]
    async fn login_validates_shape_first() {
        let err = service().login(login_req("", "")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
