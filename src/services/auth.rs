// src/services/auth.rs
// DOCUMENTATION: Password hashing, bearer tokens and request authentication
// PURPOSE: Resolve `Authorization: Bearer <token>` to the calling user

use crate::config::Config;
use crate::db::ProfileRepository;
use crate::errors::RazorError;
use crate::models::{SigninRequest, SignupRequest, TokenResponse};
use actix_web::HttpRequest;
use argon2::{
    password_hash::{rand_core::OsRng, rand_core::RngCore, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

/// The authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub is_admin: bool,
}

impl AuthUser {
    /// Owner of a resource, or an admin
    pub fn can_manage(&self, owner: Option<Uuid>) -> bool {
        self.is_admin || owner == Some(self.id)
    }
}

pub fn hash_password(password: &str) -> Result<String, RazorError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| RazorError::InternalError(format!("password hash error: {}", e)))
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

/// 32 random bytes, hex encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Tokens are only ever stored as their SHA-256
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Token from the Authorization header, if there is a usable one
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Resolve the caller or fail with 401
pub async fn authenticate(req: &HttpRequest, pool: &PgPool) -> Result<AuthUser, RazorError> {
    let token = bearer_token(req).ok_or_else(|| {
        log::debug!("Request to {} without bearer token", req.path());
        RazorError::unauthenticated()
    })?;

    match ProfileRepository::user_for_token(pool, &hash_token(&token)).await? {
        Some((id, is_admin)) => Ok(AuthUser { id, is_admin }),
        None => {
            log::warn!("Request to {} with unknown or expired token", req.path());
            Err(RazorError::Unauthorized("Invalid or expired token".to_string()))
        }
    }
}

/// Like `authenticate`, but anonymous callers get None instead of a 401
pub async fn authenticate_optional(
    req: &HttpRequest,
    pool: &PgPool,
) -> Result<Option<AuthUser>, RazorError> {
    if bearer_token(req).is_none() {
        return Ok(None);
    }
    authenticate(req, pool).await.map(Some)
}

/// Background sweep of expired session tokens
pub fn start_token_sweep(pool: PgPool, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            match ProfileRepository::prune_expired_tokens(&pool).await {
                Ok(0) => {}
                Ok(n) => log::debug!("Pruned {} expired session tokens", n),
                Err(e) => log::warn!("Session token sweep failed: {}", e),
            }
        }
    });
}

pub struct AuthService;

impl AuthService {
    pub async fn signup(
        pool: &PgPool,
        config: &Config,
        req: SignupRequest,
    ) -> Result<TokenResponse, RazorError> {
        let username = req.username.trim();
        let password_hash = hash_password(&req.password)?;
        let full_name = req
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        let profile =
            ProfileRepository::create_profile(pool, username, full_name, &password_hash).await?;
        log::info!("New account: {} ({})", profile.username, profile.id);

        Self::issue_token(pool, config, profile.id).await
    }

    pub async fn signin(
        pool: &PgPool,
        config: &Config,
        req: SigninRequest,
    ) -> Result<TokenResponse, RazorError> {
        let credentials = ProfileRepository::get_credentials(pool, req.username.trim()).await?;

        match credentials {
            Some((user_id, hash)) if verify_password(&hash, &req.password) => {
                Self::issue_token(pool, config, user_id).await
            }
            _ => {
                log::warn!("Failed sign-in for {}", req.username);
                Err(RazorError::Unauthorized(
                    "Invalid username or password".to_string(),
                ))
            }
        }
    }

    /// Revoke the token presented with the request
    pub async fn signout(req: &HttpRequest, pool: &PgPool) -> Result<(), RazorError> {
        let user = authenticate(req, pool).await?;
        if let Some(token) = bearer_token(req) {
            ProfileRepository::delete_token(pool, &hash_token(&token)).await?;
        }
        log::info!("User {} signed out", user.id);
        Ok(())
    }

    async fn issue_token(
        pool: &PgPool,
        config: &Config,
        user_id: Uuid,
    ) -> Result<TokenResponse, RazorError> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::seconds(config.session_ttl_seconds);
        ProfileRepository::insert_token(pool, user_id, &hash_token(&token), expires_at).await?;

        Ok(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: config.session_ttl_seconds,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "correct horse"));
        assert!(!verify_password(&hash, "battery staple"));
        assert!(!verify_password("not-a-hash", "correct horse"));
    }

    #[test]
    fn test_tokens_are_random_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_token_is_stable() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer  tok123 "))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("tok123"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcg=="))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        assert_eq!(bearer_token(&TestRequest::default().to_http_request()), None);
    }

    #[test]
    fn test_can_manage() {
        let id = Uuid::new_v4();
        let user = AuthUser { id, is_admin: false };
        assert!(user.can_manage(Some(id)));
        assert!(!user.can_manage(Some(Uuid::new_v4())));
        assert!(!user.can_manage(None));

        let admin = AuthUser {
            id,
            is_admin: true,
        };
        assert!(admin.can_manage(None));
    }
}
