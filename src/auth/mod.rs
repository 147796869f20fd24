//! Password hashing and the authenticated-caller extractor.
//!
//! Authentication is session-based: a successful login stores the user id
//! in the caller's server-side session, and [`CurrentUser`] reads it back
//! on protected routes. Passwords are stored as argon2 PHC strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{errors::ServiceError, session::Session};

/// Hashes a plain-text password with a freshly generated salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalError(format!("password hashing failed: {}", e)))
}

/// Verifies a plain-text password against a stored PHC hash string.
/// Malformed stored hashes verify as false rather than erroring: the
/// caller only ever learns "credentials did not match".
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// The authenticated caller, resolved from the session.
///
/// Extraction fails with 401 when the session carries no user id — the
/// JSON-API rendition of "redirect to login".
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            ServiceError::InternalError("session middleware not installed".to_string())
        })?;

        session
            .user_id()
            .map(|id| CurrentUser { id })
            .ok_or_else(|| ServiceError::Unauthorized("Login required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("hunter2hunter2").expect("hashing");
        assert!(verify_password(&hash, "hunter2hunter2"));
        assert!(!verify_password(&hash, "wrong-password"));
    }

    #[test]
    fn distinct_salts_produce_distinct_hashes() {
        let a = hash_password("same-password").expect("hashing");
        let b = hash_password("same-password").expect("hashing");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }
}
