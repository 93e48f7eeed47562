use axum::extract::FromRef;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::{InsertError, User},
    },
    state::AppState,
    validation::is_valid_phone,
};

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("password too short")]
    WeakPassword,
    #[error("invalid phone number format")]
    InvalidPhone,
    #[error("phone number already registered")]
    Conflict,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum LoginError {
    // One variant for "no such user" and "wrong password", so responses
    // cannot be used to probe which phone numbers have accounts.
    #[error("invalid phone number or password")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Registers a new account: validate, check uniqueness, hash, persist.
/// Nothing is written unless every step succeeds.
pub async fn register(
    state: &AppState,
    name: &str,
    phone: &str,
    password: &str,
) -> Result<User, RegisterError> {
    if password.len() < state.config.password_min_len {
        return Err(RegisterError::WeakPassword);
    }
    if !is_valid_phone(phone) {
        return Err(RegisterError::InvalidPhone);
    }

    // Cheap pre-check before paying for the hash; the insert below stays
    // the authoritative uniqueness gate.
    if state.users.find_by_phone(phone).await?.is_some() {
        return Err(RegisterError::Conflict);
    }

    // Argon2 is CPU-bound by design; keep it off the async workers.
    let cost = state.config.argon2.clone();
    let plain = password.to_string();
    let hash = tokio::task::spawn_blocking(move || hash_password(&plain, &cost))
        .await
        .map_err(|e| anyhow::anyhow!(e))??;

    let user = state
        .users
        .insert(name, phone, &hash)
        .await
        .map_err(|e| match e {
            InsertError::Conflict => RegisterError::Conflict,
            InsertError::Other(e) => RegisterError::Internal(e),
        })?;

    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Verifies credentials and issues a signed session token.
pub async fn login(state: &AppState, phone: &str, password: &str) -> Result<String, LoginError> {
    let user = match state.users.find_by_phone(phone).await? {
        Some(u) => u,
        None => {
            warn!("login attempt for unknown phone");
            return Err(LoginError::InvalidCredentials);
        }
    };

    let plain = password.to_string();
    let hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(|e| anyhow::anyhow!(e))??;

    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(LoginError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(state).sign(user.id, &user.name)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let state = AppState::fake();
        let user = register(&state, "amal", "771234567", "secret1")
            .await
            .expect("register");
        assert_eq!(user.phone, "771234567");
        assert_ne!(user.password_hash, "secret1");

        let token = login(&state, "771234567", "secret1").await.expect("login");
        let claims = JwtKeys::from_ref(&state).verify(&token).expect("verify token");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.name, "amal");
    }

    #[tokio::test]
    async fn register_rejects_weak_password_and_bad_phone() {
        let state = AppState::fake();
        assert!(matches!(
            register(&state, "amal", "771234567", "short").await,
            Err(RegisterError::WeakPassword)
        ));
        assert!(matches!(
            register(&state, "amal", "123456789", "longenough").await,
            Err(RegisterError::InvalidPhone)
        ));
        // neither attempt left a record behind
        assert!(state.users.find_by_phone("771234567").await.unwrap().is_none());
        assert!(state.users.find_by_phone("123456789").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let state = AppState::fake();
        register(&state, "amal", "771234567", "secret1").await.expect("first");
        let err = register(&state, "badr", "771234567", "secret2").await.unwrap_err();
        assert!(matches!(err, RegisterError::Conflict));
        let kept = state.users.find_by_phone("771234567").await.unwrap().unwrap();
        assert_eq!(kept.name, "amal");
    }

    #[tokio::test]
    async fn login_collapses_unknown_user_and_wrong_password() {
        let state = AppState::fake();
        register(&state, "amal", "771234567", "secret1").await.expect("register");

        let unknown = login(&state, "700000000", "secret1").await.unwrap_err();
        let wrong = login(&state, "771234567", "wrong-pass").await.unwrap_err();
        assert!(matches!(unknown, LoginError::InvalidCredentials));
        assert!(matches!(wrong, LoginError::InvalidCredentials));
    }
}
