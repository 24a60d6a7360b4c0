use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password, verify_against_dummy, verify_password},
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    error::{AppError, AppResult, ConflictField},
};

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn bad_credentials() -> AppError {
    AppError::Authentication("Incorrect email or password".into())
}

/// Creates an account. Email uniqueness is checked before username, so a
/// request colliding on both reports the email.
pub async fn register(
    users: &dyn UserStore,
    email: &str,
    username: &str,
    password: &str,
) -> AppResult<User> {
    let email = normalize_email(email);
    let username = username.trim().to_string();

    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation("Password too short".into()));
    }

    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict(ConflictField::Email));
    }
    if users.find_by_username(&username).await?.is_some() {
        warn!(username = %username, "username already taken");
        return Err(AppError::Conflict(ConflictField::Username));
    }

    let password_hash = hash_password(password)?;
    let user = users
        .create(NewUser {
            email,
            username,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Returns a signed access token. Unknown email and wrong password yield the
/// same error.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> AppResult<String> {
    let email = normalize_email(email);

    let user = match users.find_by_email(&email).await? {
        Some(u) => u,
        None => {
            verify_against_dummy(password);
            warn!(email = %email, "login unknown email");
            return Err(bad_credentials());
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(bad_credentials());
    }

    let token = keys.sign_access(user.id, &user.email)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}

/// Resolves a bearer token to the full user record. The record still holds
/// the password hash; callers must not re-expose it.
pub async fn authenticate(users: &dyn UserStore, keys: &JwtKeys, token: &str) -> AppResult<User> {
    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AppError::unauthorized()
    })?;

    let Some(sub) = claims.sub else {
        warn!("token is missing sub claim");
        return Err(AppError::unauthorized());
    };
    let user_id = Uuid::parse_str(&sub).map_err(|_| {
        warn!(sub = %sub, "token sub is not a user id");
        AppError::unauthorized()
    })?;

    users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "token subject no longer exists");
        AppError::unauthorized()
    })
}
