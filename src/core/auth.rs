//! Authentication - email/password accounts and HS256 bearer tokens.
//!
//! Passwords are hashed with bcrypt on the blocking thread pool so a slow
//! hash never stalls the async workers. Tokens carry the user id as `sub`
//! and expire after [`TOKEN_TTL_HOURS`].

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    errors::{Error, Result},
    models::User,
    repository::UserRepository,
};

/// Lifetime of issued tokens.
pub const TOKEN_TTL_HOURS: i64 = 72;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// JWT claims carried by every issued token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Account email
    pub email: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Signs and verifies HS256 tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Creates an issuer whose tokens live for `ttl`.
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issues a token for `user`.
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            Error::Internal {
                message: format!("failed to sign token: {e}"),
            }
        })
    }

    /// Decodes `token`, checking signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| Error::Auth {
                message: format!("invalid token: {e}"),
            })
    }
}

fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(Error::validation("invalid email format"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn invalid_credentials() -> Error {
    Error::Auth {
        message: "invalid credentials".to_string(),
    }
}

async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| Error::Internal {
            message: format!("hashing task failed: {e}"),
        })?
        .map_err(|e| Error::Internal {
            message: format!("failed to hash password: {e}"),
        })
}

async fn verify_password(password: String, digest: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &digest).unwrap_or(false))
        .await
        .map_err(|e| Error::Internal {
            message: format!("verification task failed: {e}"),
        })
}

/// Registration and login over a [`UserRepository`].
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
}

impl AuthService {
    /// Creates the service with the default bcrypt cost.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenIssuer) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Overrides the bcrypt work factor.
    #[must_use]
    pub const fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Creates an account. The returned user serializes without its digest.
    ///
    /// # Errors
    /// [`Error::Validation`] for a malformed email or short password,
    /// [`Error::Conflict`] if the email is taken.
    pub async fn register(&self, email: &str, password: &str) -> Result<User> {
        validate_email(email)?;
        validate_password(password)?;

        let digest = hash_password(password.to_string(), self.bcrypt_cost).await?;
        let user = self.users.create(email.trim(), &digest).await?;
        info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Checks credentials and issues a token.
    ///
    /// # Errors
    /// [`Error::Auth`] for an unknown email or a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        validate_email(email)?;

        let user = match self.users.get_by_email(email.trim()).await {
            Ok(user) => user,
            Err(Error::NotFound { .. }) => return Err(invalid_credentials()),
            Err(err) => return Err(err),
        };

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            warn!(user_id = user.id, "failed login attempt");
            return Err(invalid_credentials());
        }

        let token = self.tokens.issue(&user)?;
        Ok((user, token))
    }

    /// Validates a bearer token.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.tokens.verify(token)
    }
}
