//! Credential checks and bearer tokens.
//!
//! Passwords are stored as SHA-256 hex digests. Tokens are HS256 JWTs
//! carrying the username as `sub`.

use std::collections::HashMap;

use askdb_core::config::AuthConfig;
use askdb_core::AskError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Account seeded into every new store.
pub const DEFAULT_USERNAME: &str = "analytics_user";
const DEFAULT_PASSWORD: &str = "secret";

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub disabled: bool,
}

/// In-memory account registry.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: HashMap<String, User>,
}

impl UserStore {
    /// Store holding only the default analytics account.
    pub fn seeded() -> Self {
        let mut store = Self::default();
        store.insert(DEFAULT_USERNAME, DEFAULT_PASSWORD, false);
        store
    }

    pub fn insert(&mut self, username: &str, password: &str, disabled: bool) {
        self.users.insert(
            username.to_string(),
            User {
                username: username.to_string(),
                password_hash: hash_password(password),
                disabled,
            },
        );
    }

    /// Unknown users, wrong passwords and disabled accounts all fail the
    /// same way.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&User, AskError> {
        match self.users.get(username) {
            Some(user) if !user.disabled && user.password_hash == hash_password(password) => {
                Ok(user)
            }
            _ => Err(AskError::InvalidCredentials),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and checks access tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expire_minutes: u32,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, expire_minutes: u32) -> Self {
        Self {
            secret: secret.into(),
            expire_minutes,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AskError> {
        let secret = config
            .secret_key
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AskError::Config("SECRET_KEY is not set".to_string()))?;
        Ok(Self::new(secret, config.token_expire_minutes))
    }

    pub fn issue(&self, username: &str) -> Result<String, AskError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(i64::from(self.expire_minutes))).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AskError::Token(e.to_string()))
    }

    /// Bad signatures, malformed tokens and expired tokens are `Forbidden`.
    pub fn verify(&self, token: &str) -> Result<Claims, AskError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AskError::Forbidden(e.to_string()))
    }
}

/// Token part of an `Authorization` header value: the second
/// space-separated word, whatever the scheme.
pub fn bearer_token(header: &str) -> Option<&str> {
    header.split(' ').nth(1).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_user_authenticates() {
        let store = UserStore::seeded();
        let user = store.authenticate("analytics_user", "secret").unwrap();
        assert_eq!(user.username, "analytics_user");
        assert_ne!(user.password_hash, "secret");
    }

    #[test]
    fn wrong_password_or_unknown_user_is_refused() {
        let store = UserStore::seeded();
        assert_eq!(
            store.authenticate("analytics_user", "nope").unwrap_err(),
            AskError::InvalidCredentials
        );
        assert_eq!(
            store.authenticate("mallory", "secret").unwrap_err(),
            AskError::InvalidCredentials
        );
    }

    #[test]
    fn disabled_user_is_refused() {
        let mut store = UserStore::default();
        store.insert("retired", "pw", true);
        assert!(store.authenticate("retired", "pw").is_err());
    }

    #[test]
    fn password_hash_is_sha256_hex() {
        assert_eq!(
            hash_password("secret"),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn issued_token_verifies() {
        let issuer = TokenIssuer::new("test-secret", 30);
        let token = issuer.issue("analytics_user").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "analytics_user");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn token_from_other_secret_is_forbidden() {
        let token = TokenIssuer::new("one", 30).issue("analytics_user").unwrap();
        let err = TokenIssuer::new("two", 30).verify(&token).unwrap_err();
        assert!(matches!(err, AskError::Forbidden(_)));
    }

    #[test]
    fn expired_token_is_forbidden() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "analytics_user".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        let err = TokenIssuer::new("test-secret", 30).verify(&token).unwrap_err();
        assert!(matches!(err, AskError::Forbidden(_)));
    }

    #[test]
    fn garbage_token_is_forbidden() {
        let err = TokenIssuer::new("s", 30).verify("not.a.jwt").unwrap_err();
        assert!(matches!(err, AskError::Forbidden(_)));
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        let config = AuthConfig {
            secret_key: None,
            token_expire_minutes: 30,
        };
        assert!(matches!(
            TokenIssuer::from_config(&config),
            Err(AskError::Config(_))
        ));
    }

    #[test]
    fn bearer_token_takes_second_word() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Token abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer "), None);
    }
}
