use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::error::Result;
use crate::models::user::Role;

// In-memory fallback secret, generated once per process when none is configured
static GENERATED_SECRET: Lazy<RwLock<Option<String>>> = Lazy::new(|| RwLock::new(None));

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub role: Role,  // Role at issue time; the fresh row still wins per request
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub jti: String, // Token id
}

/// Get the HS256 signing secret, generating a temporary one when unconfigured.
fn signing_secret() -> String {
    if let Some(secret) = &CONFIG.auth.jwt_secret {
        return secret.clone();
    }

    // Fast path: check cache with read lock
    {
        let cache = GENERATED_SECRET.read();
        if let Some(secret) = cache.as_ref() {
            return secret.clone();
        }
    }

    // Slow path: acquire write lock with double-checked locking
    let mut cache = GENERATED_SECRET.write();
    if let Some(secret) = cache.as_ref() {
        return secret.clone();
    }

    tracing::warn!("SITEKIT_JWT_SECRET not set, generating a temporary signing secret");
    let secret = generate_random_string(32);
    *cache = Some(secret.clone());
    secret
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Create a JWT access token for a user. `expires_in` overrides the
/// configured lifetime (seconds).
pub fn create_access_token(user_id: i64, role: Role, expires_in: Option<i64>) -> Result<String> {
    let now = Utc::now();
    let exp = match expires_in {
        Some(seconds) => now + Duration::seconds(seconds),
        None => now + Duration::hours(CONFIG.auth.token_ttl_hours),
    };

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: exp.timestamp(),
        iat: now.timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_secret(signing_secret().as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| e.into())
}

/// Decode and validate a JWT token
pub fn decode_token(token: &str) -> Result<Claims> {
    let key = DecodingKey::from_secret(signing_secret().as_bytes());

    let mut validation = Validation::default();
    validation.validate_exp = true;
    // No clock skew tolerance for expiration check
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

/// Generate a cryptographically secure random string (hex)
pub fn generate_random_string(length: usize) -> String {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..length).map(|_| rng.random()).collect();
    hex::encode(bytes)
}
