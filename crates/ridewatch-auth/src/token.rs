//! HS256 bearer tokens.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use ridewatch_core::Claims;

use crate::error::{AuthError, AuthResult};

/// Minimum signing secret length in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Wire claims. `sub` is the numeric account id as a string.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    adm: bool,
    iat: i64,
    exp: i64,
}

/// Issues and validates signed tokens for users and admins.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

impl TokenService {
    /// Create a token service from an explicit secret and lifetime.
    ///
    /// `ttl_secs` must lie in `1..=MAX_TOKEN_TTL_SECS`.
    pub fn new(secret: &[u8], ttl_secs: u64) -> AuthResult<Self> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::WeakSecret(MIN_SECRET_LENGTH));
        }
        if ttl_secs == 0 || ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(AuthError::TtlOutOfRange(ttl_secs));
        }
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or(AuthError::TtlOutOfRange(ttl_secs))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iat"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a token for `user_id` starting now.
    pub fn issue(&self, user_id: i64, is_admin: bool) -> AuthResult<String> {
        self.issue_at(user_id, is_admin, Utc::now())
    }

    /// Issue a token as if it were created at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: i64,
        is_admin: bool,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Hashing("token expiry out of range".to_string()))?;
        let claims = TokenClaims {
            sub: user_id.to_string(),
            adm: is_admin,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Verify a token and extract its claims.
    pub fn validate(&self, token: &str) -> AuthResult<Claims> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => {
                    debug!(subsystem = "auth", op = "validate", error = %e, "Token rejected");
                    AuthError::Invalid(e.to_string())
                }
            }
        })?;

        let user_id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::Invalid("subject is not an account id".to_string()))?;
        let expires_at = Utc
            .timestamp_opt(data.claims.exp, 0)
            .single()
            .ok_or_else(|| AuthError::Invalid("expiry out of range".to_string()))?;

        Ok(Claims {
            user_id,
            is_admin: data.claims.adm,
            expires_at,
        })
    }
}
