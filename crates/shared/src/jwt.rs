//! Identity token verification.
//!
//! Sessions are issued by the external identity provider. This module only
//! verifies their JWTs (HS256 shared secret or RS256 public key) and extracts
//! the caller identity. Minting is available when signing material is
//! configured, which local development and the integration tests rely on.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Token signing is not configured")]
    SigningUnavailable,
}

/// Session claims issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Session identifier
    #[serde(default)]
    pub jti: String,
    /// Audience, checked only when the verifier has one configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Display name captured at sign-up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Verifies (and optionally mints) identity tokens.
#[derive(Clone)]
pub struct JwtConfig {
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    encoding_key: Option<EncodingKey>,
    audience: Option<String>,
    /// Lifetime of minted tokens in seconds
    pub access_token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("audience", &self.audience)
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("decoding_key", &"[REDACTED]")
            .field("encoding_key", &self.encoding_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Default lifetime of minted tokens (1 hour)
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_SECS: i64 = 3600;

impl JwtConfig {
    /// Creates a verifier for HS256 tokens signed with a shared secret.
    ///
    /// The secret also signs, so tokens can be minted with the same config.
    pub fn from_secret(secret: &str) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("JWT secret is empty".to_string()));
        }

        Ok(Self {
            algorithm: Algorithm::HS256,
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: Some(EncodingKey::from_secret(secret.as_bytes())),
            audience: None,
            access_token_expiry_secs: DEFAULT_ACCESS_TOKEN_EXPIRY_SECS,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        })
    }

    /// Creates a verifier for RS256 tokens.
    ///
    /// # Arguments
    /// * `public_key_pem` - RSA public key of the identity provider
    /// * `private_key_pem` - Optional RSA private key, only needed to mint tokens
    pub fn from_rsa_pem(
        public_key_pem: &str,
        private_key_pem: Option<&str>,
    ) -> Result<Self, JwtError> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        let encoding_key = match private_key_pem.filter(|k| !k.is_empty()) {
            Some(pem) => Some(
                EncodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?,
            ),
            None => None,
        };

        Ok(Self {
            algorithm: Algorithm::RS256,
            decoding_key,
            encoding_key,
            audience: None,
            access_token_expiry_secs: DEFAULT_ACCESS_TOKEN_EXPIRY_SECS,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        })
    }

    /// Requires tokens to carry the given audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Overrides the clock skew leeway.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// Overrides the lifetime of minted tokens.
    pub fn with_expiry(mut self, access_token_expiry_secs: i64) -> Self {
        self.access_token_expiry_secs = access_token_expiry_secs;
        self
    }

    /// Returns the signing algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Mints an access token for the given identity.
    ///
    /// Returns `(token, jti)`.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        name: Option<&str>,
    ) -> Result<(String, String), JwtError> {
        let encoding_key = self
            .encoding_key
            .as_ref()
            .ok_or(JwtError::SigningUnavailable)?;

        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
            aud: self.audience.clone(),
            name: name.map(str::to_string),
        };

        let token = encode(&Header::new(self.algorithm), &claims, encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, jti))
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

/// Extracts the identity id from validated claims.
pub fn extract_user_id(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidToken)
}
