use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned by access-token verification.
///
/// Only used for logging. Callers collapse every variant into one rejection.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("token expired at exp boundary")]
    ExpiresNow,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthConfigError {
    #[error("jwt secret must not be empty")]
    EmptySecret,
}

/// Decoded payload of a verified access token.
///
/// Kept as a plain claim-name → value mapping: application fields (`cID`, ...) and
/// standard metadata (`iat`, `exp`, ...) pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Caller identifier, if the issuer put one in the token.
    pub fn cid(&self) -> Option<&str> {
        self.0.get("cID").and_then(Value::as_str)
    }
}

/// Verification settings, injected once at startup.
#[derive(Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub leeway_seconds: u64,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

/// HMAC (HS256/384/512) access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: u64,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(settings: AuthSettings) -> Result<Self, AuthConfigError> {
        if settings.secret.is_empty() {
            return Err(AuthConfigError::EmptySecret);
        }

        let decoding_key = DecodingKey::from_secret(settings.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // exp/nbf are checked only when the token carries them
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = settings.leeway_seconds;

        if let Some(issuer) = settings.issuer.as_deref() {
            validation.set_issuer(&[issuer]);
        }
        match settings.audience.as_deref() {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
            leeway_seconds: settings.leeway_seconds,
        })
    }

    /// Verify and decode an access token.
    ///
    /// `jsonwebtoken::Validation` checks:
    /// - signature (any HMAC algorithm, same secret)
    /// - `exp` / `nbf` when present
    /// - `iss` / `aud` when configured
    ///
    /// jsonwebtoken still accepts `exp == now`; a token is already expired in that
    /// second, so the boundary is checked here.
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        if let Some(exp) = data.claims.0.get("exp").and_then(Value::as_f64) {
            let now = jsonwebtoken::get_current_timestamp() as f64;
            if exp + self.leeway_seconds as f64 <= now {
                return Err(VerificationError::ExpiresNow);
            }
        }

        Ok(data.claims)
    }
}
