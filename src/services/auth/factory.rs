//! Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{AuthService, access_jwt::AuthSettings};

pub fn build_auth_service(config: &Config) -> Result<Arc<AuthService>, AppError> {
    let auth = AuthService::new(AuthSettings {
        secret: config.jwt_secret.clone(),
        leeway_seconds: config.access_token_leeway_seconds,
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
    })
    .map_err(|e| {
        tracing::error!(error = %e, "failed to build access token verifier");
        AppError::Internal
    })?;

    Ok(Arc::new(auth))
}
