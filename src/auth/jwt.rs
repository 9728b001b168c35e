use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{auth::claims::Claims, config::JwtConfig, error::AppError};

/// A freshly signed token with its validity window.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// HS256 signing and verification keys, built once from configuration.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::days(cfg.ttl_days),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<IssuedToken, AppError> {
        self.issue_at(user_id, email, OffsetDateTime::now_utc())
    }

    pub(crate) fn issue_at(
        &self,
        user_id: Uuid,
        email: &str,
        now: OffsetDateTime,
    ) -> Result<IssuedToken, AppError> {
        let expires_at = now
            .checked_add(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("token expiry out of range")))?;
        let claims = Claims {
            sub: user_id,
            user_id,
            email: email.to_string(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(e.into()))?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at,
        })
    }

    /// Checks signature, algorithm and expiry. Every failure is `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        if token.trim().is_empty() {
            return Err(AppError::Unauthorized("Invalid token".into()));
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            warn!(error = %e, "jwt rejected");
            AppError::Unauthorized("Invalid token".into())
        })?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}
