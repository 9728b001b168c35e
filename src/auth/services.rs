use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::LoginData,
        jwt::JwtKeys,
        password::PasswordHasher,
        repo::UserStore,
        repo_types::PublicUser,
    },
    error::AppError,
};

/// Register / login / me / logout on top of the user store and token keys.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys, hasher: PasswordHasher) -> Self {
        Self {
            users,
            keys,
            hasher,
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<PublicUser, AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            warn!("email already registered");
            return Err(AppError::Conflict("Email already in use".into()));
        }

        let hash = self.hasher.hash(password)?;
        // A concurrent registration can still win the insert; the store reports it.
        let user = self.users.create(email, &hash).await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginData, AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            warn!("login unknown email");
            return Err(AppError::NotFound("User not found".into()));
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::Unauthorized("Password is incorrect".into()));
        }

        let issued = self.keys.issue(user.id, &user.email)?;
        info!(user_id = %user.id, "user logged in");
        Ok(LoginData {
            user_id: user.id,
            email: user.email,
            token: issued.token,
        })
    }

    #[instrument(skip_all)]
    pub async fn me(&self, token: Option<&str>) -> Result<PublicUser, AppError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Invalid user".into()))?;

        let claims = self.keys.verify(token)?;
        match self.users.find_by_id(claims.sub).await? {
            Some(user) => Ok(user.into()),
            None => {
                warn!(user_id = %claims.sub, "token subject no longer exists");
                Err(AppError::NotFound("User not found".into()))
            }
        }
    }

    /// Tokens are not tracked server-side, so there is nothing to revoke here.
    pub fn logout(&self) {
        info!("user logged out");
    }
}
