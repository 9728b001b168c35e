use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    auth::{
        jwt::JwtKeys,
        password::PasswordHasher,
        repo::{InMemoryUserStore, PgUserStore, UserStore},
        services::AuthService,
    },
    config::{AppConfig, ConfigError},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
}

impl AppState {
    /// Connects to Postgres, applies migrations and wires the auth service.
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        Ok(Self::from_parts(config, Arc::new(PgUserStore::new(db)))?)
    }

    /// Same wiring over a process-local store.
    pub fn in_memory(config: AppConfig) -> Result<Self, ConfigError> {
        Self::from_parts(config, Arc::new(InMemoryUserStore::new()))
    }

    pub fn from_parts(config: AppConfig, users: Arc<dyn UserStore>) -> Result<Self, ConfigError> {
        let keys = JwtKeys::new(&config.jwt);
        let hasher = PasswordHasher::new(&config.password)?;
        Ok(Self {
            config: Arc::new(config),
            auth: AuthService::new(users, keys, hasher),
        })
    }
}
