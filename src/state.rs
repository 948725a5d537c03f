use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    auth::{
        password::Argon2PasswordEncoder,
        repo::{MemoryUserStore, PgUserStore, UserStore},
        services::AuthService,
    },
    config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let users: Arc<dyn UserStore> = match &config.database_url {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;
                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;
                Arc::new(PgUserStore::new(db))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; users are kept in memory");
                Arc::new(MemoryUserStore::new())
            }
        };

        let state = Self::from_parts(config, users);
        if let Some(seed) = &state.config.admin {
            state
                .auth
                .ensure_admin(seed)
                .await
                .context("seed admin account")?;
        }
        Ok(state)
    }

    pub fn from_parts(config: Arc<AppConfig>, users: Arc<dyn UserStore>) -> Self {
        let auth = AuthService::new(users, Arc::new(Argon2PasswordEncoder));
        Self { config, auth }
    }

    /// In-memory state with a fixed JWT secret, for tests.
    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 5,
            },
            cors_max_age_secs: 3600,
            admin: None,
        });
        Self::from_parts(config, Arc::new(MemoryUserStore::new()))
    }
}
