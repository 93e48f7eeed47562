use std::sync::Arc;

use anyhow::Context;

use crate::{
    auth::repo::{MemoryUserRepository, PgUserRepository, UserRepository},
    catalog::repo::CatalogStore,
    config::AppConfig,
    otp::{
        delivery::{LogDelivery, OtpDelivery},
        store::{MemoryOtpStore, OtpStore},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub otp: Arc<dyn OtpStore>,
    pub delivery: Arc<dyn OtpDelivery>,
    pub catalog: Arc<CatalogStore>,
}

impl AppState {
    /// Builds process state from the environment. With `DATABASE_URL` set
    /// the user repository is Postgres-backed; otherwise everything runs on
    /// the in-memory stores (codes and accounts are lost on restart).
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let users: Arc<dyn UserRepository> = match &config.database_url {
            Some(url) => {
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("run migrations")?;
                tracing::info!("user repository: postgres");
                Arc::new(PgUserRepository::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory user repository");
                Arc::new(MemoryUserRepository::new())
            }
        };

        let otp = Arc::new(MemoryOtpStore::new(&config.otp));

        Ok(Self {
            config,
            users,
            otp,
            delivery: Arc::new(LogDelivery),
            catalog: Arc::new(CatalogStore::seeded()),
        })
    }

    /// In-memory state with fixed config, for tests.
    pub fn fake() -> Self {
        Self::fake_with_delivery(Arc::new(LogDelivery))
    }

    pub fn fake_with_delivery(delivery: Arc<dyn OtpDelivery>) -> Self {
        let config = Arc::new(AppConfig::for_tests());
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            otp: Arc::new(MemoryOtpStore::new(&config.otp)),
            delivery,
            catalog: Arc::new(CatalogStore::seeded()),
            config,
        }
    }
}
