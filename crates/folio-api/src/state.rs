use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use tracing::{info, warn};

use folio_core::{hash_password, DatabaseBackend, JwtManager, Settings};
use folio_store::{ContentStore, MemoryStore, PgStore};

use crate::rate_limit::RateLimitManager;

/// Shared application state, cheap to clone into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub settings: Arc<Settings>,
    pub jwt: Arc<JwtManager>,
    pub rate_limits: Arc<RateLimitManager>,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn ContentStore> = match settings.database.backend {
            DatabaseBackend::Postgres => {
                let store = PgStore::connect(&settings.database)
                    .await
                    .context("failed to connect to postgres")?;
                store.migrate().await.context("failed to run migrations")?;
                Arc::new(store)
            }
            DatabaseBackend::Memory => {
                warn!("using the in-memory store; data will not survive a restart");
                Arc::new(MemoryStore::new())
            }
        };

        let state = Self {
            store,
            jwt: Arc::new(JwtManager::new(&settings.auth)),
            rate_limits: Arc::new(RateLimitManager::new(settings.environment)),
            settings: Arc::new(settings),
        };
        state.seed_admin().await?;
        Ok(state)
    }

    /// Build state around an existing store, used by integration tests.
    pub fn with_store(settings: Settings, store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            jwt: Arc::new(JwtManager::new(&settings.auth)),
            rate_limits: Arc::new(RateLimitManager::new(settings.environment)),
            settings: Arc::new(settings),
        }
    }

    /// Create the admin account on first boot when credentials are
    /// configured. An existing account is never overwritten.
    pub async fn seed_admin(&self) -> anyhow::Result<()> {
        let auth = &self.settings.auth;
        let (Some(username), Some(password)) = (&auth.admin_username, &auth.admin_password) else {
            return Ok(());
        };
        let hash = hash_password(password.expose_secret())
            .context("failed to hash admin password")?;
        self.store
            .ensure_admin(username, &hash)
            .await
            .context("failed to seed admin account")?;
        info!(username = %username, "Admin account ensured");
        Ok(())
    }
}
