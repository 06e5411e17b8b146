use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, SeaOrmAuthService, SeaOrmWalletService, TokenIssuer, WalletService,
};

/// Everything a request handler needs, built once at startup and passed down.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub wallet_service: Arc<dyn WalletService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;
        store.seed_catalog().await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires services around an already-migrated store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let tokens = TokenIssuer::from_config(&config.security);

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            tokens,
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        let wallet_service = Arc::new(SeaOrmWalletService::new(store.clone()))
            as Arc<dyn WalletService + Send + Sync + 'static>;

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            wallet_service,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
