use tracing::{error, info};

use super::{ConfigError, MarketplaceConfig};
use crate::actor_framework::ResourceActor;
use crate::clients::ProductClient;
use crate::domain::{Accounts, Product, ProductId};

/// The marketplace: one ledger actor plus the client used to reach it.
///
/// Responsible for starting the ledger with its genesis balances and for
/// shutting it down.
pub struct MarketplaceSystem {
    pub product_client: ProductClient,
    name: String,
    handle: tokio::task::JoinHandle<()>,
}

impl MarketplaceSystem {
    /// Starts the ledger actor. Must be called inside a tokio runtime.
    pub fn new(config: &MarketplaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(name = %config.name, "Starting marketplace");

        let mut accounts = Accounts::default();
        for (account, balance) in config.genesis_balances()? {
            accounts
                .deposit(&account, balance)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            info!(account = %account, balance = %balance, "Genesis account funded");
        }

        let (ledger, product_resource_client) = ResourceActor::<Product>::new(
            config.mailbox_capacity,
            config.event_capacity,
            accounts,
            ProductId::new,
        );
        let product_client = ProductClient::new(product_resource_client);
        let handle = tokio::spawn(ledger.run());

        Ok(Self {
            product_client,
            name: config.name.clone(),
            handle,
        })
    }

    /// The marketplace's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Closes the ledger and waits for it to stop.
    ///
    /// The ledger only stops once every clone of the client is dropped.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down marketplace...");
        drop(self.product_client);

        if let Err(e) = self.handle.await {
            error!("Ledger task failed: {:?}", e);
            return Err(format!("Ledger task failed: {:?}", e));
        }

        info!("Marketplace shutdown complete.");
        Ok(())
    }
}
