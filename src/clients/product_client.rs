use tokio::sync::{broadcast, watch};
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{Receipt, ResourceClient};
use crate::domain::{AccountId, Amount, MarketEvent, Product, ProductId};
use crate::product_actor::{LedgerCommand, MarketError, ProductAction, ProductCreate};

/// Client for interacting with the marketplace ledger actor.
///
/// Cheap to clone; every clone talks to the same ledger.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, MarketError, product);

impl ProductClient {
    /// Lists a new product owned by `seller`.
    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        name: &str,
        price: Amount,
        seller: &AccountId,
    ) -> Result<Receipt<Product, MarketEvent>, MarketError> {
        debug!("Sending request");
        let params = ProductCreate {
            name: name.to_string(),
            price,
            seller: seller.clone(),
        };
        match self.inner.create(params).await {
            Ok(receipt) => {
                info!(product_id = %receipt.output.id, "Product listed");
                Ok(receipt)
            }
            Err(e) => {
                let e = MarketError::from(e);
                warn!(error = %e, "Listing rejected");
                Err(e)
            }
        }
    }

    /// Buys product `id` for `payment` wei on behalf of `buyer`.
    #[instrument(skip(self))]
    pub async fn purchase_product(
        &self,
        id: ProductId,
        payment: Amount,
        buyer: &AccountId,
    ) -> Result<Receipt<Product, MarketEvent>, MarketError> {
        debug!("Sending request");
        let action = ProductAction::Purchase {
            buyer: buyer.clone(),
            payment,
        };
        match self.inner.perform_action(id, action).await {
            Ok(receipt) => {
                info!(product_id = %id, "Product purchased");
                Ok(receipt)
            }
            Err(e) => {
                let e = MarketError::from(e);
                warn!(error = %e, "Purchase rejected");
                Err(e)
            }
        }
    }

    /// Credits `amount` wei to `account` and returns the new balance.
    #[instrument(skip(self))]
    pub async fn deposit(&self, account: &AccountId, amount: Amount) -> Result<Amount, MarketError> {
        debug!("Sending request");
        let command = LedgerCommand::Deposit {
            account: account.clone(),
            amount,
        };
        Ok(self.inner.execute(command).await?.output)
    }

    #[instrument(skip(self))]
    pub async fn balance_of(&self, account: &AccountId) -> Result<Amount, MarketError> {
        debug!("Sending request");
        Ok(self.inner.execute(LedgerCommand::BalanceOf(account.clone())).await?.output)
    }

    /// Events committed from now on, in commit order.
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.inner.subscribe()
    }

    /// Ordered product list, refreshed after every listing or sale.
    pub fn listing_feed(&self) -> watch::Receiver<Vec<Product>> {
        self.inner.feed()
    }
}
