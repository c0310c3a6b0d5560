mod domain;
mod clients;

mod app_system;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod product_actor;

use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn, Instrument};
use crate::app_system::{setup_tracing, MarketplaceConfig, MarketplaceSystem};
use crate::domain::{format_ether, parse_ether, AccountId};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = MarketplaceConfig::from_env().map_err(|e| e.to_string())?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_level);

    let system = MarketplaceSystem::new(&config).map_err(|e| e.to_string())?;
    info!(name = %system.name(), "Marketplace ready");

    let seller = AccountId::from("0xseller");
    let buyer = AccountId::from("0xbuyer");
    let price = parse_ether("1").map_err(|e| e.to_string())?;

    let client = &system.product_client;
    let mut events = client.subscribe();
    let event_log = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => info!(product_id = ?event.product_id().map(|id| id.value()), ?event, "Market event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event log lagging"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    if client.balance_of(&buyer).await.map_err(|e| e.to_string())? < price {
        client.deposit(&buyer, price).await.map_err(|e| e.to_string())?;
    }

    let span = tracing::info_span!("listing");
    let product = async {
        info!("Listing demo product");
        client.create_product("iPhone X", price, &seller).await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?
    .output;

    info!(product_id = product.id.value(), price = %format_ether(product.price), "Listed");

    let span = tracing::info_span!("purchase");
    let purchase = async {
        info!("Buying demo product");
        client.purchase_product(product.id, product.price, &buyer).await
    }
    .instrument(span)
    .await;

    match purchase {
        Ok(receipt) => info!(owner = receipt.output.owner.as_str(), events = receipt.events.len(), "Purchase settled"),
        Err(e) => error!(error = %e, "Purchase failed"),
    }

    for product in client.list_products().await.map_err(|e| e.to_string())? {
        info!(
            product_id = product.id.value(),
            name = %product.name,
            price = %format_ether(product.price),
            owner = product.owner.as_str(),
            for_sale = product.is_for_sale(),
            "Listing"
        );
    }
    info!(listings = client.listing_feed().borrow().len(), "Listing feed");
    let seller_balance = client.balance_of(&seller).await.map_err(|e| e.to_string())?;
    info!(seller = %seller, balance = %format_ether(seller_balance), "Seller balance");

    // Shutdown system gracefully
    system.shutdown().await?;
    if let Err(e) = event_log.await {
        error!("Event log task failed: {:?}", e);
    }

    info!("Marketplace stopped");
    Ok(())
}
