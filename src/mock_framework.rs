//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_action`] to assert behavior
//! and answer the request the way the ledger would.

use crate::actor_framework::{Entity, FrameworkError, Receipt, ResourceClient, ResourceRequest};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

type Responder<T, E> = oneshot::Sender<Result<T, FrameworkError<E>>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client's event and feed channels are live but nothing publishes on them.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (events, _) = broadcast::channel(buffer_size);
    let (_, feed) = watch::channel(Vec::new());
    (ResourceClient::new(sender, events, feed), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Responder<Receipt<T, T::Event>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<T, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Responder<Receipt<T::ActionResult, T::Event>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Command request
pub async fn expect_command<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Command, Responder<Receipt<T::CommandResult, T::Event>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Command { command, respond_to }) => Some((command, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ProductClient;
    use crate::domain::{AccountId, MarketEvent, Product, ProductId};
    use crate::product_actor::{LedgerCommand, MarketError, ProductAction};

    fn iphone(owner: &str) -> Product {
        Product {
            id: ProductId::new(1),
            name: "iPhone X".to_string(),
            price: 100,
            owner: AccountId::from(owner),
            purchased: false,
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = ProductClient::new(inner);
        let seller = AccountId::from("0xseller");

        let create_task = tokio::spawn(async move { client.create_product("iPhone X", 100, &seller).await });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.name, "iPhone X");
        assert_eq!(params.price, 100);
        assert_eq!(params.seller, AccountId::from("0xseller"));
        let product = iphone("0xseller");
        let events = vec![MarketEvent::created(&product)];
        responder.send(Ok(Receipt::new(product.clone(), events))).unwrap();

        let receipt = create_task.await.unwrap().unwrap();
        assert_eq!(receipt.output, product);
    }

    #[tokio::test]
    async fn purchase_passes_buyer_and_payment() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = ProductClient::new(inner);
        let buyer = AccountId::from("0xbuyer");

        let purchase_task =
            tokio::spawn(async move { client.purchase_product(ProductId::new(1), 100, &buyer).await });

        let (id, action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        assert_eq!(id, ProductId::new(1));
        match action {
            ProductAction::Purchase { buyer, payment } => {
                assert_eq!(buyer, AccountId::from("0xbuyer"));
                assert_eq!(payment, 100);
            }
        }
        responder
            .send(Err(FrameworkError::Entity(MarketError::AlreadyPurchased(ProductId::new(1)))))
            .unwrap();

        let result = purchase_task.await.unwrap();
        assert_eq!(result, Err(MarketError::AlreadyPurchased(ProductId::new(1))));
    }

    #[tokio::test]
    async fn get_forwards_id_and_not_found() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = ProductClient::new(inner);

        let get_task = tokio::spawn(async move { client.get_product(ProductId::new(99)).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, ProductId::new(99));
        responder
            .send(Err(FrameworkError::Entity(MarketError::ProductNotFound(id))))
            .unwrap();

        assert_eq!(get_task.await.unwrap(), Err(MarketError::ProductNotFound(ProductId::new(99))));
    }

    #[tokio::test]
    async fn dropped_responder_is_communication_error() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = ProductClient::new(inner);

        let balance_task =
            tokio::spawn(async move { client.balance_of(&AccountId::from("0xseller")).await });

        let (command, responder) = expect_command(&mut receiver).await.expect("Expected Command request");
        assert!(matches!(command, LedgerCommand::BalanceOf(account) if account.as_str() == "0xseller"));
        drop(responder);

        assert_eq!(
            balance_task.await.unwrap(),
            Err(MarketError::ActorCommunicationError("Actor dropped".to_string()))
        );
    }
}
