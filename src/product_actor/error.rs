use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::{AccountId, Amount, ProductId};

/// Rejections the marketplace reports to callers. None of them change state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarketError {
    #[error("Invalid listing: {0}")]
    InvalidListing(String),
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("Product already purchased: {0}")]
    AlreadyPurchased(ProductId),
    #[error("Insufficient payment: price {price}, offered {offered}")]
    InsufficientPayment { price: Amount, offered: Amount },
    #[error("Seller cannot buy their own product: {0}")]
    SelfPurchase(AccountId),
    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: Amount, required: Amount },
    #[error("Invalid account: {0:?}")]
    InvalidAccount(String),
    #[error("Balance overflow for account {0}")]
    BalanceOverflow(AccountId),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<MarketError>> for MarketError {
    fn from(err: FrameworkError<MarketError>) -> Self {
        match err {
            FrameworkError::Entity(err) => err,
            other => MarketError::ActorCommunicationError(other.to_string()),
        }
    }
}
