use super::{AccountId, Amount, Product, ProductId};

/// Events emitted by the ledger after a committed state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketEvent {
    ProductCreated {
        id: ProductId,
        name: String,
        price: Amount,
        owner: AccountId,
        purchased: bool,
    },
    ProductPurchased {
        id: ProductId,
        name: String,
        price: Amount,
        owner: AccountId,
        purchased: bool,
    },
    Deposited {
        account: AccountId,
        amount: Amount,
        balance: Amount,
    },
}

impl MarketEvent {
    pub fn created(product: &Product) -> Self {
        Self::ProductCreated {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            owner: product.owner.clone(),
            purchased: product.purchased,
        }
    }

    pub fn purchased(product: &Product) -> Self {
        Self::ProductPurchased {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            owner: product.owner.clone(),
            purchased: product.purchased,
        }
    }

    /// The product this event is about, if any.
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            Self::ProductCreated { id, .. } | Self::ProductPurchased { id, .. } => Some(*id),
            Self::Deposited { .. } => None,
        }
    }
}
