use std::fmt;

use super::{AccountId, Amount};

/// Sequential product identifier, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(u64);

impl ProductId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A listing in the marketplace.
///
/// Created once by its seller, sold at most once, never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price in wei.
    pub price: Amount,
    pub owner: AccountId,
    pub purchased: bool,
}

impl Product {
    pub fn is_for_sale(&self) -> bool {
        !self.purchased
    }
}
