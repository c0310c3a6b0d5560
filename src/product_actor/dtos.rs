use crate::domain::{AccountId, Amount};

/// Parameters of a new listing, as submitted by the seller.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: Amount,
    pub seller: AccountId,
}
