use crate::domain::{AccountId, Amount};

/// Custom actions for Product entities.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Buys the product for `payment` wei.
    ///
    /// # Errors
    /// Fails if the product is sold, the payment is below the price, the
    /// buyer already owns it, or the buyer cannot cover the payment.
    Purchase { buyer: AccountId, payment: Amount },
}

/// Commands against the marketplace balance book.
#[derive(Debug, Clone)]
pub enum LedgerCommand {
    /// Credits an account; results in the new balance.
    Deposit { account: AccountId, amount: Amount },
    /// Reads an account balance.
    BalanceOf(AccountId),
}
