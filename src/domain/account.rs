use std::collections::HashMap;
use std::fmt;

use super::Amount;
use crate::product_actor::MarketError;

/// Opaque identity of a marketplace participant, e.g. a wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }

    /// Fails with `InvalidAccount` for a blank identity.
    pub fn ensure_valid(&self) -> Result<(), MarketError> {
        if self.is_blank() {
            return Err(MarketError::InvalidAccount(self.0.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}


/// Balance book of every account known to the marketplace.
///
/// Accounts that never received funds have a zero balance.
#[derive(Debug, Clone, Default)]
pub struct Accounts {
    balances: HashMap<AccountId, Amount>,
}

impl Accounts {
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Credits `amount` and returns the new balance.
    pub fn deposit(&mut self, account: &AccountId, amount: Amount) -> Result<Amount, MarketError> {
        account.ensure_valid()?;
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or_else(|| MarketError::BalanceOverflow(account.clone()))?;
        self.balances.insert(account.clone(), balance);
        Ok(balance)
    }

    /// Moves `amount` from `from` to `to`. Either both balances change or neither does.
    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<(), MarketError> {
        let (debited, credited) = self.check_transfer(from, to, amount)?;
        self.balances.insert(from.clone(), debited);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }

    fn check_transfer(&self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<(Amount, Amount), MarketError> {
        from.ensure_valid()?;
        to.ensure_valid()?;

        let balance = self.balance_of(from);
        let debited = balance
            .checked_sub(amount)
            .ok_or(MarketError::InsufficientFunds { balance, required: amount })?;
        if from == to {
            return Ok((balance, balance));
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| MarketError::BalanceOverflow(to.clone()))?;
        Ok((debited, credited))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_account_has_zero_balance() {
        let accounts = Accounts::default();
        assert_eq!(accounts.balance_of(&"0xnobody".into()), 0);
    }

    #[test]
    fn deposit_accumulates() {
        let mut accounts = Accounts::default();
        let alice = AccountId::from("0xalice");
        assert_eq!(accounts.deposit(&alice, 5), Ok(5));
        assert_eq!(accounts.deposit(&alice, 7), Ok(12));
    }

    #[test]
    fn deposit_rejects_blank_and_overflow() {
        let mut accounts = Accounts::default();
        assert_eq!(
            accounts.deposit(&AccountId::from("  "), 1),
            Err(MarketError::InvalidAccount("  ".to_string()))
        );

        let whale = AccountId::from("0xwhale");
        accounts.deposit(&whale, Amount::MAX).unwrap();
        assert_eq!(accounts.deposit(&whale, 1), Err(MarketError::BalanceOverflow(whale.clone())));
        assert_eq!(accounts.balance_of(&whale), Amount::MAX);
    }

    #[test]
    fn transfer_is_all_or_nothing() {
        let mut accounts = Accounts::default();
        let buyer = AccountId::from("0xbuyer");
        let seller = AccountId::from("0xseller");
        accounts.deposit(&buyer, 10).unwrap();

        assert_eq!(
            accounts.transfer(&buyer, &seller, 11),
            Err(MarketError::InsufficientFunds { balance: 10, required: 11 })
        );
        assert_eq!((accounts.balance_of(&buyer), accounts.balance_of(&seller)), (10, 0));

        accounts.transfer(&buyer, &seller, 4).unwrap();
        assert_eq!((accounts.balance_of(&buyer), accounts.balance_of(&seller)), (6, 4));
    }

    #[test]
    fn transfer_to_self_keeps_balance() {
        let mut accounts = Accounts::default();
        let alice = AccountId::from("0xalice");
        accounts.deposit(&alice, 3).unwrap();
        accounts.transfer(&alice, &alice, 2).unwrap();
        assert_eq!(accounts.balance_of(&alice), 3);
    }
}
