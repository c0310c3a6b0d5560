use tracing::debug;

use super::{LedgerCommand, MarketError, ProductAction, ProductCreate};
use crate::actor_framework::{Entity, Receipt};
use crate::domain::{Accounts, Amount, MarketEvent, Product, ProductId};

impl Entity for Product {
    type Id = ProductId;
    type CreateParams = ProductCreate;
    type Action = ProductAction;
    type ActionResult = Product;
    type Command = LedgerCommand;
    type CommandResult = Amount;
    type Context = Accounts;
    type Event = MarketEvent;
    type Error = MarketError;

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// Creates an unsold listing owned by the seller.
    ///
    /// # Errors
    /// `InvalidListing` for an empty name or a zero price, `InvalidAccount`
    /// for a blank seller.
    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, MarketError> {
        if params.name.is_empty() {
            return Err(MarketError::InvalidListing("name must not be empty".to_string()));
        }
        if params.price == 0 {
            return Err(MarketError::InvalidListing("price must be positive".to_string()));
        }
        params.seller.ensure_valid()?;

        Ok(Self {
            id,
            name: params.name,
            price: params.price,
            owner: params.seller,
            purchased: false,
        })
    }

    fn not_found(id: &ProductId) -> MarketError {
        MarketError::ProductNotFound(*id)
    }

    fn on_create(&self) -> Vec<MarketEvent> {
        vec![MarketEvent::created(self)]
    }

    fn handle_action(
        &mut self,
        action: ProductAction,
        accounts: &mut Accounts,
    ) -> Result<Receipt<Product, MarketEvent>, MarketError> {
        match action {
            ProductAction::Purchase { buyer, payment } => {
                buyer.ensure_valid()?;
                if payment < self.price {
                    return Err(MarketError::InsufficientPayment {
                        price: self.price,
                        offered: payment,
                    });
                }
                if self.purchased {
                    return Err(MarketError::AlreadyPurchased(self.id));
                }
                if buyer == self.owner {
                    return Err(MarketError::SelfPurchase(buyer));
                }

                // The whole payment goes to the seller, overpayment included.
                accounts.transfer(&buyer, &self.owner, payment)?;
                debug!(product_id = %self.id, seller = %self.owner, buyer = %buyer, payment = %payment, "Payment settled");

                self.owner = buyer;
                self.purchased = true;
                Ok(Receipt::new(self.clone(), vec![MarketEvent::purchased(self)]))
            }
        }
    }

    fn handle_command(
        accounts: &mut Accounts,
        command: LedgerCommand,
    ) -> Result<Receipt<Amount, MarketEvent>, MarketError> {
        match command {
            LedgerCommand::Deposit { account, amount } => {
                let balance = accounts.deposit(&account, amount)?;
                Ok(Receipt::new(balance, vec![MarketEvent::Deposited { account, amount, balance }]))
            }
            LedgerCommand::BalanceOf(account) => Ok(Receipt::quiet(accounts.balance_of(&account))),
        }
    }
}
