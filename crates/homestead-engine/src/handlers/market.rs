//! Selling goods at the market.
//!
//! A sale is quoted first and settled when the user confirms. The quote
//! clamps the request to what the user holds; the confirmation settles
//! exactly the quoted amount, or refuses if the holding has shrunk in
//! between. Proceeds are always priced by the market at settlement. The
//! price carried by the confirm button is only compared against it, and a
//! mismatch refuses the sale.

use homestead_core::economy::{SaleAmount, clamp_sale, sale_proceeds};
use homestead_core::payload::ButtonAction;
use homestead_db::{InventoryStore, ItemStore};
use homestead_types::{AnimalType, GuildId, UserId};
use tracing::{debug, info};

use super::{Homestead, Outcome, reject};
use crate::error::HandlerError;
use crate::rejection::Rejection;

/// A priced offer to sell, awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleQuote {
    /// Good to sell.
    pub good: AnimalType,
    /// Amount after clamping to the holding.
    pub amount: u64,
    /// Whether the request was reduced to fit the holding.
    pub adjusted: bool,
    /// Price per unit.
    pub unit_price: u64,
    /// `amount * unit_price`.
    pub total: u64,
}

impl SaleQuote {
    /// Button that settles this quote.
    pub const fn confirm(&self) -> ButtonAction {
        ButtonAction::Sell {
            good: self.good,
            amount: self.amount,
            unit_price: self.unit_price,
        }
    }
}

/// A committed sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sale {
    /// Good sold.
    pub good: AnimalType,
    /// Units sold.
    pub amount: u64,
    /// Whether the request was reduced to fit the holding.
    pub adjusted: bool,
    /// Price per unit.
    pub unit_price: u64,
    /// Gold credited.
    pub proceeds: u64,
    /// Balance after the credit.
    pub balance: u64,
    /// Units of the good left.
    pub remaining: u64,
}

/// Find a good by the key or name of the animal producing it, ignoring
/// case. Product names are not unique (cows and goats both give milk).
pub fn resolve_good(query: &str) -> Option<AnimalType> {
    let query = query.trim();
    AnimalType::ALL
        .into_iter()
        .find(|good| good.key().eq_ignore_ascii_case(query) || good.name().eq_ignore_ascii_case(query))
}

impl Homestead {
    /// Quote a sale of `requested` units, or everything held when `None`.
    pub async fn quote_sale(
        &self,
        guild: GuildId,
        user: UserId,
        query: &str,
        requested: Option<u64>,
    ) -> Result<Outcome<SaleQuote>, HandlerError> {
        let Some(good) = resolve_good(query) else {
            return Ok(Outcome::Rejected(Rejection::UnknownGood {
                query: query.to_owned(),
            }));
        };

        let mut conn = self.pool().acquire().await?;
        let held = ItemStore::new(&mut conn)
            .user_items(guild, user)
            .await?
            .amount_of(good);

        let Some(SaleAmount { amount, adjusted }) = clamp_sale(held, requested) else {
            return Ok(Outcome::Rejected(Rejection::NothingToSell { good }));
        };
        let unit_price = self.market.sell_price(guild, good);
        let total = sale_proceeds(amount, unit_price).ok_or(HandlerError::Overflow("sale total"))?;

        Ok(Outcome::Done(SaleQuote {
            good,
            amount,
            adjusted,
            unit_price,
            total,
        }))
    }

    /// Settle a confirmed quote: exactly `amount` at the current price,
    /// provided it still equals `quoted_price`.
    pub async fn confirm_sale(
        &self,
        guild: GuildId,
        user: UserId,
        good: AnimalType,
        amount: u64,
        quoted_price: u64,
    ) -> Result<Outcome<Sale>, HandlerError> {
        let current = self.market.sell_price(guild, good);
        if quoted_price != current {
            let rejection = Rejection::PriceChanged {
                good,
                quoted: quoted_price,
                current,
            };
            debug!(%rejection, "request rejected");
            return Ok(Outcome::Rejected(rejection));
        }
        self.settle(guild, user, good, SaleRequest::Exact(amount))
            .await
    }

    /// Sell in one step at the current price, clamping to the holding.
    pub async fn sell(
        &self,
        guild: GuildId,
        user: UserId,
        good: AnimalType,
        requested: Option<u64>,
    ) -> Result<Outcome<Sale>, HandlerError> {
        self.settle(guild, user, good, SaleRequest::UpTo(requested))
            .await
    }

    async fn settle(
        &self,
        guild: GuildId,
        user: UserId,
        good: AnimalType,
        request: SaleRequest,
    ) -> Result<Outcome<Sale>, HandlerError> {
        let unit_price = self.market.sell_price(guild, good);
        let mut tx = self.pool().begin().await?;
        InventoryStore::new(&mut tx).lock_balance(guild, user).await?;
        let held = ItemStore::new(&mut tx)
            .lock_user_amount(guild, user, good)
            .await?;

        let (amount, adjusted) = match request {
            SaleRequest::UpTo(requested) => match clamp_sale(held, requested) {
                Some(SaleAmount { amount, adjusted }) => (amount, adjusted),
                None => return reject(tx, Rejection::NothingToSell { good }).await,
            },
            SaleRequest::Exact(_) if held == 0 => {
                return reject(tx, Rejection::NothingToSell { good }).await;
            }
            SaleRequest::Exact(amount) if amount > held || amount == 0 => {
                let rejection = Rejection::InsufficientGoods {
                    good,
                    requested: amount,
                    available: held,
                };
                return reject(tx, rejection).await;
            }
            SaleRequest::Exact(amount) => (amount, false),
        };

        let proceeds =
            sale_proceeds(amount, unit_price).ok_or(HandlerError::Overflow("sale proceeds"))?;

        let Some(remaining) = ItemStore::new(&mut tx)
            .take_user_items(guild, user, good, amount)
            .await?
        else {
            let rejection = Rejection::InsufficientGoods {
                good,
                requested: amount,
                available: held,
            };
            return reject(tx, rejection).await;
        };
        let balance = InventoryStore::new(&mut tx)
            .credit(guild, user, proceeds)
            .await?;

        tx.commit().await?;

        info!(
            guild = %guild,
            user = %user,
            good = good.key(),
            amount,
            adjusted,
            unit_price,
            proceeds,
            balance,
            "Goods sold"
        );

        Ok(Outcome::Done(Sale {
            good,
            amount,
            adjusted,
            unit_price,
            proceeds,
            balance,
            remaining,
        }))
    }
}

#[derive(Debug, Clone, Copy)]
enum SaleRequest {
    /// Sell up to this many, or everything when `None`.
    UpTo(Option<u64>),
    /// Sell exactly this many or nothing.
    Exact(u64),
}
