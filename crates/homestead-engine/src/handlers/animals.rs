//! Animal purchase.

use homestead_core::board::{Board, BoardMode, build_board};
use homestead_db::{AnimalStore, InventoryStore, PlotStore};
use homestead_types::{Animal, BoardPosition, GuildId, Plot, UserId};
use tracing::info;

use super::plots::newborn_for;
use super::{Homestead, Outcome, reject};
use crate::error::HandlerError;
use crate::rejection::Rejection;

/// A committed animal purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalPurchase {
    /// The plot the animal joined.
    pub plot: Plot,
    /// The new animal.
    pub animal: Animal,
    /// Gold paid.
    pub price: u64,
    /// Balance after paying.
    pub balance: u64,
}

/// The board for choosing where a new animal goes.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalOffer {
    /// Price of the next animal.
    pub price: u64,
    /// Board with owned plots enabled.
    pub board: Board,
}

impl Homestead {
    /// Price of the next animal for `user`, counted across all their plots.
    pub async fn animal_price(&self, guild: GuildId, user: UserId) -> Result<u64, HandlerError> {
        let mut conn = self.pool().acquire().await?;
        let count = AnimalStore::new(&mut conn).count_for_owner(guild, user).await?;
        Ok(self.economy().animal_price(count))
    }

    /// Show the board of owned plots with the next animal's price.
    pub async fn animal_offer(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> Result<AnimalOffer, HandlerError> {
        let mut conn = self.pool().acquire().await?;
        let count = AnimalStore::new(&mut conn).count_for_owner(guild, user).await?;
        let plots = PlotStore::new(&mut conn).list_for_user(guild, user).await?;
        Ok(AnimalOffer {
            price: self.economy().animal_price(count),
            board: build_board(guild, user, &plots, BoardMode::BuyAnimal)?,
        })
    }

    /// Buy a random animal for the plot at `position`.
    pub async fn buy_animal(
        &self,
        guild: GuildId,
        user: UserId,
        position: BoardPosition,
    ) -> Result<Outcome<AnimalPurchase>, HandlerError> {
        let mut tx = self.pool().begin().await?;
        let balance = InventoryStore::new(&mut tx).lock_balance(guild, user).await?;

        let Some(plot) = PlotStore::new(&mut tx).find_at(guild, user, position).await? else {
            return reject(tx, Rejection::PlotNotOwned { position }).await;
        };

        let count = AnimalStore::new(&mut tx).count_for_owner(guild, user).await?;
        let price = self.economy().animal_price(count);
        if price > balance {
            let rejection = Rejection::InsufficientFunds {
                required: price,
                available: balance,
            };
            return reject(tx, rejection).await;
        }

        let newborn = newborn_for(plot.plot_type)?;
        let animal = Animal::new(newborn.animal_type, &plot, newborn.production_rate)?;
        AnimalStore::new(&mut tx).insert(&animal).await?;

        let Some(balance) = InventoryStore::new(&mut tx).debit(guild, user, price).await? else {
            let rejection = Rejection::InsufficientFunds {
                required: price,
                available: balance,
            };
            return reject(tx, rejection).await;
        };

        tx.commit().await?;

        info!(
            guild = %guild,
            user = %user,
            position = %position,
            animal = %animal.animal_type,
            production_rate = animal.production_rate,
            price,
            balance,
            "Animal purchased"
        );

        Ok(Outcome::Done(AnimalPurchase {
            plot,
            animal,
            price,
            balance,
        }))
    }
}
