//! Plot purchase.

use homestead_core::board::{Board, BoardMode, build_board};
use homestead_core::livestock::{Newborn, draw_animal};
use homestead_core::oracle;
use homestead_db::{AnimalStore, InventoryStore, PlotStore};
use homestead_types::{Animal, BOARD_SIZE, BoardPosition, GuildId, Plot, PlotType, UserId};
use tracing::info;

use super::{Homestead, Outcome, reject};
use crate::error::HandlerError;
use crate::rejection::Rejection;

/// A committed plot purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPurchase {
    /// The new plot.
    pub plot: Plot,
    /// The animal that came with it.
    pub starter: Animal,
    /// Gold paid.
    pub price: u64,
    /// Balance after paying.
    pub balance: u64,
}

/// The purchase board with the price of the next plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOffer {
    /// Price of the next plot.
    pub price: u64,
    /// Current balance.
    pub balance: u64,
    /// Board with open cells enabled.
    pub board: Board,
}

/// Draw a random animal for a habitat, outside of any await.
pub(crate) fn newborn_for(plot_type: PlotType) -> Result<Newborn, HandlerError> {
    let mut rng = rand::rng();
    draw_animal(plot_type, &mut rng).ok_or(HandlerError::EmptyHabitat(plot_type))
}

fn board_cells() -> usize {
    usize::from(BOARD_SIZE).saturating_mul(usize::from(BOARD_SIZE))
}

impl Homestead {
    /// Show the purchase board if the user can afford another plot.
    pub async fn plot_offer(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> Result<Outcome<PlotOffer>, HandlerError> {
        let mut conn = self.pool().acquire().await?;
        let plots = PlotStore::new(&mut conn).list_for_user(guild, user).await?;
        let balance = InventoryStore::new(&mut conn).fetch(guild, user).await?.money;

        if plots.len() >= board_cells() {
            return Ok(Outcome::Rejected(Rejection::BoardFull));
        }
        let price = self.economy().plot_price(u64::try_from(plots.len()).unwrap_or(u64::MAX));
        if price > balance {
            return Ok(Outcome::Rejected(Rejection::InsufficientFunds {
                required: price,
                available: balance,
            }));
        }

        let board = build_board(guild, user, &plots, BoardMode::Purchase)?;
        Ok(Outcome::Done(PlotOffer {
            price,
            balance,
            board,
        }))
    }

    /// Buy the cell at `position`, with one starter animal.
    ///
    /// The habitat comes from the oracle, never from the caller.
    pub async fn purchase_plot(
        &self,
        guild: GuildId,
        user: UserId,
        position: BoardPosition,
    ) -> Result<Outcome<PlotPurchase>, HandlerError> {
        let mut tx = self.pool().begin().await?;
        let balance = InventoryStore::new(&mut tx).lock_balance(guild, user).await?;

        let owned = PlotStore::new(&mut tx).list_for_user(guild, user).await?;
        if owned.iter().any(|p| p.position == position) {
            return reject(tx, Rejection::PlotAlreadyOwned { position }).await;
        }
        if owned.len() >= board_cells() {
            return reject(tx, Rejection::BoardFull).await;
        }

        let price = self
            .economy()
            .plot_price(u64::try_from(owned.len()).unwrap_or(u64::MAX));
        if price > balance {
            let rejection = Rejection::InsufficientFunds {
                required: price,
                available: balance,
            };
            return reject(tx, rejection).await;
        }

        let plot = Plot::new(guild, user, position, oracle::assign(guild, user, position));
        if !PlotStore::new(&mut tx).insert(&plot).await? {
            return reject(tx, Rejection::PlotAlreadyOwned { position }).await;
        }

        let newborn = newborn_for(plot.plot_type)?;
        let starter = Animal::new(newborn.animal_type, &plot, newborn.production_rate)?;
        AnimalStore::new(&mut tx).insert(&starter).await?;

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
            plot_type = %plot.plot_type,
            starter = %starter.animal_type,
            price,
            balance,
            "Plot purchased"
        );

        Ok(Outcome::Done(PlotPurchase {
            plot,
            starter,
            price,
            balance,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_has_twenty_five_cells() {
        assert_eq!(board_cells(), 25);
    }

    #[test]
    fn newborns_fit_their_plot() {
        for plot_type in PlotType::ALL {
            let newborn = newborn_for(plot_type);
            assert!(newborn.is_ok_and(|n| n.animal_type.lives_on(plot_type)));
        }
    }
}
