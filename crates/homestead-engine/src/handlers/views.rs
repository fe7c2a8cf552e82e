//! Read-only views. These never lock and never write.

use homestead_core::board::{Board, BoardMode, build_board};
use homestead_db::{AnimalStore, InventoryStore, ItemStore, PlotStore};
use homestead_types::{
    BoardPosition, GuildId, Inventory, PlotItems, PlotWithAnimals, UserId, UserItems,
};

use super::{Homestead, Outcome};
use crate::error::HandlerError;
use crate::rejection::Rejection;

/// A user's balance and goods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryView {
    /// Currency balance.
    pub inventory: Inventory,
    /// Goods held, empty piles excluded.
    pub items: UserItems,
}

/// One plot with its animals and storage.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotDetail {
    /// The plot and its animals.
    pub plot: PlotWithAnimals,
    /// Goods waiting on the plot, smallest pile first.
    pub items: PlotItems,
}

impl Homestead {
    /// Balance and goods for `user`.
    pub async fn inventory(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> Result<InventoryView, HandlerError> {
        let mut conn = self.pool().acquire().await?;
        let inventory = InventoryStore::new(&mut conn).fetch(guild, user).await?;
        let items = ItemStore::new(&mut conn).user_items(guild, user).await?;
        Ok(InventoryView { inventory, items })
    }

    /// The plot at `position` with its animals and stored goods.
    pub async fn plot_detail(
        &self,
        guild: GuildId,
        user: UserId,
        position: BoardPosition,
    ) -> Result<Outcome<PlotDetail>, HandlerError> {
        let mut conn = self.pool().acquire().await?;
        let Some(plot) = PlotStore::new(&mut conn)
            .find_at(guild, user, position)
            .await?
        else {
            return Ok(Outcome::Rejected(Rejection::PlotNotOwned { position }));
        };
        let animals = AnimalStore::new(&mut conn).list_for_plot(plot.id).await?;
        let items = ItemStore::new(&mut conn).plot_items(plot.id).await?;
        Ok(Outcome::Done(PlotDetail {
            plot: PlotWithAnimals { plot, animals },
            items,
        }))
    }

    /// `user`'s board laid out for `mode`.
    pub async fn board(
        &self,
        guild: GuildId,
        user: UserId,
        mode: BoardMode,
    ) -> Result<Board, HandlerError> {
        let mut conn = self.pool().acquire().await?;
        let plots = PlotStore::new(&mut conn).list_for_user(guild, user).await?;
        Ok(build_board(guild, user, &plots, mode)?)
    }
}
