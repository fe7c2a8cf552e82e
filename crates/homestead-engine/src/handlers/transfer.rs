//! Moving a plot's stored goods into the owner's inventory.

use homestead_db::{InventoryStore, ItemStore, PlotStore};
use homestead_types::{BoardPosition, GuildId, Item, Plot, UserId};
use tracing::info;

use super::{Homestead, Outcome, reject};
use crate::error::HandlerError;
use crate::rejection::Rejection;

/// A committed transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// The emptied plot.
    pub plot: Plot,
    /// What was moved, by good.
    pub moved: Vec<Item>,
}

impl Homestead {
    /// Move everything stored on the plot at `position` to `user`.
    ///
    /// All or nothing: the plot is emptied and the inventory credited in the
    /// same transaction.
    pub async fn collect_plot(
        &self,
        guild: GuildId,
        user: UserId,
        position: BoardPosition,
    ) -> Result<Outcome<Collection>, HandlerError> {
        let mut tx = self.pool().begin().await?;
        InventoryStore::new(&mut tx).lock_balance(guild, user).await?;

        let Some(plot) = PlotStore::new(&mut tx).find_at(guild, user, position).await? else {
            return reject(tx, Rejection::PlotNotOwned { position }).await;
        };

        let moved = ItemStore::new(&mut tx)
            .move_plot_to_user(plot.id, guild, user)
            .await?;
        if moved.is_empty() {
            return reject(tx, Rejection::NothingToMove).await;
        }

        tx.commit().await?;

        info!(
            guild = %guild,
            user = %user,
            plot = %plot.id,
            kinds = moved.len(),
            units = moved.iter().fold(0_u64, |acc, i| acc.saturating_add(i.amount)),
            "Plot storage moved to inventory"
        );

        Ok(Outcome::Done(Collection { plot, moved }))
    }
}
