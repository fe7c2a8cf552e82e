//! Persistence for goods: `plot_items` and `user_items`.
//!
//! Goods are produced onto plots by the scheduler, moved wholesale into the
//! owner's inventory, and removed from there by sales. Every write here is
//! relative (`amount = amount + n`) so concurrent writers never lose an
//! update.

use std::collections::{BTreeMap, BTreeSet};

use homestead_types::{AnimalType, GuildId, Item, PlotId, PlotItems, UserId, UserItems};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::convert::{
    amount_from_db, amount_to_db, animal_type_from_db, animal_type_to_db, guild_to_db, user_to_db,
};
use crate::error::DbError;

#[derive(sqlx::FromRow)]
struct ItemRow {
    item: String,
    amount: i64,
}

impl TryFrom<ItemRow> for Item {
    type Error = DbError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Self::new(
            animal_type_from_db(&row.item)?,
            amount_from_db(row.amount)?,
        ))
    }
}

fn decode_items(rows: Vec<ItemRow>) -> Result<Vec<Item>, DbError> {
    rows.into_iter().map(Item::try_from).collect()
}

/// Operations on the item tables within one connection or transaction.
pub struct ItemStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ItemStore<'c> {
    /// Bind a store to a connection, usually `&mut *tx`.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Goods stored on a plot, smallest pile first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row does not decode.
    pub async fn plot_items(&mut self, plot_id: PlotId) -> Result<PlotItems, DbError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r"SELECT item, amount
              FROM plot_items
              WHERE plot_id = $1 AND amount > 0
              ORDER BY amount, item",
        )
        .bind(plot_id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(PlotItems {
            plot_id,
            items: decode_items(rows)?,
        })
    }

    /// Goods `user` holds in `guild`, excluding empty piles.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row does not decode.
    pub async fn user_items(&mut self, guild: GuildId, user: UserId) -> Result<UserItems, DbError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r"SELECT item, amount
              FROM user_items
              WHERE guild_id = $1 AND owner_id = $2 AND amount > 0
              ORDER BY item",
        )
        .bind(guild_to_db(guild)?)
        .bind(user_to_db(user)?)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(UserItems {
            guild_id: guild,
            owner_id: user,
            items: decode_items(rows)?,
        })
    }

    /// How much of `good` `user` holds, locking the row until commit.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn lock_user_amount(
        &mut self,
        guild: GuildId,
        user: UserId,
        good: AnimalType,
    ) -> Result<u64, DbError> {
        let amount: Option<i64> = sqlx::query_scalar(
            r"SELECT amount
              FROM user_items
              WHERE guild_id = $1 AND owner_id = $2 AND item = $3
              FOR UPDATE",
        )
        .bind(guild_to_db(guild)?)
        .bind(user_to_db(user)?)
        .bind(animal_type_to_db(good))
        .fetch_optional(&mut *self.conn)
        .await?;

        amount.map_or(Ok(0), amount_from_db)
    }

    /// Add produced units to plots in one statement.
    ///
    /// Each `(plot, good)` key may appear once, which a map guarantees.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the upsert fails or an amount does not fit.
    pub async fn add_plot_items(
        &mut self,
        increments: &BTreeMap<(PlotId, AnimalType), u64>,
    ) -> Result<(), DbError> {
        if increments.is_empty() {
            return Ok(());
        }

        let len = increments.len();
        let mut plot_ids: Vec<Uuid> = Vec::with_capacity(len);
        let mut items: Vec<String> = Vec::with_capacity(len);
        let mut amounts: Vec<i64> = Vec::with_capacity(len);
        for (&(plot_id, good), &amount) in increments {
            plot_ids.push(plot_id.into_inner());
            items.push(animal_type_to_db(good).to_owned());
            amounts.push(amount_to_db(amount)?);
        }

        sqlx::query(
            r"INSERT INTO plot_items (plot_id, item, amount)
              SELECT * FROM UNNEST($1::UUID[], $2::TEXT[], $3::BIGINT[])
              ON CONFLICT (plot_id, item)
              DO UPDATE SET amount = plot_items.amount + EXCLUDED.amount",
        )
        .bind(&plot_ids)
        .bind(&items)
        .bind(&amounts)
        .execute(&mut *self.conn)
        .await?;

        tracing::debug!(rows = len, "Upserted plot items (batch UNNEST)");
        Ok(())
    }

    /// Which of `plot_ids` already hold at least `capacity` units in total.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn plots_at_capacity(
        &mut self,
        plot_ids: &[PlotId],
        capacity: u64,
    ) -> Result<BTreeSet<PlotId>, DbError> {
        if plot_ids.is_empty() {
            return Ok(BTreeSet::new());
        }

        let ids: Vec<Uuid> = plot_ids.iter().copied().map(PlotId::into_inner).collect();
        let full: Vec<Uuid> = sqlx::query_scalar(
            r"SELECT plot_id
              FROM plot_items
              WHERE plot_id = ANY($1)
              GROUP BY plot_id
              HAVING SUM(amount) >= $2",
        )
        .bind(&ids)
        .bind(amount_to_db(capacity)?)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(full.into_iter().map(PlotId).collect())
    }

    /// Move every good stored on `plot_id` into `user`'s inventory.
    ///
    /// Returns what was moved; empty if the plot held nothing. The plot's
    /// rows are deleted, so a production tick racing this one either lands
    /// before the move (and is moved) or conflicts and retries next tick.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if either statement fails.
    pub async fn move_plot_to_user(
        &mut self,
        plot_id: PlotId,
        guild: GuildId,
        user: UserId,
    ) -> Result<Vec<Item>, DbError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r"DELETE FROM plot_items
              WHERE plot_id = $1
              RETURNING item, amount",
        )
        .bind(plot_id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;

        let mut moved = decode_items(rows)?;
        moved.retain(|item| item.amount > 0);
        moved.sort_by_key(|item| item.kind);
        if moved.is_empty() {
            return Ok(moved);
        }

        let goods: Vec<String> = moved
            .iter()
            .map(|i| animal_type_to_db(i.kind).to_owned())
            .collect();
        let amounts = moved
            .iter()
            .map(|i| amount_to_db(i.amount))
            .collect::<Result<Vec<i64>, DbError>>()?;

        sqlx::query(
            r"INSERT INTO user_items (owner_id, guild_id, item, amount)
              SELECT $1, $2, item, amount
              FROM UNNEST($3::TEXT[], $4::BIGINT[]) AS moved (item, amount)
              ON CONFLICT (owner_id, guild_id, item)
              DO UPDATE SET amount = user_items.amount + EXCLUDED.amount",
        )
        .bind(user_to_db(user)?)
        .bind(guild_to_db(guild)?)
        .bind(&goods)
        .bind(&amounts)
        .execute(&mut *self.conn)
        .await?;

        Ok(moved)
    }

    /// Remove `amount` of `good` from `user`, only if they hold that much.
    ///
    /// Returns the remaining amount, or `None` if the holding was short and
    /// nothing changed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the update fails.
    pub async fn take_user_items(
        &mut self,
        guild: GuildId,
        user: UserId,
        good: AnimalType,
        amount: u64,
    ) -> Result<Option<u64>, DbError> {
        let remaining: Option<i64> = sqlx::query_scalar(
            r"UPDATE user_items
              SET amount = amount - $4
              WHERE guild_id = $1 AND owner_id = $2 AND item = $3 AND amount >= $4
              RETURNING amount",
        )
        .bind(guild_to_db(guild)?)
        .bind(user_to_db(user)?)
        .bind(animal_type_to_db(good))
        .bind(amount_to_db(amount)?)
        .fetch_optional(&mut *self.conn)
        .await?;

        remaining.map(amount_from_db).transpose()
    }
}
