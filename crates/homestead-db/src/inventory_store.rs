//! Persistence for the `inventory` table (currency balances).

use homestead_types::{GuildId, Inventory, UserId};
use sqlx::PgConnection;

use crate::convert::{amount_from_db, amount_to_db, guild_to_db, user_to_db};
use crate::error::DbError;

/// Operations on balances within one connection or transaction.
pub struct InventoryStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> InventoryStore<'c> {
    /// Bind a store to a connection, usually `&mut *tx`.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Read a balance without locking. Missing rows read as zero.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn fetch(&mut self, guild: GuildId, user: UserId) -> Result<Inventory, DbError> {
        let money: Option<i64> = sqlx::query_scalar(
            r"SELECT money FROM inventory WHERE guild_id = $1 AND owner_id = $2",
        )
        .bind(guild_to_db(guild)?)
        .bind(user_to_db(user)?)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(Inventory {
            guild_id: guild,
            owner_id: user,
            money: money.map_or(Ok(0), amount_from_db)?,
        })
    }

    /// Read a balance and hold its row lock until the transaction ends.
    ///
    /// The row is created at zero first if missing, so even a user's first
    /// purchase has a row to serialize on.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if either statement fails.
    pub async fn lock_balance(&mut self, guild: GuildId, user: UserId) -> Result<u64, DbError> {
        let guild_id = guild_to_db(guild)?;
        let owner_id = user_to_db(user)?;

        sqlx::query(
            r"INSERT INTO inventory (owner_id, guild_id, money)
              VALUES ($1, $2, 0)
              ON CONFLICT (owner_id, guild_id) DO NOTHING",
        )
        .bind(owner_id)
        .bind(guild_id)
        .execute(&mut *self.conn)
        .await?;

        let money: i64 = sqlx::query_scalar(
            r"SELECT money FROM inventory
              WHERE owner_id = $1 AND guild_id = $2
              FOR UPDATE",
        )
        .bind(owner_id)
        .bind(guild_id)
        .fetch_one(&mut *self.conn)
        .await?;

        amount_from_db(money)
    }

    /// Subtract `amount` only if the balance covers it.
    ///
    /// Returns the new balance, or `None` if funds were short and nothing
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the update fails.
    pub async fn debit(
        &mut self,
        guild: GuildId,
        user: UserId,
        amount: u64,
    ) -> Result<Option<u64>, DbError> {
        let money: Option<i64> = sqlx::query_scalar(
            r"UPDATE inventory
              SET money = money - $3
              WHERE guild_id = $1 AND owner_id = $2 AND money >= $3
              RETURNING money",
        )
        .bind(guild_to_db(guild)?)
        .bind(user_to_db(user)?)
        .bind(amount_to_db(amount)?)
        .fetch_optional(&mut *self.conn)
        .await?;

        money.map(amount_from_db).transpose()
    }

    /// Add `amount` to a balance, creating the row if needed.
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the upsert fails or the total overflows.
    pub async fn credit(&mut self, guild: GuildId, user: UserId, amount: u64) -> Result<u64, DbError> {
        let money: i64 = sqlx::query_scalar(
            r"INSERT INTO inventory (owner_id, guild_id, money)
              VALUES ($1, $2, $3)
              ON CONFLICT (owner_id, guild_id)
              DO UPDATE SET money = inventory.money + EXCLUDED.money
              RETURNING money",
        )
        .bind(user_to_db(user)?)
        .bind(guild_to_db(guild)?)
        .bind(amount_to_db(amount)?)
        .fetch_one(&mut *self.conn)
        .await?;

        amount_from_db(money)
    }
}
