//! Persistence for the `plots` table.

use chrono::{DateTime, Utc};
use homestead_types::{BoardPosition, GuildId, Plot, PlotId, UserId};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::convert::{
    guild_to_db, plot_type_from_db, plot_type_to_db, position_from_db, position_to_db,
    snowflake_from_db, user_to_db,
};
use crate::error::DbError;

/// A row from the `plots` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlotRow {
    /// Plot identifier.
    pub id: Uuid,
    /// Owning user snowflake.
    pub owner_id: i64,
    /// Guild snowflake.
    pub guild_id: i64,
    /// Board column.
    pub x: i16,
    /// Board row.
    pub y: i16,
    /// Habitat key.
    pub plot_type: String,
    /// Purchase time.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PlotRow> for Plot {
    type Error = DbError;

    fn try_from(row: PlotRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PlotId(row.id),
            owner_id: UserId(snowflake_from_db(row.owner_id)?),
            guild_id: GuildId(snowflake_from_db(row.guild_id)?),
            position: position_from_db(row.x, row.y)?,
            plot_type: plot_type_from_db(&row.plot_type)?,
            created_at: row.created_at,
        })
    }
}

/// Operations on the `plots` table within one connection or transaction.
pub struct PlotStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PlotStore<'c> {
    /// Bind a store to a connection, usually `&mut *tx`.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a plot unless its cell is already taken.
    ///
    /// Returns `false` when the `(owner, guild, x, y)` cell is occupied.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the insert fails or an id does not fit.
    pub async fn insert(&mut self, plot: &Plot) -> Result<bool, DbError> {
        let (x, y) = position_to_db(plot.position);
        let result = sqlx::query(
            r"INSERT INTO plots (id, owner_id, guild_id, x, y, plot_type, created_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7)
              ON CONFLICT (owner_id, guild_id, x, y) DO NOTHING",
        )
        .bind(plot.id.into_inner())
        .bind(user_to_db(plot.owner_id)?)
        .bind(guild_to_db(plot.guild_id)?)
        .bind(x)
        .bind(y)
        .bind(plot_type_to_db(plot.plot_type))
        .bind(plot.created_at)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Every plot `user` owns in `guild`, in board order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row does not decode.
    pub async fn list_for_user(
        &mut self,
        guild: GuildId,
        user: UserId,
    ) -> Result<Vec<Plot>, DbError> {
        let rows = sqlx::query_as::<_, PlotRow>(
            r"SELECT id, owner_id, guild_id, x, y, plot_type, created_at
              FROM plots
              WHERE guild_id = $1 AND owner_id = $2
              ORDER BY x, y",
        )
        .bind(guild_to_db(guild)?)
        .bind(user_to_db(user)?)
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Plot::try_from).collect()
    }

    /// The plot `user` owns at `position`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or the row does not decode.
    pub async fn find_at(
        &mut self,
        guild: GuildId,
        user: UserId,
        position: BoardPosition,
    ) -> Result<Option<Plot>, DbError> {
        let (x, y) = position_to_db(position);
        let row = sqlx::query_as::<_, PlotRow>(
            r"SELECT id, owner_id, guild_id, x, y, plot_type, created_at
              FROM plots
              WHERE guild_id = $1 AND owner_id = $2 AND x = $3 AND y = $4",
        )
        .bind(guild_to_db(guild)?)
        .bind(user_to_db(user)?)
        .bind(x)
        .bind(y)
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(Plot::try_from).transpose()
    }
}
