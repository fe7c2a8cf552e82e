//! Persistence for the `animals` table.

use chrono::{DateTime, Utc};
use homestead_core::production::Producer;
use homestead_types::{Animal, AnimalId, GuildId, PlotId, UserId};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::convert::{
    amount_from_db, animal_type_from_db, animal_type_to_db, guild_to_db, user_to_db,
};
use crate::error::DbError;

/// A row from the `animals` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnimalRow {
    /// Animal identifier.
    pub id: Uuid,
    /// Plot the animal lives on.
    pub plot_id: Uuid,
    /// Animal key.
    pub animal_type: String,
    /// Stored production rate.
    pub production_rate: f64,
    /// Arrival time.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AnimalRow> for Animal {
    type Error = DbError;

    fn try_from(row: AnimalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AnimalId(row.id),
            animal_type: animal_type_from_db(&row.animal_type)?,
            plot_id: PlotId(row.plot_id),
            production_rate: row.production_rate,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProducerRow {
    id: Uuid,
    plot_id: Uuid,
    animal_type: String,
    production_rate: f64,
}

/// Operations on the `animals` table within one connection or transaction.
pub struct AnimalStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> AnimalStore<'c> {
    /// Bind a store to a connection, usually `&mut *tx`.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a new animal.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(&mut self, animal: &Animal) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO animals (id, plot_id, animal_type, production_rate, created_at)
              VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(animal.id.into_inner())
        .bind(animal.plot_id.into_inner())
        .bind(animal_type_to_db(animal.animal_type))
        .bind(animal.production_rate)
        .bind(animal.created_at)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    /// Animals living on `plot_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row does not decode.
    pub async fn list_for_plot(&mut self, plot_id: PlotId) -> Result<Vec<Animal>, DbError> {
        let rows = sqlx::query_as::<_, AnimalRow>(
            r"SELECT id, plot_id, animal_type, production_rate, created_at
              FROM animals
              WHERE plot_id = $1
              ORDER BY created_at, id",
        )
        .bind(plot_id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Animal::try_from).collect()
    }

    /// How many animals `user` owns across all their plots in `guild`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn count_for_owner(&mut self, guild: GuildId, user: UserId) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar(
            r"SELECT COUNT(*)
              FROM animals a
              JOIN plots p ON p.id = a.plot_id
              WHERE p.guild_id = $1 AND p.owner_id = $2",
        )
        .bind(guild_to_db(guild)?)
        .bind(user_to_db(user)?)
        .fetch_one(&mut *self.conn)
        .await?;

        amount_from_db(count)
    }

    /// Every animal whose rate is at least `min_rate`, in id order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row does not decode.
    pub async fn list_producers(&mut self, min_rate: f64) -> Result<Vec<Producer>, DbError> {
        let rows = sqlx::query_as::<_, ProducerRow>(
            r"SELECT id, plot_id, animal_type, production_rate
              FROM animals
              WHERE production_rate >= $1
              ORDER BY id",
        )
        .bind(min_rate)
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Producer {
                    animal_id: AnimalId(row.id),
                    plot_id: PlotId(row.plot_id),
                    animal_type: animal_type_from_db(&row.animal_type)?,
                    production_rate: row.production_rate,
                })
            })
            .collect()
    }
}
