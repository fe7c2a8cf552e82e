//! Error type for the data layer.
//!
//! Anything that goes wrong between a store call and `PostgreSQL` surfaces as
//! a [`DbError`]. Expected refusals (short funds, an occupied cell) are not
//! errors here; stores report them as `None` or `false`.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A query, connection, or commit failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A schema migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row holds a value the domain cannot represent, such as an
    /// unknown animal key or a negative amount.
    #[error("corrupt row: {0}")]
    Decode(String),

    /// A domain value does not fit its column, such as a snowflake above
    /// `i64::MAX`.
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// The `database` config section is unusable.
    #[error("database configuration: {0}")]
    Config(String),
}
