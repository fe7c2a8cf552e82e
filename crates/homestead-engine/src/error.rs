//! Error types for the engine.
//!
//! User-facing refusals are not errors; see [`crate::rejection`]. A
//! [`HandlerError`] means the request could not be served at all and the
//! transaction was rolled back.

use homestead_core::board::BoardError;
use homestead_core::config::ConfigError;
use homestead_core::payload::PayloadError;
use homestead_core::scheduler::SchedulerError;
use homestead_db::DbError;
use homestead_types::{CatalogError, EntityError, PlotType};

/// Errors that abort a single handler invocation.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The store failed; nothing was committed.
    #[error("database error: {0}")]
    Db(#[from] DbError),

    /// A value failed entity validation.
    #[error("entity error: {0}")]
    Entity(#[from] EntityError),

    /// The board could not be assembled from stored plots.
    #[error("board error: {0}")]
    Board(#[from] BoardError),

    /// A button id could not be decoded.
    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    /// A catalog key could not be resolved.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The catalog has no animal for a habitat.
    #[error("no animal can live on a {0} plot")]
    EmptyHabitat(PlotType),

    /// An amount computation overflowed.
    #[error("amount overflow: {0}")]
    Overflow(&'static str),
}

impl From<sqlx::Error> for HandlerError {
    fn from(e: sqlx::Error) -> Self {
        Self::Db(DbError::from(e))
    }
}

impl HandlerError {
    /// Plain text shown to the user. Internal detail stays in the logs.
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Payload(_) => "That button is no longer valid.",
            _ => "Something went wrong, please try again later.",
        }
    }
}

/// Top-level errors for the service binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The database could not be reached or migrated.
    #[error("database error: {0}")]
    Db(#[from] DbError),

    /// The production scheduler did not stop cleanly.
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Waiting for the shutdown signal failed.
    #[error("signal error: {0}")]
    Signal(#[from] std::io::Error),
}
