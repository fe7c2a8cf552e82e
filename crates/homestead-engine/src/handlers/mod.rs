//! Transaction handlers.
//!
//! Every mutating handler opens one transaction, locks the caller's balance
//! row, reads and validates, and either commits all its writes or rolls back
//! with a [`Rejection`]. Locking the balance first serializes concurrent
//! requests from the same user, so a double click cannot spend the same
//! gold twice.

pub mod animals;
pub mod market;
pub mod plots;
pub mod transfer;
pub mod views;

use std::sync::Arc;

use homestead_core::config::HomesteadConfig;
use homestead_core::economy::{Economy, FlatMarket, MarketPricing};
use homestead_db::PostgresPool;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::error::HandlerError;
use crate::rejection::Rejection;

/// Result of a handler that may refuse the request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The request was applied and committed.
    Done(T),
    /// The request was refused; nothing changed.
    Rejected(Rejection),
}

impl<T> Outcome<T> {
    /// The committed value, if any.
    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection, if any.
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Done(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Roll back and report a refusal.
async fn reject<T>(
    tx: Transaction<'_, Postgres>,
    rejection: Rejection,
) -> Result<Outcome<T>, HandlerError> {
    tx.rollback().await?;
    debug!(%rejection, "request rejected");
    Ok(Outcome::Rejected(rejection))
}

/// Shared handler context: the pool and the pricing rules.
#[derive(Clone)]
pub struct Homestead {
    pool: PostgresPool,
    economy: Economy,
    market: Arc<dyn MarketPricing>,
}

impl Homestead {
    /// Build a context with explicit pricing.
    pub const fn new(pool: PostgresPool, economy: Economy, market: Arc<dyn MarketPricing>) -> Self {
        Self {
            pool,
            economy,
            market,
        }
    }

    /// Build a context from configuration, with a flat market price.
    pub fn from_config(pool: PostgresPool, config: &HomesteadConfig) -> Self {
        Self::new(
            pool,
            Economy::new(&config.economy),
            Arc::new(FlatMarket::new(config.economy.sell_price)),
        )
    }

    /// The connection pool.
    pub const fn pool(&self) -> &PostgresPool {
        &self.pool
    }

    /// The pricing curves.
    pub const fn economy(&self) -> &Economy {
        &self.economy
    }
}
