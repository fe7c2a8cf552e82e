//! The transactional production tick.
//!
//! A tick reads candidates, checks capacity, and writes increments inside a
//! single `REPEATABLE READ` transaction. If a user collects or sells from a
//! plot mid-tick, one side fails with a serialization error and the tick is
//! simply retried by the next one.

use std::collections::BTreeSet;
use std::future::Future;

use homestead_core::config::ProductionConfig;
use homestead_core::production::{
    ProductionError, ProductionSource, TickReport, plan_production,
};
use homestead_types::PlotId;

use crate::animal_store::AnimalStore;
use crate::error::DbError;
use crate::item_store::ItemStore;
use crate::postgres::PostgresPool;

/// [`ProductionSource`] backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgProductionSource {
    pool: PostgresPool,
    plot_capacity: u64,
    min_production_rate: f64,
}

impl PgProductionSource {
    /// Create a source using the production section of the config.
    pub const fn new(pool: PostgresPool, config: &ProductionConfig) -> Self {
        Self {
            pool,
            plot_capacity: config.plot_capacity,
            min_production_rate: config.min_production_rate,
        }
    }

    /// Run one tick to commit.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any statement or the commit fails; the
    /// transaction is rolled back.
    pub async fn run_tick(&self, tick: u64, seed: u64) -> Result<TickReport, DbError> {
        let mut tx = self.pool.begin_repeatable_read().await?;

        let producers = AnimalStore::new(&mut *tx)
            .list_producers(self.min_production_rate)
            .await?;
        let candidate_plots: Vec<PlotId> = producers
            .iter()
            .map(|p| p.plot_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut items = ItemStore::new(&mut *tx);
        let full = items
            .plots_at_capacity(&candidate_plots, self.plot_capacity)
            .await?;
        let plan = plan_production(seed, &producers, &full);
        items.add_plot_items(&plan.increments).await?;

        tx.commit().await?;

        Ok(TickReport {
            tick,
            seed,
            candidates: producers.len(),
            produced: plan.produced,
            units: plan.units(),
            plots_at_capacity: full.len(),
        })
    }
}

impl ProductionSource for PgProductionSource {
    fn produce(
        &self,
        tick: u64,
        tick_seed: u64,
    ) -> impl Future<Output = Result<TickReport, ProductionError>> + Send {
        async move {
            self.run_tick(tick, tick_seed)
                .await
                .map_err(|e| ProductionError::Store {
                    message: e.to_string(),
                })
        }
    }
}
