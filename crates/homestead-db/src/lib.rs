//! `PostgreSQL` data layer for the Homestead farming economy.
//!
//! Stores borrow a single connection, normally a transaction opened by the
//! caller, so a handler can compose reads and writes across tables and
//! commit them together:
//!
//! ```text
//! let mut tx = pool.begin().await?;
//! let balance = InventoryStore::new(&mut tx).lock_balance(guild, user).await?;
//! PlotStore::new(&mut tx).insert(&plot).await?;
//! tx.commit().await?;
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, migrations, and transaction levels
//! - [`plot_store`] -- Plots
//! - [`animal_store`] -- Animals and production candidates
//! - [`item_store`] -- Goods on plots and in user inventories
//! - [`inventory_store`] -- Currency balances
//! - [`production_store`] -- The transactional production tick
//! - [`error`] -- Shared error types

pub mod animal_store;
mod convert;
pub mod error;
pub mod inventory_store;
pub mod item_store;
pub mod plot_store;
pub mod postgres;
pub mod production_store;

// Re-export primary types for convenience.
pub use animal_store::{AnimalRow, AnimalStore};
pub use error::DbError;
pub use inventory_store::InventoryStore;
pub use item_store::ItemStore;
pub use plot_store::{PlotRow, PlotStore};
pub use postgres::PostgresPool;
pub use production_store::PgProductionSource;
