//! Game rules for the Homestead farming economy.
//!
//! Everything here is independent of storage: the deterministic plot
//! oracle, pricing, animal draws, production planning and the loop that
//! drives it, the board model, and the button payload codec.
//!
//! # Modules
//!
//! - [`board`] -- The 5x5 board with per-mode enabling and habitat styles.
//! - [`config`] -- Configuration loading from `homestead.yaml` into
//!   strongly-typed structs.
//! - [`economy`] -- Plot and animal pricing, the market seam, sale clamping.
//! - [`hashing`] -- Stable FNV-1a seeding.
//! - [`livestock`] -- Random animal draws for a plot.
//! - [`oracle`] -- Deterministic habitat assignment per board cell.
//! - [`payload`] -- Button id parsing and formatting.
//! - [`production`] -- Per-tick production planning and the
//!   [`ProductionSource`] seam.
//! - [`scheduler`] -- The background production loop.
//!
//! [`ProductionSource`]: production::ProductionSource

pub mod board;
pub mod config;
pub mod economy;
pub mod hashing;
pub mod livestock;
pub mod oracle;
pub mod payload;
pub mod production;
pub mod scheduler;

pub use board::{Board, BoardCell, BoardError, BoardMode, ButtonStyle, CellContent, build_board};
pub use config::{ConfigError, HomesteadConfig};
pub use economy::{Economy, FlatMarket, MarketPricing, SaleAmount};
pub use payload::{ButtonAction, PayloadError};
pub use production::{ProductionError, ProductionSource, TickReport};
pub use scheduler::{SchedulerError, SchedulerHandle, SchedulerSummary, spawn_scheduler};
