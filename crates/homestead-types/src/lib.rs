//! Shared type definitions for the Homestead farming economy.
//!
//! This crate is the single source of truth for the catalog and the entity
//! shapes used across the workspace.
//!
//! # Modules
//!
//! - [`catalog`] -- Plot habitats and animals, with their definition records
//! - [`ids`] -- Typed identifiers for plots, animals, users, and guilds
//! - [`structs`] -- Plots, animals, items, and balances

pub mod catalog;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use catalog::{
    AnimalDef, AnimalType, CatalogError, PlotDef, PlotType, animals_for_plot_type, lookup_animal,
    lookup_plot_type,
};
pub use ids::{AnimalId, GuildId, PlotId, UserId};
pub use structs::{
    Animal, BOARD_SIZE, BoardPosition, EntityError, Inventory, Item, Plot, PlotItems,
    PlotWithAnimals, UserItems,
};
