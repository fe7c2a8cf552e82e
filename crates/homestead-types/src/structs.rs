//! Entity structs: plots, animals, and the three stores of value.
//!
//! These are transient views. Every value is built from a database row,
//! used for one request or tick, and dropped; nothing here holds a
//! reference to anything else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{AnimalType, PlotType};
use crate::ids::{AnimalId, GuildId, PlotId, UserId};

/// Width and height of every user's plot board.
pub const BOARD_SIZE: u8 = 5;

/// Errors raised when constructing entities from raw values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntityError {
    /// A board coordinate fell outside the board.
    #[error("board position ({x}, {y}) is outside the {size}x{size} board", size = BOARD_SIZE)]
    PositionOutOfBounds {
        /// Column.
        x: i64,
        /// Row.
        y: i64,
    },

    /// A production rate fell outside `[0, 1)`.
    #[error("production rate {0} is outside [0, 1)")]
    InvalidProductionRate(f64),

    /// An animal was placed on a plot it cannot live on.
    #[error("a {animal} cannot live on a {plot_type} plot")]
    IncompatibleHabitat {
        /// The animal being placed.
        animal: AnimalType,
        /// The plot's habitat.
        plot_type: PlotType,
    },
}

// ---------------------------------------------------------------------------
// BoardPosition
// ---------------------------------------------------------------------------

/// A cell on a user's 5x5 plot board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoardPosition {
    x: u8,
    y: u8,
}

impl BoardPosition {
    /// Create a position, rejecting coordinates outside the board.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::PositionOutOfBounds`] if either coordinate is
    /// negative or not below [`BOARD_SIZE`].
    pub fn new(x: i64, y: i64) -> Result<Self, EntityError> {
        let in_range = |v: i64| (0..i64::from(BOARD_SIZE)).contains(&v);
        if !in_range(x) || !in_range(y) {
            return Err(EntityError::PositionOutOfBounds { x, y });
        }
        let out_of_bounds = || EntityError::PositionOutOfBounds { x, y };
        Ok(Self {
            x: u8::try_from(x).map_err(|_err| out_of_bounds())?,
            y: u8::try_from(y).map_err(|_err| out_of_bounds())?,
        })
    }

    /// Column, `0..BOARD_SIZE`.
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Row, `0..BOARD_SIZE`.
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Every cell of the board, column by column.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..BOARD_SIZE).flat_map(|x| (0..BOARD_SIZE).map(move |y| Self { x, y }))
    }
}

impl core::fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Plot / Animal
// ---------------------------------------------------------------------------

/// A plot of land owned by one user in one guild.
///
/// The habitat is fixed at purchase and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
    /// Plot identifier.
    pub id: PlotId,
    /// Owning user.
    pub owner_id: UserId,
    /// Guild the plot exists in.
    pub guild_id: GuildId,
    /// Cell on the owner's board.
    pub position: BoardPosition,
    /// Habitat of the plot.
    pub plot_type: PlotType,
    /// When the plot was bought.
    pub created_at: DateTime<Utc>,
}

impl Plot {
    /// Create a new, not yet persisted, plot.
    pub fn new(
        guild_id: GuildId,
        owner_id: UserId,
        position: BoardPosition,
        plot_type: PlotType,
    ) -> Self {
        Self {
            id: PlotId::new(),
            owner_id,
            guild_id,
            position,
            plot_type,
            created_at: Utc::now(),
        }
    }
}

/// An animal living on a plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    /// Animal identifier.
    pub id: AnimalId,
    /// Kind of animal; also the good it produces.
    pub animal_type: AnimalType,
    /// Plot the animal lives on.
    pub plot_id: PlotId,
    /// Chance, in `[0, 1)`, of producing one unit on any given tick.
    pub production_rate: f64,
    /// When the animal arrived.
    pub created_at: DateTime<Utc>,
}

impl Animal {
    /// Create a new, not yet persisted, animal on `plot`.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::IncompatibleHabitat`] if the animal cannot live
    /// on the plot, or [`EntityError::InvalidProductionRate`] if the rate is
    /// outside `[0, 1)`.
    pub fn new(
        animal_type: AnimalType,
        plot: &Plot,
        production_rate: f64,
    ) -> Result<Self, EntityError> {
        if !animal_type.lives_on(plot.plot_type) {
            return Err(EntityError::IncompatibleHabitat {
                animal: animal_type,
                plot_type: plot.plot_type,
            });
        }
        if !(0.0..1.0).contains(&production_rate) {
            return Err(EntityError::InvalidProductionRate(production_rate));
        }
        Ok(Self {
            id: AnimalId::new(),
            animal_type,
            plot_id: plot.id,
            production_rate,
            created_at: Utc::now(),
        })
    }

    /// Emoji for this animal.
    pub const fn emoji(&self) -> &'static str {
        self.animal_type.emoji()
    }
}

/// A plot together with every animal living on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotWithAnimals {
    /// The plot.
    pub plot: Plot,
    /// Its animals.
    pub animals: Vec<Animal>,
}

// ---------------------------------------------------------------------------
// Items and inventories
// ---------------------------------------------------------------------------

/// An amount of one good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The good, keyed by the animal that produces it.
    pub kind: AnimalType,
    /// Number of units.
    pub amount: u64,
}

impl Item {
    /// Create an item stack.
    pub const fn new(kind: AnimalType, amount: u64) -> Self {
        Self { kind, amount }
    }

    /// Product name agreeing with the amount.
    pub const fn name(&self) -> &'static str {
        self.kind.product_name(self.amount)
    }
}

/// Goods accumulated on one plot, waiting to be moved to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotItems {
    /// Plot holding the goods.
    pub plot_id: PlotId,
    /// Stored goods.
    pub items: Vec<Item>,
}

impl PlotItems {
    /// Total units stored across all goods.
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |acc, item| acc.saturating_add(item.amount))
    }

    /// Whether the plot holds nothing.
    pub fn is_empty(&self) -> bool {
        self.items.iter().all(|item| item.amount == 0)
    }
}

/// Goods owned by a user in one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserItems {
    /// Guild scope.
    pub guild_id: GuildId,
    /// Owning user.
    pub owner_id: UserId,
    /// Owned goods with a positive amount.
    pub items: Vec<Item>,
}

impl UserItems {
    /// Amount owned of one good (zero if absent).
    pub fn amount_of(&self, kind: AnimalType) -> u64 {
        self.items
            .iter()
            .filter(|item| item.kind == kind)
            .fold(0_u64, |acc, item| acc.saturating_add(item.amount))
    }
}

/// A user's currency balance in one guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Guild scope.
    pub guild_id: GuildId,
    /// Owning user.
    pub owner_id: UserId,
    /// Gold balance. Never negative.
    pub money: u64,
}

impl Inventory {
    /// An empty balance for a user with no inventory row yet.
    pub const fn empty(guild_id: GuildId, owner_id: UserId) -> Self {
        Self {
            guild_id,
            owner_id,
            money: 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lake_plot() -> Plot {
        Plot::new(
            GuildId(1),
            UserId(2),
            BoardPosition::new(0, 4).unwrap(),
            PlotType::Lake,
        )
    }

    #[test]
    fn positions_outside_board_are_rejected() {
        assert!(BoardPosition::new(4, 4).is_ok());
        assert_eq!(
            BoardPosition::new(5, 0),
            Err(EntityError::PositionOutOfBounds { x: 5, y: 0 })
        );
        assert!(BoardPosition::new(0, -1).is_err());
    }

    #[test]
    fn board_has_twenty_five_distinct_cells() {
        let mut cells: Vec<BoardPosition> = BoardPosition::all().collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 25);
    }

    #[test]
    fn animal_must_match_habitat() {
        let plot = lake_plot();
        assert!(Animal::new(AnimalType::Otter, &plot, 0.5).is_ok());
        assert_eq!(
            Animal::new(AnimalType::Cow, &plot, 0.5),
            Err(EntityError::IncompatibleHabitat {
                animal: AnimalType::Cow,
                plot_type: PlotType::Lake,
            })
        );
    }

    #[test]
    fn production_rate_must_be_a_probability() {
        let plot = lake_plot();
        assert!(Animal::new(AnimalType::Otter, &plot, 0.0).is_ok());
        assert!(Animal::new(AnimalType::Otter, &plot, 1.0).is_err());
        assert!(Animal::new(AnimalType::Otter, &plot, -0.1).is_err());
    }

    #[test]
    fn plot_items_total_sums_amounts() {
        let items = PlotItems {
            plot_id: PlotId::new(),
            items: vec![
                Item::new(AnimalType::Rooster, 7),
                Item::new(AnimalType::Cow, 3),
            ],
        };
        assert_eq!(items.total(), 10);
        assert!(!items.is_empty());
    }

    #[test]
    fn user_items_amount_of_missing_good_is_zero() {
        let items = UserItems {
            guild_id: GuildId(1),
            owner_id: UserId(2),
            items: vec![Item::new(AnimalType::Rooster, 2)],
        };
        assert_eq!(items.amount_of(AnimalType::Rooster), 2);
        assert_eq!(items.amount_of(AnimalType::Cow), 0);
    }
}
