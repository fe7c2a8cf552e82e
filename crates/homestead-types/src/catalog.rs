//! The static catalog: plot habitats and the animals that live on them.
//!
//! Both enumerations are plain data. Each variant resolves to an immutable
//! definition record ([`PlotDef`], [`AnimalDef`]); nothing here knows how a
//! plot is drawn on screen. Variant order is load-bearing: the plot
//! assignment oracle picks from [`PlotType::ALL`] by index, so reordering or
//! inserting plot types changes every offer that has not been bought yet.

use serde::{Deserialize, Serialize};

/// Errors raised when resolving catalog keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No animal is registered under this key.
    #[error("unknown animal key: {0}")]
    UnknownAnimal(String),

    /// No plot type is registered under this key.
    #[error("unknown plot type key: {0}")]
    UnknownPlotType(String),
}

// ---------------------------------------------------------------------------
// Plot types
// ---------------------------------------------------------------------------

/// Definition record for a plot habitat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotDef {
    /// Stable storage key.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
}

/// A habitat a plot of land can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotType {
    /// Pasture for livestock.
    Farm,
    /// Hedgerows and burrows.
    Garden,
    /// Open water.
    Lake,
    /// Aviaries and open air.
    Sky,
}

impl PlotType {
    /// Every plot type, in catalog order.
    pub const ALL: [Self; 4] = [Self::Farm, Self::Garden, Self::Lake, Self::Sky];

    /// Return the definition record for this plot type.
    pub const fn def(self) -> PlotDef {
        match self {
            Self::Farm => PlotDef { key: "farm", name: "farm" },
            Self::Garden => PlotDef { key: "garden", name: "garden" },
            Self::Lake => PlotDef { key: "lake", name: "lake" },
            Self::Sky => PlotDef { key: "sky", name: "sky" },
        }
    }

    /// Stable storage key.
    pub const fn key(self) -> &'static str {
        self.def().key
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        self.def().name
    }

    /// Resolve a plot type from its storage key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownPlotType`] if no plot type uses `key`.
    pub fn from_key(key: &str) -> Result<Self, CatalogError> {
        Self::ALL
            .into_iter()
            .find(|t| t.key() == key)
            .ok_or_else(|| CatalogError::UnknownPlotType(key.to_owned()))
    }
}

impl core::fmt::Display for PlotType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Animals
// ---------------------------------------------------------------------------

/// Definition record for an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimalDef {
    /// Stable storage key. Also the key of the good this animal produces.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Emoji used when drawing the animal on its plot.
    pub emoji: &'static str,
    /// The only habitat this animal can live on.
    pub plot_type: PlotType,
    /// Singular and plural names of the produced good.
    pub product: (&'static str, &'static str),
}

/// A kind of animal a user can rear.
///
/// Goods are keyed by the animal that produces them, so an `AnimalType`
/// doubles as the good kind in plot storage and user inventories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalType {
    /// Cow (farm).
    Cow,
    /// Pig (farm).
    Pig,
    /// Sheep (farm).
    Sheep,
    /// Goat (farm).
    Goat,
    /// Turkey (farm).
    Turkey,
    /// Rooster (farm).
    Rooster,
    /// Rabbit (garden).
    Rabbit,
    /// Skunk (garden).
    Skunk,
    /// Badger (garden).
    Badger,
    /// Mouse (garden).
    Mouse,
    /// Hedgehog (garden).
    Hedgehog,
    /// Beaver (garden).
    Beaver,
    /// Chipmunk (garden).
    Chipmunk,
    /// Snail (garden).
    Snail,
    /// Otter (lake).
    Otter,
    /// Turtle (lake).
    Turtle,
    /// Crocodile (lake).
    Crocodile,
    /// Duck (lake).
    Duck,
    /// Penguin (lake).
    Penguin,
    /// Swan (lake).
    Swan,
    /// Whale (lake).
    Whale,
    /// Seal (lake).
    Seal,
    /// Fish (lake).
    Fish,
    /// Blowfish (lake).
    Blowfish,
    /// Shark (lake).
    Shark,
    /// Octopus (lake).
    Octopus,
    /// Crab (lake).
    Crab,
    /// Dove (sky).
    Dove,
    /// Eagle (sky).
    Eagle,
    /// Owl (sky).
    Owl,
    /// Flamingo (sky).
    Flamingo,
    /// Peacock (sky).
    Peacock,
    /// Parrot (sky).
    Parrot,
    /// Bat (sky).
    Bat,
}

impl AnimalType {
    /// Every animal, in catalog order.
    pub const ALL: [Self; 34] = [
        Self::Cow,
        Self::Pig,
        Self::Sheep,
        Self::Goat,
        Self::Turkey,
        Self::Rooster,
        Self::Rabbit,
        Self::Skunk,
        Self::Badger,
        Self::Mouse,
        Self::Hedgehog,
        Self::Beaver,
        Self::Chipmunk,
        Self::Snail,
        Self::Otter,
        Self::Turtle,
        Self::Crocodile,
        Self::Duck,
        Self::Penguin,
        Self::Swan,
        Self::Whale,
        Self::Seal,
        Self::Fish,
        Self::Blowfish,
        Self::Shark,
        Self::Octopus,
        Self::Crab,
        Self::Dove,
        Self::Eagle,
        Self::Owl,
        Self::Flamingo,
        Self::Peacock,
        Self::Parrot,
        Self::Bat,
    ];

    /// Return the definition record for this animal.
    pub const fn def(self) -> AnimalDef {
        match self {
            Self::Cow => AnimalDef {
                key: "cow",
                name: "cow",
                emoji: "🐄",
                plot_type: PlotType::Farm,
                product: ("bottle of milk", "bottles of milk"),
            },
            Self::Pig => AnimalDef {
                key: "pig",
                name: "pig",
                emoji: "🐖",
                plot_type: PlotType::Farm,
                product: ("pepper", "peppers"),
            },
            Self::Sheep => AnimalDef {
                key: "sheep",
                name: "sheep",
                emoji: "🐑",
                plot_type: PlotType::Farm,
                product: ("pound of wool", "pounds of wool"),
            },
            Self::Goat => AnimalDef {
                key: "goat",
                name: "goat",
                emoji: "🐐",
                plot_type: PlotType::Farm,
                product: ("bottle of milk", "bottles of milk"),
            },
            Self::Turkey => AnimalDef {
                key: "turkey",
                name: "turkey",
                emoji: "🦃",
                plot_type: PlotType::Farm,
                product: ("pumpkin", "pumpkins"),
            },
            Self::Rooster => AnimalDef {
                key: "rooster",
                name: "rooster",
                emoji: "🐓",
                plot_type: PlotType::Farm,
                product: ("egg", "eggs"),
            },
            Self::Rabbit => AnimalDef {
                key: "rabbit",
                name: "rabbit",
                emoji: "🐇",
                plot_type: PlotType::Garden,
                product: ("foot", "feet"),
            },
            Self::Skunk => AnimalDef {
                key: "skunk",
                name: "skunk",
                emoji: "🦨",
                plot_type: PlotType::Garden,
                product: ("perfume bottle", "perfume bottles"),
            },
            Self::Badger => AnimalDef {
                key: "badger",
                name: "badger",
                emoji: "🦡",
                plot_type: PlotType::Garden,
                product: ("badge", "badges"),
            },
            Self::Mouse => AnimalDef {
                key: "mouse",
                name: "mouse",
                emoji: "🐁",
                plot_type: PlotType::Garden,
                product: ("ratatouille", "ratatouille"),
            },
            Self::Hedgehog => AnimalDef {
                key: "hedgehog",
                name: "hedgehog",
                emoji: "🦔",
                plot_type: PlotType::Garden,
                product: ("quill", "quills"),
            },
            Self::Beaver => AnimalDef {
                key: "beaver",
                name: "beaver",
                emoji: "🦫",
                plot_type: PlotType::Garden,
                product: ("hat", "hats"),
            },
            Self::Chipmunk => AnimalDef {
                key: "chipmunk",
                name: "chipmunk",
                emoji: "🐿️",
                plot_type: PlotType::Garden,
                product: ("nut", "nuts"),
            },
            Self::Snail => AnimalDef {
                key: "snail",
                name: "snail",
                emoji: "🐌",
                plot_type: PlotType::Garden,
                product: ("shell", "shells"),
            },
            Self::Otter => AnimalDef {
                key: "otter",
                name: "otter",
                emoji: "🦦",
                plot_type: PlotType::Lake,
                product: ("clam", "clams"),
            },
            Self::Turtle => AnimalDef {
                key: "turtle",
                name: "turtle",
                emoji: "🐢",
                plot_type: PlotType::Lake,
                product: ("scute", "scutes"),
            },
            Self::Crocodile => AnimalDef {
                key: "crocodile",
                name: "crocodile",
                emoji: "🐊",
                plot_type: PlotType::Lake,
                product: ("handbag", "handbags"),
            },
            Self::Duck => AnimalDef {
                key: "duck",
                name: "duck",
                emoji: "🦆",
                plot_type: PlotType::Lake,
                product: ("loaf of bread", "loaves of bread"),
            },
            Self::Penguin => AnimalDef {
                key: "penguin",
                name: "penguin",
                emoji: "🐧",
                plot_type: PlotType::Lake,
                product: ("chocolate biscuit", "chocolate biscuits"),
            },
            Self::Swan => AnimalDef {
                key: "swan",
                name: "swan",
                emoji: "🦢",
                plot_type: PlotType::Lake,
                product: ("feather", "feathers"),
            },
            Self::Whale => AnimalDef {
                key: "whale",
                name: "whale",
                emoji: "🐳",
                plot_type: PlotType::Lake,
                product: ("bestselling book", "bestselling books"),
            },
            Self::Seal => AnimalDef {
                key: "seal",
                name: "seal",
                emoji: "🦭",
                plot_type: PlotType::Lake,
                product: ("flipper", "flippers"),
            },
            Self::Fish => AnimalDef {
                key: "fish",
                name: "fish",
                emoji: "🐟",
                plot_type: PlotType::Lake,
                product: ("portion of caviar", "portions of caviar"),
            },
            Self::Blowfish => AnimalDef {
                key: "blowfish",
                name: "blowfish",
                emoji: "🐡",
                plot_type: PlotType::Lake,
                product: ("vial of poison", "vials of poison"),
            },
            Self::Shark => AnimalDef {
                key: "shark",
                name: "shark",
                emoji: "🦈",
                plot_type: PlotType::Lake,
                product: ("DVD", "DVDs"),
            },
            Self::Octopus => AnimalDef {
                key: "octopus",
                name: "octopus",
                emoji: "🐙",
                plot_type: PlotType::Lake,
                product: ("anime", "animes"),
            },
            Self::Crab => AnimalDef {
                key: "crab",
                name: "crab",
                emoji: "🦀",
                plot_type: PlotType::Lake,
                product: ("rave", "raves"),
            },
            Self::Dove => AnimalDef {
                key: "dove",
                name: "dove",
                emoji: "🕊️",
                plot_type: PlotType::Sky,
                product: ("bar of soap", "bars of soap"),
            },
            Self::Eagle => AnimalDef {
                key: "eagle",
                name: "eagle",
                emoji: "🦅",
                plot_type: PlotType::Sky,
                product: ("law degree", "law degrees"),
            },
            Self::Owl => AnimalDef {
                key: "owl",
                name: "owl",
                emoji: "🦉",
                plot_type: PlotType::Sky,
                product: ("pellet", "pellets"),
            },
            Self::Flamingo => AnimalDef {
                key: "flamingo",
                name: "flamingo",
                emoji: "🦩",
                plot_type: PlotType::Sky,
                product: ("shrimp", "shrimp"),
            },
            Self::Peacock => AnimalDef {
                key: "peacock",
                name: "peacock",
                emoji: "🦚",
                plot_type: PlotType::Sky,
                product: ("pea", "peas"),
            },
            Self::Parrot => AnimalDef {
                key: "parrot",
                name: "parrot",
                emoji: "🦜",
                plot_type: PlotType::Sky,
                product: ("cracker", "crackers"),
            },
            Self::Bat => AnimalDef {
                key: "bat",
                name: "bat",
                emoji: "🦇",
                plot_type: PlotType::Sky,
                product: ("riddle", "riddles"),
            },
        }
    }

    /// Stable storage key.
    pub const fn key(self) -> &'static str {
        self.def().key
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        self.def().name
    }

    /// Emoji for this animal.
    pub const fn emoji(self) -> &'static str {
        self.def().emoji
    }

    /// The habitat this animal must live on.
    pub const fn plot_type(self) -> PlotType {
        self.def().plot_type
    }

    /// Name of the produced good, singular for exactly one unit.
    pub const fn product_name(self, amount: u64) -> &'static str {
        let (singular, plural) = self.def().product;
        if amount == 1 { singular } else { plural }
    }

    /// Whether this animal can live on a plot of the given type.
    pub fn lives_on(self, plot_type: PlotType) -> bool {
        self.plot_type() == plot_type
    }

    /// Resolve an animal from its storage key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownAnimal`] if no animal uses `key`.
    pub fn from_key(key: &str) -> Result<Self, CatalogError> {
        Self::ALL
            .into_iter()
            .find(|a| a.key() == key)
            .ok_or_else(|| CatalogError::UnknownAnimal(key.to_owned()))
    }
}

impl core::fmt::Display for AnimalType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Look up an animal definition by key.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownAnimal`] for an unregistered key.
pub fn lookup_animal(key: &str) -> Result<AnimalDef, CatalogError> {
    AnimalType::from_key(key).map(AnimalType::def)
}

/// Look up a plot type definition by key.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownPlotType`] for an unregistered key.
pub fn lookup_plot_type(key: &str) -> Result<PlotDef, CatalogError> {
    PlotType::from_key(key).map(PlotType::def)
}

/// All animals that can live on the given plot type, in catalog order.
pub fn animals_for_plot_type(plot_type: PlotType) -> Vec<AnimalType> {
    AnimalType::ALL
        .into_iter()
        .filter(|a| a.lives_on(plot_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_plot_type_hosts_at_least_one_animal() {
        for plot_type in PlotType::ALL {
            assert!(
                !animals_for_plot_type(plot_type).is_empty(),
                "{plot_type} has no animals"
            );
        }
    }

    #[test]
    fn animal_keys_are_unique_and_resolve() {
        let mut keys: Vec<&str> = AnimalType::ALL.iter().map(|a| a.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), AnimalType::ALL.len());

        for animal in AnimalType::ALL {
            assert_eq!(AnimalType::from_key(animal.key()), Ok(animal));
        }
    }

    #[test]
    fn plot_keys_resolve() {
        for plot_type in PlotType::ALL {
            assert_eq!(lookup_plot_type(plot_type.key()), Ok(plot_type.def()));
        }
    }

    #[test]
    fn unknown_keys_are_errors() {
        assert_eq!(
            lookup_animal("dodo"),
            Err(CatalogError::UnknownAnimal("dodo".to_owned()))
        );
        assert_eq!(
            PlotType::from_key("tree"),
            Err(CatalogError::UnknownPlotType("tree".to_owned()))
        );
    }

    #[test]
    fn product_name_pluralizes() {
        assert_eq!(AnimalType::Rooster.product_name(1), "egg");
        assert_eq!(AnimalType::Rooster.product_name(0), "eggs");
        assert_eq!(AnimalType::Duck.product_name(2), "loaves of bread");
    }

    #[test]
    fn habitats_partition_the_catalog() {
        let total: usize = PlotType::ALL
            .into_iter()
            .map(|t| animals_for_plot_type(t).len())
            .sum();
        assert_eq!(total, AnimalType::ALL.len());
        assert!(animals_for_plot_type(PlotType::Lake).contains(&AnimalType::Otter));
        assert!(!AnimalType::Otter.lives_on(PlotType::Farm));
    }

    #[test]
    fn serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&AnimalType::Blowfish).ok();
        assert_eq!(json.as_deref(), Some("\"blowfish\""));
    }
}
