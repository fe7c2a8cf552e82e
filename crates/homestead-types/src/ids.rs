//! Type-safe identifier wrappers.
//!
//! Entities created by the economy (plots, animals) carry UUID v7
//! identifiers generated app-side so rows can be written in the same
//! transaction that decides to create them. Users and guilds are owned by
//! the chat platform and arrive as opaque 64-bit snowflakes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Generates a newtype wrapper around a platform snowflake (`u64`).
macro_rules! define_snowflake {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Return the raw snowflake value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a plot of land.
    PlotId
}

define_id! {
    /// Unique identifier for an animal living on a plot.
    AnimalId
}

define_snowflake! {
    /// Chat-platform user identifier.
    UserId
}

define_snowflake! {
    /// Chat-platform guild (server) identifier. Every economy is scoped to one.
    GuildId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_are_distinct_types() {
        let plot = PlotId::new();
        let animal = AnimalId::new();
        assert_ne!(plot.into_inner(), Uuid::nil());
        assert_ne!(animal.into_inner(), Uuid::nil());
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = PlotId::new();
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<PlotId, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }

    #[test]
    fn snowflake_display_is_raw_number() {
        let user = UserId::from(141_231_597_155_385_344);
        assert_eq!(user.to_string(), "141231597155385344");
        assert_eq!(user.get(), 141_231_597_155_385_344);
    }
}
