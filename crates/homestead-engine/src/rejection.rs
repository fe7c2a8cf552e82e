//! User-facing refusals.
//!
//! A rejection is a normal result, not an error: the handler rolls back,
//! nothing changes, and the user is told why in plain text.

use core::fmt;

use homestead_types::{AnimalType, BoardPosition, UserId};

use crate::format::{gold, group_thousands};

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The balance does not cover the price.
    InsufficientFunds {
        /// Price of the purchase.
        required: u64,
        /// Current balance.
        available: u64,
    },
    /// The user already owns the cell.
    PlotAlreadyOwned {
        /// The cell.
        position: BoardPosition,
    },
    /// The user owns no plot at the cell.
    PlotNotOwned {
        /// The cell.
        position: BoardPosition,
    },
    /// Every cell of the board is owned.
    BoardFull,
    /// The user holds none of the good.
    NothingToSell {
        /// The good.
        good: AnimalType,
    },
    /// The user holds less than a confirmed sale needs.
    InsufficientGoods {
        /// The good.
        good: AnimalType,
        /// Amount the sale needs.
        requested: u64,
        /// Amount held now.
        available: u64,
    },
    /// The market price moved after the sale was quoted.
    PriceChanged {
        /// The good.
        good: AnimalType,
        /// Price per unit on the quote.
        quoted: u64,
        /// Price per unit now.
        current: u64,
    },
    /// The plot's storage is empty.
    NothingToMove,
    /// The presser does not own the board the button belongs to.
    WrongActor {
        /// The board's owner.
        owner: UserId,
    },
    /// No good matches the name given.
    UnknownGood {
        /// What the user typed.
        query: String,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientFunds {
                required,
                available,
            } => write!(
                f,
                "You need **{}** for that (you currently have **{}**).",
                gold(*required),
                gold(*available)
            ),
            Self::PlotAlreadyOwned { position } => {
                write!(f, "You already own the plot at {position}.")
            }
            Self::PlotNotOwned { position } => write!(f, "You don't own a plot at {position}."),
            Self::BoardFull => f.write_str("You already own every plot on your board."),
            Self::NothingToSell { good } => write!(
                f,
                "You don't have any {} to sell.",
                good.product_name(0)
            ),
            Self::InsufficientGoods {
                good,
                requested,
                available,
            } => write!(
                f,
                "You only have **{}x {}**, not {}.",
                group_thousands(*available),
                good.product_name(*available),
                group_thousands(*requested)
            ),
            Self::PriceChanged {
                good,
                quoted,
                current,
            } => write!(
                f,
                "The price of {} changed from **{}** to **{}** each. Sell again for a new quote.",
                good.product_name(0),
                gold(*quoted),
                gold(*current)
            ),
            Self::NothingToMove => f.write_str("There's nothing on that plot to move."),
            Self::WrongActor { owner } => write!(
                f,
                "Only <@{owner}> can use these buttons. Run the command yourself to get your own."
            ),
            Self::UnknownGood { query } => write!(f, "There's no item called \"{query}\"."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_plain_text_with_grouped_amounts() {
        let r = Rejection::InsufficientFunds {
            required: 31_000,
            available: 100,
        };
        assert_eq!(
            r.to_string(),
            "You need **31,000 gold** for that (you currently have **100 gold**)."
        );
        assert_eq!(
            Rejection::NothingToSell {
                good: AnimalType::Cow
            }
            .to_string(),
            "You don't have any bottles of milk to sell."
        );
    }

    #[test]
    fn price_change_names_both_prices() {
        let r = Rejection::PriceChanged {
            good: AnimalType::Cow,
            quoted: 50,
            current: 1_250,
        };
        assert_eq!(
            r.to_string(),
            "The price of bottles of milk changed from **50 gold** to **1,250 gold** each. \
             Sell again for a new quote."
        );
    }
}
