//! Button payload codec.
//!
//! Buttons carry a short space-separated id that is handed back verbatim
//! when pressed. Plot buttons embed the user the board belongs to, and only
//! that user may press them; the id is re-validated on every press rather
//! than trusted.
//!
//! | Action | Wire form |
//! |--------|-----------|
//! | purchase a cell | `PLOT_PURCHASE <user> <x> <y>` |
//! | open a plot | `PLOT_SHOW <user> <x> <y>` |
//! | back to the board | `PLOT_SHOW_ALL <user>` |
//! | collect a plot | `PLOT_MOVE_ITEMS <user> <x> <y>` |
//! | buy an animal | `PLOT_BUY_ANIMAL <user> <x> <y>` |
//! | confirm a sale | `SELL <item> <amount> <unit_price>` |
//! | cancel a sale | `SELL CANCEL` |

use core::fmt;
use core::str::FromStr;

use homestead_types::{AnimalType, BoardPosition, CatalogError, EntityError, UserId};

/// Errors from parsing a button id.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PayloadError {
    /// The id was empty.
    #[error("empty button id")]
    Empty,

    /// The leading verb is not one this codec knows.
    #[error("unknown button action: {0}")]
    UnknownAction(String),

    /// The verb was known but the argument count was wrong.
    #[error("{action} expects {expected} arguments, got {got}")]
    WrongArity {
        /// The verb.
        action: &'static str,
        /// Arguments the verb takes.
        expected: usize,
        /// Arguments found.
        got: usize,
    },

    /// A numeric argument did not parse.
    #[error("invalid number in button id: {0}")]
    InvalidNumber(String),

    /// Coordinates fall outside the board.
    #[error(transparent)]
    Position(#[from] EntityError),

    /// The sale names an unknown good.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A decoded button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Buy the offered cell at `position` on `user`'s board.
    PlotPurchase {
        /// Board owner, and the only permitted presser.
        user: UserId,
        /// Cell to buy.
        position: BoardPosition,
    },
    /// Open the plot at `position`.
    PlotShow {
        /// Board owner.
        user: UserId,
        /// Plot to open.
        position: BoardPosition,
    },
    /// Return to the board of owned plots.
    PlotShowAll {
        /// Board owner.
        user: UserId,
    },
    /// Move everything stored on a plot into the owner's inventory.
    PlotMoveItems {
        /// Board owner.
        user: UserId,
        /// Plot to collect.
        position: BoardPosition,
    },
    /// Buy a random animal for the plot at `position`.
    PlotBuyAnimal {
        /// Board owner.
        user: UserId,
        /// Plot receiving the animal.
        position: BoardPosition,
    },
    /// Settle a quoted sale.
    Sell {
        /// Good being sold.
        good: AnimalType,
        /// Quoted amount.
        amount: u64,
        /// Quoted price per unit.
        unit_price: u64,
    },
    /// Abandon a quoted sale.
    SellCancel,
}

impl ButtonAction {
    /// The only user allowed to press this button, if it is bound to one.
    ///
    /// Sale buttons are sent privately to the seller and act on whoever
    /// presses them.
    pub const fn required_actor(&self) -> Option<UserId> {
        match *self {
            Self::PlotPurchase { user, .. }
            | Self::PlotShow { user, .. }
            | Self::PlotShowAll { user }
            | Self::PlotMoveItems { user, .. }
            | Self::PlotBuyAnimal { user, .. } => Some(user),
            Self::Sell { .. } | Self::SellCancel => None,
        }
    }

    /// Whether `presser` may press this button.
    pub fn permits(&self, presser: UserId) -> bool {
        self.required_actor().is_none_or(|user| user == presser)
    }

    /// Parse a button id.
    pub fn parse(custom_id: &str) -> Result<Self, PayloadError> {
        let mut parts = custom_id.split_whitespace();
        let verb = parts.next().ok_or(PayloadError::Empty)?;
        let args: Vec<&str> = parts.collect();

        match verb {
            "PLOT_PURCHASE" => {
                let (user, position) = user_and_position("PLOT_PURCHASE", &args)?;
                Ok(Self::PlotPurchase { user, position })
            }
            "PLOT_SHOW" => {
                let (user, position) = user_and_position("PLOT_SHOW", &args)?;
                Ok(Self::PlotShow { user, position })
            }
            "PLOT_SHOW_ALL" => match args.as_slice() {
                [user] => Ok(Self::PlotShowAll {
                    user: UserId(number(user)?),
                }),
                _ => Err(arity("PLOT_SHOW_ALL", 1, &args)),
            },
            "PLOT_MOVE_ITEMS" => {
                let (user, position) = user_and_position("PLOT_MOVE_ITEMS", &args)?;
                Ok(Self::PlotMoveItems { user, position })
            }
            "PLOT_BUY_ANIMAL" => {
                let (user, position) = user_and_position("PLOT_BUY_ANIMAL", &args)?;
                Ok(Self::PlotBuyAnimal { user, position })
            }
            "SELL" => match args.as_slice() {
                ["CANCEL"] => Ok(Self::SellCancel),
                [good, amount, unit_price] => Ok(Self::Sell {
                    good: AnimalType::from_key(good)?,
                    amount: number(amount)?,
                    unit_price: number(unit_price)?,
                }),
                _ => Err(arity("SELL", 3, &args)),
            },
            other => Err(PayloadError::UnknownAction(other.to_owned())),
        }
    }
}

fn number(raw: &str) -> Result<u64, PayloadError> {
    raw.parse::<u64>()
        .map_err(|_err| PayloadError::InvalidNumber(raw.to_owned()))
}

fn signed(raw: &str) -> Result<i64, PayloadError> {
    raw.parse::<i64>()
        .map_err(|_err| PayloadError::InvalidNumber(raw.to_owned()))
}

const fn arity(action: &'static str, expected: usize, args: &[&str]) -> PayloadError {
    PayloadError::WrongArity {
        action,
        expected,
        got: args.len(),
    }
}

fn user_and_position(
    action: &'static str,
    args: &[&str],
) -> Result<(UserId, BoardPosition), PayloadError> {
    match args {
        [user, x, y] => Ok((
            UserId(number(user)?),
            BoardPosition::new(signed(x)?, signed(y)?)?,
        )),
        _ => Err(arity(action, 3, args)),
    }
}

impl FromStr for ButtonAction {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PlotPurchase { user, position } => {
                write!(f, "PLOT_PURCHASE {user} {} {}", position.x(), position.y())
            }
            Self::PlotShow { user, position } => {
                write!(f, "PLOT_SHOW {user} {} {}", position.x(), position.y())
            }
            Self::PlotShowAll { user } => write!(f, "PLOT_SHOW_ALL {user}"),
            Self::PlotMoveItems { user, position } => {
                write!(f, "PLOT_MOVE_ITEMS {user} {} {}", position.x(), position.y())
            }
            Self::PlotBuyAnimal { user, position } => {
                write!(f, "PLOT_BUY_ANIMAL {user} {} {}", position.x(), position.y())
            }
            Self::Sell {
                good,
                amount,
                unit_price,
            } => write!(f, "SELL {} {amount} {unit_price}", good.key()),
            Self::SellCancel => f.write_str("SELL CANCEL"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pos(x: i64, y: i64) -> BoardPosition {
        BoardPosition::new(x, y).unwrap()
    }

    #[test]
    fn parses_plot_buttons() {
        assert_eq!(
            ButtonAction::parse("PLOT_PURCHASE 1234 2 4").unwrap(),
            ButtonAction::PlotPurchase {
                user: UserId(1234),
                position: pos(2, 4),
            }
        );
        assert_eq!(
            ButtonAction::parse("PLOT_SHOW_ALL 77").unwrap(),
            ButtonAction::PlotShowAll { user: UserId(77) }
        );
    }

    #[test]
    fn formats_the_wire_form() {
        let action = ButtonAction::PlotMoveItems {
            user: UserId(9),
            position: pos(0, 3),
        };
        assert_eq!(action.to_string(), "PLOT_MOVE_ITEMS 9 0 3");

        let sale = ButtonAction::Sell {
            good: AnimalType::Rooster,
            amount: 5,
            unit_price: 50,
        };
        assert_eq!(sale.to_string(), "SELL rooster 5 50");
        assert_eq!(ButtonAction::SellCancel.to_string(), "SELL CANCEL");
    }

    #[test]
    fn display_output_parses_back() {
        let actions = [
            ButtonAction::PlotBuyAnimal {
                user: UserId(u64::MAX),
                position: pos(4, 4),
            },
            ButtonAction::Sell {
                good: AnimalType::Bat,
                amount: 1,
                unit_price: 0,
            },
            ButtonAction::SellCancel,
        ];
        for action in actions {
            assert_eq!(action.to_string().parse::<ButtonAction>().unwrap(), action);
        }
    }

    #[test]
    fn rejects_malformed_ids() {
        assert_eq!(ButtonAction::parse("  "), Err(PayloadError::Empty));
        assert!(matches!(
            ButtonAction::parse("PLOT_EXPLODE 1 2 3"),
            Err(PayloadError::UnknownAction(_))
        ));
        assert!(matches!(
            ButtonAction::parse("PLOT_SHOW 1 2"),
            Err(PayloadError::WrongArity { got: 2, .. })
        ));
        assert!(matches!(
            ButtonAction::parse("PLOT_SHOW abc 1 1"),
            Err(PayloadError::InvalidNumber(_))
        ));
        assert!(matches!(
            ButtonAction::parse("PLOT_SHOW 1 5 0"),
            Err(PayloadError::Position(_))
        ));
        assert!(matches!(
            ButtonAction::parse("SELL unicorn 1 50"),
            Err(PayloadError::Catalog(_))
        ));
        assert!(matches!(
            ButtonAction::parse("SELL rooster -1 50"),
            Err(PayloadError::InvalidNumber(_))
        ));
    }

    #[test]
    fn plot_buttons_are_bound_to_their_owner() {
        let action = ButtonAction::PlotShow {
            user: UserId(1),
            position: pos(1, 1),
        };
        assert!(action.permits(UserId(1)));
        assert!(!action.permits(UserId(2)));
        assert!(ButtonAction::SellCancel.permits(UserId(2)));
    }
}
