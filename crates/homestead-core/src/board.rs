//! The 5x5 board a user picks plots from.
//!
//! Every cell is either a plot the user owns or the habitat the oracle
//! offers there. Which cells are pressable depends on what the board is for:
//! buying enables open cells, everything else enables owned cells.

use std::collections::BTreeMap;

use homestead_types::{BOARD_SIZE, BoardPosition, GuildId, Plot, PlotType, UserId};

use crate::oracle;
use crate::payload::ButtonAction;

/// Errors from assembling a board.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    /// A plot handed in belongs to a different user or guild.
    #[error("plot at {position} does not belong to this board")]
    ForeignPlot {
        /// Cell the plot occupies.
        position: BoardPosition,
    },

    /// Two plots claim the same cell.
    #[error("two plots occupy {position}")]
    DuplicateCell {
        /// The contested cell.
        position: BoardPosition,
    },
}

/// Visual style of a button, as understood by the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonStyle {
    /// Blurple.
    Primary,
    /// Gray.
    Secondary,
    /// Green.
    Success,
    /// Red.
    Danger,
}

/// Style used for cells of a given habitat.
pub const fn plot_style(plot_type: PlotType) -> ButtonStyle {
    match plot_type {
        PlotType::Farm => ButtonStyle::Success,
        PlotType::Garden => ButtonStyle::Danger,
        PlotType::Lake => ButtonStyle::Primary,
        PlotType::Sky => ButtonStyle::Secondary,
    }
}

/// What a board is being shown for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardMode {
    /// Pick an open cell to buy.
    Purchase,
    /// Pick an owned plot to open.
    Show,
    /// Pick an owned plot to put a new animal on.
    BuyAnimal,
}

impl BoardMode {
    const fn enables(self, owned: bool) -> bool {
        match self {
            Self::Purchase => !owned,
            Self::Show | Self::BuyAnimal => owned,
        }
    }

    const fn action(self, user: UserId, position: BoardPosition) -> ButtonAction {
        match self {
            Self::Purchase => ButtonAction::PlotPurchase { user, position },
            Self::Show => ButtonAction::PlotShow { user, position },
            Self::BuyAnimal => ButtonAction::PlotBuyAnimal { user, position },
        }
    }
}

/// What sits on a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// A plot the user owns.
    Owned(Plot),
    /// An open cell and the habitat it would have if bought.
    Offered(PlotType),
}

impl CellContent {
    /// Habitat of the cell, owned or not.
    pub const fn plot_type(&self) -> PlotType {
        match self {
            Self::Owned(plot) => plot.plot_type,
            Self::Offered(plot_type) => *plot_type,
        }
    }

    /// Whether the user owns this cell.
    pub const fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

/// One button on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardCell {
    /// Where the cell is.
    pub position: BoardPosition,
    /// Owned plot or offer.
    pub content: CellContent,
    /// Button style for the cell's habitat.
    pub style: ButtonStyle,
    /// Whether the cell can be pressed in this mode.
    pub enabled: bool,
    /// What pressing the cell does.
    pub action: ButtonAction,
}

/// A full board, one row per `x`, one column per `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Mode the board was built for.
    pub mode: BoardMode,
    /// `BOARD_SIZE` rows of `BOARD_SIZE` cells.
    pub rows: Vec<Vec<BoardCell>>,
}

impl Board {
    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &BoardCell> {
        self.rows.iter().flatten()
    }

    /// The cell at `position`.
    pub fn cell(&self, position: BoardPosition) -> Option<&BoardCell> {
        self.rows
            .get(usize::from(position.x()))
            .and_then(|row| row.get(usize::from(position.y())))
    }

    /// Whether no cell can be pressed.
    pub fn is_inert(&self) -> bool {
        self.cells().all(|cell| !cell.enabled)
    }
}

/// Lay out `user`'s board in `guild` for `mode`.
pub fn build_board(
    guild_id: GuildId,
    user_id: UserId,
    owned: &[Plot],
    mode: BoardMode,
) -> Result<Board, BoardError> {
    let mut by_position: BTreeMap<BoardPosition, &Plot> = BTreeMap::new();
    for plot in owned {
        if plot.guild_id != guild_id || plot.owner_id != user_id {
            return Err(BoardError::ForeignPlot {
                position: plot.position,
            });
        }
        if by_position.insert(plot.position, plot).is_some() {
            return Err(BoardError::DuplicateCell {
                position: plot.position,
            });
        }
    }

    let offers = oracle::offers(guild_id, user_id);
    let mut rows: Vec<Vec<BoardCell>> = (0..BOARD_SIZE)
        .map(|_| Vec::with_capacity(usize::from(BOARD_SIZE)))
        .collect();

    for (position, offered) in offers {
        let content = by_position
            .get(&position)
            .map_or(CellContent::Offered(offered), |plot| {
                CellContent::Owned((*plot).clone())
            });
        let cell = BoardCell {
            position,
            style: plot_style(content.plot_type()),
            enabled: mode.enables(content.is_owned()),
            action: mode.action(user_id, position),
            content,
        };
        if let Some(row) = rows.get_mut(usize::from(position.x())) {
            row.push(cell);
        }
    }

    Ok(Board { mode, rows })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GUILD: GuildId = GuildId(5);
    const USER: UserId = UserId(8);

    fn owned_at(x: i64, y: i64) -> Plot {
        let position = BoardPosition::new(x, y).unwrap();
        Plot::new(GUILD, USER, position, oracle::assign(GUILD, USER, position))
    }

    #[test]
    fn board_is_five_by_five_in_position_order() {
        let board = build_board(GUILD, USER, &[], BoardMode::Purchase).unwrap();
        assert_eq!(board.rows.len(), 5);
        for (x, row) in board.rows.iter().enumerate() {
            assert_eq!(row.len(), 5);
            for (y, cell) in row.iter().enumerate() {
                assert_eq!(usize::from(cell.position.x()), x);
                assert_eq!(usize::from(cell.position.y()), y);
            }
        }
    }

    #[test]
    fn purchase_mode_enables_only_open_cells() {
        let plots = [owned_at(0, 0), owned_at(3, 1)];
        let board = build_board(GUILD, USER, &plots, BoardMode::Purchase).unwrap();
        for cell in board.cells() {
            assert_eq!(cell.enabled, !cell.content.is_owned());
        }
        assert_eq!(board.cells().filter(|c| c.enabled).count(), 23);
    }

    #[test]
    fn show_mode_enables_only_owned_cells() {
        let plots = [owned_at(2, 2)];
        let board = build_board(GUILD, USER, &plots, BoardMode::Show).unwrap();
        let enabled: Vec<_> = board.cells().filter(|c| c.enabled).collect();
        assert_eq!(enabled.len(), 1);
        assert_eq!(
            enabled.first().map(|c| c.action.to_string()),
            Some("PLOT_SHOW 8 2 2".to_owned())
        );
    }

    #[test]
    fn empty_board_is_inert_outside_purchase() {
        let board = build_board(GUILD, USER, &[], BoardMode::BuyAnimal).unwrap();
        assert!(board.is_inert());
    }

    #[test]
    fn offers_match_the_oracle() {
        let board = build_board(GUILD, USER, &[], BoardMode::Purchase).unwrap();
        for cell in board.cells() {
            assert_eq!(
                cell.content.plot_type(),
                oracle::assign(GUILD, USER, cell.position)
            );
            assert_eq!(cell.style, plot_style(cell.content.plot_type()));
        }
    }

    #[test]
    fn rejects_plots_from_another_board() {
        let position = BoardPosition::new(1, 1).unwrap();
        let foreign = Plot::new(GUILD, UserId(9), position, PlotType::Sky);
        assert_eq!(
            build_board(GUILD, USER, &[foreign], BoardMode::Show),
            Err(BoardError::ForeignPlot { position })
        );
    }

    #[test]
    fn habitat_styles() {
        assert_eq!(plot_style(PlotType::Farm), ButtonStyle::Success);
        assert_eq!(plot_style(PlotType::Garden), ButtonStyle::Danger);
        assert_eq!(plot_style(PlotType::Lake), ButtonStyle::Primary);
        assert_eq!(plot_style(PlotType::Sky), ButtonStyle::Secondary);
    }
}
