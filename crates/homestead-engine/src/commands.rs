//! Command and button dispatch.
//!
//! The chat platform is outside this crate. It hands over a typed
//! [`Command`] or a raw button id and renders the [`Reply`] it gets back.

use homestead_core::board::{Board, BoardMode, ButtonStyle, CellContent};
use homestead_core::payload::ButtonAction;
use homestead_types::{Animal, GuildId, UserId};
use tracing::{debug, error};

use crate::error::HandlerError;
use crate::format::{gold, group_thousands, item, item_list};
use crate::handlers::market::resolve_good;
use crate::handlers::views::PlotDetail;
use crate::handlers::{Homestead, Outcome};
use crate::rejection::Rejection;

/// A slash command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the purchase board.
    BuyPlot,
    /// Show the board of owned plots.
    ShowPlots,
    /// Show the board for placing a new animal.
    BuyAnimal,
    /// Quote a sale.
    Sell {
        /// Good, by animal key or name.
        good: String,
        /// Units to sell; everything held when `None`.
        amount: Option<u64>,
    },
    /// Show balance and goods.
    Inventory,
}

/// A rendered button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Visible text.
    pub label: String,
    /// Payload handed back on press.
    pub custom_id: String,
    /// Colour.
    pub style: ButtonStyle,
    /// Whether the button is greyed out.
    pub disabled: bool,
}

impl Button {
    fn new(label: &str, action: ButtonAction, style: ButtonStyle) -> Self {
        Self {
            label: label.to_owned(),
            custom_id: action.to_string(),
            style,
            disabled: false,
        }
    }

    #[must_use]
    const fn disabled_if(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// What to send back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    /// Message text.
    pub content: String,
    /// Rows of buttons.
    pub buttons: Vec<Vec<Button>>,
    /// Whether only the invoking user sees the reply.
    pub ephemeral: bool,
}

impl Reply {
    fn public(content: String) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    fn private(content: String) -> Self {
        Self {
            content,
            ephemeral: true,
            ..Self::default()
        }
    }

    fn rejected(rejection: &Rejection) -> Self {
        Self::private(rejection.to_string())
    }

    #[must_use]
    fn with_row(mut self, row: Vec<Button>) -> Self {
        self.buttons.push(row);
        self
    }

    #[must_use]
    fn with_rows(mut self, rows: Vec<Vec<Button>>) -> Self {
        self.buttons.extend(rows);
        self
    }
}

/// Render a board as rows of buttons. Owned cells show their habitat.
pub fn board_buttons(board: &Board) -> Vec<Vec<Button>> {
    board
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| Button {
                    label: match &cell.content {
                        CellContent::Owned(plot) => plot.plot_type.name().to_owned(),
                        CellContent::Offered(_) => "\u{200b}".to_owned(),
                    },
                    custom_id: cell.action.to_string(),
                    style: cell.style,
                    disabled: !cell.enabled,
                })
                .collect()
        })
        .collect()
}

fn plot_detail_reply(detail: &PlotDetail) -> Reply {
    let plot = &detail.plot.plot;
    let animals: String = detail.plot.animals.iter().map(Animal::emoji).collect();
    let content = format!(
        "Your {} plot at {}\n{}\n**Items**\n{}",
        plot.plot_type,
        plot.position,
        if animals.is_empty() { "No animals yet" } else { animals.as_str() },
        item_list(&detail.items.items, "Nothing yet :("),
    );
    let user = plot.owner_id;
    Reply::public(content).with_row(vec![
        Button::new(
            "Show all plots",
            ButtonAction::PlotShowAll { user },
            ButtonStyle::Primary,
        ),
        Button::new(
            "Move items to inventory",
            ButtonAction::PlotMoveItems {
                user,
                position: plot.position,
            },
            ButtonStyle::Secondary,
        )
        .disabled_if(detail.items.is_empty()),
    ])
}

impl Homestead {
    /// Handle a command and always produce a reply.
    ///
    /// Failures are logged and answered with a generic message.
    pub async fn respond_to_command(&self, guild: GuildId, user: UserId, command: Command) -> Reply {
        match self.run_command(guild, user, command).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(guild = %guild, user = %user, error = %e, "command failed");
                Reply::private(e.user_message().to_owned())
            }
        }
    }

    /// Handle a button press and always produce a reply.
    pub async fn respond_to_button(&self, guild: GuildId, presser: UserId, custom_id: &str) -> Reply {
        match self.press_button(guild, presser, custom_id).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(guild = %guild, user = %presser, custom_id, error = %e, "button failed");
                Reply::private(e.user_message().to_owned())
            }
        }
    }

    /// Handle a command.
    pub async fn run_command(
        &self,
        guild: GuildId,
        user: UserId,
        command: Command,
    ) -> Result<Reply, HandlerError> {
        debug!(guild = %guild, user = %user, ?command, "command received");
        match command {
            Command::BuyPlot => Ok(match self.plot_offer(guild, user).await? {
                Outcome::Done(offer) => Reply::public(format!(
                    "Which plot would you like to purchase? This will cost **{}**.",
                    gold(offer.price)
                ))
                .with_rows(board_buttons(&offer.board)),
                Outcome::Rejected(r) => Reply::rejected(&r),
            }),
            Command::ShowPlots => self.show_plots(guild, user).await,
            Command::BuyAnimal => {
                let offer = self.animal_offer(guild, user).await?;
                if offer.board.is_inert() {
                    return Ok(Reply::private(
                        "You need a plot before you can buy an animal.".to_owned(),
                    ));
                }
                Ok(Reply::public(format!(
                    "Which plot would you like to add an animal to? The next animal costs **{}**.",
                    gold(offer.price)
                ))
                .with_rows(board_buttons(&offer.board)))
            }
            Command::Sell { good, amount } => {
                Ok(match self.quote_sale(guild, user, &good, amount).await? {
                    Outcome::Done(quote) => {
                        let mut content = String::new();
                        if quote.adjusted {
                            content.push_str("You don't have that many, so the amount was lowered.\n");
                        }
                        content.push_str(&format!(
                            "Sell **{}x {}** @ **{} each** for **{}**?",
                            group_thousands(quote.amount),
                            quote.good.product_name(quote.amount),
                            gold(quote.unit_price),
                            gold(quote.total),
                        ));
                        Reply::private(content).with_row(vec![
                            Button::new("Yes", quote.confirm(), ButtonStyle::Success),
                            Button::new("No", ButtonAction::SellCancel, ButtonStyle::Danger),
                        ])
                    }
                    Outcome::Rejected(r) => Reply::rejected(&r),
                })
            }
            Command::Inventory => {
                let view = self.inventory(guild, user).await?;
                Ok(Reply::public(format!(
                    "**Gold:** {}\n**Items**\n{}",
                    gold(view.inventory.money),
                    item_list(&view.items.items, "Nothing yet :("),
                )))
            }
        }
    }

    /// Handle a button press, re-validating who pressed it.
    pub async fn press_button(
        &self,
        guild: GuildId,
        presser: UserId,
        custom_id: &str,
    ) -> Result<Reply, HandlerError> {
        let action = ButtonAction::parse(custom_id)?;
        if let Some(owner) = action.required_actor().filter(|owner| *owner != presser) {
            return Ok(Reply::rejected(&Rejection::WrongActor { owner }));
        }
        debug!(guild = %guild, user = %presser, %action, "button pressed");

        match action {
            ButtonAction::PlotPurchase { user, position } => {
                Ok(match self.purchase_plot(guild, user, position).await? {
                    Outcome::Done(p) => Reply::public(format!(
                        "You bought the {} plot at {} for **{}**. A {} {} has moved in!",
                        p.plot.plot_type,
                        p.plot.position,
                        gold(p.price),
                        p.starter.emoji(),
                        p.starter.animal_type,
                    )),
                    Outcome::Rejected(r) => Reply::rejected(&r),
                })
            }
            ButtonAction::PlotShow { user, position } => {
                Ok(match self.plot_detail(guild, user, position).await? {
                    Outcome::Done(detail) => plot_detail_reply(&detail),
                    Outcome::Rejected(r) => Reply::rejected(&r),
                })
            }
            ButtonAction::PlotShowAll { user } => self.show_plots(guild, user).await,
            ButtonAction::PlotMoveItems { user, position } => {
                Ok(match self.collect_plot(guild, user, position).await? {
                    Outcome::Done(collection) => {
                        let moved: Vec<String> = collection.moved.iter().map(item).collect();
                        Reply::public(format!(
                            "Moved **{}** to your inventory.",
                            moved.join(", ")
                        ))
                        .with_row(vec![Button::new(
                            "Show all plots",
                            ButtonAction::PlotShowAll { user },
                            ButtonStyle::Primary,
                        )])
                    }
                    Outcome::Rejected(r) => Reply::rejected(&r),
                })
            }
            ButtonAction::PlotBuyAnimal { user, position } => {
                Ok(match self.buy_animal(guild, user, position).await? {
                    Outcome::Done(p) => Reply::public(format!(
                        "Added a new **{}** {} to your plot for **{}**.",
                        p.animal.animal_type,
                        p.animal.emoji(),
                        gold(p.price),
                    )),
                    Outcome::Rejected(r) => Reply::rejected(&r),
                })
            }
            ButtonAction::Sell {
                good,
                amount,
                unit_price,
            } => Ok(
                match self
                    .confirm_sale(guild, presser, good, amount, unit_price)
                    .await?
                {
                    Outcome::Done(sale) => Reply::private(format!(
                        "Sold **{}x {}** for **{}**. You now have **{}**.",
                        group_thousands(sale.amount),
                        sale.good.product_name(sale.amount),
                        gold(sale.proceeds),
                        gold(sale.balance),
                    )),
                    Outcome::Rejected(r) => Reply::rejected(&r),
                },
            ),
            ButtonAction::SellCancel => Ok(Reply::private("Sale cancelled.".to_owned())),
        }
    }

    async fn show_plots(&self, guild: GuildId, user: UserId) -> Result<Reply, HandlerError> {
        let board = self.board(guild, user, BoardMode::Show).await?;
        if board.is_inert() {
            return Ok(Reply::private("You don't own any plots yet.".to_owned()));
        }
        Ok(Reply::public("Which plot would you like to view?".to_owned())
            .with_rows(board_buttons(&board)))
    }
}

/// Parse a good and amount the way the `sell` command receives them.
///
/// Returns `None` for an unknown good.
pub fn sell_command(good: &str, amount: Option<u64>) -> Option<Command> {
    resolve_good(good).map(|g| Command::Sell {
        good: g.key().to_owned(),
        amount,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homestead_core::board::build_board;

    use super::*;

    #[test]
    fn board_renders_five_rows_of_five() {
        let board = build_board(GuildId(1), UserId(2), &[], BoardMode::Purchase).unwrap();
        let rows = board_buttons(&board);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.len() == 5));
        assert!(rows.iter().flatten().all(|b| !b.disabled));
        assert!(
            rows.iter()
                .flatten()
                .all(|b| b.custom_id.starts_with("PLOT_PURCHASE 2 "))
        );
    }

    #[test]
    fn rejections_reply_privately() {
        let reply = Reply::rejected(&Rejection::NothingToMove);
        assert!(reply.ephemeral);
        assert!(reply.buttons.is_empty());
    }

    #[test]
    fn sell_command_normalises_the_good() {
        assert_eq!(
            sell_command("Rooster", Some(3)),
            Some(Command::Sell {
                good: "rooster".to_owned(),
                amount: Some(3),
            })
        );
        assert_eq!(sell_command("unicorn", None), None);
    }
}
