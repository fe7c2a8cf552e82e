//! Pricing rules for land, livestock, and the market.
//!
//! Both acquisition curves are strictly increasing so that every extra plot
//! or animal costs more than the last. All arithmetic saturates at
//! `u64::MAX`; with a 25-cell board and the default coefficients the plot
//! curve tops out around 2.8e14, far from saturation.

use homestead_types::{AnimalType, GuildId};

use crate::config::EconomyConfig;

/// Plot and animal price curves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Economy {
    plot_linear: u64,
    plot_exponential: u64,
    plot_growth_base: u64,
    animal_quadratic: u64,
    animal_linear: u64,
}

impl Economy {
    /// Build the price curves from validated configuration.
    pub const fn new(config: &EconomyConfig) -> Self {
        Self {
            plot_linear: config.plot_linear,
            plot_exponential: config.plot_exponential,
            plot_growth_base: config.plot_growth_base,
            animal_quadratic: config.animal_quadratic,
            animal_linear: config.animal_linear,
        }
    }

    /// Price of the next plot for a user who already owns
    /// `current_plot_count` plots.
    ///
    /// The first plot is free. The exponential term would need
    /// `base^(-1)` at a count of zero, so that case is answered directly.
    pub fn plot_price(&self, current_plot_count: u64) -> u64 {
        let Some(exponent) = current_plot_count.checked_sub(1) else {
            return 0;
        };
        let exponent = u32::try_from(exponent).unwrap_or(u32::MAX);
        let linear = self.plot_linear.saturating_mul(current_plot_count);
        let growth = self
            .plot_growth_base
            .saturating_pow(exponent)
            .saturating_mul(self.plot_exponential);
        linear.saturating_add(growth)
    }

    /// Price of the next animal for a user who already owns
    /// `owned_animal_count` animals across all of their plots.
    pub const fn animal_price(&self, owned_animal_count: u64) -> u64 {
        let n = owned_animal_count;
        self.animal_quadratic
            .saturating_mul(n.saturating_mul(n))
            .saturating_add(self.animal_linear.saturating_mul(n))
    }
}

impl Default for Economy {
    fn default() -> Self {
        Self::new(&EconomyConfig::default())
    }
}

/// Source of market sell prices.
///
/// Call sites always pass the guild so per-guild or per-good pricing can be
/// swapped in without touching them.
pub trait MarketPricing: Send + Sync {
    /// Gold paid per unit of `good` sold in `guild_id`.
    fn sell_price(&self, guild_id: GuildId, good: AnimalType) -> u64;
}

/// One price for every good in every guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatMarket {
    per_unit: u64,
}

impl FlatMarket {
    /// A market paying `per_unit` gold for anything.
    pub const fn new(per_unit: u64) -> Self {
        Self { per_unit }
    }
}

impl MarketPricing for FlatMarket {
    fn sell_price(&self, _guild_id: GuildId, _good: AnimalType) -> u64 {
        self.per_unit
    }
}

/// How much of a sale request can actually be sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleAmount {
    /// Units that will be sold.
    pub amount: u64,
    /// Whether the request was lowered to what the seller owns.
    pub adjusted: bool,
}

/// Clamp a sale request to the owned amount.
///
/// `None` (or zero) means "sell everything". Returns `None` when nothing is
/// owned; over-requests are lowered, never refused.
pub fn clamp_sale(owned: u64, requested: Option<u64>) -> Option<SaleAmount> {
    if owned == 0 {
        return None;
    }
    match requested.filter(|&r| r > 0) {
        None => Some(SaleAmount {
            amount: owned,
            adjusted: false,
        }),
        Some(r) if r > owned => Some(SaleAmount {
            amount: owned,
            adjusted: true,
        }),
        Some(r) => Some(SaleAmount {
            amount: r,
            adjusted: false,
        }),
    }
}

/// Gold earned by selling `amount` units at `unit_price`, or `None` on
/// overflow.
pub const fn sale_proceeds(amount: u64, unit_price: u64) -> Option<u64> {
    amount.checked_mul(unit_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use homestead_types::BOARD_SIZE;

    fn max_plots() -> u64 {
        u64::from(BOARD_SIZE) * u64::from(BOARD_SIZE)
    }

    #[test]
    fn first_plot_is_free() {
        assert_eq!(Economy::default().plot_price(0), 0);
    }

    #[test]
    fn plot_prices_match_the_live_curve() {
        let economy = Economy::default();
        assert_eq!(economy.plot_price(1), 31_000);
        assert_eq!(economy.plot_price(2), 63_000);
        assert_eq!(economy.plot_price(3), 99_000);
        assert_eq!(economy.plot_price(4), 147_000);
    }

    #[test]
    fn plot_price_strictly_increases_across_the_board() {
        let economy = Economy::default();
        for n in 0..max_plots() {
            assert!(
                economy.plot_price(n + 1) > economy.plot_price(n),
                "plot_price({}) <= plot_price({n})",
                n + 1
            );
        }
    }

    #[test]
    fn animal_price_starts_at_zero_and_strictly_increases() {
        let economy = Economy::default();
        assert_eq!(economy.animal_price(0), 0);
        assert_eq!(economy.animal_price(1), 3_000);
        assert_eq!(economy.animal_price(2), 6_500);
        for n in 0..10_000 {
            assert!(economy.animal_price(n + 1) > economy.animal_price(n));
        }
    }

    #[test]
    fn prices_saturate_instead_of_overflowing() {
        let economy = Economy::default();
        assert_eq!(economy.plot_price(u64::MAX), u64::MAX);
        assert_eq!(economy.animal_price(u64::MAX), u64::MAX);
    }

    #[test]
    fn flat_market_ignores_guild_and_good() {
        let market = FlatMarket::new(50);
        assert_eq!(market.sell_price(GuildId(1), AnimalType::Cow), 50);
        assert_eq!(market.sell_price(GuildId(2), AnimalType::Shark), 50);
    }

    #[test]
    fn sale_defaults_to_everything_owned() {
        assert_eq!(
            clamp_sale(12, None),
            Some(SaleAmount {
                amount: 12,
                adjusted: false
            })
        );
        assert_eq!(clamp_sale(12, Some(0)).map(|s| s.amount), Some(12));
    }

    #[test]
    fn over_request_is_clamped_and_flagged() {
        assert_eq!(
            clamp_sale(5, Some(10)),
            Some(SaleAmount {
                amount: 5,
                adjusted: true
            })
        );
    }

    #[test]
    fn nothing_owned_cannot_be_sold() {
        assert_eq!(clamp_sale(0, Some(3)), None);
        assert_eq!(clamp_sale(0, None), None);
    }

    #[test]
    fn proceeds_detect_overflow() {
        assert_eq!(sale_proceeds(5, 50), Some(250));
        assert_eq!(sale_proceeds(u64::MAX, 2), None);
    }
}
