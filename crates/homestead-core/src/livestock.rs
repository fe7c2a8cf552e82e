//! Drawing new animals for a plot.

use homestead_types::{AnimalType, PlotType, animals_for_plot_type};
use rand::Rng;
use rand::seq::IndexedRandom;

/// A freshly drawn animal: its kind and its lifelong production rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Newborn {
    /// Kind of animal, always compatible with the plot it was drawn for.
    pub animal_type: AnimalType,
    /// Production rate in `[0, 1)`, fixed for the animal's lifetime.
    pub production_rate: f64,
}

/// Draw a random animal able to live on `plot_type`.
///
/// Returns `None` only if the catalog has no animal for the habitat.
pub fn draw_animal<R: Rng + ?Sized>(plot_type: PlotType, rng: &mut R) -> Option<Newborn> {
    let animal_type = animals_for_plot_type(plot_type).choose(rng).copied()?;
    Some(Newborn {
        animal_type,
        production_rate: rng.random::<f64>(),
    })
}
