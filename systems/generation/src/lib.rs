#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised map generation that only accepts solver-verified maps.
//!
//! Each attempt draws every room from a uniform range chosen by the grid's
//! cell count, solves the result with the real minimum-health solver, and
//! accepts it only when the minimum health is positive and under a
//! size-dependent ceiling. Attempts that fail for any reason are recorded and
//! retried. When the attempt budget runs out the grid receives a fixed
//! pattern that is solvable by construction.

use dungeon_path_core::{DpTable, GridDimensions, GridView, SolveError};
use dungeon_path_system_solver::solve_into;
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};
use serde::{Deserialize, Serialize};

/// Aggregated tuning knobs controlling map difficulty and generation latency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationTuning {
    /// Value ranges keyed by cell count; the first band that covers the grid wins.
    pub value_bands: Vec<ValueBand>,
    /// Number of random attempts allowed before falling back.
    pub attempts: AttemptTuning,
    /// Ceiling applied to the minimum health of an accepted map.
    pub acceptance: AcceptanceTuning,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            value_bands: vec![
                ValueBand::up_to(25, -30, 15),
                ValueBand::up_to(100, -16, 8),
                ValueBand::up_to(1_000, -8, 4),
                ValueBand::unbounded(-4, 2),
            ],
            attempts: AttemptTuning::default(),
            acceptance: AcceptanceTuning::default(),
        }
    }
}

impl GenerationTuning {
    /// Band that applies to a grid with the provided number of cells.
    #[must_use]
    pub fn band_for(&self, cell_count: usize) -> Option<&ValueBand> {
        self.value_bands
            .iter()
            .find(|band| band.max_cells.map_or(true, |max| cell_count <= max))
    }

    /// Number of random attempts granted to a grid with the provided cell count.
    #[must_use]
    pub fn attempt_budget(&self, cell_count: usize) -> u32 {
        if cell_count > self.attempts.large_grid_cells {
            self.attempts.large_grid_attempts
        } else {
            self.attempts.small_grid_attempts
        }
    }

    /// Largest minimum health an accepted map may require.
    #[must_use]
    pub fn health_ceiling(&self, cell_count: usize) -> u64 {
        let multiplier = if cell_count > self.acceptance.large_grid_cells {
            self.acceptance.large_grid_multiplier
        } else {
            self.acceptance.small_grid_multiplier
        };
        (cell_count as u64).saturating_mul(multiplier)
    }

    /// Checks the tuning for values that would make every attempt fail.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.value_bands.is_empty() {
            return Err(TuningError::NoBands);
        }

        for (index, band) in self.value_bands.iter().enumerate() {
            if band.min > band.max {
                return Err(TuningError::InvertedBand {
                    index,
                    min: band.min,
                    max: band.max,
                });
            }
        }

        if self.attempts.small_grid_attempts == 0 || self.attempts.large_grid_attempts == 0 {
            return Err(TuningError::ZeroAttemptBudget);
        }

        Ok(())
    }
}

/// Inclusive range of room values used for grids up to a cell count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueBand {
    /// Largest cell count covered by the band; `None` covers every size.
    #[serde(default)]
    pub max_cells: Option<usize>,
    /// Smallest value a room may receive.
    pub min: i32,
    /// Largest value a room may receive.
    pub max: i32,
}

impl ValueBand {
    /// Creates a band covering grids with at most `max_cells` cells.
    #[must_use]
    pub const fn up_to(max_cells: usize, min: i32, max: i32) -> Self {
        Self {
            max_cells: Some(max_cells),
            min,
            max,
        }
    }

    /// Creates a band covering grids of any size.
    #[must_use]
    pub const fn unbounded(min: i32, max: i32) -> Self {
        Self {
            max_cells: None,
            min,
            max,
        }
    }
}

/// Attempt budgets; large grids get fewer attempts to bound latency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttemptTuning {
    /// Grids with more cells than this use `large_grid_attempts`.
    pub large_grid_cells: usize,
    /// Attempt budget for grids at or below the threshold.
    pub small_grid_attempts: u32,
    /// Attempt budget for grids above the threshold.
    pub large_grid_attempts: u32,
}

impl Default for AttemptTuning {
    fn default() -> Self {
        Self {
            large_grid_cells: 1_000,
            small_grid_attempts: 100,
            large_grid_attempts: 10,
        }
    }
}

/// Acceptance ceiling expressed as a multiple of the cell count.
///
/// The two multipliers are kept separate rather than folded into one formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceTuning {
    /// Grids with more cells than this use `large_grid_multiplier`.
    pub large_grid_cells: usize,
    /// Ceiling multiplier for grids at or below the threshold.
    pub small_grid_multiplier: u64,
    /// Ceiling multiplier for grids above the threshold.
    pub large_grid_multiplier: u64,
}

impl Default for AcceptanceTuning {
    fn default() -> Self {
        Self {
            large_grid_cells: 1_000,
            small_grid_multiplier: 2,
            large_grid_multiplier: 1,
        }
    }
}

/// Problems detected when validating a [`GenerationTuning`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TuningError {
    /// No value band was configured.
    #[error("at least one value band is required")]
    NoBands,
    /// A band's lower bound exceeds its upper bound.
    #[error("value band {index} has min {min} above max {max}")]
    InvertedBand {
        /// Position of the band in the table.
        index: usize,
        /// Configured lower bound.
        min: i32,
        /// Configured upper bound.
        max: i32,
    },
    /// An attempt budget of zero was configured.
    #[error("attempt budgets must be at least one")]
    ZeroAttemptBudget,
}

/// Reason a single generation attempt did not produce an accepted map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttemptFailure {
    /// No value band covers the grid's cell count.
    #[error("no value band covers {cell_count} cells")]
    NoBand {
        /// Cell count of the grid.
        cell_count: usize,
    },
    /// The selected band cannot be sampled.
    #[error("value band [{min}, {max}] is empty")]
    InvertedBand {
        /// Configured lower bound.
        min: i32,
        /// Configured upper bound.
        max: i32,
    },
    /// The solver refused the drawn grid.
    #[error("solver failed: {0}")]
    Solve(#[from] SolveError),
    /// The drawn grid was solvable but outside the acceptance window.
    #[error("minimum health {min_health} is outside 1..={ceiling}")]
    Rejected {
        /// Minimum health of the drawn grid.
        min_health: u64,
        /// Ceiling in force for the grid size.
        ceiling: u64,
    },
}

/// How a generation run concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// A random map passed the acceptance check.
    Accepted {
        /// Minimum health of the accepted map.
        min_health: u64,
    },
    /// Every attempt failed and the deterministic pattern was written.
    Fallback,
}

/// Summary of a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    /// Number of random attempts consumed, including the accepted one.
    pub attempts: u32,
    /// How the run concluded.
    pub outcome: GenerationOutcome,
    /// Failures recorded for every attempt that was not accepted.
    pub failures: Vec<AttemptFailure>,
}

impl GenerationReport {
    /// Reports whether the deterministic pattern was written.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.outcome == GenerationOutcome::Fallback
    }
}

/// Room value of the deterministic fallback pattern.
///
/// Every fourth anti-diagonal heals by one, the diagonal just before it hurts
/// by one, and the rest are neutral, so any monotone path stays within one
/// point of its starting health.
#[must_use]
pub const fn fallback_value(row: u32, column: u32) -> i32 {
    match (row as u64 + column as u64) % 4 {
        0 => 1,
        3 => -1,
        _ => 0,
    }
}

/// Map generator that couples random filling with solver verification.
#[derive(Debug)]
pub struct MapGenerator {
    tuning: GenerationTuning,
    scratch: DpTable,
}

impl Default for MapGenerator {
    fn default() -> Self {
        Self::new(GenerationTuning::default())
    }
}

impl MapGenerator {
    /// Creates a new generator with the provided tuning surface.
    #[must_use]
    pub fn new(tuning: GenerationTuning) -> Self {
        Self {
            tuning,
            scratch: DpTable::new(GridDimensions::new(0, 0)),
        }
    }

    /// Tuning currently in force.
    #[must_use]
    pub fn tuning(&self) -> &GenerationTuning {
        &self.tuning
    }

    /// Returns a mutable reference to the tuning knobs.
    pub fn tuning_mut(&mut self) -> &mut GenerationTuning {
        &mut self.tuning
    }

    /// Fills `cells` (row-major, `dimensions` sized) with a verified map.
    ///
    /// Never fails: when no random attempt is accepted the fallback pattern is
    /// written instead.
    pub fn generate<R>(
        &mut self,
        dimensions: GridDimensions,
        cells: &mut [i32],
        rng: &mut R,
    ) -> GenerationReport
    where
        R: Rng + ?Sized,
    {
        let cell_count = dimensions.cell_count();
        let budget = self.tuning.attempt_budget(cell_count);
        let mut failures = Vec::new();

        for attempt in 1..=budget {
            match self.attempt(dimensions, cells, rng) {
                Ok(min_health) => {
                    tracing::info!(
                        rows = dimensions.rows(),
                        columns = dimensions.columns(),
                        attempt,
                        min_health,
                        "map generation accepted"
                    );
                    return GenerationReport {
                        attempts: attempt,
                        outcome: GenerationOutcome::Accepted { min_health },
                        failures,
                    };
                }
                Err(failure) => {
                    tracing::debug!(attempt, %failure, "map generation attempt failed");
                    failures.push(failure);
                }
            }
        }

        tracing::warn!(
            rows = dimensions.rows(),
            columns = dimensions.columns(),
            attempts = budget,
            "no random map accepted; writing fallback pattern"
        );
        write_fallback(dimensions, cells);

        GenerationReport {
            attempts: budget,
            outcome: GenerationOutcome::Fallback,
            failures,
        }
    }

    fn attempt<R>(
        &mut self,
        dimensions: GridDimensions,
        cells: &mut [i32],
        rng: &mut R,
    ) -> Result<u64, AttemptFailure>
    where
        R: Rng + ?Sized,
    {
        let cell_count = dimensions.cell_count();
        let band = *self
            .tuning
            .band_for(cell_count)
            .ok_or(AttemptFailure::NoBand { cell_count })?;
        if band.min > band.max {
            return Err(AttemptFailure::InvertedBand {
                min: band.min,
                max: band.max,
            });
        }

        let distribution = Uniform::new_inclusive(band.min, band.max);
        for cell in cells.iter_mut() {
            *cell = distribution.sample(rng);
        }

        if self.scratch.dimensions() != dimensions {
            self.scratch = DpTable::new(dimensions);
        }
        let min_health = solve_into(GridView::new(cells, dimensions), &mut self.scratch)?;

        let ceiling = self.tuning.health_ceiling(cell_count);
        if min_health == 0 || min_health > ceiling {
            return Err(AttemptFailure::Rejected {
                min_health,
                ceiling,
            });
        }

        Ok(min_health)
    }
}

/// Writes the deterministic fallback pattern into row-major storage.
pub fn write_fallback(dimensions: GridDimensions, cells: &mut [i32]) {
    let columns = dimensions.columns() as usize;
    if columns == 0 {
        return;
    }

    for (index, cell) in cells.iter_mut().enumerate() {
        let row = (index / columns) as u32;
        let column = (index % columns) as u32;
        *cell = fallback_value(row, column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bands_match_cell_count_thresholds() {
        let tuning = GenerationTuning::default();
        let range = |cells| {
            let band = tuning.band_for(cells).expect("band");
            (band.min, band.max)
        };

        assert_eq!(range(1), (-30, 15));
        assert_eq!(range(25), (-30, 15));
        assert_eq!(range(26), (-16, 8));
        assert_eq!(range(100), (-16, 8));
        assert_eq!(range(101), (-8, 4));
        assert_eq!(range(1_000), (-8, 4));
        assert_eq!(range(1_001), (-4, 2));
        assert_eq!(range(10_000), (-4, 2));
    }

    #[test]
    fn default_budgets_and_ceilings_switch_above_one_thousand_cells() {
        let tuning = GenerationTuning::default();

        assert_eq!(tuning.attempt_budget(1_000), 100);
        assert_eq!(tuning.attempt_budget(1_001), 10);
        assert_eq!(tuning.health_ceiling(25), 50);
        assert_eq!(tuning.health_ceiling(1_000), 2_000);
        assert_eq!(tuning.health_ceiling(1_001), 1_001);
        assert_eq!(tuning.health_ceiling(10_000), 10_000);
    }

    #[test]
    fn fallback_pattern_cycles_every_four_diagonals() {
        assert_eq!(fallback_value(0, 0), 1);
        assert_eq!(fallback_value(0, 1), 0);
        assert_eq!(fallback_value(1, 1), 0);
        assert_eq!(fallback_value(1, 2), -1);
        assert_eq!(fallback_value(2, 2), 1);
        assert_eq!(fallback_value(99, 99), 0);
    }

    #[test]
    fn validation_flags_unusable_tuning() {
        assert_eq!(GenerationTuning::default().validate(), Ok(()));

        let mut empty = GenerationTuning::default();
        empty.value_bands.clear();
        assert_eq!(empty.validate(), Err(TuningError::NoBands));

        let mut inverted = GenerationTuning::default();
        inverted.value_bands[1] = ValueBand::up_to(100, 5, -5);
        assert_eq!(
            inverted.validate(),
            Err(TuningError::InvertedBand {
                index: 1,
                min: 5,
                max: -5,
            })
        );

        let mut no_attempts = GenerationTuning::default();
        no_attempts.attempts.large_grid_attempts = 0;
        assert_eq!(no_attempts.validate(), Err(TuningError::ZeroAttemptBudget));
    }
}
