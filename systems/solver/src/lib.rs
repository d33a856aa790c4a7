#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure minimum-health solver.
//!
//! Every DP entry holds the smallest health a traveler must carry when
//! entering that room in order to reach the exit, moving only right or down,
//! without their health ever dropping to zero. Health is checked right after
//! each room's delta is applied, so the requirement for a room is
//! `max(1, best_next - value)`, where `best_next` is the cheaper of the two
//! successors (or `1` at the exit). The table is filled from the exit toward
//! the origin, and the origin entry is the minimum starting health.

use dungeon_path_core::{DpTable, GridView, SolveError};

/// Solves the grid into a freshly allocated table.
pub fn solve(grid: GridView<'_>) -> Result<DpTable, SolveError> {
    let mut table = DpTable::new(grid.dimensions());
    let _ = solve_into(grid, &mut table)?;
    Ok(table)
}

/// Solves the grid into the provided table and returns the minimum health.
///
/// Shapes are checked once up front; the recurrence then runs without
/// further bounds validation.
pub fn solve_into(grid: GridView<'_>, table: &mut DpTable) -> Result<u64, SolveError> {
    let dimensions = grid.dimensions();
    if dimensions.is_empty() {
        return Err(SolveError::EmptyGrid);
    }

    let cell_count = dimensions.cell_count();
    if table.dimensions() != dimensions
        || grid.cells().len() != cell_count
        || table.cells().len() != cell_count
    {
        return Err(SolveError::DimensionMismatch {
            grid: dimensions,
            table: table.dimensions(),
            cells: grid.cells().len(),
        });
    }

    let rows = dimensions.rows() as usize;
    let columns = dimensions.columns() as usize;
    let values = grid.cells();
    let dp = table.cells_mut();

    let exit = cell_count - 1;
    dp[exit] = entry_health(1, values[exit]);

    let last_row = (rows - 1) * columns;
    for column in (0..columns - 1).rev() {
        let index = last_row + column;
        dp[index] = entry_health(dp[index + 1], values[index]);
    }

    for row in (0..rows - 1).rev() {
        let index = row * columns + columns - 1;
        dp[index] = entry_health(dp[index + columns], values[index]);
    }

    for row in (0..rows - 1).rev() {
        for column in (0..columns - 1).rev() {
            let index = row * columns + column;
            let best_next = dp[index + columns].min(dp[index + 1]);
            dp[index] = entry_health(best_next, values[index]);
        }
    }

    Ok(dp[0])
}

/// Health required on entry to a room, given what the next room requires.
#[must_use]
pub fn entry_health(next_required: u64, value: i32) -> u64 {
    let required = i128::from(next_required) - i128::from(value);
    u64::try_from(required.max(1)).unwrap_or(u64::MAX)
}
