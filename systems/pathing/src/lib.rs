#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy reconstruction of the canonical optimal path from a solved DP table.

use dungeon_path_core::{CellCoord, DpTable, GridView, Path, SolveError};
use dungeon_path_system_solver::solve_into;

/// Walks the table from the origin to the exit and returns the visited rooms.
///
/// On the last row the walk always moves right and on the last column it
/// always moves down. Elsewhere it moves toward the successor with the smaller
/// requirement, preferring down when both are equal, so a given grid always
/// yields the same path. An unsolved table is solved first; a table whose
/// shape disagrees with the grid or with its own storage is rejected.
pub fn reconstruct(grid: GridView<'_>, table: &mut DpTable) -> Result<Path, SolveError> {
    let cell_count = grid.dimensions().cell_count();
    if table.dimensions() != grid.dimensions()
        || table.cells().len() != cell_count
        || grid.cells().len() != cell_count
    {
        return Err(SolveError::DimensionMismatch {
            grid: grid.dimensions(),
            table: table.dimensions(),
            cells: grid.cells().len(),
        });
    }
    if !table.is_solved() {
        let _ = solve_into(grid, table)?;
    }

    let dimensions = table.dimensions();
    let columns = dimensions.columns() as usize;
    let last_row = dimensions.rows() - 1;
    let last_column = dimensions.columns() - 1;
    let dp = table.cells();

    let length = (dimensions.rows() + dimensions.columns() - 1) as usize;
    let mut cells = Vec::with_capacity(length);
    let (mut row, mut column) = (0u32, 0u32);

    loop {
        cells.push(CellCoord::new(column, row));

        if row == last_row && column == last_column {
            break;
        }

        if row == last_row {
            column += 1;
        } else if column == last_column {
            row += 1;
        } else {
            let index = row as usize * columns + column as usize;
            if dp[index + columns] <= dp[index + 1] {
                row += 1;
            } else {
                column += 1;
            }
        }
    }

    Ok(Path::from_cells(cells))
}
