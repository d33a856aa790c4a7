use dungeon_path_core::{CellCoord, GridView, Path};

/// Formats a room as `(row, column)`.
pub(crate) fn cell_label(cell: CellCoord) -> String {
    format!("({}, {})", cell.row(), cell.column())
}

pub(crate) fn path_line(path: &Path) -> String {
    path.cells()
        .iter()
        .map(|cell| cell_label(*cell))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Draws the grid one row per line with rooms on the path bracketed.
pub(crate) fn grid_with_path(grid: GridView<'_>, path: &Path) -> String {
    let width = grid
        .cells()
        .iter()
        .map(|value| value.to_string().len())
        .max()
        .unwrap_or(1);
    let dimensions = grid.dimensions();

    let mut drawing = String::new();
    for row in 0..dimensions.rows() {
        for column in 0..dimensions.columns() {
            let cell = CellCoord::new(column, row);
            let Some(value) = grid.value(cell) else {
                continue;
            };
            if path.contains(cell) {
                drawing.push_str(&format!("[{value:>width$}]"));
            } else {
                drawing.push_str(&format!(" {value:>width$} "));
            }
        }
        drawing.push('\n');
    }
    drawing
}
