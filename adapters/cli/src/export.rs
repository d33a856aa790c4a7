use std::io::{self, Write};

use dungeon_path_core::{GridDimensions, GridView};

/// File name used when the caller does not pick a destination.
pub(crate) fn default_file_name(dimensions: GridDimensions) -> String {
    format!("map_{}x{}.csv", dimensions.rows(), dimensions.columns())
}

/// Writes the grid as a comma separated table.
///
/// The table opens with `#` metadata lines and a blank line, followed by a
/// line of column indices and one line per grid row.
pub(crate) fn write_table<W: Write>(
    out: &mut W,
    grid: GridView<'_>,
    min_health: u64,
) -> io::Result<()> {
    let dimensions = grid.dimensions();
    let rows = dimensions.rows();
    let columns = dimensions.columns();

    writeln!(out, "# Map data")?;
    writeln!(out, "# Size: {rows}x{columns}")?;
    writeln!(out, "# Minimum initial health: {min_health}")?;
    writeln!(
        out,
        "# Start: (0,0), End: ({},{})",
        rows.saturating_sub(1),
        columns.saturating_sub(1)
    )?;
    writeln!(out)?;

    writeln!(out, "{}", join((0..columns).map(|column| column.to_string())))?;
    for row in 0..rows {
        if let Some(values) = grid.row(row) {
            writeln!(out, "{}", join(values.iter().map(i32::to_string)))?;
        }
    }
    Ok(())
}

fn join(fields: impl Iterator<Item = String>) -> String {
    fields.collect::<Vec<_>>().join(",")
}
