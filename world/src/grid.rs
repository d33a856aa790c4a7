use dungeon_path_core::{DpTable, GridDimensions, GridError, GridLimits, GridView};

const INITIAL_DIMENSIONS: GridDimensions = GridDimensions::new(5, 5);

/// Owns the room values and their paired DP table.
///
/// Both matrices always share the same dimensions; resizing is the only
/// point where either is reallocated.
#[derive(Clone, Debug)]
pub struct GridStore {
    dimensions: GridDimensions,
    cells: Vec<i32>,
    table: DpTable,
    limits: GridLimits,
}

impl GridStore {
    /// Creates a zero-filled 5x5 store governed by the provided limits.
    #[must_use]
    pub fn new(limits: GridLimits) -> Self {
        Self {
            dimensions: INITIAL_DIMENSIONS,
            cells: vec![0; INITIAL_DIMENSIONS.cell_count()],
            table: DpTable::new(INITIAL_DIMENSIONS),
            limits,
        }
    }

    /// Reallocates both matrices zero-filled, discarding every prior value.
    pub fn set_size(&mut self, rows: u32, columns: u32) -> Result<(), GridError> {
        let dimensions = self.limits.check(rows, columns)?;

        self.cells = vec![0; dimensions.cell_count()];
        self.table = DpTable::new(dimensions);
        self.dimensions = dimensions;
        debug_assert_eq!(self.table.dimensions(), self.dimensions);
        debug_assert_eq!(self.cells.len(), self.table.cells().len());

        tracing::info!(rows, columns, "grid resized");
        Ok(())
    }

    /// Dimensions shared by the grid and its DP table.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Limits applied on every resize.
    #[must_use]
    pub const fn limits(&self) -> GridLimits {
        self.limits
    }

    /// Value stored at the provided row and column.
    pub fn value(&self, row: u32, column: u32) -> Result<i32, GridError> {
        let index = self.index(row, column)?;
        Ok(self.cells[index])
    }

    /// Overwrites the value at the provided row and column.
    ///
    /// The DP table no longer describes the grid afterwards and is marked
    /// unsolved.
    pub fn set_value(&mut self, row: u32, column: u32, value: i32) -> Result<(), GridError> {
        let index = self.index(row, column)?;
        self.cells[index] = value;
        self.table.invalidate();
        Ok(())
    }

    /// Read-only view over the room values.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.dimensions)
    }

    /// Paired DP table; meaningful only once solved.
    #[must_use]
    pub fn table(&self) -> &DpTable {
        &self.table
    }

    /// Splits the store into the grid view and the DP table for solving.
    pub(crate) fn solve_parts(&mut self) -> (GridView<'_>, &mut DpTable) {
        (GridView::new(&self.cells, self.dimensions), &mut self.table)
    }

    /// Hands out the raw values for a bulk rewrite and marks the table unsolved.
    pub(crate) fn fill_parts(&mut self) -> (GridDimensions, &mut [i32]) {
        self.table.invalidate();
        (self.dimensions, &mut self.cells)
    }

    fn index(&self, row: u32, column: u32) -> Result<usize, GridError> {
        self.dimensions
            .index(dungeon_path_core::CellCoord::new(column, row))
            .ok_or(GridError::Index {
                row,
                column,
                rows: self.dimensions.rows(),
                columns: self.dimensions.columns(),
            })
    }
}
