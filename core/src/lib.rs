#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the dungeon path engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world, and the pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes them through its
//! `apply` entry point and reports [`Event`] values describing what changed.
//! Systems never own the grid; they receive a read-only [`GridView`] and, where
//! they compute something, write into caller-provided storage such as a
//! [`DpTable`].

use std::mem::size_of;

use serde::{Deserialize, Serialize};

/// Largest row or column count accepted by default.
pub const DEFAULT_MAX_DIMENSION: u32 = 100;

/// Default ceiling on the memory reserved for a grid and its DP table.
pub const DEFAULT_MEMORY_CEILING_BYTES: u64 = 500 * 1024 * 1024;

/// Bytes reserved per cell, counting the room value and its DP entry.
pub const BYTES_PER_CELL: u64 = (size_of::<i32>() + size_of::<u64>()) as u64;

/// Sentinel stored in a [`DpTable`] entry that has not been solved yet.
pub const UNSET_HEALTH: u64 = 0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Reallocates the grid and DP table, discarding every prior value.
    ConfigureGrid {
        /// Number of rows in the new grid.
        rows: u32,
        /// Number of columns in the new grid.
        columns: u32,
    },
    /// Overwrites the health delta stored in a single room.
    SetRoom {
        /// Room receiving the new value.
        cell: CellCoord,
        /// Signed health delta applied when the room is entered.
        value: i32,
    },
    /// Fills the grid with a verified-solvable map.
    GenerateMap {
        /// Seed for the random source; `None` draws a fresh seed.
        seed: Option<u64>,
    },
    /// Solves the DP table and reports the minimum starting health.
    CalculateMinHealth,
    /// Reconstructs the canonical optimal path, solving first if stale.
    ComputeOptimalPath,
    /// Starts a new manual session at the top-left room.
    ResetGame {
        /// Health the player starts with before the first room applies.
        initial_health: i64,
    },
    /// Moves the player by the provided offset.
    MovePlayer {
        /// Column offset of the move.
        dx: i32,
        /// Row offset of the move.
        dy: i32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was reallocated with new dimensions.
    GridConfigured {
        /// Dimensions of the freshly allocated grid.
        dimensions: GridDimensions,
    },
    /// Confirms that a single room value changed.
    RoomChanged {
        /// Room that changed.
        cell: CellCoord,
        /// Value now stored in the room.
        value: i32,
    },
    /// Reports the outcome of a map generation run.
    MapGenerated {
        /// Number of random attempts consumed.
        attempts: u32,
        /// Indicates whether the deterministic fallback pattern was written.
        fallback: bool,
    },
    /// Reports the minimum starting health for the current grid.
    MinHealthCalculated {
        /// Smallest starting health that survives to the exit.
        min_health: u64,
    },
    /// Reports that the optimal path was reconstructed.
    OptimalPathComputed {
        /// Number of rooms on the path, including start and exit.
        length: usize,
    },
    /// Confirms that a manual session started.
    GameReset {
        /// Health after the starting room was applied.
        health: i64,
        /// State of the session immediately after the reset.
        state: SessionState,
    },
    /// Confirms that the player entered a new room.
    PlayerMoved {
        /// Room the player left.
        from: CellCoord,
        /// Room the player entered.
        to: CellCoord,
        /// Health after the entered room was applied.
        health: i64,
    },
    /// Reports that a move was refused without changing the session.
    MoveRejected {
        /// Column offset of the refused move.
        dx: i32,
        /// Row offset of the refused move.
        dy: i32,
    },
    /// Announces that the session reached a terminal state.
    SessionEnded {
        /// Terminal state that was reached.
        state: SessionState,
    },
}

/// Location of a single room expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Top-left room where every traversal starts.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Applies a signed offset, returning `None` when either axis leaves `u32`.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(Self::new(column, row))
    }

    /// Reports whether `next` lies exactly one step right or one step down.
    #[must_use]
    pub fn is_forward_step_to(self, next: CellCoord) -> bool {
        let right = next.row == self.row && next.column == self.column.wrapping_add(1);
        let down = next.column == self.column && next.row == self.row.wrapping_add(1);
        right || down
    }
}

/// Row and column counts of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    rows: u32,
    columns: u32,
}

impl GridDimensions {
    /// Creates a new dimension descriptor. No validation is performed.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of rooms.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.rows) * u64::from(self.columns);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether either axis is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Bottom-right room, or `None` for an empty grid.
    #[must_use]
    pub const fn exit(&self) -> Option<CellCoord> {
        if self.is_empty() {
            None
        } else {
            Some(CellCoord::new(self.columns - 1, self.rows - 1))
        }
    }

    /// Row-major storage index of the cell.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Limits applied whenever a grid is (re)allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLimits {
    /// Largest accepted row or column count.
    pub max_dimension: u32,
    /// Largest number of bytes the grid and DP table may reserve together.
    pub memory_ceiling_bytes: u64,
}

impl GridLimits {
    /// Estimated bytes reserved by a grid of the provided size.
    #[must_use]
    pub fn required_bytes(rows: u32, columns: u32) -> u64 {
        u64::from(rows)
            .saturating_mul(u64::from(columns))
            .saturating_mul(BYTES_PER_CELL)
    }

    /// Validates a requested grid size against these limits.
    pub fn check(&self, rows: u32, columns: u32) -> Result<GridDimensions, GridError> {
        if rows == 0 || columns == 0 || rows > self.max_dimension || columns > self.max_dimension
        {
            return Err(GridError::InvalidSize {
                rows,
                columns,
                max: self.max_dimension,
            });
        }

        let required_bytes = Self::required_bytes(rows, columns);
        if required_bytes > self.memory_ceiling_bytes {
            return Err(GridError::Capacity {
                required_bytes,
                ceiling_bytes: self.memory_ceiling_bytes,
            });
        }

        Ok(GridDimensions::new(rows, columns))
    }
}

impl Default for GridLimits {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            memory_ceiling_bytes: DEFAULT_MEMORY_CEILING_BYTES,
        }
    }
}

/// Read-only view over the room values of a grid, stored row-major.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [i32],
    dimensions: GridDimensions,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided row-major slice.
    #[must_use]
    pub const fn new(cells: &'a [i32], dimensions: GridDimensions) -> Self {
        Self { cells, dimensions }
    }

    /// Dimensions the view claims to cover.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Raw row-major room values.
    #[must_use]
    pub const fn cells(&self) -> &'a [i32] {
        self.cells
    }

    /// Value of the room at the provided cell.
    #[must_use]
    pub fn value(&self, cell: CellCoord) -> Option<i32> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Values of a single row.
    #[must_use]
    pub fn row(&self, row: u32) -> Option<&'a [i32]> {
        let width = usize::try_from(self.dimensions.columns()).ok()?;
        let start = usize::try_from(row).ok()?.checked_mul(width)?;
        if row >= self.dimensions.rows() {
            return None;
        }
        self.cells.get(start..start + width)
    }
}

/// Per-room memo of the health required on entry to survive to the exit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpTable {
    dimensions: GridDimensions,
    cells: Vec<u64>,
}

impl DpTable {
    /// Allocates an unsolved table with the provided dimensions.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![UNSET_HEALTH; dimensions.cell_count()],
        }
    }

    /// Dimensions of the table.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Raw row-major entries. Unsolved entries hold [`UNSET_HEALTH`].
    #[must_use]
    pub fn cells(&self) -> &[u64] {
        &self.cells
    }

    /// Mutable row-major entries, used by solvers to fill the table.
    pub fn cells_mut(&mut self) -> &mut [u64] {
        &mut self.cells
    }

    /// Entry for a single room, or `None` when out of bounds or unsolved.
    #[must_use]
    pub fn required_health(&self, cell: CellCoord) -> Option<u64> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .filter(|value| *value != UNSET_HEALTH)
    }

    /// Entries of a single row.
    #[must_use]
    pub fn row(&self, row: u32) -> Option<&[u64]> {
        if row >= self.dimensions.rows() {
            return None;
        }
        let width = usize::try_from(self.dimensions.columns()).ok()?;
        let start = usize::try_from(row).ok()?.checked_mul(width)?;
        self.cells.get(start..start + width)
    }

    /// Reports whether the table holds a complete solution.
    ///
    /// Solvers fill the table from the exit toward the origin, so the origin
    /// entry is the last one written.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.min_health().is_some()
    }

    /// Solved origin entry, which is the minimum starting health.
    #[must_use]
    pub fn min_health(&self) -> Option<u64> {
        self.cells.first().copied().filter(|value| *value != UNSET_HEALTH)
    }

    /// Marks every entry as unsolved.
    pub fn invalidate(&mut self) {
        self.cells.fill(UNSET_HEALTH);
    }
}

/// Ordered sequence of rooms from the origin toward the exit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Wraps the provided cells without validation.
    #[must_use]
    pub fn from_cells(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    /// Rooms in traversal order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of rooms on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the path holds no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the path visits the provided room.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// First room of the path.
    #[must_use]
    pub fn first(&self) -> Option<CellCoord> {
        self.cells.first().copied()
    }

    /// Last room of the path.
    #[must_use]
    pub fn last(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Reports whether every step moves exactly one room right or down.
    #[must_use]
    pub fn is_monotone(&self) -> bool {
        self.cells
            .windows(2)
            .all(|pair| pair[0].is_forward_step_to(pair[1]))
    }
}

/// State of a manual play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// The player may still move.
    Playing,
    /// The player reached the exit alive.
    Won,
    /// The player's health dropped to zero or below.
    Lost,
}

impl SessionState {
    /// Reports whether no further moves are accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Facts about a single room that a presentation layer needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellFacts {
    /// Health delta stored in the room.
    pub value: i32,
    /// Indicates whether the room lies on the last computed optimal path.
    pub on_optimal_path: bool,
    /// Indicates whether the player visited the room in the current session.
    pub on_player_path: bool,
    /// Indicates whether the room is the top-left start.
    pub is_start: bool,
    /// Indicates whether the room is the bottom-right exit.
    pub is_end: bool,
}

/// Reasons a grid allocation or room access may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A dimension was zero or above the configured maximum.
    #[error("grid size {rows}x{columns} is invalid; both sides must be within 1..={max}")]
    InvalidSize {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
        /// Largest accepted row or column count.
        max: u32,
    },
    /// The allocation would exceed the memory ceiling.
    #[error("grid needs {required_bytes} bytes, above the {ceiling_bytes} byte ceiling")]
    Capacity {
        /// Estimated bytes for the grid and its DP table.
        required_bytes: u64,
        /// Configured ceiling.
        ceiling_bytes: u64,
    },
    /// A room index fell outside the grid.
    #[error("room ({row}, {column}) is outside the {rows}x{columns} grid")]
    Index {
        /// Requested row.
        row: u32,
        /// Requested column.
        column: u32,
        /// Number of rows in the grid.
        rows: u32,
        /// Number of columns in the grid.
        columns: u32,
    },
}

/// Reasons the minimum-health solver may refuse to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    /// The grid has zero rows or zero columns.
    #[error("cannot solve an empty grid")]
    EmptyGrid,
    /// The grid, its storage, and the DP table disagree on shape.
    #[error("grid shape {grid:?} does not match DP table shape {table:?} ({cells} cells stored)")]
    DimensionMismatch {
        /// Dimensions claimed by the grid view.
        grid: GridDimensions,
        /// Dimensions of the DP table.
        table: GridDimensions,
        /// Number of room values actually stored.
        cells: usize,
    },
}

/// Reasons a manual session may fail to start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The starting health was zero or negative.
    #[error("initial health must be positive, got {health}")]
    InvalidHealth {
        /// Rejected starting health.
        health: i64,
    },
    /// The grid has no starting room.
    #[error("cannot start a session on an empty grid")]
    EmptyGrid,
}

/// Any failure surfaced by the world's command entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Grid allocation or room access failed.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The solver refused to run.
    #[error(transparent)]
    Solve(#[from] SolveError),
    /// A manual session could not be started.
    #[error(transparent)]
    Session(#[from] SessionError),
}
