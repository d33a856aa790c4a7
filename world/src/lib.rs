#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative engine state for the dungeon path puzzle.
//!
//! The world owns the grid, its DP table, the most recently reconstructed
//! optimal path and at most one manual session. Every mutation goes through
//! either a [`World`] method or [`apply`]; the pure systems only ever see
//! borrowed views of the state held here.

mod config;
mod grid;

use dungeon_path_core::{
    Command, EngineError, Event, GridError, GridLimits, Path, SessionError, SolveError,
};
use dungeon_path_system_generation::MapGenerator;
use dungeon_path_system_session::PlayerSession;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use config::{WorldConfig, DEFAULT_INITIAL_HEALTH};
pub use dungeon_path_system_generation::GenerationReport;
pub use grid::GridStore;

/// Represents one engine instance.
#[derive(Debug)]
pub struct World {
    grid: GridStore,
    generator: MapGenerator,
    optimal_path: Option<Path>,
    session: Option<PlayerSession>,
    default_initial_health: i64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a 5x5 zero-filled world with default limits and tuning.
    #[must_use]
    pub fn new() -> Self {
        let config = WorldConfig::default();
        Self {
            grid: GridStore::new(config.limits),
            generator: MapGenerator::new(config.tuning),
            optimal_path: None,
            session: None,
            default_initial_health: config.default_initial_health,
        }
    }

    /// Creates a world from a configuration, sizing the grid as requested.
    pub fn with_config(config: WorldConfig) -> Result<Self, GridError> {
        let mut world = Self {
            grid: GridStore::new(config.limits),
            generator: MapGenerator::new(config.tuning),
            optimal_path: None,
            session: None,
            default_initial_health: config.default_initial_health,
        };
        world.set_size(config.initial_rows, config.initial_columns)?;
        Ok(world)
    }

    /// Health manual play starts with when the caller does not pick one.
    #[must_use]
    pub const fn default_initial_health(&self) -> i64 {
        self.default_initial_health
    }

    /// Reallocates the grid, dropping the cached path and any session.
    ///
    /// A rejected size leaves the world untouched.
    pub fn set_size(&mut self, rows: u32, columns: u32) -> Result<(), GridError> {
        self.grid.set_size(rows, columns)?;
        self.optimal_path = None;
        self.session = None;
        Ok(())
    }

    /// Value stored in a single room.
    pub fn value(&self, row: u32, column: u32) -> Result<i32, GridError> {
        self.grid.value(row, column)
    }

    /// Overwrites a single room, marking the solution stale.
    ///
    /// A running session keeps its position and health.
    pub fn set_value(&mut self, row: u32, column: u32, value: i32) -> Result<(), GridError> {
        self.grid.set_value(row, column, value)?;
        self.optimal_path = None;
        Ok(())
    }

    /// Fills the grid with a verified map, drawing a fresh seed when none is given.
    pub fn generate(&mut self, seed: Option<u64>) -> GenerationReport {
        let seed = seed.unwrap_or_else(rand::random);
        tracing::debug!(seed, "generating map");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate_with(&mut rng)
    }

    /// Fills the grid with a verified map drawn from the provided random source.
    pub fn generate_with<R>(&mut self, rng: &mut R) -> GenerationReport
    where
        R: Rng + ?Sized,
    {
        let (dimensions, cells) = self.grid.fill_parts();
        let report = self.generator.generate(dimensions, cells, rng);
        self.optimal_path = None;
        self.session = None;
        report
    }

    /// Minimum starting health for the current grid.
    ///
    /// Solves only when the table is stale, so repeated calls are cheap and
    /// return the same value.
    pub fn calculate_min_health(&mut self) -> Result<u64, SolveError> {
        if let Some(min_health) = self.grid.table().min_health() {
            return Ok(min_health);
        }
        let (view, table) = self.grid.solve_parts();
        dungeon_path_system_solver::solve_into(view, table)
    }

    /// Reconstructs the canonical optimal path and caches it for queries.
    pub fn optimal_path(&mut self) -> Result<Path, SolveError> {
        let (view, table) = self.grid.solve_parts();
        let path = dungeon_path_system_pathing::reconstruct(view, table)?;
        self.optimal_path = Some(path.clone());
        Ok(path)
    }

    /// Starts a new manual session, replacing any previous one.
    pub fn reset_game(&mut self, initial_health: i64) -> Result<&PlayerSession, SessionError> {
        let session = PlayerSession::reset(self.grid.view(), initial_health)?;
        Ok(&*self.session.insert(session))
    }

    /// Reports whether the running session would accept the move.
    #[must_use]
    pub fn can_move(&self, dx: i32, dy: i32) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.can_move(self.grid.dimensions(), dx, dy))
    }

    /// Moves the player of the running session.
    ///
    /// Returns `false` when there is no session or the move is refused.
    pub fn move_player(&mut self, dx: i32, dy: i32) -> bool {
        let view = self.grid.view();
        self.session
            .as_mut()
            .is_some_and(|session| session.move_player(view, dx, dy))
    }

    /// Limits the grid is validated against.
    #[must_use]
    pub const fn limits(&self) -> GridLimits {
        self.grid.limits()
    }
}

/// Applies the provided command to the world, reporting what changed.
///
/// Refused moves are reported as [`Event::MoveRejected`] and are not errors.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    match command {
        Command::ConfigureGrid { rows, columns } => {
            world.set_size(rows, columns)?;
            out_events.push(Event::GridConfigured {
                dimensions: world.grid.dimensions(),
            });
        }
        Command::SetRoom { cell, value } => {
            world.set_value(cell.row(), cell.column(), value)?;
            out_events.push(Event::RoomChanged { cell, value });
        }
        Command::GenerateMap { seed } => {
            let report = world.generate(seed);
            out_events.push(Event::MapGenerated {
                attempts: report.attempts,
                fallback: report.used_fallback(),
            });
        }
        Command::CalculateMinHealth => {
            let min_health = world.calculate_min_health()?;
            out_events.push(Event::MinHealthCalculated { min_health });
        }
        Command::ComputeOptimalPath => {
            let path = world.optimal_path()?;
            out_events.push(Event::OptimalPathComputed { length: path.len() });
        }
        Command::ResetGame { initial_health } => {
            let session = world.reset_game(initial_health)?;
            out_events.push(Event::GameReset {
                health: session.current_health(),
                state: session.state(),
            });
        }
        Command::MovePlayer { dx, dy } => {
            let from = query::player_position(world);
            if !world.move_player(dx, dy) {
                out_events.push(Event::MoveRejected { dx, dy });
                return Ok(());
            }

            if let (Some(from), Some(session)) = (from, world.session.as_ref()) {
                out_events.push(Event::PlayerMoved {
                    from,
                    to: session.position(),
                    health: session.current_health(),
                });
                if session.state().is_terminal() {
                    out_events.push(Event::SessionEnded {
                        state: session.state(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use dungeon_path_core::{
        CellCoord, CellFacts, DpTable, GridDimensions, GridView, Path, SessionState,
    };
    use dungeon_path_system_session::PlayerSession;

    /// Dimensions of the current grid.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.grid.dimensions()
    }

    /// Read-only view over the room values.
    #[must_use]
    pub fn grid(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// DP table paired with the grid; all entries are unset while stale.
    #[must_use]
    pub fn dp_table(world: &World) -> &DpTable {
        world.grid.table()
    }

    /// Minimum health from the last solve, if the table is current.
    #[must_use]
    pub fn min_health(world: &World) -> Option<u64> {
        world.grid.table().min_health()
    }

    /// Optimal path reconstructed since the last grid change.
    #[must_use]
    pub fn optimal_path(world: &World) -> Option<&Path> {
        world.optimal_path.as_ref()
    }

    /// Running manual session, if one was started.
    #[must_use]
    pub fn session(world: &World) -> Option<&PlayerSession> {
        world.session.as_ref()
    }

    /// Room the player currently occupies.
    #[must_use]
    pub fn player_position(world: &World) -> Option<CellCoord> {
        world.session.as_ref().map(PlayerSession::position)
    }

    /// Player's current health.
    #[must_use]
    pub fn current_health(world: &World) -> Option<i64> {
        world.session.as_ref().map(PlayerSession::current_health)
    }

    /// State of the running session.
    #[must_use]
    pub fn session_state(world: &World) -> Option<SessionState> {
        world.session.as_ref().map(PlayerSession::state)
    }

    /// Rooms the player has visited, empty when no session is running.
    #[must_use]
    pub fn player_path(world: &World) -> &[CellCoord] {
        world
            .session
            .as_ref()
            .map(PlayerSession::history)
            .unwrap_or_default()
    }

    /// Presentation facts for one room; `None` outside the grid.
    #[must_use]
    pub fn cell_facts(world: &World, cell: CellCoord) -> Option<CellFacts> {
        let value = world.grid.view().value(cell)?;
        let dimensions = world.grid.dimensions();

        Some(CellFacts {
            value,
            on_optimal_path: world
                .optimal_path
                .as_ref()
                .is_some_and(|path| path.contains(cell)),
            on_player_path: player_path(world).contains(&cell),
            is_start: cell == CellCoord::ORIGIN,
            is_end: dimensions.exit() == Some(cell),
        })
    }
}
