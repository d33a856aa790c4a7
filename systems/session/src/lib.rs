#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based manual play over a fixed grid.
//!
//! A session starts at the top-left room with the starting room's delta
//! already applied, then accepts moves until the player either dies or
//! reaches the exit alive. Refused moves leave the session untouched and are
//! reported through a `false` return rather than an error.

use std::str::FromStr;

use dungeon_path_core::{CellCoord, GridDimensions, GridView, SessionError, SessionState};

/// Moves offered to players in the reference game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// One room toward increasing column indices.
    Right,
    /// One room toward increasing row indices.
    Down,
}

impl Step {
    /// Column and row offsets of the step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }
}

impl FromStr for Step {
    type Err = ParseStepError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "r" | "right" => Ok(Self::Right),
            "d" | "down" => Ok(Self::Down),
            _ => Err(ParseStepError(value.trim().to_owned())),
        }
    }
}

/// Error returned when a move token is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown move '{0}'; expected R, D, RIGHT or DOWN")]
pub struct ParseStepError(String);

/// Mutable state of one manual play-through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSession {
    position: CellCoord,
    current_health: i64,
    initial_health: i64,
    history: Vec<CellCoord>,
    state: SessionState,
}

impl PlayerSession {
    /// Starts a session at the origin with the origin's delta applied.
    ///
    /// A damaging enough origin ends the session immediately as
    /// [`SessionState::Lost`].
    pub fn reset(grid: GridView<'_>, initial_health: i64) -> Result<Self, SessionError> {
        if initial_health <= 0 {
            return Err(SessionError::InvalidHealth {
                health: initial_health,
            });
        }

        let origin_value = grid
            .value(CellCoord::ORIGIN)
            .ok_or(SessionError::EmptyGrid)?;

        let mut session = Self {
            position: CellCoord::ORIGIN,
            current_health: initial_health.saturating_add(i64::from(origin_value)),
            initial_health,
            history: vec![CellCoord::ORIGIN],
            state: SessionState::Playing,
        };
        session.evaluate(grid.dimensions());
        Ok(session)
    }

    /// Room the player currently occupies.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Health after every entered room has been applied.
    #[must_use]
    pub const fn current_health(&self) -> i64 {
        self.current_health
    }

    /// Health the session was started with.
    #[must_use]
    pub const fn initial_health(&self) -> i64 {
        self.initial_health
    }

    /// Rooms visited so far, starting with the origin.
    #[must_use]
    pub fn history(&self) -> &[CellCoord] {
        &self.history
    }

    /// Current state of the session.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Reports whether a move by the offset would be accepted.
    #[must_use]
    pub fn can_move(&self, dimensions: GridDimensions, dx: i32, dy: i32) -> bool {
        self.destination(dimensions, dx, dy).is_some()
    }

    /// Moves the player, applies the entered room and re-evaluates the state.
    ///
    /// Returns `false` and leaves the session untouched when the move is
    /// refused.
    pub fn move_player(&mut self, grid: GridView<'_>, dx: i32, dy: i32) -> bool {
        let Some(destination) = self.destination(grid.dimensions(), dx, dy) else {
            return false;
        };
        let Some(value) = grid.value(destination) else {
            return false;
        };

        self.position = destination;
        self.history.push(destination);
        self.current_health = self.current_health.saturating_add(i64::from(value));
        self.evaluate(grid.dimensions());
        true
    }

    /// Convenience wrapper around [`PlayerSession::move_player`] for a [`Step`].
    pub fn step(&mut self, grid: GridView<'_>, step: Step) -> bool {
        let (dx, dy) = step.delta();
        self.move_player(grid, dx, dy)
    }

    fn destination(&self, dimensions: GridDimensions, dx: i32, dy: i32) -> Option<CellCoord> {
        if self.state != SessionState::Playing {
            return None;
        }
        self.position
            .offset(dx, dy)
            .filter(|cell| dimensions.contains(*cell))
    }

    fn evaluate(&mut self, dimensions: GridDimensions) {
        self.state = if self.current_health <= 0 {
            SessionState::Lost
        } else if dimensions.exit() == Some(self.position) {
            SessionState::Won
        } else {
            SessionState::Playing
        };

        if self.state.is_terminal() {
            tracing::info!(
                state = ?self.state,
                health = self.current_health,
                moves = self.history.len() - 1,
                "session ended"
            );
        }
    }
}
