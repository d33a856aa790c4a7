use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use dungeon_path_core::{Command, Event, SessionState};
use dungeon_path_system_session::Step;
use dungeon_path_world::{apply, query, World};

use crate::render::cell_label;

/// Parses a comma separated move list such as `R,D,down`.
pub(crate) fn parse_moves(moves: &str) -> Result<Vec<Step>> {
    moves
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<Step>()
                .with_context(|| format!("invalid move list '{moves}'"))
        })
        .collect()
}

/// Starts a session and applies the moves in order, stopping at a terminal state.
pub(crate) fn replay<W: Write>(
    world: &mut World,
    health: i64,
    steps: &[Step],
    out: &mut W,
) -> Result<SessionState> {
    let mut state = start(world, health, out)?;
    for (index, step) in steps.iter().enumerate() {
        if state.is_terminal() {
            writeln!(
                out,
                "session over; ignoring {} remaining move(s)",
                steps.len() - index
            )?;
            break;
        }
        state = advance(world, *step, out)?;
    }
    Ok(state)
}

/// Starts a session and reads one move per line until the session ends or `q`.
pub(crate) fn interactive<R: BufRead, W: Write>(
    world: &mut World,
    health: i64,
    input: R,
    out: &mut W,
) -> Result<SessionState> {
    let mut state = start(world, health, out)?;
    if state.is_terminal() {
        return Ok(state);
    }
    writeln!(out, "enter r (right), d (down) or q (quit)")?;

    for line in input.lines() {
        let line = line.context("failed to read move from stdin")?;
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        if token.eq_ignore_ascii_case("q") || token.eq_ignore_ascii_case("quit") {
            break;
        }
        match token.parse::<Step>() {
            Ok(step) => state = advance(world, step, out)?,
            Err(error) => writeln!(out, "{error}")?,
        }
        if state.is_terminal() {
            break;
        }
    }
    Ok(state)
}

fn start<W: Write>(world: &mut World, health: i64, out: &mut W) -> Result<SessionState> {
    let mut events = Vec::new();
    apply(
        world,
        Command::ResetGame {
            initial_health: health,
        },
        &mut events,
    )?;
    report(world, &events, out)
}

fn advance<W: Write>(world: &mut World, step: Step, out: &mut W) -> Result<SessionState> {
    let (dx, dy) = step.delta();
    let mut events = Vec::new();
    apply(world, Command::MovePlayer { dx, dy }, &mut events)?;
    report(world, &events, out)
}

fn report<W: Write>(world: &World, events: &[Event], out: &mut W) -> Result<SessionState> {
    for event in events {
        match event {
            Event::GameReset { health, state } => {
                writeln!(out, "start (0, 0)  health {health}  {state:?}")?;
            }
            Event::PlayerMoved { from, to, health } => writeln!(
                out,
                "{} -> {}  health {health}",
                cell_label(*from),
                cell_label(*to)
            )?,
            Event::MoveRejected { .. } => writeln!(out, "move refused")?,
            Event::SessionEnded { state } => match state {
                SessionState::Won => writeln!(out, "reached the exit alive")?,
                SessionState::Lost => writeln!(out, "the hero has fallen")?,
                SessionState::Playing => {}
            },
            _ => {}
        }
    }
    query::session_state(world).context("no session is running")
}
