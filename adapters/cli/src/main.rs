#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for the dungeon path engine.

mod config;
mod export;
mod play;
mod render;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dungeon_path_world::{query, World};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Minimum-health dungeon path puzzle.
#[derive(Debug, Parser)]
#[command(name = "dungeon-path", version)]
struct Cli {
    /// TOML file overriding grid limits, generation tuning and defaults
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Generate a map and print its minimum health and optimal path
    Solve(SolveArgs),
    /// Play a generated map from a move list or interactively
    Play(PlayArgs),
    /// Generate a map and write it as a CSV table
    Export(ExportArgs),
}

/// Options shared by every subcommand that builds a map.
#[derive(Debug, Args)]
struct MapArgs {
    /// Number of rows; defaults to the configured initial grid
    #[arg(long)]
    rows: Option<u32>,

    /// Number of columns; defaults to the configured initial grid
    #[arg(long)]
    columns: Option<u32>,

    /// Seed for map generation; a fresh seed is drawn when omitted
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct SolveArgs {
    #[command(flatten)]
    map: MapArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct PlayArgs {
    #[command(flatten)]
    map: MapArgs,

    /// Starting health; defaults to the configured value
    #[arg(long)]
    health: Option<i64>,

    /// Comma separated moves (R, D, RIGHT, DOWN); read from stdin when omitted
    #[arg(long, value_name = "MOVES")]
    moves: Option<String>,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[command(flatten)]
    map: MapArgs,

    /// Destination file; defaults to map_<rows>x<columns>.csv
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Human readable summary with the grid drawn
    Text,
    /// Machine readable JSON summary
    Json,
}

#[derive(Debug, Serialize)]
struct SolveSummary {
    rows: u32,
    columns: u32,
    min_health: u64,
    generation_attempts: u32,
    used_fallback: bool,
    path: Vec<RoomLabel>,
    grid: Vec<Vec<i32>>,
}

#[derive(Debug, Serialize)]
struct RoomLabel {
    row: u32,
    column: u32,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;
    let mut world = World::with_config(config).context("invalid initial grid in config")?;

    match cli.command {
        CliCommand::Solve(args) => solve(&mut world, &args),
        CliCommand::Play(args) => {
            let _ = prepare_map(&mut world, &args.map)?;
            let health = args
                .health
                .unwrap_or_else(|| world.default_initial_health());
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match args.moves.as_deref() {
                Some(moves) => {
                    let steps = play::parse_moves(moves)?;
                    let _ = play::replay(&mut world, health, &steps, &mut out)?;
                }
                None => {
                    let stdin = io::stdin();
                    let _ = play::interactive(&mut world, health, stdin.lock(), &mut out)?;
                }
            }
            Ok(())
        }
        CliCommand::Export(args) => {
            let _ = prepare_map(&mut world, &args.map)?;
            let min_health = world.calculate_min_health()?;
            let dimensions = query::dimensions(&world);
            let path = args.out.unwrap_or_else(|| {
                PathBuf::from(export::default_file_name(dimensions))
            });
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            export::write_table(&mut writer, query::grid(&world), min_health)
                .and_then(|()| writer.flush())
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "map exported");
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Resizes the grid when requested and fills it with a generated map.
fn prepare_map(
    world: &mut World,
    args: &MapArgs,
) -> Result<dungeon_path_world::GenerationReport> {
    if args.rows.is_some() || args.columns.is_some() {
        let current = query::dimensions(world);
        let rows = args.rows.unwrap_or(current.rows());
        let columns = args.columns.unwrap_or(current.columns());
        world.set_size(rows, columns)?;
    }
    Ok(world.generate(args.seed))
}

fn solve(world: &mut World, args: &SolveArgs) -> Result<()> {
    let report = prepare_map(world, &args.map)?;
    let min_health = world.calculate_min_health()?;
    let path = world.optimal_path()?;
    let grid = query::grid(world);
    let dimensions = grid.dimensions();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => {
            writeln!(out, "grid: {}x{}", dimensions.rows(), dimensions.columns())?;
            writeln!(out, "minimum health: {min_health}")?;
            writeln!(out, "path length: {}", path.len())?;
            writeln!(out, "path (row, column): {}", render::path_line(&path))?;
            writeln!(out)?;
            write!(out, "{}", render::grid_with_path(grid, &path))?;
        }
        OutputFormat::Json => {
            let summary = SolveSummary {
                rows: dimensions.rows(),
                columns: dimensions.columns(),
                min_health,
                generation_attempts: report.attempts,
                used_fallback: report.used_fallback(),
                path: path
                    .cells()
                    .iter()
                    .map(|cell| RoomLabel {
                        row: cell.row(),
                        column: cell.column(),
                    })
                    .collect(),
                grid: (0..dimensions.rows())
                    .filter_map(|row| grid.row(row).map(<[i32]>::to_vec))
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut out, &summary)
                .context("failed to encode solve summary")?;
            writeln!(out)?;
        }
    }
    Ok(())
}
