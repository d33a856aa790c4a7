use dungeon_path_core::{
    CellCoord, Command, EngineError, Event, GridDimensions, GridError, SessionError, SessionState,
};
use dungeon_path_world::{apply, query, World, WorldConfig};

fn run(world: &mut World, commands: &[Command]) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        apply(world, *command, &mut events).expect("command succeeds");
    }
    events
}

fn reference_world() -> World {
    let mut world = World::new();
    let _ = run(
        &mut world,
        &[
            Command::ConfigureGrid { rows: 2, columns: 2 },
            Command::SetRoom {
                cell: CellCoord::new(0, 0),
                value: -2,
            },
            Command::SetRoom {
                cell: CellCoord::new(1, 0),
                value: -3,
            },
            Command::SetRoom {
                cell: CellCoord::new(0, 1),
                value: -5,
            },
            Command::SetRoom {
                cell: CellCoord::new(1, 1),
                value: -10,
            },
        ],
    );
    world
}

fn moves_along(cells: &[CellCoord]) -> Vec<Command> {
    cells
        .windows(2)
        .map(|pair| Command::MovePlayer {
            dx: pair[1].column() as i32 - pair[0].column() as i32,
            dy: pair[1].row() as i32 - pair[0].row() as i32,
        })
        .collect()
}

#[test]
fn configure_grid_reports_zeroed_dimensions() {
    let mut world = World::new();

    for (rows, columns) in [(1, 1), (1, 100), (100, 1), (17, 42), (100, 100)] {
        let events = run(&mut world, &[Command::ConfigureGrid { rows, columns }]);

        let dimensions = GridDimensions::new(rows, columns);
        assert_eq!(events, vec![Event::GridConfigured { dimensions }]);
        assert_eq!(query::grid(&world).cells().len(), dimensions.cell_count());
        assert_eq!(query::dp_table(&world).cells().len(), dimensions.cell_count());
        assert!(query::grid(&world).cells().iter().all(|value| *value == 0));
    }
}

#[test]
fn reference_grid_solves_and_reconstructs() {
    let mut world = reference_world();

    let events = run(
        &mut world,
        &[Command::CalculateMinHealth, Command::ComputeOptimalPath],
    );

    assert_eq!(
        events,
        vec![
            Event::MinHealthCalculated { min_health: 16 },
            Event::OptimalPathComputed { length: 3 },
        ]
    );
    let table = query::dp_table(&world);
    assert_eq!(table.row(0), Some(&[16, 14][..]));
    assert_eq!(table.row(1), Some(&[16, 11][..]));
    assert_eq!(
        query::optimal_path(&world).map(|path| path.cells().to_vec()),
        Some(vec![
            CellCoord::new(0, 0),
            CellCoord::new(1, 0),
            CellCoord::new(1, 1),
        ])
    );
}

#[test]
fn winning_move_reports_the_move_then_the_end() {
    let mut world = reference_world();

    let events = run(
        &mut world,
        &[
            Command::ResetGame { initial_health: 16 },
            Command::MovePlayer { dx: 1, dy: 0 },
            Command::MovePlayer { dx: 0, dy: 1 },
        ],
    );

    assert_eq!(
        events,
        vec![
            Event::GameReset {
                health: 14,
                state: SessionState::Playing,
            },
            Event::PlayerMoved {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(1, 0),
                health: 11,
            },
            Event::PlayerMoved {
                from: CellCoord::new(1, 0),
                to: CellCoord::new(1, 1),
                health: 1,
            },
            Event::SessionEnded {
                state: SessionState::Won,
            },
        ]
    );
}

#[test]
fn refused_moves_are_events_not_errors() {
    let mut world = reference_world();

    let events = run(&mut world, &[Command::MovePlayer { dx: 1, dy: 0 }]);
    assert_eq!(events, vec![Event::MoveRejected { dx: 1, dy: 0 }]);

    let events = run(
        &mut world,
        &[
            Command::ResetGame { initial_health: 6 },
            Command::MovePlayer { dx: 0, dy: 1 },
            Command::MovePlayer { dx: 1, dy: 0 },
        ],
    );
    assert_eq!(
        events.last(),
        Some(&Event::MoveRejected { dx: 1, dy: 0 }),
        "a lost session accepts no further moves"
    );
    assert_eq!(query::session_state(&world), Some(SessionState::Lost));
    assert_eq!(query::player_path(&world).len(), 2);
}

#[test]
fn invalid_commands_surface_typed_errors() {
    let mut world = World::new();
    let mut events = Vec::new();

    assert_eq!(
        apply(
            &mut world,
            Command::ConfigureGrid {
                rows: 0,
                columns: 3
            },
            &mut events
        ),
        Err(EngineError::Grid(GridError::InvalidSize {
            rows: 0,
            columns: 3,
            max: 100,
        }))
    );
    assert_eq!(
        apply(
            &mut world,
            Command::SetRoom {
                cell: CellCoord::new(5, 0),
                value: 1,
            },
            &mut events
        ),
        Err(EngineError::Grid(GridError::Index {
            row: 0,
            column: 5,
            rows: 5,
            columns: 5,
        }))
    );
    assert_eq!(
        apply(
            &mut world,
            Command::ResetGame { initial_health: 0 },
            &mut events
        ),
        Err(EngineError::Session(SessionError::InvalidHealth { health: 0 }))
    );
    assert!(events.is_empty(), "failed commands emit nothing");
}

#[test]
fn generated_maps_are_solvable_at_the_extremes() {
    let mut world = World::new();

    for (rows, columns) in [(1, 1), (100, 100)] {
        let events = run(
            &mut world,
            &[
                Command::ConfigureGrid { rows, columns },
                Command::GenerateMap { seed: Some(42) },
                Command::CalculateMinHealth,
            ],
        );

        let Some(Event::MinHealthCalculated { min_health }) = events.last() else {
            panic!("expected a min health event, got {events:?}");
        };
        assert!(*min_health >= 1);
    }
}

#[test]
fn optimal_path_survives_with_exactly_the_minimum_health() {
    let mut world = World::new();
    let _ = run(
        &mut world,
        &[
            Command::ConfigureGrid { rows: 6, columns: 9 },
            Command::GenerateMap { seed: Some(2024) },
        ],
    );
    let min_health = world.calculate_min_health().expect("solves");
    let path = world.optimal_path().expect("path");
    assert_eq!(path.len(), 6 + 9 - 1);
    let moves = moves_along(path.cells());

    let _ = run(
        &mut world,
        &[Command::ResetGame {
            initial_health: min_health as i64,
        }],
    );
    let _ = run(&mut world, &moves);
    assert_eq!(query::session_state(&world), Some(SessionState::Won));

    if min_health > 1 {
        let _ = run(
            &mut world,
            &[Command::ResetGame {
                initial_health: min_health as i64 - 1,
            }],
        );
        for command in &moves {
            let mut events = Vec::new();
            apply(&mut world, *command, &mut events).expect("moves never error");
        }
        assert_eq!(query::session_state(&world), Some(SessionState::Lost));
    }
}

#[test]
fn seeded_script_replays_identically() {
    let script = [
        Command::ConfigureGrid { rows: 7, columns: 5 },
        Command::GenerateMap { seed: Some(77) },
        Command::CalculateMinHealth,
        Command::ComputeOptimalPath,
        Command::ResetGame {
            initial_health: 20,
        },
        Command::MovePlayer { dx: 0, dy: 1 },
        Command::MovePlayer { dx: 1, dy: 0 },
        Command::MovePlayer { dx: 0, dy: 1 },
    ];

    let mut first = World::new();
    let mut second = World::new();
    let first_events = run(&mut first, &script);
    let second_events = run(&mut second, &script);

    assert_eq!(first_events, second_events);
    assert_eq!(query::grid(&first).cells(), query::grid(&second).cells());
    assert_eq!(query::dp_table(&first), query::dp_table(&second));
    assert_eq!(query::player_path(&first), query::player_path(&second));
    assert_eq!(query::current_health(&first), query::current_health(&second));
}

#[test]
fn world_config_loads_partially_from_toml() {
    let config: WorldConfig = toml::from_str(
        r#"
            initial_rows = 8
            default_initial_health = 30

            [limits]
            max_dimension = 40

            [tuning.attempts]
            small_grid_attempts = 5
        "#,
    )
    .expect("config parses");

    assert_eq!(config.initial_rows, 8);
    assert_eq!(config.initial_columns, 5);
    assert_eq!(config.default_initial_health, 30);
    assert_eq!(config.limits.max_dimension, 40);
    assert_eq!(
        config.limits.memory_ceiling_bytes,
        WorldConfig::default().limits.memory_ceiling_bytes
    );
    assert_eq!(config.tuning.attempts.small_grid_attempts, 5);

    let mut world = World::with_config(config).expect("legal size");
    assert_eq!(query::dimensions(&world), GridDimensions::new(8, 5));
    assert!(matches!(
        world.set_size(41, 1),
        Err(GridError::InvalidSize { max: 40, .. })
    ));
}
