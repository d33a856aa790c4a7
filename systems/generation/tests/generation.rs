use dungeon_path_core::{GridDimensions, GridView};
use dungeon_path_system_generation::{
    fallback_value, AttemptFailure, GenerationOutcome, GenerationTuning, MapGenerator, ValueBand,
};
use dungeon_path_system_solver::solve;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn generate(
    generator: &mut MapGenerator,
    rows: u32,
    columns: u32,
    seed: u64,
) -> (Vec<i32>, dungeon_path_system_generation::GenerationReport) {
    let dimensions = GridDimensions::new(rows, columns);
    let mut cells = vec![0; dimensions.cell_count()];
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let report = generator.generate(dimensions, &mut cells, &mut rng);
    (cells, report)
}

fn solved_min_health(cells: &[i32], rows: u32, columns: u32) -> u64 {
    let table = solve(GridView::new(cells, GridDimensions::new(rows, columns))).expect("solves");
    table.min_health().expect("solved")
}

#[test]
fn accepted_maps_respect_band_and_ceiling() {
    let mut generator = MapGenerator::default();

    for seed in 0..20 {
        let (cells, report) = generate(&mut generator, 5, 5, seed);
        let min_health = solved_min_health(&cells, 5, 5);

        match report.outcome {
            GenerationOutcome::Accepted {
                min_health: reported,
            } => {
                assert_eq!(reported, min_health, "report must match a fresh solve");
                assert!(min_health >= 1 && min_health <= 50);
                assert!(cells.iter().all(|value| (-30..=15).contains(value)));
                assert_eq!(report.failures.len() as u32, report.attempts - 1);
            }
            GenerationOutcome::Fallback => {
                assert_eq!(report.attempts, 100);
                assert_eq!(report.failures.len(), 100);
            }
        }
    }
}

#[test]
fn every_legal_extreme_size_yields_a_solvable_map() {
    let mut generator = MapGenerator::default();

    for (rows, columns) in [(1, 1), (1, 100), (100, 1), (31, 33), (100, 100)] {
        let (cells, report) = generate(&mut generator, rows, columns, 7);
        let min_health = solved_min_health(&cells, rows, columns);

        assert!(min_health >= 1, "{rows}x{columns} must need positive health");
        assert!(report.attempts >= 1);
        let budget = if rows * columns > 1_000 { 10 } else { 100 };
        assert!(report.attempts <= budget);
    }
}

#[test]
fn same_seed_reproduces_the_same_map() {
    let mut first = MapGenerator::default();
    let mut second = MapGenerator::default();

    let (first_cells, first_report) = generate(&mut first, 8, 6, 0xdead_beef);
    let (second_cells, second_report) = generate(&mut second, 8, 6, 0xdead_beef);

    assert_eq!(first_cells, second_cells);
    assert_eq!(first_report, second_report);
}

#[test]
fn impossible_ceiling_forces_the_fallback_pattern() {
    let mut tuning = GenerationTuning::default();
    tuning.acceptance.small_grid_multiplier = 0;
    let mut generator = MapGenerator::new(tuning);

    let (cells, report) = generate(&mut generator, 4, 6, 3);

    assert_eq!(report.outcome, GenerationOutcome::Fallback);
    assert_eq!(report.attempts, 100);
    assert_eq!(report.failures.len(), 100);
    assert!(report
        .failures
        .iter()
        .all(|failure| matches!(failure, AttemptFailure::Rejected { ceiling: 0, .. })));

    for row in 0..4u32 {
        for column in 0..6u32 {
            let index = (row * 6 + column) as usize;
            assert_eq!(cells[index], fallback_value(row, column));
        }
    }
    assert_eq!(cells[0], 1);
    assert_eq!(cells[3], -1);
}

#[test]
fn failing_attempts_are_recorded_without_aborting() {
    let mut tuning = GenerationTuning::default();
    tuning.value_bands = vec![ValueBand::unbounded(3, -3)];
    tuning.attempts.small_grid_attempts = 4;
    let mut generator = MapGenerator::new(tuning);

    let (cells, report) = generate(&mut generator, 3, 3, 11);

    assert!(report.used_fallback());
    assert_eq!(
        report.failures,
        vec![AttemptFailure::InvertedBand { min: 3, max: -3 }; 4]
    );
    assert_eq!(solved_min_health(&cells, 3, 3), 1);
}

#[test]
fn uncovered_cell_count_falls_back() {
    let mut tuning = GenerationTuning::default();
    tuning.value_bands = vec![ValueBand::up_to(4, -1, 1)];
    tuning.attempts.small_grid_attempts = 2;
    let mut generator = MapGenerator::new(tuning);

    let (_, report) = generate(&mut generator, 3, 3, 5);

    assert_eq!(
        report.failures,
        vec![AttemptFailure::NoBand { cell_count: 9 }; 2]
    );
    assert!(report.used_fallback());
}

#[test]
fn tuning_loads_partially_from_toml() {
    let tuning: GenerationTuning = toml::from_str(
        r#"
            [attempts]
            small_grid_attempts = 3

            [acceptance]
            large_grid_multiplier = 4
        "#,
    )
    .expect("tuning parses");

    assert_eq!(tuning.attempts.small_grid_attempts, 3);
    assert_eq!(tuning.attempts.large_grid_attempts, 10);
    assert_eq!(tuning.acceptance.small_grid_multiplier, 2);
    assert_eq!(tuning.acceptance.large_grid_multiplier, 4);
    assert_eq!(tuning.value_bands, GenerationTuning::default().value_bands);
}

#[test]
fn custom_bands_load_from_toml() {
    let tuning: GenerationTuning = toml::from_str(
        r#"
            [[value_bands]]
            max_cells = 9
            min = -2
            max = 2

            [[value_bands]]
            min = -1
            max = 1
        "#,
    )
    .expect("tuning parses");

    assert_eq!(
        tuning.value_bands,
        vec![ValueBand::up_to(9, -2, 2), ValueBand::unbounded(-1, 1)]
    );
    assert!(tuning.validate().is_ok());
}
