use dungeon_path_core::GridLimits;
use dungeon_path_system_generation::GenerationTuning;
use serde::Deserialize;

/// Initial health offered to manual play when none is supplied.
pub const DEFAULT_INITIAL_HEALTH: i64 = 100;

/// Settings that shape a freshly created world.
///
/// Every field is optional when deserialised; omitted fields keep their
/// defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Limits enforced on every resize.
    pub limits: GridLimits,
    /// Knobs for the map generator.
    pub tuning: GenerationTuning,
    /// Row count of the initial grid.
    pub initial_rows: u32,
    /// Column count of the initial grid.
    pub initial_columns: u32,
    /// Health used by manual play when the caller does not choose one.
    pub default_initial_health: i64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            limits: GridLimits::default(),
            tuning: GenerationTuning::default(),
            initial_rows: 5,
            initial_columns: 5,
            default_initial_health: DEFAULT_INITIAL_HEALTH,
        }
    }
}
