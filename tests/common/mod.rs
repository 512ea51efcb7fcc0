use std::sync::Once;

use indexmap::IndexMap;
use mlb_elo_processor::{
    model::{
        config::EloConfig,
        corrections::{ParkFactor, Re24Baseline},
        structures::{plate_appearance::PlateAppearance, player_role::PitcherRole},
        talent_config::TalentConfig
    },
    pipeline::PipelineInputs,
    utils::test_utils::{generate_baseline_rows, generate_park_factor_rows}
};

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Configuration and correction tables used across integration tests.
pub struct Fixture {
    pub elo_config: EloConfig,
    pub talent_config: TalentConfig,
    pub baseline: Re24Baseline,
    pub park_factor: ParkFactor,
    pub pitcher_roles: IndexMap<i32, PitcherRole>
}

impl Fixture {
    pub fn new() -> Fixture {
        Fixture {
            elo_config: EloConfig::default(),
            talent_config: TalentConfig::default(),
            baseline: Re24Baseline::from_rows(&generate_baseline_rows()),
            park_factor: ParkFactor::from_rows(&generate_park_factor_rows()),
            pitcher_roles: IndexMap::new()
        }
    }

    /// Inputs with every correction layer enabled and no seed.
    pub fn inputs<'a>(&'a self, plate_appearances: &'a [PlateAppearance]) -> PipelineInputs<'a> {
        PipelineInputs {
            plate_appearances,
            elo_config: &self.elo_config,
            talent_config: &self.talent_config,
            baseline: Some(&self.baseline),
            park_factor: Some(&self.park_factor),
            pitcher_roles: &self.pitcher_roles,
            elo_seed: &[],
            talent_seed: &[]
        }
    }
}
