use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::ProcessorError,
    model::{
        config::EloConfig,
        corrections::{ParkFactor, Re24Baseline},
        elo_batch::{EloBatch, EloRunOutput},
        elo_calculator::EloCalculator,
        structures::{plate_appearance::PlateAppearance, player_role::PitcherRole},
        talent_batch::{TalentBatch, TalentRunOutput},
        talent_config::TalentConfig,
        talent_engine::TalentEngine
    },
    store::records::{PlayerEloRecord, TalentPlayerRecord}
};

/// Usage role of a pitcher, as supplied by the roster source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PitcherRoleRow {
    pub player_id: i32,
    pub pitcher_role: String
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Export only players who appeared in this run
    pub active_only: bool,
    /// Start a new season before processing
    pub reset_season: bool,
    pub strict_ordering: bool
}

/// Read-only inputs shared by both processors.
#[derive(Debug, Clone, Copy)]
pub struct PipelineInputs<'a> {
    pub plate_appearances: &'a [PlateAppearance],
    pub elo_config: &'a EloConfig,
    pub talent_config: &'a TalentConfig,
    pub baseline: Option<&'a Re24Baseline>,
    pub park_factor: Option<&'a ParkFactor>,
    pub pitcher_roles: &'a IndexMap<i32, PitcherRole>,
    pub elo_seed: &'a [PlayerEloRecord],
    pub talent_seed: &'a [TalentPlayerRecord]
}

#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub elo: EloRunOutput,
    pub talent: TalentRunOutput
}

pub fn pitcher_role_map(rows: &[PitcherRoleRow]) -> IndexMap<i32, PitcherRole> {
    rows.iter()
        .map(|r| (r.player_id, PitcherRole::from_label(&r.pitcher_role)))
        .collect()
}

/// Runs the scalar and facet processors side by side over the same stream.
/// The two share no state, so either failing fails the run.
pub fn run(inputs: &PipelineInputs, options: &PipelineOptions) -> Result<RunOutput, ProcessorError> {
    inputs.elo_config.validate()?;
    inputs.talent_config.validate()?;

    info!(
        "Processing {} plate appearances (seeded with {} scalar and {} facet rows)",
        inputs.plate_appearances.len(),
        inputs.elo_seed.len(),
        inputs.talent_seed.len()
    );

    let (elo, talent) = rayon::join(|| run_elo(inputs, options), || run_talent(inputs, options));

    Ok(RunOutput {
        elo: elo?,
        talent: talent?
    })
}

pub fn run_elo(inputs: &PipelineInputs, options: &PipelineOptions) -> Result<EloRunOutput, ProcessorError> {
    let calculator = EloCalculator::new(inputs.elo_config, inputs.baseline, inputs.park_factor);
    let mut batch = EloBatch::from_records(calculator, inputs.elo_seed).with_strict_ordering(options.strict_ordering);

    batch.process(inputs.plate_appearances)?;

    Ok(batch.into_output(options.active_only))
}

pub fn run_talent(inputs: &PipelineInputs, options: &PipelineOptions) -> Result<TalentRunOutput, ProcessorError> {
    let engine = TalentEngine::new(inputs.talent_config);
    let mut batch = TalentBatch::from_records(engine, inputs.talent_seed)?.with_strict_ordering(options.strict_ordering);

    if options.reset_season {
        batch.reset_season();
    }
    for (player_id, role) in inputs.pitcher_roles {
        batch.set_pitcher_role(*player_id, *role);
    }

    batch.process(inputs.plate_appearances)?;

    Ok(batch.into_output(options.active_only))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::generate_plate_appearances;

    #[test]
    fn test_pitcher_role_map() {
        let rows = vec![
            PitcherRoleRow {
                player_id: 1,
                pitcher_role: "closer".to_string()
            },
            PitcherRoleRow {
                player_id: 2,
                pitcher_role: "swingman".to_string()
            }
        ];

        let roles = pitcher_role_map(&rows);
        assert_eq!(roles[&1], PitcherRole::Closer);
        assert_eq!(roles[&2], PitcherRole::Starter);
    }

    #[test]
    fn test_run_matches_individual_processors() {
        let pas = generate_plate_appearances(400, 4, 8, 3);
        let elo_config = EloConfig::default();
        let talent_config = TalentConfig::default();
        let roles = IndexMap::new();
        let inputs = PipelineInputs {
            plate_appearances: &pas,
            elo_config: &elo_config,
            talent_config: &talent_config,
            baseline: None,
            park_factor: None,
            pitcher_roles: &roles,
            elo_seed: &[],
            talent_seed: &[]
        };
        let options = PipelineOptions::default();

        let output = run(&inputs, &options).unwrap();

        assert_eq!(output.elo.players, run_elo(&inputs, &options).unwrap().players);
        assert_eq!(output.talent.players, run_talent(&inputs, &options).unwrap().players);
        assert_eq!(output.elo.pa_details.len(), pas.len());
    }

    #[test]
    fn test_invalid_config_fails_before_processing() {
        let pas = generate_plate_appearances(10, 1, 2, 2);
        let elo_config = EloConfig {
            min_elo: 2000.0,
            ..EloConfig::default()
        };
        let talent_config = TalentConfig::default();
        let roles = IndexMap::new();
        let inputs = PipelineInputs {
            plate_appearances: &pas,
            elo_config: &elo_config,
            talent_config: &talent_config,
            baseline: None,
            park_factor: None,
            pitcher_roles: &roles,
            elo_seed: &[],
            talent_seed: &[]
        };

        assert!(matches!(
            run(&inputs, &PipelineOptions::default()),
            Err(ProcessorError::InvalidConfig(_))
        ));
    }
}
