use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use crate::{
    error::ProcessorError,
    model::{
        constants::PROGRESS_LOG_INTERVAL,
        elo_calculator::EloCalculator,
        ohlc::{DailyOhlc, OhlcTracker},
        sequence::SequenceGuard,
        structures::{player_elo_state::PlayerEloState, plate_appearance::PlateAppearance, player_role::EloRole}
    },
    store::records::{EloPaDetail, PlayerEloRecord},
    utils::progress_utils::progress_bar
};

/// Everything a scalar run produces.
#[derive(Debug, Clone, Default)]
pub struct EloRunOutput {
    pub players: Vec<PlayerEloRecord>,
    pub pa_details: Vec<EloPaDetail>,
    pub daily_ohlc: Vec<DailyOhlc<EloRole>>
}

/// Drives the scalar calculator over a chronologically ordered PA stream.
///
/// Seeding a batch with the snapshot of an earlier run and processing the
/// remaining days yields the same ratings as one full replay.
pub struct EloBatch<'a> {
    calculator: EloCalculator<'a>,
    players: IndexMap<i32, PlayerEloState>,
    pa_details: Vec<EloPaDetail>,
    ohlc: OhlcTracker<EloRole>,
    active_player_ids: IndexSet<i32>,
    sequence: SequenceGuard
}

impl<'a> EloBatch<'a> {
    pub fn new(calculator: EloCalculator<'a>) -> EloBatch<'a> {
        EloBatch {
            calculator,
            players: IndexMap::new(),
            pa_details: Vec::new(),
            ohlc: OhlcTracker::new(),
            active_player_ids: IndexSet::new(),
            sequence: SequenceGuard::default()
        }
    }

    /// Resumes from a snapshot. Cumulative run value starts over at zero.
    pub fn from_records(calculator: EloCalculator<'a>, records: &[PlayerEloRecord]) -> EloBatch<'a> {
        let min_elo = calculator.config().min_elo;
        let mut batch = EloBatch::new(calculator);
        for r in records {
            batch.players.insert(
                r.player_id,
                PlayerEloState {
                    player_id: r.player_id,
                    batting_elo: r.batting_elo.max(min_elo),
                    pitching_elo: r.pitching_elo.max(min_elo),
                    batting_pa: r.batting_pa,
                    pitching_pa: r.pitching_pa,
                    cumulative_rv: 0.0,
                    last_game_date: r.last_game_date
                }
            );
        }

        debug!("Seeded scalar ELO batch with {} players", batch.players.len());
        batch
    }

    pub fn with_strict_ordering(mut self, strict: bool) -> EloBatch<'a> {
        self.sequence = SequenceGuard::new(strict);
        self
    }

    /// Processes the stream and closes the final day.
    pub fn process(&mut self, plate_appearances: &[PlateAppearance]) -> Result<(), ProcessorError> {
        let total = plate_appearances.len();
        let progress_bar = progress_bar(total as u64, "Processing scalar ELO".to_string());

        for (i, pa) in plate_appearances.iter().enumerate() {
            self.process_plate_appearance(pa)?;

            if let Some(bar) = &progress_bar {
                bar.inc(1);
            }
            if (i + 1) % PROGRESS_LOG_INTERVAL == 0 {
                info!("ELO: processed {} / {} PAs", i + 1, total);
            }
        }
        self.ohlc.finish();

        if let Some(bar) = progress_bar {
            bar.finish_and_clear();
        }
        info!(
            "ELO: processed {} PAs, {} players touched, {} daily bars",
            total,
            self.active_player_ids.len(),
            self.ohlc.records().len()
        );

        Ok(())
    }

    /// Rates a single PA.
    ///
    /// Steps:
    /// 1. Validate the record and, if enabled, its position in the stream.
    /// 2. Roll the daily bars over when the date changes.
    /// 3. Rate the PA and write both players back.
    /// 4. Record the bars, the audit row and the active set.
    pub fn process_plate_appearance(&mut self, pa: &PlateAppearance) -> Result<(), ProcessorError> {
        pa.validate()?;
        self.sequence.check(pa)?;
        self.ohlc.advance_to(pa.game_date);

        let mut batter = self.state_or_default(pa.batter_id);
        let mut pitcher = self.state_or_default(pa.pitcher_id);

        let update = self.calculator.apply(&mut batter, &mut pitcher, pa);
        batter.last_game_date = Some(pa.game_date);
        pitcher.last_game_date = Some(pa.game_date);

        self.players.insert(pa.batter_id, batter);
        self.players.insert(pa.pitcher_id, pitcher);

        self.ohlc.record(
            pa.batter_id,
            EloRole::Batting,
            update.batter_elo_before,
            update.batter_elo_after
        );
        self.ohlc.record(
            pa.pitcher_id,
            EloRole::Pitching,
            update.pitcher_elo_before,
            update.pitcher_elo_after
        );

        self.pa_details.push(EloPaDetail {
            pa_id: pa.pa_id,
            game_date: pa.game_date,
            batter_id: pa.batter_id,
            pitcher_id: pa.pitcher_id,
            result_type: pa.result_type,
            update
        });
        self.active_player_ids.insert(pa.batter_id);
        self.active_player_ids.insert(pa.pitcher_id);

        Ok(())
    }

    fn state_or_default(&self, player_id: i32) -> PlayerEloState {
        self.players
            .get(&player_id)
            .cloned()
            .unwrap_or_else(|| PlayerEloState::new(player_id))
    }

    pub fn player(&self, player_id: i32) -> Option<&PlayerEloState> {
        self.players.get(&player_id)
    }

    pub fn players(&self) -> &IndexMap<i32, PlayerEloState> {
        &self.players
    }

    pub fn pa_details(&self) -> &[EloPaDetail] {
        &self.pa_details
    }

    pub fn daily_ohlc(&self) -> &[DailyOhlc<EloRole>] {
        self.ohlc.records()
    }

    pub fn active_player_ids(&self) -> &IndexSet<i32> {
        &self.active_player_ids
    }

    /// Snapshot rows, optionally limited to players seen in this run.
    pub fn player_elo_records(&self, active_only: bool) -> Vec<PlayerEloRecord> {
        self.players
            .values()
            .filter(|p| !active_only || self.active_player_ids.contains(&p.player_id))
            .map(|p| PlayerEloRecord {
                player_id: p.player_id,
                batting_elo: p.batting_elo,
                pitching_elo: p.pitching_elo,
                composite_elo: p.composite_elo(),
                batting_pa: p.batting_pa,
                pitching_pa: p.pitching_pa,
                pa_count: p.pa_count(),
                last_game_date: p.last_game_date
            })
            .collect()
    }

    pub fn into_output(self, active_only: bool) -> EloRunOutput {
        EloRunOutput {
            players: self.player_elo_records(active_only),
            pa_details: self.pa_details,
            daily_ohlc: self.ohlc.into_records()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{config::EloConfig, structures::result_type::ResultType},
        utils::test_utils::{generate_plate_appearance, generate_plate_appearances}
    };
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    #[test]
    fn test_process_creates_players() {
        let config = EloConfig::default();
        let mut batch = EloBatch::new(EloCalculator::new(&config, None, None));
        let pas = vec![
            generate_plate_appearance(1, 10, 20, Some(ResultType::HomeRun), Some(1.4)),
            generate_plate_appearance(2, 11, 20, Some(ResultType::StrikeOut), Some(-0.3))
        ];

        batch.process(&pas).unwrap();

        assert_eq!(batch.players().len(), 3);
        assert_abs_diff_eq!(batch.player(10).unwrap().batting_elo, 1521.0, epsilon = 1e-10);
        assert_eq!(batch.player(20).unwrap().pitching_pa, 2);
        assert_eq!(batch.pa_details().len(), 2);
        assert_eq!(batch.active_player_ids().len(), 3);
    }

    #[test]
    fn test_daily_bars_per_role() {
        let config = EloConfig::default();
        let mut batch = EloBatch::new(EloCalculator::new(&config, None, None));
        let pas = vec![
            generate_plate_appearance(1, 10, 20, Some(ResultType::Single), Some(0.4)),
            generate_plate_appearance(2, 10, 20, Some(ResultType::Out), Some(-0.25))
        ];

        batch.process(&pas).unwrap();

        let bars = batch.daily_ohlc();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].player_id, 10);
        assert_eq!(bars[0].stream, EloRole::Batting);
        assert_eq!(bars[0].total_pa, 2);
        assert_eq!(bars[0].open, 1500.0);
        assert_abs_diff_eq!(bars[0].high, 1504.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bars[0].close, 1501.5, epsilon = 1e-10);
        assert_eq!(bars[1].stream, EloRole::Pitching);
    }

    #[test]
    fn test_two_way_player_keeps_roles_apart() {
        let config = EloConfig::default();
        let mut batch = EloBatch::new(EloCalculator::new(&config, None, None));
        let pas = vec![
            generate_plate_appearance(1, 10, 20, Some(ResultType::Single), Some(0.5)),
            generate_plate_appearance(2, 20, 10, Some(ResultType::Single), Some(0.5))
        ];

        batch.process(&pas).unwrap();

        let two_way = batch.player(10).unwrap();
        assert_abs_diff_eq!(two_way.batting_elo, 1505.0, epsilon = 1e-10);
        assert_abs_diff_eq!(two_way.pitching_elo, 1495.0, epsilon = 1e-10);
        assert_abs_diff_eq!(two_way.composite_elo(), 1500.0, epsilon = 1e-10);
        assert_eq!(batch.daily_ohlc().len(), 4);
    }

    #[test]
    fn test_malformed_plate_appearance_aborts() {
        let config = EloConfig::default();
        let mut batch = EloBatch::new(EloCalculator::new(&config, None, None));
        let mut bad = generate_plate_appearance(2, 10, 20, Some(ResultType::Single), Some(0.5));
        bad.outs_when_up = 5;

        let result = batch.process(&[bad]);

        assert!(matches!(result, Err(ProcessorError::MalformedPlateAppearance { pa_id: 2, .. })));
        assert!(batch.players().is_empty());
    }

    #[test]
    fn test_strict_ordering() {
        let config = EloConfig::default();
        let pas = vec![
            generate_plate_appearance(2, 10, 20, None, Some(0.1)),
            generate_plate_appearance(1, 10, 20, None, Some(0.1))
        ];

        let mut lenient = EloBatch::new(EloCalculator::new(&config, None, None));
        assert!(lenient.process(&pas).is_ok());

        let mut strict = EloBatch::new(EloCalculator::new(&config, None, None)).with_strict_ordering(true);
        assert!(matches!(strict.process(&pas), Err(ProcessorError::OutOfOrder { pa_id: 1, .. })));
    }

    #[test]
    fn test_active_only_export() {
        let config = EloConfig::default();
        let seed = vec![PlayerEloRecord {
            player_id: 99,
            batting_elo: 1600.0,
            pitching_elo: 1500.0,
            composite_elo: 1600.0,
            batting_pa: 10,
            pitching_pa: 0,
            pa_count: 10,
            last_game_date: NaiveDate::from_ymd_opt(2024, 3, 30)
        }];
        let mut batch = EloBatch::from_records(EloCalculator::new(&config, None, None), &seed);
        batch
            .process(&[generate_plate_appearance(1, 10, 20, Some(ResultType::Walk), Some(0.3))])
            .unwrap();

        assert_eq!(batch.player_elo_records(false).len(), 3);
        let active = batch.player_elo_records(true);
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|r| r.player_id != 99));
    }

    #[test]
    fn test_seed_applies_floor() {
        let config = EloConfig::default();
        let seed = vec![PlayerEloRecord {
            player_id: 7,
            batting_elo: 120.0,
            pitching_elo: 1550.0,
            composite_elo: 120.0,
            batting_pa: 4,
            pitching_pa: 0,
            pa_count: 4,
            last_game_date: None
        }];
        let batch = EloBatch::from_records(EloCalculator::new(&config, None, None), &seed);

        let player = batch.player(7).unwrap();
        assert_eq!(player.batting_elo, config.min_elo);
        assert_eq!(player.pitching_elo, 1550.0);
    }

    #[test]
    fn test_seed_restores_state() {
        let config = EloConfig::default();
        let pas = generate_plate_appearances(200, 3, 8, 4);

        let mut first = EloBatch::new(EloCalculator::new(&config, None, None));
        first.process(&pas).unwrap();
        let records = first.player_elo_records(false);

        let seeded = EloBatch::from_records(EloCalculator::new(&config, None, None), &records);
        for (id, state) in first.players() {
            let restored = seeded.player(*id).unwrap();
            assert_eq!(restored.batting_elo, state.batting_elo);
            assert_eq!(restored.pitching_pa, state.pitching_pa);
            assert_eq!(restored.last_game_date, state.last_game_date);
            assert_eq!(restored.cumulative_rv, 0.0);
        }
    }
}
