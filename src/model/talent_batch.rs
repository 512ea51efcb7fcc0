use std::str::FromStr;

use indexmap::IndexSet;
use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    error::ProcessorError,
    model::{
        constants::{PROGRESS_LOG_INTERVAL, TALENT_ELO_MAX, TALENT_ELO_MIN},
        ohlc::{DailyOhlc, OhlcTracker},
        sequence::SequenceGuard,
        structures::{
            dimension::{BatterDimension, PitcherDimension, TalentFacet},
            plate_appearance::PlateAppearance,
            player_role::{PitcherRole, PlayerRole}
        },
        talent_engine::TalentEngine,
        talent_state::{DualTalentState, TalentRole, TalentStateManager}
    },
    store::records::{TalentCompositeRecord, TalentPaDetail, TalentPlayerRecord},
    utils::progress_utils::progress_bar
};

/// Everything a facet run produces.
#[derive(Debug, Clone, Default)]
pub struct TalentRunOutput {
    pub players: Vec<TalentPlayerRecord>,
    pub composites: Vec<TalentCompositeRecord>,
    pub pa_details: Vec<TalentPaDetail>,
    pub daily_ohlc: Vec<DailyOhlc<TalentFacet>>
}

/// Drives the facet engine over a chronologically ordered PA stream,
/// tracking season ratings in daily bars per facet.
pub struct TalentBatch<'a> {
    engine: TalentEngine<'a>,
    state: TalentStateManager,
    pa_details: Vec<TalentPaDetail>,
    ohlc: OhlcTracker<TalentFacet>,
    active_player_ids: IndexSet<i32>,
    sequence: SequenceGuard
}

impl<'a> TalentBatch<'a> {
    pub fn new(engine: TalentEngine<'a>) -> TalentBatch<'a> {
        TalentBatch {
            engine,
            state: TalentStateManager::new(),
            pa_details: Vec::new(),
            ohlc: OhlcTracker::new(),
            active_player_ids: IndexSet::new(),
            sequence: SequenceGuard::default()
        }
    }

    /// Resumes from per-facet snapshot rows.
    pub fn from_records(engine: TalentEngine<'a>, records: &[TalentPlayerRecord]) -> Result<TalentBatch<'a>, ProcessorError> {
        let mut batch = TalentBatch::new(engine);

        for r in records {
            match r.player_role {
                PlayerRole::Batter => {
                    let dimension = BatterDimension::from_str(&r.talent_type).map_err(|_| {
                        ProcessorError::InvalidSnapshot(format!(
                            "unknown batter facet {:?} for player {}",
                            r.talent_type, r.player_id
                        ))
                    })?;
                    let dual = batch.state.get_or_create_batter(r.player_id);
                    restore(dual, dimension.index(), r);
                }
                PlayerRole::Pitcher => {
                    let dimension = PitcherDimension::from_str(&r.talent_type).map_err(|_| {
                        ProcessorError::InvalidSnapshot(format!(
                            "unknown pitcher facet {:?} for player {}",
                            r.talent_type, r.player_id
                        ))
                    })?;
                    let dual = batch.state.get_or_create_pitcher(r.player_id);
                    dual.set_role(TalentRole::Pitcher(r.pitcher_role.unwrap_or_default()));
                    restore(dual, dimension.index(), r);
                }
            }
        }

        debug!("Seeded talent batch with {} player roles", batch.state.len());
        Ok(batch)
    }

    pub fn with_strict_ordering(mut self, strict: bool) -> TalentBatch<'a> {
        self.sequence = SequenceGuard::new(strict);
        self
    }

    /// Assigns a pitcher's usage role, creating the pitcher if unseen.
    pub fn set_pitcher_role(&mut self, player_id: i32, role: PitcherRole) {
        self.state
            .get_or_create_pitcher(player_id)
            .set_role(TalentRole::Pitcher(role));
    }

    /// Starts a new season for every known player.
    pub fn reset_season(&mut self) {
        info!("Talent: resetting season ratings for {} player roles", self.state.len());
        self.state.reset_season();
    }

    pub fn process(&mut self, plate_appearances: &[PlateAppearance]) -> Result<(), ProcessorError> {
        let total = plate_appearances.len();
        let progress_bar = progress_bar(total as u64, "Processing talent ELO".to_string());

        for (i, pa) in plate_appearances.iter().enumerate() {
            self.process_plate_appearance(pa)?;

            if let Some(bar) = &progress_bar {
                bar.inc(1);
            }
            if (i + 1) % PROGRESS_LOG_INTERVAL == 0 {
                info!("Talent: processed {} / {} PAs", i + 1, total);
            }
        }
        self.ohlc.finish();

        if let Some(bar) = progress_bar {
            bar.finish_and_clear();
        }
        info!(
            "Talent: processed {} PAs, {} facet updates, {} daily bars",
            total,
            self.pa_details.len(),
            self.ohlc.records().len()
        );

        Ok(())
    }

    /// Rates a single PA on the season ratings, mirrors the deltas into the
    /// career ratings and records every facet of both players in the daily
    /// bars. Audit rows are written only for facets that moved.
    pub fn process_plate_appearance(&mut self, pa: &PlateAppearance) -> Result<(), ProcessorError> {
        pa.validate()?;
        self.sequence.check(pa)?;
        self.ohlc.advance_to(pa.game_date);

        let (batter, pitcher) = self.state.matchup(pa.batter_id, pa.pitcher_id);
        let batter_before = batter.season.elo_dimensions;
        let pitcher_before = pitcher.season.elo_dimensions;

        let result = self.engine.process_plate_appearance(batter, pitcher, pa);
        batter.last_game_date = Some(pa.game_date);
        pitcher.last_game_date = Some(pa.game_date);

        for dimension in BatterDimension::ALL {
            let i = dimension.index();
            self.ohlc.record(
                pa.batter_id,
                TalentFacet::Batter(dimension),
                batter_before[i],
                result.batter_after[i]
            );
            if result.batter_deltas[i] != 0.0 {
                self.pa_details.push(TalentPaDetail {
                    pa_id: pa.pa_id,
                    game_date: pa.game_date,
                    player_id: pa.batter_id,
                    player_role: PlayerRole::Batter,
                    talent_type: dimension.to_string(),
                    elo_before: batter_before[i],
                    elo_after: result.batter_after[i],
                    delta: result.batter_deltas[i]
                });
            }
        }
        for dimension in PitcherDimension::ALL {
            let i = dimension.index();
            self.ohlc.record(
                pa.pitcher_id,
                TalentFacet::Pitcher(dimension),
                pitcher_before[i],
                result.pitcher_after[i]
            );
            if result.pitcher_deltas[i] != 0.0 {
                self.pa_details.push(TalentPaDetail {
                    pa_id: pa.pa_id,
                    game_date: pa.game_date,
                    player_id: pa.pitcher_id,
                    player_role: PlayerRole::Pitcher,
                    talent_type: dimension.to_string(),
                    elo_before: pitcher_before[i],
                    elo_after: result.pitcher_after[i],
                    delta: result.pitcher_deltas[i]
                });
            }
        }

        self.active_player_ids.insert(pa.batter_id);
        self.active_player_ids.insert(pa.pitcher_id);

        Ok(())
    }

    pub fn state(&self) -> &TalentStateManager {
        &self.state
    }

    pub fn pa_details(&self) -> &[TalentPaDetail] {
        &self.pa_details
    }

    pub fn daily_ohlc(&self) -> &[DailyOhlc<TalentFacet>] {
        self.ohlc.records()
    }

    pub fn active_player_ids(&self) -> &IndexSet<i32> {
        &self.active_player_ids
    }

    fn is_exported(&self, player_id: i32, active_only: bool) -> bool {
        !active_only || self.active_player_ids.contains(&player_id)
    }

    /// One row per player, role and facet.
    pub fn talent_player_records(&self, active_only: bool) -> Vec<TalentPlayerRecord> {
        let batters = self
            .state
            .batters
            .values()
            .filter(|d| self.is_exported(d.player_id(), active_only))
            .flat_map(|d| BatterDimension::ALL.map(|dim| facet_record(d, dim.index(), dim.as_ref())));
        let pitchers = self
            .state
            .pitchers
            .values()
            .filter(|d| self.is_exported(d.player_id(), active_only))
            .flat_map(|d| PitcherDimension::ALL.map(|dim| facet_record(d, dim.index(), dim.as_ref())));

        batters.chain(pitchers).collect()
    }

    pub fn composite_records(&self, active_only: bool) -> Vec<TalentCompositeRecord> {
        let weights = &self.engine.config().composite;

        let batters = self
            .state
            .batters
            .values()
            .filter(|d| self.is_exported(d.player_id(), active_only))
            .map(|d| TalentCompositeRecord {
                player_id: d.player_id(),
                player_role: PlayerRole::Batter,
                pitcher_role: None,
                season_composite: d.season.composite(&weights.batter),
                career_composite: d.career.composite(&weights.batter)
            });
        let pitchers = self
            .state
            .pitchers
            .values()
            .filter(|d| self.is_exported(d.player_id(), active_only))
            .map(|d| {
                let role = d.career.role.pitcher_role().unwrap_or_default();
                TalentCompositeRecord {
                    player_id: d.player_id(),
                    player_role: PlayerRole::Pitcher,
                    pitcher_role: Some(role),
                    season_composite: d.season.composite(weights.pitcher(role)),
                    career_composite: d.career.composite(weights.pitcher(role))
                }
            });

        batters
            .chain(pitchers)
            .sorted_by_key(|r| (r.player_id, r.player_role))
            .collect()
    }

    pub fn into_output(self, active_only: bool) -> TalentRunOutput {
        TalentRunOutput {
            players: self.talent_player_records(active_only),
            composites: self.composite_records(active_only),
            pa_details: self.pa_details,
            daily_ohlc: self.ohlc.into_records()
        }
    }
}

fn restore<const N: usize>(dual: &mut DualTalentState<N>, index: usize, r: &TalentPlayerRecord) {
    dual.season.elo_dimensions[index] = r.season_elo.clamp(TALENT_ELO_MIN, TALENT_ELO_MAX);
    dual.career.elo_dimensions[index] = r.career_elo.clamp(TALENT_ELO_MIN, TALENT_ELO_MAX);
    dual.season.event_counts[index] = r.season_event_count;
    dual.career.event_counts[index] = r.career_event_count;
    dual.season.pa_count = r.season_pa_count;
    dual.career.pa_count = r.career_pa_count;
    dual.last_game_date = r.last_game_date;
}

fn facet_record<const N: usize>(dual: &DualTalentState<N>, index: usize, talent_type: &str) -> TalentPlayerRecord {
    let role = dual.career.role;

    TalentPlayerRecord {
        player_id: dual.player_id(),
        player_role: role.player_role(),
        talent_type: talent_type.to_string(),
        pitcher_role: role.pitcher_role(),
        season_elo: dual.season.elo_dimensions[index],
        career_elo: dual.career.elo_dimensions[index],
        season_event_count: dual.season.event_counts[index],
        career_event_count: dual.career.event_counts[index],
        season_pa_count: dual.season.pa_count,
        career_pa_count: dual.career.pa_count,
        last_game_date: dual.last_game_date
    }
}
