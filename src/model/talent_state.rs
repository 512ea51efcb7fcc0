use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{
    constants::{TALENT_DEFAULT_ELO, TALENT_ELO_MAX, TALENT_ELO_MIN},
    structures::{
        dimension::{BatterDimension, PitcherDimension, N_BATTER_DIMENSIONS, N_PITCHER_DIMENSIONS},
        player_role::{PitcherRole, PlayerRole}
    }
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TalentRole {
    Batter,
    Pitcher(PitcherRole)
}

impl TalentRole {
    pub fn player_role(&self) -> PlayerRole {
        match self {
            TalentRole::Batter => PlayerRole::Batter,
            TalentRole::Pitcher(_) => PlayerRole::Pitcher
        }
    }

    pub fn pitcher_role(&self) -> Option<PitcherRole> {
        match self {
            TalentRole::Batter => None,
            TalentRole::Pitcher(role) => Some(*role)
        }
    }
}

/// Per-facet ratings of one player in one role.
#[derive(Debug, Clone, PartialEq)]
pub struct TalentState<const N: usize> {
    pub player_id: i32,
    pub role: TalentRole,
    pub elo_dimensions: [f64; N],
    /// Number of PAs that moved each facet
    pub event_counts: [u32; N],
    pub pa_count: u32
}

pub type BatterTalentState = TalentState<N_BATTER_DIMENSIONS>;
pub type PitcherTalentState = TalentState<N_PITCHER_DIMENSIONS>;

impl<const N: usize> TalentState<N> {
    pub fn new(player_id: i32, role: TalentRole) -> TalentState<N> {
        TalentState {
            player_id,
            role,
            elo_dimensions: [TALENT_DEFAULT_ELO; N],
            event_counts: [0; N],
            pa_count: 0
        }
    }

    /// Adds each delta with the rating range clamp. A facet's event count
    /// moves only when its delta is non-zero; the PA count always moves.
    pub fn apply_deltas(&mut self, deltas: &[f64; N]) {
        for (i, delta) in deltas.iter().enumerate() {
            if *delta != 0.0 {
                self.elo_dimensions[i] = (self.elo_dimensions[i] + delta).clamp(TALENT_ELO_MIN, TALENT_ELO_MAX);
                self.event_counts[i] += 1;
            }
        }
        self.pa_count += 1;
    }

    pub fn composite(&self, weights: &[f64; N]) -> f64 {
        self.elo_dimensions.iter().zip(weights).map(|(elo, w)| elo * w).sum()
    }
}

impl BatterTalentState {
    pub fn elo(&self, dimension: BatterDimension) -> f64 {
        self.elo_dimensions[dimension.index()]
    }

    pub fn event_count(&self, dimension: BatterDimension) -> u32 {
        self.event_counts[dimension.index()]
    }
}

impl PitcherTalentState {
    pub fn elo(&self, dimension: PitcherDimension) -> f64 {
        self.elo_dimensions[dimension.index()]
    }

    pub fn event_count(&self, dimension: PitcherDimension) -> u32 {
        self.event_counts[dimension.index()]
    }
}

/// Season and career halves of a player's facet ratings. Both move together;
/// only the season half can be reset.
#[derive(Debug, Clone, PartialEq)]
pub struct DualTalentState<const N: usize> {
    pub season: TalentState<N>,
    pub career: TalentState<N>,
    pub last_game_date: Option<NaiveDate>
}

impl<const N: usize> DualTalentState<N> {
    pub fn new(player_id: i32, role: TalentRole) -> DualTalentState<N> {
        DualTalentState {
            season: TalentState::new(player_id, role),
            career: TalentState::new(player_id, role),
            last_game_date: None
        }
    }

    pub fn player_id(&self) -> i32 {
        self.career.player_id
    }

    pub fn apply_deltas(&mut self, deltas: &[f64; N]) {
        self.season.apply_deltas(deltas);
        self.career.apply_deltas(deltas);
    }

    pub fn reset_season(&mut self) {
        self.season = TalentState::new(self.season.player_id, self.season.role);
    }

    pub fn set_role(&mut self, role: TalentRole) {
        self.season.role = role;
        self.career.role = role;
    }
}

/// Owns every player's dual facet state, created on first sight.
#[derive(Debug, Clone, Default)]
pub struct TalentStateManager {
    pub batters: IndexMap<i32, DualTalentState<N_BATTER_DIMENSIONS>>,
    pub pitchers: IndexMap<i32, DualTalentState<N_PITCHER_DIMENSIONS>>
}

impl TalentStateManager {
    pub fn new() -> TalentStateManager {
        TalentStateManager::default()
    }

    pub fn get_or_create_batter(&mut self, player_id: i32) -> &mut DualTalentState<N_BATTER_DIMENSIONS> {
        self.batters
            .entry(player_id)
            .or_insert_with(|| DualTalentState::new(player_id, TalentRole::Batter))
    }

    /// New pitchers default to the starter role.
    pub fn get_or_create_pitcher(&mut self, player_id: i32) -> &mut DualTalentState<N_PITCHER_DIMENSIONS> {
        self.pitchers
            .entry(player_id)
            .or_insert_with(|| DualTalentState::new(player_id, TalentRole::Pitcher(PitcherRole::default())))
    }

    /// Both sides of a plate appearance, created if needed.
    pub fn matchup(
        &mut self,
        batter_id: i32,
        pitcher_id: i32
    ) -> (
        &mut DualTalentState<N_BATTER_DIMENSIONS>,
        &mut DualTalentState<N_PITCHER_DIMENSIONS>
    ) {
        let batter = self
            .batters
            .entry(batter_id)
            .or_insert_with(|| DualTalentState::new(batter_id, TalentRole::Batter));
        let pitcher = self
            .pitchers
            .entry(pitcher_id)
            .or_insert_with(|| DualTalentState::new(pitcher_id, TalentRole::Pitcher(PitcherRole::default())));

        (batter, pitcher)
    }

    pub fn batter(&self, player_id: i32) -> Option<&DualTalentState<N_BATTER_DIMENSIONS>> {
        self.batters.get(&player_id)
    }

    pub fn pitcher(&self, player_id: i32) -> Option<&DualTalentState<N_PITCHER_DIMENSIONS>> {
        self.pitchers.get(&player_id)
    }

    /// Starts a new season for every known player. Career halves are untouched.
    pub fn reset_season(&mut self) {
        self.batters.values_mut().for_each(|s| s.reset_season());
        self.pitchers.values_mut().for_each(|s| s.reset_season());
    }

    pub fn len(&self) -> usize {
        self.batters.len() + self.pitchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batters.is_empty() && self.pitchers.is_empty()
    }
}
