use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{
    elo_calculator::EloUpdateResult,
    structures::{
        player_role::{PitcherRole, PlayerRole},
        result_type::ResultType
    }
};

/// Scalar rating snapshot of one player. Also the seed format for resuming.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerEloRecord {
    pub player_id: i32,
    pub batting_elo: f64,
    pub pitching_elo: f64,
    /// Derived on export, ignored when seeding
    #[serde(default)]
    pub composite_elo: f64,
    pub batting_pa: u32,
    pub pitching_pa: u32,
    #[serde(default)]
    pub pa_count: u32,
    pub last_game_date: Option<NaiveDate>
}

/// Per-PA audit row of the scalar model.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EloPaDetail {
    pub pa_id: i64,
    pub game_date: NaiveDate,
    pub batter_id: i32,
    pub pitcher_id: i32,
    pub result_type: Option<ResultType>,
    #[serde(flatten)]
    pub update: EloUpdateResult
}

/// Facet rating snapshot: one row per player, role and facet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TalentPlayerRecord {
    pub player_id: i32,
    pub player_role: PlayerRole,
    pub talent_type: String,
    /// Only present for pitchers
    pub pitcher_role: Option<PitcherRole>,
    pub season_elo: f64,
    pub career_elo: f64,
    pub season_event_count: u32,
    pub career_event_count: u32,
    pub season_pa_count: u32,
    pub career_pa_count: u32,
    pub last_game_date: Option<NaiveDate>
}

/// Role-weighted blend of a player's facets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TalentCompositeRecord {
    pub player_id: i32,
    pub player_role: PlayerRole,
    pub pitcher_role: Option<PitcherRole>,
    pub season_composite: f64,
    pub career_composite: f64
}

/// Per-PA audit row of the facet model, one per facet that moved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TalentPaDetail {
    pub pa_id: i64,
    pub game_date: NaiveDate,
    pub player_id: i32,
    pub player_role: PlayerRole,
    pub talent_type: String,
    pub elo_before: f64,
    pub elo_after: f64,
    pub delta: f64
}
