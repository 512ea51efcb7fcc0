use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{
    constants::{INITIAL_ELO, MIN_ELO},
    structures::player_role::EloRole
};

/// Scalar rating state for a single player across both roles.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerEloState {
    pub player_id: i32,
    pub batting_elo: f64,
    pub pitching_elo: f64,
    pub batting_pa: u32,
    pub pitching_pa: u32,
    /// Raw run value accumulated this run; not persisted
    #[serde(skip)]
    pub cumulative_rv: f64,
    pub last_game_date: Option<NaiveDate>
}

impl PlayerEloState {
    pub fn new(player_id: i32) -> PlayerEloState {
        PlayerEloState {
            player_id,
            batting_elo: INITIAL_ELO,
            pitching_elo: INITIAL_ELO,
            batting_pa: 0,
            pitching_pa: 0,
            cumulative_rv: 0.0,
            last_game_date: None
        }
    }

    pub fn pa_count(&self) -> u32 {
        self.batting_pa + self.pitching_pa
    }

    /// PA-weighted blend of both role ratings.
    pub fn composite_elo(&self) -> f64 {
        let total = self.pa_count();
        if total == 0 {
            return INITIAL_ELO;
        }

        (self.batting_elo * self.batting_pa as f64 + self.pitching_elo * self.pitching_pa as f64) / total as f64
    }

    pub fn elo(&self, role: EloRole) -> f64 {
        match role {
            EloRole::Batting => self.batting_elo,
            EloRole::Pitching => self.pitching_elo
        }
    }

    pub fn set_elo(&mut self, role: EloRole, value: f64) {
        let value = value.max(MIN_ELO);
        match role {
            EloRole::Batting => self.batting_elo = value,
            EloRole::Pitching => self.pitching_elo = value
        }
    }
}
