use serde::{Deserialize, Serialize};

use crate::model::{
    config::EloConfig,
    corrections::{ParkFactor, Re24Baseline},
    structures::{player_elo_state::PlayerEloState, plate_appearance::PlateAppearance, player_role::EloRole}
};

/// Outcome of rating a single plate appearance on the scalar model.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EloUpdateResult {
    pub batter_elo_before: f64,
    pub batter_elo_after: f64,
    pub pitcher_elo_before: f64,
    pub pitcher_elo_after: f64,
    /// Batter delta before the field-error override
    pub raw_delta: f64,
    pub batter_delta: f64,
    pub pitcher_delta: f64,
    /// Run value after park and base-out corrections; `None` without a signal
    pub rv_diff: Option<f64>,
    pub k_base: f64,
    pub physics_mod: f64,
    pub k_effective: f64
}

/// Zero-sum run-value ELO between batter and pitcher.
///
/// Correction providers are optional; a missing provider skips its step.
pub struct EloCalculator<'a> {
    config: &'a EloConfig,
    baseline: Option<&'a Re24Baseline>,
    park_factor: Option<&'a ParkFactor>
}

impl<'a> EloCalculator<'a> {
    pub fn new(
        config: &'a EloConfig,
        baseline: Option<&'a Re24Baseline>,
        park_factor: Option<&'a ParkFactor>
    ) -> EloCalculator<'a> {
        EloCalculator {
            config,
            baseline,
            park_factor
        }
    }

    pub fn config(&self) -> &EloConfig {
        self.config
    }

    /// Run value net of park and situation.
    pub fn rv_diff(&self, pa: &PlateAppearance, rv: f64) -> f64 {
        let adjusted = match self.park_factor {
            Some(parks) => rv - (parks.factor(&pa.home_team) - 1.0) * self.config.adjustment_scale,
            None => rv
        };

        match self.baseline {
            Some(baseline) => adjusted - baseline.expected_rv(pa.base_out_state()),
            None => adjusted
        }
    }

    /// Computes the rating change for a PA without touching either state.
    ///
    /// Steps:
    /// 1. Correct the run value for park and base-out state.
    /// 2. Scale by the result type's K, modulated by batted-ball quality.
    /// 3. Give the pitcher the exact negative of the batter's delta.
    /// 4. On a field error the batter gains nothing and the pitcher loses nothing.
    /// 5. Apply the deltas with the rating floor.
    pub fn calculate(&self, batter: &PlayerEloState, pitcher: &PlayerEloState, pa: &PlateAppearance) -> EloUpdateResult {
        let k_base = self.config.k_base(pa.result_type);
        let physics_mod = self.config.physics_mod(pa.result_type, pa.xwoba);
        let k_effective = k_base * physics_mod;

        let rv_diff = pa.run_value().map(|rv| self.rv_diff(pa, rv));
        let raw_delta = rv_diff.map(|d| k_effective * d).unwrap_or(0.0);

        let mut batter_delta = raw_delta;
        let mut pitcher_delta = -raw_delta;
        if pa.result_type.is_some_and(|r| r.is_field_error()) {
            if batter_delta > 0.0 {
                batter_delta = 0.0;
            }
            if pitcher_delta < 0.0 {
                pitcher_delta = 0.0;
            }
        }

        EloUpdateResult {
            batter_elo_before: batter.batting_elo,
            batter_elo_after: (batter.batting_elo + batter_delta).max(self.config.min_elo),
            pitcher_elo_before: pitcher.pitching_elo,
            pitcher_elo_after: (pitcher.pitching_elo + pitcher_delta).max(self.config.min_elo),
            raw_delta,
            batter_delta,
            pitcher_delta,
            rv_diff,
            k_base,
            physics_mod,
            k_effective
        }
    }

    /// Rates the PA and writes the result into both states.
    ///
    /// PA counters advance even when the PA carries no run value.
    pub fn apply(&self, batter: &mut PlayerEloState, pitcher: &mut PlayerEloState, pa: &PlateAppearance) -> EloUpdateResult {
        let result = self.calculate(batter, pitcher, pa);

        batter.set_elo(EloRole::Batting, result.batter_elo_after);
        pitcher.set_elo(EloRole::Pitching, result.pitcher_elo_after);
        batter.batting_pa += 1;
        pitcher.pitching_pa += 1;

        if let Some(rv) = pa.run_value() {
            batter.cumulative_rv += rv;
            pitcher.cumulative_rv -= rv;
        }

        result
    }
}
