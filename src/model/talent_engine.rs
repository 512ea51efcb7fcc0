use serde::{Deserialize, Serialize};

use crate::model::{
    constants::MIN_RELIABILITY,
    structures::{
        dimension::{BatterDimension, PitcherDimension, N_BATTER_DIMENSIONS, N_PITCHER_DIMENSIONS},
        plate_appearance::PlateAppearance,
        result_type::ResultType
    },
    talent_config::{BatterWeights, TalentConfig},
    talent_state::{BatterTalentState, DualTalentState, PitcherTalentState}
};

/// Per-facet rating changes produced by one plate appearance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TalentUpdateResult {
    pub batter_deltas: [f64; N_BATTER_DIMENSIONS],
    pub pitcher_deltas: [f64; N_PITCHER_DIMENSIONS],
    pub batter_after: [f64; N_BATTER_DIMENSIONS],
    pub pitcher_after: [f64; N_PITCHER_DIMENSIONS],
    pub result_type: Option<ResultType>,
    pub is_clutch: bool,
    pub clutch_multiplier: f64
}

/// Logistic win expectancy of `rating` against `opponent`.
pub fn expected_score(rating: f64, opponent: f64, divisor: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / divisor))
}

/// Ramps from `MIN_RELIABILITY` at zero events to 1.0 at `threshold` events.
pub fn reliability(event_count: u32, threshold: f64) -> f64 {
    let progress = (event_count as f64 / threshold).min(1.0);
    MIN_RELIABILITY + (1.0 - MIN_RELIABILITY) * progress
}

fn facet_delta(k: f64, scale: f64, weight: f64, expected: f64, reliability: f64) -> f64 {
    let actual = if weight > 0.0 { 1.0 } else { 0.0 };
    k * scale * weight.abs() * (actual - expected) * reliability
}

/// Multi-facet matchup model. Each facet is an independent ELO contest
/// against the opposing facet it maps to; the exchange is not zero-sum.
pub struct TalentEngine<'a> {
    config: &'a TalentConfig
}

impl<'a> TalentEngine<'a> {
    pub fn new(config: &'a TalentConfig) -> TalentEngine<'a> {
        TalentEngine { config }
    }

    pub fn config(&self) -> &TalentConfig {
        self.config
    }

    /// Leverage multiplier applied to the clutch facet weight.
    pub fn clutch_multiplier(&self, leverage: f64, risp: bool, weights: &BatterWeights) -> f64 {
        let clutch = &self.config.clutch;
        let mut multiplier = if leverage <= 1.0 {
            0.0
        } else {
            (leverage / 2.0).min(clutch.max_multiplier)
        };

        if risp && multiplier == 0.0 {
            multiplier = clutch.risp_multiplier;
        }

        multiplier * weights.clutch_multiplier
    }

    fn clutch_weight(base: f64, multiplier: f64) -> f64 {
        if multiplier > 0.0 {
            base * (1.0 + multiplier)
        } else {
            base * 0.5
        }
    }

    fn batter_divisor(&self, dimension: BatterDimension) -> f64 {
        let own = self.config.batter_params(dimension).logistic_divisor;
        match dimension.opponent() {
            Some(opponent) => (own + self.config.pitcher_params(opponent).logistic_divisor) / 2.0,
            None => own
        }
    }

    fn pitcher_divisor(&self, dimension: PitcherDimension) -> f64 {
        let own = self.config.pitcher_params(dimension).logistic_divisor;
        (own + self.config.batter_params(dimension.opponent()).logistic_divisor) / 2.0
    }

    /// Rates one PA without mutating either player.
    ///
    /// For every facet with a non-zero weight for this result type, the actual
    /// score is 1 for a positive weight and 0 otherwise; the delta scales with
    /// the weight's magnitude and the facet's reliability ramp. Batter speed has
    /// no pitching counterpart and always expects 0.5.
    pub fn calculate(
        &self,
        batter: &BatterTalentState,
        pitcher: &PitcherTalentState,
        result_type: Option<ResultType>,
        leverage: f64,
        risp: bool
    ) -> TalentUpdateResult {
        let batter_weights = self.config.batter_weights(result_type);
        let pitcher_weights = self.config.pitcher_weights(result_type);
        let clutch_multiplier = self.clutch_multiplier(leverage, risp, &batter_weights);
        let is_clutch = leverage > self.config.clutch.leverage_threshold || risp;

        let mut batter_deltas = [0.0; N_BATTER_DIMENSIONS];
        for dimension in BatterDimension::ALL {
            let mut weight = batter_weights.weight(dimension);
            if dimension == BatterDimension::Clutch {
                weight = Self::clutch_weight(weight, clutch_multiplier);
            }
            if weight == 0.0 {
                continue;
            }

            let params = self.config.batter_params(dimension);
            let expected = match dimension.opponent() {
                Some(opponent) => expected_score(
                    batter.elo(dimension),
                    pitcher.elo(opponent),
                    self.batter_divisor(dimension)
                ),
                None => 0.5
            };
            let r = reliability(batter.event_count(dimension), params.reliability_threshold);

            batter_deltas[dimension.index()] = facet_delta(params.k, params.scale, weight, expected, r);
        }

        let mut pitcher_deltas = [0.0; N_PITCHER_DIMENSIONS];
        for dimension in PitcherDimension::ALL {
            let mut weight = pitcher_weights.weight(dimension);
            if dimension == PitcherDimension::Clutch {
                weight = Self::clutch_weight(weight, clutch_multiplier);
            }
            if weight == 0.0 {
                continue;
            }

            let params = self.config.pitcher_params(dimension);
            let expected = expected_score(
                pitcher.elo(dimension),
                batter.elo(dimension.opponent()),
                self.pitcher_divisor(dimension)
            );
            let r = reliability(pitcher.event_count(dimension), params.reliability_threshold);

            pitcher_deltas[dimension.index()] = facet_delta(params.k, params.scale, weight, expected, r);
        }

        let mut batter_after = batter.clone();
        batter_after.apply_deltas(&batter_deltas);
        let mut pitcher_after = pitcher.clone();
        pitcher_after.apply_deltas(&pitcher_deltas);

        TalentUpdateResult {
            batter_deltas,
            pitcher_deltas,
            batter_after: batter_after.elo_dimensions,
            pitcher_after: pitcher_after.elo_dimensions,
            result_type,
            is_clutch,
            clutch_multiplier
        }
    }

    /// Rates a PA on the season ratings and applies the same deltas to both
    /// the season and career halves of each player.
    pub fn process_plate_appearance(
        &self,
        batter: &mut DualTalentState<N_BATTER_DIMENSIONS>,
        pitcher: &mut DualTalentState<N_PITCHER_DIMENSIONS>,
        pa: &PlateAppearance
    ) -> TalentUpdateResult {
        let result = self.calculate(
            &batter.season,
            &pitcher.season,
            pa.result_type,
            pa.leverage(),
            pa.is_risp()
        );

        batter.apply_deltas(&result.batter_deltas);
        pitcher.apply_deltas(&result.pitcher_deltas);

        result
    }
}
