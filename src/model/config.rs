use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::ProcessorError,
    model::{
        constants::*,
        structures::result_type::ResultType
    }
};

/// Parameters of the scalar rating model.
///
/// Missing fields in a JSON override fall back to the built-in defaults.
/// Entries of `event_k_factors` are merged into the default table, while
/// `non_bip` is replaced as a whole.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EloConfig {
    pub initial_elo: f64,
    pub min_elo: f64,
    /// Used when the result type is absent or has no entry in `event_k_factors`
    pub k_factor: f64,
    pub adjustment_scale: f64,
    /// Exchange rate per result type
    #[serde(deserialize_with = "merge_event_k_factors")]
    pub event_k_factors: IndexMap<ResultType, f64>,
    /// Result types without a batted ball; xwOBA never modulates these
    pub non_bip: IndexSet<ResultType>,
    pub league_avg_xwoba: f64,
    pub physics_alpha: f64,
    pub physics_mod_min: f64,
    pub physics_mod_max: f64
}

impl Default for EloConfig {
    fn default() -> Self {
        let event_k_factors = IndexMap::from([
            (ResultType::HomeRun, 15.0),
            (ResultType::Triple, 14.0),
            (ResultType::Double, 12.0),
            (ResultType::Single, 10.0),
            (ResultType::Out, 10.0),
            (ResultType::GroundIntoDoublePlay, 10.0),
            (ResultType::FieldersChoice, 10.0),
            (ResultType::StrikeOut, 6.0),
            (ResultType::Walk, 6.0),
            (ResultType::IntentionalWalk, 3.0),
            (ResultType::HitByPitch, 3.0),
            (ResultType::Sacrifice, 3.0),
            (ResultType::FieldError, 0.0)
        ]);
        let non_bip = IndexSet::from([
            ResultType::StrikeOut,
            ResultType::Walk,
            ResultType::IntentionalWalk,
            ResultType::HitByPitch,
            ResultType::Sacrifice,
            ResultType::FieldError
        ]);

        EloConfig {
            initial_elo: INITIAL_ELO,
            min_elo: MIN_ELO,
            k_factor: K_FACTOR,
            adjustment_scale: ADJUSTMENT_SCALE,
            event_k_factors,
            non_bip,
            league_avg_xwoba: LEAGUE_AVG_XWOBA,
            physics_alpha: PHYSICS_ALPHA,
            physics_mod_min: PHYSICS_MOD_MIN,
            physics_mod_max: PHYSICS_MOD_MAX
        }
    }
}

fn merge_event_k_factors<'de, D>(deserializer: D) -> Result<IndexMap<ResultType, f64>, D::Error>
where
    D: Deserializer<'de>
{
    let overrides = IndexMap::<ResultType, f64>::deserialize(deserializer)?;
    let mut table = EloConfig::default().event_k_factors;
    table.extend(overrides);

    Ok(table)
}

impl EloConfig {
    pub fn k_base(&self, result_type: Option<ResultType>) -> f64 {
        result_type
            .and_then(|r| self.event_k_factors.get(&r).copied())
            .unwrap_or(self.k_factor)
    }

    /// Batted-ball quality multiplier on K.
    ///
    /// Neutral (1.0) for non-BIP results and when xwOBA is unknown; otherwise
    /// scales linearly with xwOBA's relative distance from league average and
    /// is clamped to `[physics_mod_min, physics_mod_max]`.
    pub fn physics_mod(&self, result_type: Option<ResultType>, xwoba: Option<f64>) -> f64 {
        let is_bip = result_type.is_some_and(|r| !self.non_bip.contains(&r));
        match xwoba {
            Some(x) if is_bip => {
                let relative = (x - self.league_avg_xwoba) / self.league_avg_xwoba;
                (1.0 + self.physics_alpha * relative).clamp(self.physics_mod_min, self.physics_mod_max)
            }
            _ => 1.0
        }
    }

    pub fn validate(&self) -> Result<(), ProcessorError> {
        if self.min_elo > self.initial_elo {
            return Err(ProcessorError::InvalidConfig(format!(
                "min_elo {} exceeds initial_elo {}",
                self.min_elo, self.initial_elo
            )));
        }
        if self.physics_mod_min > self.physics_mod_max {
            return Err(ProcessorError::InvalidConfig(
                "physics_mod_min must not exceed physics_mod_max".to_string()
            ));
        }
        if self.league_avg_xwoba <= 0.0 {
            return Err(ProcessorError::InvalidConfig(
                "league_avg_xwoba must be positive".to_string()
            ));
        }
        if let Some((r, k)) = self.event_k_factors.iter().find(|(_, k)| **k < 0.0) {
            return Err(ProcessorError::InvalidConfig(format!("negative K {} for {}", k, r)));
        }

        Ok(())
    }
}
