use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::hash::Hash;

use crate::{
    error::ProcessorError,
    model::{
        constants::*,
        structures::{
            dimension::{BatterDimension, PitcherDimension, N_BATTER_DIMENSIONS, N_PITCHER_DIMENSIONS},
            player_role::PitcherRole,
            result_type::ResultType
        }
    }
};

/// Update parameters for one facet.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DimensionParams {
    pub k: f64,
    pub scale: f64,
    /// Event count at which the reliability ramp reaches 1.0
    pub reliability_threshold: f64,
    pub logistic_divisor: f64
}

impl Default for DimensionParams {
    fn default() -> Self {
        DimensionParams {
            k: DEFAULT_DIMENSION_K,
            scale: DEFAULT_DIMENSION_SCALE,
            reliability_threshold: DEFAULT_RELIABILITY_THRESHOLD,
            logistic_divisor: DEFAULT_LOGISTIC_DIVISOR
        }
    }
}

impl DimensionParams {
    const fn new(k: f64, scale: f64, reliability_threshold: f64, logistic_divisor: f64) -> Self {
        DimensionParams {
            k,
            scale,
            reliability_threshold,
            logistic_divisor
        }
    }
}

/// Partial facet parameters from a JSON override. Unset fields keep the
/// facet's built-in value.
#[derive(Deserialize, Debug, Clone, Copy, Default)]
#[serde(default)]
struct DimensionParamsOverride {
    k: Option<f64>,
    scale: Option<f64>,
    reliability_threshold: Option<f64>,
    logistic_divisor: Option<f64>
}

impl DimensionParamsOverride {
    fn apply(self, base: DimensionParams) -> DimensionParams {
        DimensionParams {
            k: self.k.unwrap_or(base.k),
            scale: self.scale.unwrap_or(base.scale),
            reliability_threshold: self.reliability_threshold.unwrap_or(base.reliability_threshold),
            logistic_divisor: self.logistic_divisor.unwrap_or(base.logistic_divisor)
        }
    }
}

fn merge_params<K: Hash + Eq>(
    mut table: IndexMap<K, DimensionParams>,
    overrides: IndexMap<K, DimensionParamsOverride>
) -> IndexMap<K, DimensionParams> {
    for (dimension, partial) in overrides {
        let base = table.get(&dimension).copied().unwrap_or_default();
        table.insert(dimension, partial.apply(base));
    }

    table
}

fn merge_batter_dimensions<'de, D>(deserializer: D) -> Result<IndexMap<BatterDimension, DimensionParams>, D::Error>
where
    D: Deserializer<'de>
{
    let overrides = IndexMap::deserialize(deserializer)?;
    Ok(merge_params(TalentConfig::default().batter_dimensions, overrides))
}

fn merge_pitcher_dimensions<'de, D>(deserializer: D) -> Result<IndexMap<PitcherDimension, DimensionParams>, D::Error>
where
    D: Deserializer<'de>
{
    let overrides = IndexMap::deserialize(deserializer)?;
    Ok(merge_params(TalentConfig::default().pitcher_dimensions, overrides))
}

fn merge_batter_weights<'de, D>(deserializer: D) -> Result<IndexMap<ResultType, BatterWeights>, D::Error>
where
    D: Deserializer<'de>
{
    let overrides = IndexMap::<ResultType, BatterWeights>::deserialize(deserializer)?;
    let mut table = TalentConfig::default().batter_weights;
    table.extend(overrides);

    Ok(table)
}

fn merge_pitcher_weights<'de, D>(deserializer: D) -> Result<IndexMap<ResultType, PitcherWeights>, D::Error>
where
    D: Deserializer<'de>
{
    let overrides = IndexMap::<ResultType, PitcherWeights>::deserialize(deserializer)?;
    let mut table = TalentConfig::default().pitcher_weights;
    table.extend(overrides);

    Ok(table)
}

/// Batter facet weights for one result type. Zero means "not affected".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BatterWeights {
    pub contact: f64,
    pub power: f64,
    pub discipline: f64,
    pub speed: f64,
    /// Base weight of the clutch facet before leverage scaling
    pub clutch_base: f64,
    /// Scales the leverage multiplier for this result (e.g. double plays)
    pub clutch_multiplier: f64
}

impl Default for BatterWeights {
    fn default() -> Self {
        BatterWeights {
            contact: 0.0,
            power: 0.0,
            discipline: 0.0,
            speed: 0.0,
            clutch_base: 0.0,
            clutch_multiplier: 1.0
        }
    }
}

impl BatterWeights {
    pub fn weight(&self, dimension: BatterDimension) -> f64 {
        match dimension {
            BatterDimension::Contact => self.contact,
            BatterDimension::Power => self.power,
            BatterDimension::Discipline => self.discipline,
            BatterDimension::Speed => self.speed,
            BatterDimension::Clutch => self.clutch_base
        }
    }
}

/// Pitcher facet weights for one result type.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(default)]
pub struct PitcherWeights {
    pub stuff: f64,
    pub bip_suppression: f64,
    pub command: f64,
    pub clutch_base: f64
}

impl PitcherWeights {
    pub fn weight(&self, dimension: PitcherDimension) -> f64 {
        match dimension {
            PitcherDimension::Stuff => self.stuff,
            PitcherDimension::BipSuppression => self.bip_suppression,
            PitcherDimension::Command => self.command,
            PitcherDimension::Clutch => self.clutch_base
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ClutchConfig {
    /// Leverage above which a PA counts as a clutch situation
    pub leverage_threshold: f64,
    pub max_multiplier: f64,
    pub risp_multiplier: f64
}

impl Default for ClutchConfig {
    fn default() -> Self {
        ClutchConfig {
            leverage_threshold: LEVERAGE_THRESHOLD,
            max_multiplier: MAX_CLUTCH_MULTIPLIER,
            risp_multiplier: RISP_CLUTCH_MULTIPLIER
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CompositeWeights {
    pub batter: [f64; N_BATTER_DIMENSIONS],
    pub starter: [f64; N_PITCHER_DIMENSIONS],
    pub reliever: [f64; N_PITCHER_DIMENSIONS],
    pub closer: [f64; N_PITCHER_DIMENSIONS]
}

impl Default for CompositeWeights {
    fn default() -> Self {
        CompositeWeights {
            batter: [0.2; N_BATTER_DIMENSIONS],
            starter: [0.25, 0.20, 0.40, 0.15],
            reliever: [0.35, 0.20, 0.30, 0.15],
            closer: [0.35, 0.25, 0.25, 0.15]
        }
    }
}

impl CompositeWeights {
    pub fn pitcher(&self, role: PitcherRole) -> &[f64; N_PITCHER_DIMENSIONS] {
        match role {
            PitcherRole::Starter => &self.starter,
            PitcherRole::Reliever => &self.reliever,
            PitcherRole::Closer => &self.closer
        }
    }
}

/// Weighting tables of the multi-facet model.
///
/// A JSON override is merged into the defaults. Facet parameters merge per
/// field, and a weight entry replaces the default row for its result type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TalentConfig {
    #[serde(deserialize_with = "merge_batter_dimensions")]
    pub batter_dimensions: IndexMap<BatterDimension, DimensionParams>,
    #[serde(deserialize_with = "merge_pitcher_dimensions")]
    pub pitcher_dimensions: IndexMap<PitcherDimension, DimensionParams>,
    #[serde(deserialize_with = "merge_batter_weights")]
    pub batter_weights: IndexMap<ResultType, BatterWeights>,
    #[serde(deserialize_with = "merge_pitcher_weights")]
    pub pitcher_weights: IndexMap<ResultType, PitcherWeights>,
    pub clutch: ClutchConfig,
    pub composite: CompositeWeights
}

fn batter(contact: f64, power: f64, discipline: f64, speed: f64, clutch_base: f64) -> BatterWeights {
    BatterWeights {
        contact,
        power,
        discipline,
        speed,
        clutch_base,
        clutch_multiplier: 1.0
    }
}

fn pitcher(stuff: f64, bip_suppression: f64, command: f64, clutch_base: f64) -> PitcherWeights {
    PitcherWeights {
        stuff,
        bip_suppression,
        command,
        clutch_base
    }
}

impl Default for TalentConfig {
    fn default() -> Self {
        use ResultType::*;

        let batter_dimensions = IndexMap::from([
            (BatterDimension::Contact, DimensionParams::new(12.0, 5.0, 400.0, 127.0)),
            (BatterDimension::Power, DimensionParams::new(14.4, 10.0, 300.0, 150.0)),
            (BatterDimension::Discipline, DimensionParams::new(12.0, 5.0, 300.0, 127.0)),
            (BatterDimension::Speed, DimensionParams::new(36.0, 5.0, 50.0, 400.0)),
            (BatterDimension::Clutch, DimensionParams::new(12.0, 5.0, 100.0, 400.0))
        ]);
        let pitcher_dimensions = IndexMap::from([
            (PitcherDimension::Stuff, DimensionParams::new(12.0, 5.0, 400.0, 127.0)),
            (PitcherDimension::BipSuppression, DimensionParams::new(4.0, 3.0, 600.0, 200.0)),
            (PitcherDimension::Command, DimensionParams::new(12.0, 5.0, 400.0, 127.0)),
            (PitcherDimension::Clutch, DimensionParams::new(12.0, 5.0, 100.0, 400.0))
        ]);

        let batter_weights = IndexMap::from([
            (HomeRun, batter(0.2, 1.0, 0.0, 0.0, 0.5)),
            (Triple, batter(0.5, 0.6, 0.0, 0.8, 0.4)),
            (Double, batter(0.6, 0.5, 0.0, 0.2, 0.3)),
            (Single, batter(1.0, 0.0, 0.0, 0.0, 0.3)),
            (Out, batter(-0.3, 0.0, 0.0, 0.0, -0.2)),
            (
                GroundIntoDoublePlay,
                BatterWeights {
                    clutch_multiplier: 1.5,
                    ..batter(-0.4, 0.0, 0.0, -0.3, -0.5)
                }
            ),
            (FieldersChoice, batter(-0.2, 0.0, 0.0, 0.0, 0.0)),
            (StrikeOut, batter(-1.0, 0.0, 0.0, 0.0, -0.3)),
            (Walk, batter(0.0, 0.0, 1.0, 0.0, 0.0)),
            (IntentionalWalk, batter(0.0, 0.0, 0.2, 0.0, 0.0)),
            (HitByPitch, batter(0.0, 0.0, 0.0, 0.0, 0.0)),
            (Sacrifice, batter(0.0, 0.0, 0.0, 0.0, 0.1)),
            (FieldError, batter(0.1, 0.0, 0.0, 0.0, 0.0))
        ]);
        let pitcher_weights = IndexMap::from([
            (StrikeOut, pitcher(1.0, 0.0, 0.3, 0.3)),
            (Walk, pitcher(0.0, 0.0, -1.0, 0.0)),
            (IntentionalWalk, pitcher(0.0, 0.0, -0.1, 0.0)),
            (HitByPitch, pitcher(0.0, 0.0, -0.5, 0.0)),
            (HomeRun, pitcher(-0.8, -0.5, 0.0, -0.5)),
            (Triple, pitcher(0.0, -0.4, 0.0, -0.3)),
            (Double, pitcher(-0.2, -0.4, 0.0, -0.3)),
            (Single, pitcher(0.0, -0.3, 0.0, -0.3)),
            (Out, pitcher(0.0, 0.3, 0.0, 0.2)),
            (GroundIntoDoublePlay, pitcher(0.0, 0.5, 0.0, 0.5)),
            (FieldersChoice, pitcher(0.0, 0.2, 0.0, 0.0)),
            (Sacrifice, pitcher(0.0, 0.1, 0.0, 0.0)),
            (FieldError, pitcher(0.0, -0.1, 0.0, 0.0))
        ]);

        TalentConfig {
            batter_dimensions,
            pitcher_dimensions,
            batter_weights,
            pitcher_weights,
            clutch: ClutchConfig::default(),
            composite: CompositeWeights::default()
        }
    }
}

impl TalentConfig {
    pub fn batter_params(&self, dimension: BatterDimension) -> DimensionParams {
        self.batter_dimensions.get(&dimension).copied().unwrap_or_default()
    }

    pub fn pitcher_params(&self, dimension: PitcherDimension) -> DimensionParams {
        self.pitcher_dimensions.get(&dimension).copied().unwrap_or_default()
    }

    /// All-zero weights for an absent or unlisted result type.
    pub fn batter_weights(&self, result_type: Option<ResultType>) -> BatterWeights {
        result_type
            .and_then(|r| self.batter_weights.get(&r).copied())
            .unwrap_or_default()
    }

    pub fn pitcher_weights(&self, result_type: Option<ResultType>) -> PitcherWeights {
        result_type
            .and_then(|r| self.pitcher_weights.get(&r).copied())
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ProcessorError> {
        let params = self
            .batter_dimensions
            .iter()
            .map(|(d, p)| (format!("batter {}", d), p))
            .chain(self.pitcher_dimensions.iter().map(|(d, p)| (format!("pitcher {}", d), p)));

        for (name, p) in params {
            if p.logistic_divisor <= 0.0 {
                return Err(ProcessorError::InvalidConfig(format!(
                    "{} logistic_divisor must be positive",
                    name
                )));
            }
            if p.reliability_threshold <= 0.0 {
                return Err(ProcessorError::InvalidConfig(format!(
                    "{} reliability_threshold must be positive",
                    name
                )));
            }
        }
        if self.clutch.max_multiplier < 0.0 || self.clutch.risp_multiplier < 0.0 {
            return Err(ProcessorError::InvalidConfig(
                "clutch multipliers must be non-negative".to_string()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_anchor_weights() {
        let config = TalentConfig::default();

        let hr = config.batter_weights(Some(ResultType::HomeRun));
        assert_eq!(hr.power, 1.0);
        assert_eq!(hr.contact, 0.2);
        assert_eq!(hr.discipline, 0.0);

        let k = config.batter_weights(Some(ResultType::StrikeOut));
        assert_eq!(k.contact, -1.0);
        assert_eq!(k.discipline, 0.0);

        let bb = config.pitcher_weights(Some(ResultType::Walk));
        assert_eq!(bb.command, -1.0);
        assert_eq!(bb.stuff, 0.0);

        assert_eq!(config.batter_weights(Some(ResultType::Triple)).speed, 0.8);
        assert_eq!(config.pitcher_weights(Some(ResultType::FieldError)).bip_suppression, -0.1);
    }

    #[test]
    fn test_missing_result_type_has_zero_weights() {
        let config = TalentConfig::default();
        let weights = config.batter_weights(None);
        for d in BatterDimension::iter() {
            assert_eq!(weights.weight(d), 0.0);
        }
        assert_eq!(weights.clutch_multiplier, 1.0);
        assert_eq!(config.pitcher_weights(None), PitcherWeights::default());
    }

    #[test]
    fn test_every_result_type_is_weighted() {
        let config = TalentConfig::default();
        for r in ResultType::iter() {
            assert!(config.batter_weights.contains_key(&r), "missing batter weights for {}", r);
            assert!(config.pitcher_weights.contains_key(&r), "missing pitcher weights for {}", r);
        }
    }

    #[test]
    fn test_missing_dimension_uses_defaults() {
        let mut config = TalentConfig::default();
        config.batter_dimensions.shift_remove(&BatterDimension::Power);
        assert_eq!(config.batter_params(BatterDimension::Power), DimensionParams::default());
        assert_eq!(config.batter_params(BatterDimension::Contact).logistic_divisor, 127.0);
    }

    #[test]
    fn test_dimension_override_merges_per_field() {
        let config: TalentConfig = serde_json::from_str(r#"{"batter_dimensions": {"power": {"k": 20.0}}}"#).unwrap();

        let power = config.batter_params(BatterDimension::Power);
        assert_eq!(power.k, 20.0);
        assert_eq!(power.scale, 10.0);
        assert_eq!(power.logistic_divisor, 150.0);
        assert_eq!(config.batter_params(BatterDimension::Contact).logistic_divisor, 127.0);
        assert_eq!(config.pitcher_params(PitcherDimension::BipSuppression).k, 4.0);
    }

    #[test]
    fn test_weight_override_keeps_other_rows() {
        let config: TalentConfig =
            serde_json::from_str(r#"{"batter_weights": {"HR": {"power": 2.0}}, "pitcher_weights": {"BB": {"command": -0.5}}}"#)
                .unwrap();

        let hr = config.batter_weights(Some(ResultType::HomeRun));
        assert_eq!(hr.power, 2.0);
        assert_eq!(hr.contact, 0.0);
        assert_eq!(hr.clutch_multiplier, 1.0);
        assert_eq!(config.batter_weights(Some(ResultType::StrikeOut)).contact, -1.0);
        assert_eq!(config.batter_weights(Some(ResultType::GroundIntoDoublePlay)).clutch_multiplier, 1.5);
        assert_eq!(config.pitcher_weights(Some(ResultType::Walk)).command, -0.5);
        assert_eq!(config.pitcher_weights(Some(ResultType::StrikeOut)).stuff, 1.0);
    }

    #[test]
    fn test_composite_weights_sum_to_one() {
        let composite = CompositeWeights::default();
        assert_abs_diff_eq!(composite.batter.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        for role in PitcherRole::iter() {
            assert_abs_diff_eq!(composite.pitcher(role).iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_validate() {
        let mut config = TalentConfig::default();
        assert!(config.validate().is_ok());

        config.pitcher_dimensions.insert(
            PitcherDimension::Command,
            DimensionParams {
                logistic_divisor: 0.0,
                ..DimensionParams::default()
            }
        );
        assert!(config.validate().is_err());
    }
}
