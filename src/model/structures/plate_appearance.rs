use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::ProcessorError,
    model::structures::result_type::{deserialize_lenient, ResultType}
};

/// One plate appearance: a single batter vs. pitcher event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlateAppearance {
    pub pa_id: i64,
    pub game_pk: i64,
    pub game_date: NaiveDate,
    pub batter_id: i32,
    pub pitcher_id: i32,
    /// Unknown labels deserialize to `None`
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub result_type: Option<ResultType>,
    /// Change in run expectancy produced by this PA (the outcome signal)
    #[serde(default)]
    pub delta_run_exp: Option<f64>,
    #[serde(default)]
    pub on_1b: bool,
    #[serde(default)]
    pub on_2b: bool,
    #[serde(default)]
    pub on_3b: bool,
    #[serde(default)]
    pub outs_when_up: u8,
    #[serde(default)]
    pub home_team: String,
    /// Expected wOBA of the batted ball, if tracked
    #[serde(default)]
    pub xwoba: Option<f64>,
    #[serde(default)]
    pub leverage_index: Option<f64>
}

impl PlateAppearance {
    /// Base-out state code in `0..24`: runner bits in the low three bits, outs × 8.
    ///
    /// Out counts above 2 land outside that range (saturating at `u8::MAX`), where
    /// no baseline entry exists.
    pub fn base_out_state(&self) -> u8 {
        let runners = (self.on_1b as u8) | (self.on_2b as u8) << 1 | (self.on_3b as u8) << 2;
        self.outs_when_up.saturating_mul(8).saturating_add(runners)
    }

    /// Runner in scoring position.
    pub fn is_risp(&self) -> bool {
        self.on_2b || self.on_3b
    }

    /// Run value, with NaN treated as missing.
    pub fn run_value(&self) -> Option<f64> {
        self.delta_run_exp.filter(|rv| !rv.is_nan())
    }

    pub fn leverage(&self) -> f64 {
        self.leverage_index.unwrap_or(1.0)
    }

    /// Chronological ordering key.
    pub fn sequence_key(&self) -> (NaiveDate, i64) {
        (self.game_date, self.pa_id)
    }

    pub fn validate(&self) -> Result<(), ProcessorError> {
        let malformed = |reason: String| ProcessorError::MalformedPlateAppearance {
            pa_id: self.pa_id,
            reason
        };

        if self.batter_id == self.pitcher_id {
            return Err(malformed(format!("player {} cannot face themselves", self.batter_id)));
        }
        if self.outs_when_up > 2 {
            return Err(malformed(format!("outs_when_up must be 0-2, got {}", self.outs_when_up)));
        }
        if let Some(li) = self.leverage_index {
            if !li.is_finite() || li < 0.0 {
                return Err(malformed(format!("invalid leverage index {}", li)));
            }
        }
        if let Some(xwoba) = self.xwoba {
            if !xwoba.is_finite() {
                return Err(malformed(format!("invalid xwOBA {}", xwoba)));
            }
        }
        if self.delta_run_exp.is_some_and(|rv| rv.is_infinite()) {
            return Err(malformed("infinite delta_run_exp".to_string()));
        }

        Ok(())
    }
}
