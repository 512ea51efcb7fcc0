use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::ProcessorError,
    model::{constants::NEUTRAL_PARK_FACTOR, structures::plate_appearance::PlateAppearance}
};

pub const N_BASE_OUT_STATES: usize = 24;

/// One row of the run-expectancy baseline table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BaselineRow {
    pub base_out_state: u8,
    #[serde(default)]
    pub state_name: String,
    #[serde(default)]
    pub sample_size: u64,
    pub mean_rv: f64
}

/// Expected run value for each base-out state.
///
/// Subtracting the baseline removes the part of a PA's run value that is
/// explained by the situation alone, leaving the batter/pitcher signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Re24Baseline {
    expected: IndexMap<u8, f64>
}

impl Re24Baseline {
    pub fn from_rows(rows: &[BaselineRow]) -> Re24Baseline {
        Re24Baseline {
            expected: rows.iter().map(|r| (r.base_out_state, r.mean_rv)).collect()
        }
    }

    /// Unknown states have a baseline of zero.
    pub fn expected_rv(&self, base_out_state: u8) -> f64 {
        self.expected.get(&base_out_state).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    /// Mean run value per base-out state over the PAs that carry one.
    /// States with no samples are omitted.
    ///
    /// Fails on the first malformed PA.
    pub fn derive(plate_appearances: &[PlateAppearance]) -> Result<Vec<BaselineRow>, ProcessorError> {
        let mut sums = [(0u64, 0.0f64); N_BASE_OUT_STATES];
        for pa in plate_appearances {
            pa.validate()?;
            let Some(rv) = pa.run_value() else {
                continue;
            };
            let state = pa.base_out_state() as usize;
            sums[state].0 += 1;
            sums[state].1 += rv;
        }

        Ok(sums
            .iter()
            .enumerate()
            .filter(|(_, (n, _))| *n > 0)
            .map(|(state, (n, total))| BaselineRow {
                base_out_state: state as u8,
                state_name: state_name(state as u8),
                sample_size: *n,
                mean_rv: total / *n as f64
            })
            .collect())
    }
}

/// Human readable name of a base-out state, e.g. `"1B-2B 1Out"`.
pub fn state_name(base_out_state: u8) -> String {
    let runners = match base_out_state & 0b111 {
        0 => "Empty",
        1 => "1B",
        2 => "2B",
        3 => "1B-2B",
        4 => "3B",
        5 => "1B-3B",
        6 => "2B-3B",
        _ => "Loaded"
    };

    format!("{} {}Out", runners, base_out_state >> 3)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParkFactorRow {
    pub team: String,
    pub park_factor: f64
}

/// Run environment of each home park, 1.0 being neutral.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParkFactor {
    factors: IndexMap<String, f64>
}

impl ParkFactor {
    pub fn from_rows(rows: &[ParkFactorRow]) -> ParkFactor {
        ParkFactor {
            factors: rows.iter().map(|r| (r.team.clone(), r.park_factor)).collect()
        }
    }

    /// Unknown teams are neutral.
    pub fn factor(&self, team: &str) -> f64 {
        self.factors.get(team).copied().unwrap_or(NEUTRAL_PARK_FACTOR)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
