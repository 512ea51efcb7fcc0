use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Which scalar rating a plate appearance moves.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EloRole {
    Batting,
    Pitching
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display, AsRefStr
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlayerRole {
    Batter,
    Pitcher
}

/// Pitcher usage, selects the composite weighting.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, EnumString, Display, AsRefStr
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PitcherRole {
    #[default]
    Starter,
    Reliever,
    Closer
}

impl PitcherRole {
    /// Unrecognized labels fall back to starter.
    pub fn from_label(label: &str) -> PitcherRole {
        PitcherRole::from_str(&label.to_ascii_lowercase()).unwrap_or_default()
    }
}
