use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub const N_BATTER_DIMENSIONS: usize = 5;
pub const N_PITCHER_DIMENSIONS: usize = 4;

/// Batter skill facets, in storage order.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display, AsRefStr
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BatterDimension {
    Contact = 0,
    Power = 1,
    Discipline = 2,
    Speed = 3,
    Clutch = 4
}

/// Pitcher skill facets, in storage order.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display, AsRefStr
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PitcherDimension {
    Stuff = 0,
    BipSuppression = 1,
    Command = 2,
    Clutch = 3
}

impl BatterDimension {
    pub const ALL: [BatterDimension; N_BATTER_DIMENSIONS] = [
        BatterDimension::Contact,
        BatterDimension::Power,
        BatterDimension::Discipline,
        BatterDimension::Speed,
        BatterDimension::Clutch
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The pitcher facet this batter facet is matched up against.
    /// Speed has no pitching counterpart.
    pub fn opponent(self) -> Option<PitcherDimension> {
        match self {
            BatterDimension::Contact => Some(PitcherDimension::Stuff),
            BatterDimension::Power => Some(PitcherDimension::BipSuppression),
            BatterDimension::Discipline => Some(PitcherDimension::Command),
            BatterDimension::Speed => None,
            BatterDimension::Clutch => Some(PitcherDimension::Clutch)
        }
    }
}

impl PitcherDimension {
    pub const ALL: [PitcherDimension; N_PITCHER_DIMENSIONS] = [
        PitcherDimension::Stuff,
        PitcherDimension::BipSuppression,
        PitcherDimension::Command,
        PitcherDimension::Clutch
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The batter facet this pitcher facet is matched up against.
    /// Both stuff and BIP suppression face contact.
    pub fn opponent(self) -> BatterDimension {
        match self {
            PitcherDimension::Stuff => BatterDimension::Contact,
            PitcherDimension::BipSuppression => BatterDimension::Contact,
            PitcherDimension::Command => BatterDimension::Discipline,
            PitcherDimension::Clutch => BatterDimension::Clutch
        }
    }
}

/// A single tracked facet of either role. Used to key per-facet
/// OHLC streams so a two-way player's clutch facets stay separate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(tag = "player_role", content = "talent_type", rename_all = "snake_case")]
pub enum TalentFacet {
    Batter(BatterDimension),
    Pitcher(PitcherDimension)
}
