use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::warn;

/// Canonical outcome label of a plate appearance.
///
/// Labels are produced upstream by the event mapper; the serialized form
/// (`"HR"`, `"StrikeOut"`, ...) is the wire vocabulary.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, AsRefStr)]
pub enum ResultType {
    #[serde(rename = "HR")]
    #[strum(serialize = "HR")]
    HomeRun,
    Triple,
    Double,
    Single,
    #[serde(rename = "OUT")]
    #[strum(serialize = "OUT")]
    Out,
    #[serde(rename = "GIDP")]
    #[strum(serialize = "GIDP")]
    GroundIntoDoublePlay,
    #[serde(rename = "FC")]
    #[strum(serialize = "FC")]
    FieldersChoice,
    StrikeOut,
    #[serde(rename = "BB")]
    #[strum(serialize = "BB")]
    Walk,
    #[serde(rename = "IBB")]
    #[strum(serialize = "IBB")]
    IntentionalWalk,
    #[serde(rename = "HBP")]
    #[strum(serialize = "HBP")]
    HitByPitch,
    #[serde(rename = "SAC")]
    #[strum(serialize = "SAC")]
    Sacrifice,
    #[serde(rename = "E")]
    #[strum(serialize = "E")]
    FieldError
}

impl ResultType {
    /// Parses a label, accepting `FIELD_ERROR` as an alias of `E`.
    pub fn from_label(label: &str) -> Option<ResultType> {
        match label {
            "FIELD_ERROR" => Some(ResultType::FieldError),
            _ => ResultType::from_str(label).ok()
        }
    }

    pub fn is_field_error(&self) -> bool {
        matches!(self, ResultType::FieldError)
    }
}

/// Deserializes an optional label, mapping anything unrecognized to `None`.
///
/// Unknown labels are not an error: the calculators fall back to their
/// defaults for a missing result type.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<ResultType>, D::Error>
where
    D: Deserializer<'de>
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.and_then(|l| {
        let parsed = ResultType::from_label(&l);
        if parsed.is_none() {
            warn!("Unknown result type label {:?}, treating as absent", l);
        }
        parsed
    }))
}
