use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Which half of a dual rating a record refers to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EloType {
    #[default]
    Season,
    Career
}
