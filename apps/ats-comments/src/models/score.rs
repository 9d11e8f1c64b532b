use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// The four fixed review levels. Scores are never interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ScoreLevel {
    Prohibited,
    NotRecommended,
    Recommended,
    Favorite,
}

impl ScoreLevel {
    pub const ALL: [ScoreLevel; 4] = [
        ScoreLevel::Prohibited,
        ScoreLevel::NotRecommended,
        ScoreLevel::Recommended,
        ScoreLevel::Favorite,
    ];

    pub fn value(self) -> u8 {
        match self {
            ScoreLevel::Prohibited => 0,
            ScoreLevel::NotRecommended => 3,
            ScoreLevel::Recommended => 6,
            ScoreLevel::Favorite => 10,
        }
    }

    /// Icon key used by the list rows.
    pub fn icon(self) -> &'static str {
        match self {
            ScoreLevel::Prohibited => "prohibited",
            ScoreLevel::NotRecommended => "not-recommended",
            ScoreLevel::Recommended => "recommended",
            ScoreLevel::Favorite => "favorite",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreLevel::Prohibited => "Prohibited",
            ScoreLevel::NotRecommended => "Not recommended",
            ScoreLevel::Recommended => "Recommended",
            ScoreLevel::Favorite => "Favorite",
        }
    }
}

impl TryFrom<u8> for ScoreLevel {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ScoreLevel::ALL
            .into_iter()
            .find(|level| level.value() == value)
            .ok_or(ValidationError::InvalidScore(value))
    }
}

impl From<ScoreLevel> for u8 {
    fn from(level: ScoreLevel) -> Self {
        level.value()
    }
}
