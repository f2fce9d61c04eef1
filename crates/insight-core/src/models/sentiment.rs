use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 5-point satisfaction scale attached to every insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "very dissatisfied")]
    VeryDissatisfied,
    #[serde(rename = "dissatisfied")]
    Dissatisfied,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "satisfied")]
    Satisfied,
    #[serde(rename = "very satisfied")]
    VerySatisfied,
}

impl Sentiment {
    pub const ALL: [Sentiment; 5] = [
        Self::VeryDissatisfied,
        Self::Dissatisfied,
        Self::Neutral,
        Self::Satisfied,
        Self::VerySatisfied,
    ];

    /// Whether this sentiment counts toward a cluster's negative share.
    pub fn is_negative(self) -> bool {
        matches!(self, Self::VeryDissatisfied | Self::Dissatisfied)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryDissatisfied => "very dissatisfied",
            Self::Dissatisfied => "dissatisfied",
            Self::Neutral => "neutral",
            Self::Satisfied => "satisfied",
            Self::VerySatisfied => "very satisfied",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| format!("unknown sentiment: {s}"))
    }
}
