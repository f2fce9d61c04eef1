use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Estimated business impact of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// How soon a cluster should be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Immediate,
    Soon,
    Later,
}

/// Fraction at or above which a cluster is rated high/immediate by default.
const HIGH_FRACTION: f64 = 0.7;
/// Fraction at or above which a cluster is rated medium/soon by default.
const MEDIUM_FRACTION: f64 = 0.4;

impl Impact {
    /// Rating used when no AI enrichment is available.
    pub fn from_negative_fraction(fraction: f64) -> Self {
        if fraction >= HIGH_FRACTION {
            Self::High
        } else if fraction >= MEDIUM_FRACTION {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Urgency {
    /// Rating used when no AI enrichment is available.
    pub fn from_negative_fraction(fraction: f64) -> Self {
        if fraction >= HIGH_FRACTION {
            Self::Immediate
        } else if fraction >= MEDIUM_FRACTION {
            Self::Soon
        } else {
            Self::Later
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Soon => "soon",
            Self::Later => "later",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Impact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown impact: {other}")),
        }
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(Self::Immediate),
            "soon" => Ok(Self::Soon),
            "later" => Ok(Self::Later),
            other => Err(format!("unknown urgency: {other}")),
        }
    }
}

/// Structured result requested from the generative-AI service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation: String,
    pub impact: Impact,
    pub urgency: Urgency,
    pub cluster_summary: String,
}
