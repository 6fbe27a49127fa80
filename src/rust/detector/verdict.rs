use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lower edge of the indecision band (excluded from it).
pub const SUSPECT_BAND_LOW: f64 = 0.4;
/// Upper edge of the indecision band (excluded from it).
pub const SUSPECT_BAND_HIGH: f64 = 0.6;
/// Probabilities at or above this, outside the band, are fraud.
pub const FRAUD_CUTOFF: f64 = 0.5;

/// Preliminary label derived from the model's fraud probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Fraud,
    Genuine,
    Suspected,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Fraud, Verdict::Genuine, Verdict::Suspected];

    /// Maps a probability to a label.
    ///
    /// Anything strictly within 0.1 of 0.5 is `Suspected`; otherwise `p >= 0.5`
    /// is `Fraud` and the rest is `Genuine`. The band edges are compared
    /// directly instead of through `|p - 0.5| < 0.1`, because the subtraction
    /// rounds 0.4 and 0.6 into the band under IEEE-754.
    ///
    /// ```
    /// use fraudgate::Verdict;
    ///
    /// assert_eq!(Verdict::from_probability(0.4), Verdict::Genuine);
    /// assert_eq!(Verdict::from_probability(0.5), Verdict::Suspected);
    /// assert_eq!(Verdict::from_probability(0.6), Verdict::Fraud);
    /// ```
    pub fn from_probability(p: f64) -> Self {
        if p > SUSPECT_BAND_LOW && p < SUSPECT_BAND_HIGH {
            Verdict::Suspected
        } else if p >= FRAUD_CUTOFF {
            Verdict::Fraud
        } else {
            Verdict::Genuine
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fraud => "fraud",
            Verdict::Genuine => "genuine",
            Verdict::Suspected => "suspected",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label `{0}` (expected fraud, genuine or suspected)")]
pub struct UnknownVerdict(pub String);

impl FromStr for Verdict {
    type Err = UnknownVerdict;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fraud" => Ok(Verdict::Fraud),
            "genuine" => Ok(Verdict::Genuine),
            "suspected" => Ok(Verdict::Suspected),
            _ => Err(UnknownVerdict(s.to_string())),
        }
    }
}

/// A model probability together with the label it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub probability: f64,
    pub verdict: Verdict,
}

impl ClassificationResult {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            probability,
            verdict: Verdict::from_probability(probability),
        }
    }
}
