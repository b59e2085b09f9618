//! Core domain types for the sleep-quality scorer.
//!
//! Everything here is a plain value type:
//! - Raw inputs supplied by the health-data layer
//! - Membership degrees per linguistic category
//! - Score breakdowns and display bands

use serde::{Deserialize, Serialize};
use std::fmt;

/// Final sleep quality, always within [0, 100] for finite inputs
pub type QualityScore = f64;

// ============================================================================
// Inputs
// ============================================================================

/// One night's worth of scoring inputs
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawInputs {
    pub sleep_duration_hours: f64,
    pub min_heart_rate: f64,
    pub avg_heart_rate: f64,
    pub max_heart_rate: f64,
    pub activity_level: f64,
    pub sleep_goal_hours: f64,
}

// ============================================================================
// Membership Types
// ============================================================================

/// Degrees of "short", "medium" and "long" sleep.
///
/// The three values are independent; they are not required to sum to 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationMembership {
    pub short: f64,
    pub medium: f64,
    pub long: f64,
}

/// Degrees of low, normal and high average heart rate
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeartRateMembership {
    pub low: f64,
    pub normal: f64,
    pub high: f64,
}

/// Degrees of low, moderate and high daytime activity
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityMembership {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
}

/// All three membership sets for a single evaluation
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Memberships {
    pub duration: DurationMembership,
    pub heart_rate: HeartRateMembership,
    pub activity: ActivityMembership,
}

// ============================================================================
// Score Output Types
// ============================================================================

/// Contribution of a single rule to the aggregate score
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleContribution {
    pub id: u8,
    pub description: String,
    pub weight: f64,
    pub value: f64,
}

/// Full trace of one scoring pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub inputs: RawInputs,
    pub memberships: Memberships,
    pub contributions: Vec<RuleContribution>,
    pub rule_sum: f64,
    pub goal_penalty: f64,
    pub raw_score: f64,
    pub score: QualityScore,
}

impl ScoreBreakdown {
    /// Display band for the final score
    pub fn band(&self) -> QualityBand {
        QualityBand::from_score(self.score)
    }
}

/// Coarse label for a quality score, for display only
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityBand {
    /// Map a score onto its band. NaN lands in `Poor`.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            QualityBand::Excellent
        } else if score >= 60.0 {
            QualityBand::Good
        } else if score >= 40.0 {
            QualityBand::Fair
        } else {
            QualityBand::Poor
        }
    }
}

impl fmt::Display for QualityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QualityBand::Poor => "Poor",
            QualityBand::Fair => "Fair",
            QualityBand::Good => "Good",
            QualityBand::Excellent => "Excellent",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(QualityBand::from_score(0.0), QualityBand::Poor);
        assert_eq!(QualityBand::from_score(39.99), QualityBand::Poor);
        assert_eq!(QualityBand::from_score(40.0), QualityBand::Fair);
        assert_eq!(QualityBand::from_score(60.0), QualityBand::Good);
        assert_eq!(QualityBand::from_score(79.9), QualityBand::Good);
        assert_eq!(QualityBand::from_score(80.0), QualityBand::Excellent);
        assert_eq!(QualityBand::from_score(100.0), QualityBand::Excellent);
    }

    #[test]
    fn test_nan_band_is_poor() {
        assert_eq!(QualityBand::from_score(f64::NAN), QualityBand::Poor);
    }

    #[test]
    fn test_band_serializes_snake_case() {
        let json = serde_json::to_string(&QualityBand::Excellent).unwrap();
        assert_eq!(json, "\"excellent\"");
        assert_eq!(QualityBand::Fair.to_string(), "Fair");
    }
}
