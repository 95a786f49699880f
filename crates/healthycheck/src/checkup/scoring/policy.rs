use serde::{Deserialize, Serialize};

/// Scores at or above this are HIGH.
pub const HIGH_RISK_THRESHOLD: u32 = 6;
/// Scores at or above this (and below HIGH) are MEDIUM.
pub const MEDIUM_RISK_THRESHOLD: u32 = 3;

/// Risk band derived from the total score. Ordered LOW < MEDIUM < HIGH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[serde(alias = "low", alias = "Low")]
    Low,
    #[serde(alias = "medium", alias = "Medium")]
    Medium,
    #[serde(alias = "high", alias = "High")]
    High,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Enum name as persisted in `riskLevel`.
    pub fn name(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RiskLevel::High => {
                "Critical condition. Take the child to the nearest hospital emergency department immediately."
            }
            RiskLevel::Medium => {
                "Needs medical attention. Consult a pediatrician within 24 hours."
            }
            RiskLevel::Low => {
                "Stable condition. Check the temperature every 4 hours and make sure the child drinks enough."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(2), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(5), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(6), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(20), RiskLevel::High);
    }

    #[test]
    fn each_level_has_its_own_recommendation() {
        assert!(RiskLevel::High.recommendation().contains("emergency"));
        assert!(RiskLevel::Medium.recommendation().contains("24 hours"));
        assert!(RiskLevel::Low.recommendation().contains("every 4 hours"));
    }
}
