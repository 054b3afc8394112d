//! Type definitions for the Artemis quiz engine
//! Core data structures shared across the sequencer, classifier and API

use serde::{Deserialize, Serialize};

/// Discrete risk tier derived from a completed answer set
///
/// Ordered by severity: Standard < Elevated Need < High Priority.
/// Always derived, never stored as user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    /// Risk aligns with general population guidelines
    Standard,
    /// One strong indicator, or several weaker ones
    ElevatedNeed,
    /// Two or more strong indicators - enhanced screening conversation warranted
    HighPriority,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Standard => "Standard",
            RiskTier::ElevatedNeed => "Elevated Need",
            RiskTier::HighPriority => "High Priority",
        }
    }

    /// Stable identifier used in persisted rows and analytics properties
    pub fn slug(&self) -> &'static str {
        match self {
            RiskTier::Standard => "standard",
            RiskTier::ElevatedNeed => "elevated-need",
            RiskTier::HighPriority => "high-priority",
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            RiskTier::Standard => "Standard Risk Profile",
            RiskTier::ElevatedNeed => "Elevated Need Detected",
            RiskTier::HighPriority => "High Priority Indicators Found",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskTier::Standard => {
                "Based on your responses, your risk appears to align with general population guidelines."
            }
            RiskTier::ElevatedNeed => {
                "Your family history suggests some factors that may warrant additional attention."
            }
            RiskTier::HighPriority => {
                "Based on your family history, you may benefit from enhanced screening protocols beyond standard guidelines."
            }
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskTier::Standard => {
                "Continue following standard screening recommendations for your age group."
            }
            RiskTier::ElevatedNeed => {
                "Consider discussing your family history with your doctor to determine if enhanced screening is appropriate."
            }
            RiskTier::HighPriority => {
                "We recommend discussing genetic counseling and personalized screening options with your healthcare provider."
            }
        }
    }
}

/// One contributing reason behind a derived tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskFactor {
    /// Multiple affected relatives with the youngest diagnosis under 50
    EarlyOnsetMultipleRelatives,
    /// A cancer-risk mutation was found through family genetic testing
    KnownMutation,
    /// Pancreatic cancer in the family (no standard screening guideline exists)
    PancreaticFamilyHistory,
    /// Several distinct cancer types in one family - hereditary syndrome indicator
    MultipleCancerTypes,
    /// Age band with increased baseline screening need
    AgeRelatedBaseline { band: String },
    /// Exactly one affected immediate relative
    SingleAffectedRelative,
    /// No cancer screenings on record
    NoPriorScreening,
}

impl RiskFactor {
    /// High-priority factors drive the tier thresholds harder than additional ones
    pub fn is_high_priority(&self) -> bool {
        matches!(
            self,
            RiskFactor::EarlyOnsetMultipleRelatives
                | RiskFactor::KnownMutation
                | RiskFactor::PancreaticFamilyHistory
                | RiskFactor::MultipleCancerTypes
        )
    }

    pub fn description(&self) -> String {
        match self {
            RiskFactor::EarlyOnsetMultipleRelatives => {
                "Multiple immediate relatives with cancer, youngest diagnosed under 50".to_string()
            }
            RiskFactor::KnownMutation => {
                "A cancer-risk mutation has been identified in your family".to_string()
            }
            RiskFactor::PancreaticFamilyHistory => {
                "Family history of pancreatic cancer, for which no standard screening guideline exists"
                    .to_string()
            }
            RiskFactor::MultipleCancerTypes => {
                "Multiple cancer types in the family, a possible hereditary syndrome indicator"
                    .to_string()
            }
            RiskFactor::AgeRelatedBaseline { band } => {
                format!("Age {} carries an increased baseline screening need", band)
            }
            RiskFactor::SingleAffectedRelative => {
                "One immediate family member diagnosed with cancer".to_string()
            }
            RiskFactor::NoPriorScreening => "No prior cancer screenings on record".to_string(),
        }
    }
}

/// Result of classifying an answer set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Derived severity tier
    pub tier: RiskTier,
    /// Factors that fired into the high-priority bucket, in rule order
    pub high_priority_factors: Vec<RiskFactor>,
    /// Factors that fired into the additional bucket, in rule order
    pub additional_factors: Vec<RiskFactor>,
}

impl Classification {
    pub fn factor_count(&self) -> usize {
        self.high_priority_factors.len() + self.additional_factors.len()
    }

    /// Pretty print for logs
    pub fn summary(&self) -> String {
        let mut output = format!("Tier: {}\n", self.tier.as_str());
        if !self.high_priority_factors.is_empty() {
            output.push_str("   High priority:\n");
            for factor in &self.high_priority_factors {
                output.push_str(&format!("     - {}\n", factor.description()));
            }
        }
        if !self.additional_factors.is_empty() {
            output.push_str("   Additional:\n");
            for factor in &self.additional_factors {
                output.push_str(&format!("     - {}\n", factor.description()));
            }
        }
        output
    }
}

/// Waitlist signup row as persisted by the hosted backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistSignup {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    pub selected_tier: String,
    pub selected_price: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub willingness_to_pay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_preference: Option<String>,
    /// Tier derived from the completed quiz, when one was attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
}

/// Feedback survey answers, attached to an existing signup row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub willingness_to_pay: String,
    pub screening_barrier: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!((RiskTier::Standard as u8) < (RiskTier::ElevatedNeed as u8));
        assert!((RiskTier::ElevatedNeed as u8) < (RiskTier::HighPriority as u8));
    }

    #[test]
    fn test_factor_buckets() {
        assert!(RiskFactor::KnownMutation.is_high_priority());
        assert!(RiskFactor::MultipleCancerTypes.is_high_priority());
        assert!(!RiskFactor::NoPriorScreening.is_high_priority());
        assert!(!RiskFactor::AgeRelatedBaseline { band: "45-54".to_string() }.is_high_priority());
    }

    #[test]
    fn test_factor_descriptions() {
        let factors = vec![
            RiskFactor::EarlyOnsetMultipleRelatives,
            RiskFactor::KnownMutation,
            RiskFactor::PancreaticFamilyHistory,
            RiskFactor::MultipleCancerTypes,
            RiskFactor::AgeRelatedBaseline { band: "55-64".to_string() },
            RiskFactor::SingleAffectedRelative,
            RiskFactor::NoPriorScreening,
        ];

        for factor in factors {
            assert!(!factor.description().is_empty(), "Description should not be empty");
        }
    }

    #[test]
    fn test_classification_summary() {
        let classification = Classification {
            tier: RiskTier::ElevatedNeed,
            high_priority_factors: vec![RiskFactor::KnownMutation],
            additional_factors: vec![RiskFactor::NoPriorScreening],
        };

        let summary = classification.summary();
        assert!(summary.contains("Elevated Need"));
        assert!(summary.contains("mutation"));
        assert_eq!(classification.factor_count(), 2);
    }
}
