//! Heuristic Risk Classifier
//!
//! Pure mapping from an answer map to a risk tier plus the contributing
//! factors. A fixed ordered rule list fills two buckets; the tier falls
//! out of plain factor counts, not a weighted score. Missing answers
//! simply mean a rule does not fire, so a mid-quiz preview never errors.

use crate::core::question_bank::{
    family_history_affirmative, option_ids, AnswerMap, QuestionId,
};
use crate::models::types::{Classification, RiskFactor, RiskTier};

/// High-priority factors needed for the top tier
const HIGH_PRIORITY_TIER_MIN: usize = 2;
/// Additional factors needed for the middle tier when nothing high fired
const ELEVATED_ADDITIONAL_MIN: usize = 2;

/// High-priority rules, evaluated in this order
static HIGH_PRIORITY_RULES: [fn(&AnswerMap) -> Option<RiskFactor>; 4] = [
    early_onset_multiple_relatives,
    known_mutation,
    pancreatic_family_history,
    multiple_cancer_types,
];

/// Classify an answer set; deterministic and side-effect-free
pub fn classify(answers: &AnswerMap) -> Classification {
    let high_priority_factors: Vec<RiskFactor> = HIGH_PRIORITY_RULES
        .iter()
        .filter_map(|rule| rule(answers))
        .collect();

    let mut additional_factors = Vec::new();

    if let Some(band) = age_band(answers) {
        additional_factors.push(RiskFactor::AgeRelatedBaseline { band: band.to_string() });
    }

    // A single affected relative only counts when no high-priority rule
    // already captured the same family history.
    if answer_is(answers, QuestionId::FamilyCancer, option_ids::FAMILY_YES_ONE)
        && high_priority_factors.is_empty()
    {
        additional_factors.push(RiskFactor::SingleAffectedRelative);
    }

    if answer_is(answers, QuestionId::PersonalHistory, option_ids::SCREENING_NONE) {
        additional_factors.push(RiskFactor::NoPriorScreening);
    }

    let tier = derive_tier(high_priority_factors.len(), additional_factors.len());

    Classification {
        tier,
        high_priority_factors,
        additional_factors,
    }
}

/// Ordinal count thresholds; intentionally not a numeric score
fn derive_tier(high_count: usize, additional_count: usize) -> RiskTier {
    if high_count >= HIGH_PRIORITY_TIER_MIN {
        RiskTier::HighPriority
    } else if high_count == 1 || additional_count >= ELEVATED_ADDITIONAL_MIN {
        RiskTier::ElevatedNeed
    } else {
        RiskTier::Standard
    }
}

// ============================================
// Rule predicates
// ============================================

fn early_onset_multiple_relatives(answers: &AnswerMap) -> Option<RiskFactor> {
    let multiple = answer_is(answers, QuestionId::FamilyCancer, option_ids::FAMILY_YES_MULTIPLE);
    let early = answer_is(answers, QuestionId::CancerAge, option_ids::DIAGNOSIS_UNDER_50);
    (multiple && early).then(|| RiskFactor::EarlyOnsetMultipleRelatives)
}

fn known_mutation(answers: &AnswerMap) -> Option<RiskFactor> {
    answer_is(answers, QuestionId::GeneticTesting, option_ids::TESTING_POSITIVE)
        .then(|| RiskFactor::KnownMutation)
}

fn pancreatic_family_history(answers: &AnswerMap) -> Option<RiskFactor> {
    (family_history_affirmative(answers)
        && answer_is(answers, QuestionId::CancerType, option_ids::TYPE_PANCREATIC))
    .then(|| RiskFactor::PancreaticFamilyHistory)
}

fn multiple_cancer_types(answers: &AnswerMap) -> Option<RiskFactor> {
    (family_history_affirmative(answers)
        && answer_is(answers, QuestionId::CancerType, option_ids::TYPE_MULTIPLE))
    .then(|| RiskFactor::MultipleCancerTypes)
}

fn age_band(answers: &AnswerMap) -> Option<&'static str> {
    match answers.get(&QuestionId::Age).map(String::as_str) {
        Some(option_ids::AGE_45_54) => Some(option_ids::AGE_45_54),
        Some(option_ids::AGE_55_64) => Some(option_ids::AGE_55_64),
        _ => None,
    }
}

fn answer_is(answers: &AnswerMap, question: QuestionId, option_id: &str) -> bool {
    answers.get(&question).map(String::as_str) == Some(option_id)
}
