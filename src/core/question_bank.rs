//! Static Question Bank - Single Source of Truth
//!
//! The versioned, read-only table of questions, options and conditional
//! rules the sequencer runs on. Nothing here is created or destroyed at
//! runtime; the only dynamic input is the answer map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Closed set of question identifiers
///
/// Keeping the keys a closed enum makes an unknown question id
/// unrepresentable in an answer map; option ids are validated separately
/// at the `select_answer` boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionId {
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "family-cancer")]
    FamilyCancer,
    #[serde(rename = "cancer-type")]
    CancerType,
    #[serde(rename = "cancer-age")]
    CancerAge,
    #[serde(rename = "genetic-testing")]
    GeneticTesting,
    #[serde(rename = "personal-history")]
    PersonalHistory,
}

impl QuestionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionId::Age => "age",
            QuestionId::FamilyCancer => "family-cancer",
            QuestionId::CancerType => "cancer-type",
            QuestionId::CancerAge => "cancer-age",
            QuestionId::GeneticTesting => "genetic-testing",
            QuestionId::PersonalHistory => "personal-history",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The evolving record of the user's selected option per question
pub type AnswerMap = HashMap<QuestionId, String>;

/// One selectable option of a question
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AnswerOption {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

/// A quiz question; immutable, defined statically
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<&'static str>,
    pub options: &'static [AnswerOption],
    /// Marks a plain yes/no question (none in the current bank)
    pub is_binary: bool,
}

impl Question {
    /// Check an option id against this question's option list
    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|option| option.id == option_id)
    }
}

/// Predicate-driven policy for splicing follow-up questions into the
/// active sequence right after an anchor question
#[derive(Clone, Copy)]
pub struct ConditionalRule {
    /// Question the inserted block follows
    pub anchor: QuestionId,
    /// Rule applies while this holds over the answer map
    pub trigger: fn(&AnswerMap) -> bool,
    /// Questions spliced in, in order
    pub inserts: &'static [Question],
}

// ============================================
// Option id constants (used by the classifier)
// ============================================

pub mod option_ids {
    pub const AGE_45_54: &str = "45-54";
    pub const AGE_55_64: &str = "55-64";
    pub const FAMILY_YES_ONE: &str = "yes-one";
    pub const FAMILY_YES_MULTIPLE: &str = "yes-multiple";
    pub const FAMILY_NO: &str = "no";
    pub const TYPE_PANCREATIC: &str = "pancreatic";
    pub const TYPE_MULTIPLE: &str = "multiple";
    pub const DIAGNOSIS_UNDER_50: &str = "under-50";
    pub const TESTING_POSITIVE: &str = "yes-positive";
    pub const SCREENING_NONE: &str = "no";
}

// ============================================
// Option tables
// ============================================

static AGE_OPTIONS: [AnswerOption; 5] = [
    AnswerOption { id: "under-35", label: "Under 35", description: None },
    AnswerOption { id: "35-44", label: "35-44", description: None },
    AnswerOption { id: "45-54", label: "45-54", description: None },
    AnswerOption { id: "55-64", label: "55-64", description: None },
    AnswerOption { id: "65+", label: "65 or older", description: None },
];

static FAMILY_CANCER_OPTIONS: [AnswerOption; 4] = [
    AnswerOption { id: "yes-one", label: "Yes, one family member", description: None },
    AnswerOption { id: "yes-multiple", label: "Yes, multiple family members", description: None },
    AnswerOption { id: "no", label: "No", description: None },
    AnswerOption { id: "unsure", label: "I'm not sure", description: None },
];

static CANCER_TYPE_OPTIONS: [AnswerOption; 7] = [
    AnswerOption { id: "breast-ovarian", label: "Breast or ovarian cancer", description: None },
    AnswerOption { id: "colorectal", label: "Colorectal cancer", description: None },
    AnswerOption { id: "lung", label: "Lung cancer", description: None },
    AnswerOption { id: "pancreatic", label: "Pancreatic cancer", description: None },
    AnswerOption { id: "prostate", label: "Prostate cancer", description: None },
    AnswerOption { id: "other", label: "Other type of cancer", description: None },
    AnswerOption { id: "multiple", label: "Multiple types", description: None },
];

static CANCER_AGE_OPTIONS: [AnswerOption; 4] = [
    AnswerOption { id: "under-50", label: "Under 50 years old", description: None },
    AnswerOption { id: "50-60", label: "50-60 years old", description: None },
    AnswerOption { id: "over-60", label: "Over 60 years old", description: None },
    AnswerOption { id: "unknown", label: "I don't know", description: None },
];

static GENETIC_TESTING_OPTIONS: [AnswerOption; 4] = [
    AnswerOption { id: "yes-positive", label: "Yes, and a mutation was found", description: None },
    AnswerOption { id: "yes-negative", label: "Yes, but no mutation was found", description: None },
    AnswerOption { id: "no", label: "No genetic testing has been done", description: None },
    AnswerOption { id: "unsure", label: "I'm not sure", description: None },
];

static PERSONAL_HISTORY_OPTIONS: [AnswerOption; 4] = [
    AnswerOption { id: "yes-regular", label: "Yes, I get regular screenings", description: None },
    AnswerOption { id: "yes-once", label: "Yes, but only once or twice", description: None },
    AnswerOption { id: "no", label: "No, I haven't had any screenings", description: None },
    AnswerOption { id: "unsure", label: "I'm not sure what counts", description: None },
];

// ============================================
// Question tables
// ============================================

/// Fixed base sequence, in presentation order
pub static BASE_QUESTIONS: [Question; 4] = [
    Question {
        id: QuestionId::Age,
        prompt: "What is your age?",
        subtext: None,
        options: &AGE_OPTIONS,
        is_binary: false,
    },
    Question {
        id: QuestionId::FamilyCancer,
        prompt: "Has anyone in your immediate family been diagnosed with cancer?",
        subtext: Some("Immediate family includes parents, siblings, and children"),
        options: &FAMILY_CANCER_OPTIONS,
        is_binary: false,
    },
    Question {
        id: QuestionId::GeneticTesting,
        prompt: "Has anyone in your family had genetic testing for cancer risk?",
        subtext: None,
        options: &GENETIC_TESTING_OPTIONS,
        is_binary: false,
    },
    Question {
        id: QuestionId::PersonalHistory,
        prompt: "Have you personally had any cancer screenings?",
        subtext: Some("Such as mammograms, colonoscopies, or PSA tests"),
        options: &PERSONAL_HISTORY_OPTIONS,
        is_binary: false,
    },
];

/// Follow-up questions shown only for an affirmative family history,
/// presented as their own quiz steps
pub static FAMILY_HISTORY_FOLLOW_UPS: [Question; 2] = [
    Question {
        id: QuestionId::CancerType,
        prompt: "What type of cancer was diagnosed in your family?",
        subtext: Some("Select the most relevant option"),
        options: &CANCER_TYPE_OPTIONS,
        is_binary: false,
    },
    Question {
        id: QuestionId::CancerAge,
        prompt: "At what age was your family member diagnosed?",
        subtext: Some("If multiple, consider the youngest age at diagnosis"),
        options: &CANCER_AGE_OPTIONS,
        is_binary: false,
    },
];

/// All conditional rules, in anchor order
pub static CONDITIONAL_RULES: [ConditionalRule; 1] = [ConditionalRule {
    anchor: QuestionId::FamilyCancer,
    trigger: family_history_affirmative,
    inserts: &FAMILY_HISTORY_FOLLOW_UPS,
}];

/// True when the family-history answer pulls the follow-ups in
pub fn family_history_affirmative(answers: &AnswerMap) -> bool {
    matches!(
        answers.get(&QuestionId::FamilyCancer).map(String::as_str),
        Some(option_ids::FAMILY_YES_ONE) | Some(option_ids::FAMILY_YES_MULTIPLE)
    )
}

// ============================================
// Lookups
// ============================================

/// Total lookup from id to static definition
pub fn question(id: QuestionId) -> &'static Question {
    match id {
        QuestionId::Age => &BASE_QUESTIONS[0],
        QuestionId::FamilyCancer => &BASE_QUESTIONS[1],
        QuestionId::GeneticTesting => &BASE_QUESTIONS[2],
        QuestionId::PersonalHistory => &BASE_QUESTIONS[3],
        QuestionId::CancerType => &FAMILY_HISTORY_FOLLOW_UPS[0],
        QuestionId::CancerAge => &FAMILY_HISTORY_FOLLOW_UPS[1],
    }
}

/// Recompute the active sequence for an answer map
///
/// Pure function of `answers`: the fixed base sequence, with each
/// conditional rule's block spliced in right after its anchor while the
/// trigger holds.
pub fn active_questions(answers: &AnswerMap) -> Vec<&'static Question> {
    let mut sequence = Vec::with_capacity(BASE_QUESTIONS.len() + FAMILY_HISTORY_FOLLOW_UPS.len());
    for question in BASE_QUESTIONS.iter() {
        sequence.push(question);
        for rule in CONDITIONAL_RULES.iter() {
            if rule.anchor == question.id && (rule.trigger)(answers) {
                sequence.extend(rule.inserts.iter());
            }
        }
    }
    sequence
}

/// Drop answers to questions no longer on the active path
///
/// Invariant: the answer map never holds an answer for a question that is
/// unreachable given the other answers; stale follow-up answers must not
/// leak into the classifier.
pub fn purge_unreachable(answers: &mut AnswerMap) {
    for rule in CONDITIONAL_RULES.iter() {
        if !(rule.trigger)(answers) {
            for question in rule.inserts.iter() {
                answers.remove(&question.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_sequence_without_family_history() {
        let answers = AnswerMap::new();
        let active = active_questions(&answers);
        assert_eq!(active.len(), 4);
        assert_eq!(active[0].id, QuestionId::Age);
        assert_eq!(active[1].id, QuestionId::FamilyCancer);
        assert_eq!(active[2].id, QuestionId::GeneticTesting);
        assert_eq!(active[3].id, QuestionId::PersonalHistory);
    }

    #[test]
    fn test_follow_ups_spliced_after_anchor() {
        let mut answers = AnswerMap::new();
        answers.insert(QuestionId::FamilyCancer, "yes-one".to_string());

        let active = active_questions(&answers);
        assert_eq!(active.len(), 6);
        assert_eq!(active[1].id, QuestionId::FamilyCancer);
        assert_eq!(active[2].id, QuestionId::CancerType);
        assert_eq!(active[3].id, QuestionId::CancerAge);
        assert_eq!(active[4].id, QuestionId::GeneticTesting);
    }

    #[test]
    fn test_active_questions_is_pure() {
        let mut answers = AnswerMap::new();
        answers.insert(QuestionId::FamilyCancer, "yes-multiple".to_string());

        let first: Vec<QuestionId> = active_questions(&answers).iter().map(|q| q.id).collect();
        let second: Vec<QuestionId> = active_questions(&answers).iter().map(|q| q.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_purge_removes_stale_follow_up_answers() {
        let mut answers = AnswerMap::new();
        answers.insert(QuestionId::FamilyCancer, "no".to_string());
        answers.insert(QuestionId::CancerType, "pancreatic".to_string());
        answers.insert(QuestionId::CancerAge, "under-50".to_string());

        purge_unreachable(&mut answers);
        assert!(!answers.contains_key(&QuestionId::CancerType));
        assert!(!answers.contains_key(&QuestionId::CancerAge));
        assert!(answers.contains_key(&QuestionId::FamilyCancer));
    }

    #[test]
    fn test_purge_keeps_reachable_answers() {
        let mut answers = AnswerMap::new();
        answers.insert(QuestionId::FamilyCancer, "yes-multiple".to_string());
        answers.insert(QuestionId::CancerType, "multiple".to_string());

        purge_unreachable(&mut answers);
        assert!(answers.contains_key(&QuestionId::CancerType));
    }

    #[test]
    fn test_option_membership() {
        let q = question(QuestionId::Age);
        assert!(q.has_option("45-54"));
        assert!(!q.has_option("pancreatic"));
    }

    #[test]
    fn test_question_id_wire_names() {
        let json = serde_json::to_string(&QuestionId::FamilyCancer).unwrap();
        assert_eq!(json, "\"family-cancer\"");

        let id: QuestionId = serde_json::from_str("\"personal-history\"").unwrap();
        assert_eq!(id, QuestionId::PersonalHistory);
    }
}
