//! Question Sequencer
//!
//! Owns one quiz session's mutable state: the answer map and the pointer
//! into the active sequence. Conditional follow-ups appear and disappear
//! purely as a function of the answers; navigation misuse is a no-op and
//! invalid input is rejected at the boundary.

use crate::core::question_bank::{self, AnswerMap, Question, QuestionId};
use crate::models::errors::{AppError, AppResult};

/// Result of an `advance()` call
#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    /// Moved to the next question
    Next(&'static Question),
    /// Sequence exhausted; the final answer map is handed to the caller
    Complete(AnswerMap),
    /// Guard failed (current question unanswered, or already complete)
    Blocked,
}

/// One visitor's quiz session
///
/// States are `AnsweringQuestion(i)` and `Complete`; `Complete` is
/// terminal for this component. The session is owned by the presentation
/// layer and mutated exclusively through `select_answer` / `advance` /
/// `retreat`.
#[derive(Debug, Clone)]
pub struct QuizSession {
    answers: AnswerMap,
    current_index: usize,
    complete: bool,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// Fresh session at the first question with an empty answer map
    pub fn new() -> Self {
        Self {
            answers: AnswerMap::new(),
            current_index: 0,
            complete: false,
        }
    }

    /// Answers recorded so far
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// The currently reachable sequence for this session's answers
    pub fn active_questions(&self) -> Vec<&'static Question> {
        question_bank::active_questions(&self.answers)
    }

    /// Question at the cursor; `None` once the session is complete
    pub fn current_question(&self) -> Option<&'static Question> {
        if self.complete {
            return None;
        }
        self.active_questions().get(self.current_index).copied()
    }

    /// True iff the current question has a recorded answer
    pub fn can_advance(&self) -> bool {
        self.current_question()
            .map(|question| self.answers.contains_key(&question.id))
            .unwrap_or(false)
    }

    /// 1-based position and total length of the active sequence
    pub fn progress(&self) -> (usize, usize) {
        let total = self.active_questions().len();
        if self.complete {
            (total, total)
        } else {
            (self.current_index + 1, total)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Record an answer; last write wins
    ///
    /// Rejects a question outside the active sequence and an option id the
    /// question does not carry - a corrupted answer map would otherwise
    /// propagate undetected into the classifier. Changing the family
    /// history answer may splice follow-ups in or out; answers to
    /// questions that drop off the active path are purged.
    pub fn select_answer(&mut self, question_id: QuestionId, option_id: &str) -> AppResult<()> {
        if self.complete {
            return Err(AppError::session_complete());
        }

        let active = self.active_questions();
        let question = active
            .iter()
            .find(|question| question.id == question_id)
            .ok_or_else(|| AppError::question_not_active(question_id.as_str()))?;

        if !question.has_option(option_id) {
            return Err(AppError::invalid_option(question_id.as_str(), option_id));
        }

        self.answers.insert(question_id, option_id.to_string());
        question_bank::purge_unreachable(&mut self.answers);

        // The sequence may have shrunk; keep the cursor in range.
        let len = self.active_questions().len();
        if self.current_index >= len {
            self.current_index = len - 1;
        }

        Ok(())
    }

    /// Move forward one question, or complete the session at the end
    ///
    /// A call while `can_advance()` is false is a no-op (`Blocked`); the
    /// caller is expected to gate on the predicate. On completion the
    /// caller receives its own copy of the final answer map; the session
    /// becomes read-only.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.complete || !self.can_advance() {
            return AdvanceOutcome::Blocked;
        }

        let active = self.active_questions();
        if self.current_index + 1 >= active.len() {
            self.complete = true;
            AdvanceOutcome::Complete(self.answers.clone())
        } else {
            self.current_index += 1;
            AdvanceOutcome::Next(active[self.current_index])
        }
    }

    /// Move back one question, floored at zero; never discards answers
    pub fn retreat(&mut self) {
        if !self.complete && self.current_index > 0 {
            self.current_index -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_current(session: &mut QuizSession, option_id: &str) {
        let id = session.current_question().expect("current question").id;
        session.select_answer(id, option_id).expect("valid answer");
    }

    #[test]
    fn test_initial_state() {
        let session = QuizSession::new();
        assert_eq!(session.current_question().map(|q| q.id), Some(QuestionId::Age));
        assert!(!session.can_advance());
        assert_eq!(session.progress(), (1, 4));
    }

    #[test]
    fn test_advance_blocked_without_answer() {
        let mut session = QuizSession::new();
        assert!(matches!(session.advance(), AdvanceOutcome::Blocked));
        assert_eq!(session.progress(), (1, 4));
    }

    #[test]
    fn test_retreat_at_zero_is_noop() {
        let mut session = QuizSession::new();
        session.retreat();
        session.retreat();
        assert_eq!(session.progress(), (1, 4));
    }

    #[test]
    fn test_affirmative_family_history_extends_sequence() {
        let mut session = QuizSession::new();
        answer_current(&mut session, "under-35");
        session.advance();

        answer_current(&mut session, "yes-one");
        assert_eq!(session.progress(), (2, 6));

        match session.advance() {
            AdvanceOutcome::Next(question) => assert_eq!(question.id, QuestionId::CancerType),
            other => panic!("expected Next, got {:?}", other),
        }
    }

    #[test]
    fn test_changing_family_history_purges_follow_up_answers() {
        let mut session = QuizSession::new();
        answer_current(&mut session, "under-35");
        session.advance();
        answer_current(&mut session, "yes-multiple");
        session.advance();
        answer_current(&mut session, "pancreatic");

        // Go back and flip the trigger off
        session.retreat();
        session
            .select_answer(QuestionId::FamilyCancer, "no")
            .expect("valid answer");

        assert!(!session.answers().contains_key(&QuestionId::CancerType));
        assert_eq!(session.active_questions().len(), 4);
    }

    #[test]
    fn test_back_and_forward_preserves_answers() {
        let mut session = QuizSession::new();
        answer_current(&mut session, "45-54");
        session.advance();
        answer_current(&mut session, "no");
        session.retreat();

        assert_eq!(
            session.answers().get(&QuestionId::FamilyCancer).map(String::as_str),
            Some("no")
        );
        // Cursor back at the first question, answer still present
        assert!(session.can_advance());
    }

    #[test]
    fn test_last_write_wins() {
        let mut session = QuizSession::new();
        session.select_answer(QuestionId::Age, "under-35").unwrap();
        session.select_answer(QuestionId::Age, "45-54").unwrap();

        assert_eq!(session.answers().len(), 1);
        assert_eq!(
            session.answers().get(&QuestionId::Age).map(String::as_str),
            Some("45-54")
        );
    }

    #[test]
    fn test_invalid_option_rejected() {
        let mut session = QuizSession::new();
        let err = session.select_answer(QuestionId::Age, "pancreatic").unwrap_err();
        assert_eq!(err.code_str(), "QUIZ_INVALID_OPTION");
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_unreachable_question_rejected() {
        let mut session = QuizSession::new();
        // No affirmative family history, so the follow-up is not active
        let err = session
            .select_answer(QuestionId::CancerType, "pancreatic")
            .unwrap_err();
        assert_eq!(err.code_str(), "QUIZ_QUESTION_NOT_ACTIVE");
    }

    #[test]
    fn test_full_run_to_completion() {
        let mut session = QuizSession::new();
        answer_current(&mut session, "45-54");
        session.advance();
        answer_current(&mut session, "yes-multiple");
        session.advance();
        answer_current(&mut session, "multiple");
        session.advance();
        answer_current(&mut session, "under-50");
        session.advance();
        answer_current(&mut session, "yes-positive");
        session.advance();
        answer_current(&mut session, "no");

        match session.advance() {
            AdvanceOutcome::Complete(answers) => {
                assert_eq!(answers.len(), 6);
                assert!(answers.contains_key(&QuestionId::CancerAge));
            }
            other => panic!("expected Complete, got {:?}", other),
        }

        assert!(session.is_complete());
        assert!(matches!(session.advance(), AdvanceOutcome::Blocked));
        assert!(session.select_answer(QuestionId::Age, "under-35").is_err());
    }
}
