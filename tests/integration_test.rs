//! Integration tests for the Artemis quiz engine

use artemis_quiz::{
    classify, AdvanceOutcome, AnswerMap, QuestionId, QuizSession, RiskFactor, RiskTier,
    SessionStore,
};

/// Answer the current question and advance
fn step(session: &mut QuizSession, option_id: &str) -> AdvanceOutcome {
    let id = session.current_question().expect("current question").id;
    session.select_answer(id, option_id).expect("valid answer");
    session.advance()
}

#[test]
fn test_risk_tier_ordering() {
    assert!((RiskTier::Standard as u8) < (RiskTier::ElevatedNeed as u8));
    assert!((RiskTier::ElevatedNeed as u8) < (RiskTier::HighPriority as u8));
}

#[test]
fn test_base_path_has_four_steps() {
    let mut session = QuizSession::new();

    assert!(matches!(step(&mut session, "under-35"), AdvanceOutcome::Next(_)));
    assert!(matches!(step(&mut session, "no"), AdvanceOutcome::Next(_)));
    assert!(matches!(step(&mut session, "no"), AdvanceOutcome::Next(_)));

    match step(&mut session, "yes-regular") {
        AdvanceOutcome::Complete(answers) => assert_eq!(answers.len(), 4),
        other => panic!("expected Complete, got {:?}", other),
    }
}

#[test]
fn test_affirmative_path_has_six_steps() {
    let mut session = QuizSession::new();

    step(&mut session, "45-54");
    // Affirmative family history splices both follow-ups in
    match step(&mut session, "yes-multiple") {
        AdvanceOutcome::Next(question) => assert_eq!(question.id, QuestionId::CancerType),
        other => panic!("expected cancer-type next, got {:?}", other),
    }
    step(&mut session, "breast-ovarian");
    match session.current_question().map(|q| q.id) {
        Some(QuestionId::CancerAge) => {}
        other => panic!("expected cancer-age, got {:?}", other),
    }
    step(&mut session, "under-50");
    step(&mut session, "yes-negative");

    match step(&mut session, "no") {
        AdvanceOutcome::Complete(answers) => {
            assert_eq!(answers.len(), 6);
            assert!(answers.contains_key(&QuestionId::CancerType));
        }
        other => panic!("expected Complete, got {:?}", other),
    }
}

#[test]
fn test_flipping_family_history_purges_and_shortens() {
    let mut session = QuizSession::new();

    step(&mut session, "under-35");
    step(&mut session, "yes-one");
    // Answer a follow-up, then walk back and change the trigger
    session
        .select_answer(QuestionId::CancerType, "pancreatic")
        .expect("follow-up active");
    session.retreat();
    session
        .select_answer(QuestionId::FamilyCancer, "unsure")
        .expect("valid answer");

    assert_eq!(session.active_questions().len(), 4);
    assert!(!session.answers().contains_key(&QuestionId::CancerType));

    // The purged answer must not influence the final classification
    step(&mut session, "unsure");
    step(&mut session, "no");
    match step(&mut session, "yes-regular") {
        AdvanceOutcome::Complete(answers) => {
            let result = classify(&answers);
            assert!(!result
                .high_priority_factors
                .contains(&RiskFactor::PancreaticFamilyHistory));
        }
        other => panic!("expected Complete, got {:?}", other),
    }
}

#[test]
fn test_advance_requires_answer_at_every_step() {
    let mut session = QuizSession::new();
    assert!(matches!(session.advance(), AdvanceOutcome::Blocked));

    session.select_answer(QuestionId::Age, "65+").unwrap();
    assert!(matches!(session.advance(), AdvanceOutcome::Next(_)));
    // Next question unanswered again
    assert!(matches!(session.advance(), AdvanceOutcome::Blocked));
}

#[test]
fn test_completed_quiz_classifies_high_priority() {
    let mut session = QuizSession::new();
    step(&mut session, "55-64");
    step(&mut session, "yes-multiple");
    step(&mut session, "multiple");
    step(&mut session, "under-50");
    step(&mut session, "yes-positive");

    let answers = match step(&mut session, "no") {
        AdvanceOutcome::Complete(answers) => answers,
        other => panic!("expected Complete, got {:?}", other),
    };

    let result = classify(&answers);
    assert_eq!(result.tier, RiskTier::HighPriority);
    assert!(result.high_priority_factors.len() >= 2);
    // Classifier input equals the handed-off map, not live session state
    assert_eq!(classify(&answers), classify(session.answers()));
}

#[test]
fn test_classify_tolerates_partial_preview() {
    let mut partial = AnswerMap::new();
    partial.insert(QuestionId::Age, "45-54".to_string());

    let mid_quiz = classify(&partial);
    assert_eq!(mid_quiz.tier, RiskTier::Standard);

    partial.insert(QuestionId::PersonalHistory, "no".to_string());
    assert_eq!(classify(&partial).tier, RiskTier::ElevatedNeed);
}

#[test]
fn test_classify_empty_map() {
    let result = classify(&AnswerMap::new());
    assert_eq!(result.tier, RiskTier::Standard);
    assert!(result.high_priority_factors.is_empty());
    assert!(result.additional_factors.is_empty());
}

#[test]
fn test_session_store_drives_full_flow() {
    let store = SessionStore::new();
    let id = store.create();

    let tier = store
        .with_session(&id, |session| {
            step(session, "under-35");
            step(session, "yes-one");
            step(session, "pancreatic");
            step(session, "over-60");
            step(session, "no");
            match step(session, "no") {
                AdvanceOutcome::Complete(answers) => Ok(classify(&answers).tier),
                other => panic!("expected Complete, got {:?}", other),
            }
        })
        .expect("session flow");

    // One high-priority factor (pancreatic history): Elevated Need
    assert_eq!(tier, RiskTier::ElevatedNeed);

    // The stored session is now terminal
    let complete = store
        .with_session(&id, |session| Ok(session.is_complete()))
        .expect("session read");
    assert!(complete);
}

#[test]
fn test_retreat_never_discards_answers() {
    let mut session = QuizSession::new();
    step(&mut session, "35-44");
    step(&mut session, "no");
    session.retreat();
    session.retreat();
    session.retreat(); // floored at the first question

    let (position, total) = session.progress();
    assert_eq!((position, total), (1, 4));
    assert_eq!(session.answers().len(), 2);
    assert!(session.can_advance());
}
