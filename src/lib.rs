//! Artemis Quiz Library
//!
//! Family cancer-history quiz engine powering a lead-generation funnel:
//! - Question sequencer with conditional follow-up questions
//! - Deterministic heuristic risk classifier (count-threshold tiers)
//! - Funnel analytics (quiz starts, completions, signups, tiers)
//! - Waitlist/lead capture persisted to a hosted backend

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::classifier::classify;
pub use crate::core::question_bank::{
    active_questions, question, AnswerMap, AnswerOption, ConditionalRule, Question, QuestionId,
};
pub use crate::core::sequencer::{AdvanceOutcome, QuizSession};
pub use crate::models::config::AppConfig;
pub use crate::models::errors::{AppError, AppResult, ErrorCode};
pub use crate::models::types::{
    Classification, RiskFactor, RiskTier, SurveyResponse, WaitlistSignup,
};
pub use crate::providers::backend::BackendClient;
pub use crate::utils::analytics::{AnalyticsCollector, AnalyticsEvent, FunnelStage, FunnelStats};
pub use crate::utils::session_store::{SessionStore, SessionStoreStats};
