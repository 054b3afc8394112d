//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::core::question_bank::{AnswerMap, Question, QuestionId};
use crate::core::sequencer::QuizSession;
use crate::models::errors::AppError;
use crate::models::types::Classification;
use crate::utils::analytics::FunnelStats;
use crate::utils::session_store::SessionStoreStats;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "API_BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            code: "API_RATE_LIMITED".to_string(),
            message: format!("Rate limit exceeded. Retry after {} seconds", retry_after),
            details: Some(format!("retry_after: {}", retry_after)),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "API_INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: None,
        }
    }
}

// ============================================
// Quiz Session
// ============================================

/// One option, as rendered by the presentation layer
#[derive(Debug, Serialize)]
pub struct OptionView {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

/// One question, as rendered by the presentation layer
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub prompt: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<&'static str>,
    pub options: Vec<OptionView>,
    pub is_binary: bool,
}

impl From<&'static Question> for QuestionView {
    fn from(question: &'static Question) -> Self {
        Self {
            id: question.id,
            prompt: question.prompt,
            subtext: question.subtext,
            options: question
                .options
                .iter()
                .map(|option| OptionView {
                    id: option.id,
                    label: option.label,
                    description: option.description,
                })
                .collect(),
            is_binary: question.is_binary,
        }
    }
}

/// Snapshot of a session for the presentation layer
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    /// "answering" | "complete"
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    /// 1-based position in the active sequence
    pub position: usize,
    pub total: usize,
    pub can_advance: bool,
    pub answers: AnswerMap,
}

impl SessionView {
    pub fn from_session(session_id: &str, session: &QuizSession) -> Self {
        let (position, total) = session.progress();
        Self {
            session_id: session_id.to_string(),
            state: if session.is_complete() {
                "complete".to_string()
            } else {
                "answering".to_string()
            },
            question: session.current_question().map(QuestionView::from),
            position,
            total,
            can_advance: session.can_advance(),
            answers: session.answers().clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question_id: QuestionId,
    pub option_id: String,
}

/// Advance result; `result` is present exactly once, on completion
#[derive(Debug, Serialize)]
pub struct AdvanceData {
    #[serde(flatten)]
    pub view: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ClassificationView>,
}

// ============================================
// Classification
// ============================================

#[derive(Debug, Serialize)]
pub struct ClassificationView {
    pub tier: String,
    pub tier_slug: String,
    pub headline: String,
    pub description: String,
    pub recommendation: String,
    pub high_priority_factors: Vec<String>,
    pub additional_factors: Vec<String>,
}

impl From<Classification> for ClassificationView {
    fn from(classification: Classification) -> Self {
        Self {
            tier: classification.tier.as_str().to_string(),
            tier_slug: classification.tier.slug().to_string(),
            headline: classification.tier.headline().to_string(),
            description: classification.tier.description().to_string(),
            recommendation: classification.tier.recommendation().to_string(),
            high_priority_factors: classification
                .high_priority_factors
                .iter()
                .map(|factor| factor.description())
                .collect(),
            additional_factors: classification
                .additional_factors
                .iter()
                .map(|factor| factor.description())
                .collect(),
        }
    }
}

/// Stateless classification preview over a raw, possibly partial map
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub answers: AnswerMap,
}

// ============================================
// Lead Capture / Survey
// ============================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    /// Completed quiz session to attach a risk tier from
    #[serde(default)]
    pub session_id: Option<String>,
    /// Absent at the email-capture step; the row is stored as pending
    #[serde(default)]
    pub selected_tier: Option<String>,
    #[serde(default)]
    pub selected_price: Option<u32>,
    #[serde(default)]
    pub willingness_to_pay: Option<String>,
    #[serde(default)]
    pub subscription_preference: Option<String>,
    #[serde(default)]
    pub utm_source: Option<String>,
    #[serde(default)]
    pub utm_campaign: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupData {
    pub email: String,
    /// True when the email was already on the waitlist
    pub already_registered: bool,
}

#[derive(Debug, Deserialize)]
pub struct SurveyRequest {
    #[serde(default)]
    pub email: Option<String>,
    pub willingness_to_pay: String,
    pub screening_barrier: String,
}

#[derive(Debug, Serialize)]
pub struct SurveyData {
    /// True when the answers reached the backend row
    pub persisted: bool,
}

// ============================================
// Stats / Health
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub funnel: FunnelStats,
    pub sessions: SessionStoreStats,
    pub uptime_seconds: u64,
    pub api_version: String,
}

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
