//! API Request Handlers

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::types::*;
use crate::core::classifier;
use crate::core::question_bank::AnswerMap;
use crate::core::sequencer::AdvanceOutcome;
use crate::models::config::AppConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Classification, SurveyResponse, WaitlistSignup};
use crate::providers::backend::BackendClient;
use crate::utils::analytics::{AnalyticsCollector, AnalyticsEvent, FunnelStage};
use crate::utils::constants::{tier_label, APP_VERSION, PENDING_TIER, SWEEP_INTERVAL_SECS};
use crate::utils::session_store::SessionStore;

lazy_static! {
    /// Same check the signup form applies client-side
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex");
}

/// Shared application state
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub analytics: Arc<AnalyticsCollector>,
    pub backend: Option<Arc<BackendClient>>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let sessions = Arc::new(SessionStore::with_ttl(config.session_ttl_secs));
        let analytics = Arc::new(AnalyticsCollector::with_config(
            config.analytics_dir.clone(),
            crate::utils::constants::DEFAULT_ANALYTICS_BUFFER,
        ));
        let backend = BackendClient::from_config(config).map(Arc::new);

        // Background task: sweep expired sessions
        let sessions_clone = sessions.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(SWEEP_INTERVAL_SECS));
            loop {
                interval.tick().await;
                sessions_clone.cleanup_expired();
            }
        });

        Self {
            sessions,
            analytics,
            backend,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Fire an analytics event locally and, when configured, to the backend
    fn track(&self, event: AnalyticsEvent) {
        if let Some(backend) = &self.backend {
            let backend = backend.clone();
            let row = event.clone();
            tokio::spawn(async move {
                backend.insert_event(&row).await;
            });
        }
        self.analytics.record(event);
    }
}

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Map an AppError onto the response envelope via its error code
fn reject(err: AppError, start: Instant) -> HandlerError {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ApiResponse::error(ApiError::from(&err), elapsed_ms(start))),
    )
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Quiz Session
// ============================================

pub async fn start_quiz(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SessionView>>, HandlerError> {
    let start = Instant::now();

    let session_id = state.sessions.create();
    state.track(AnalyticsEvent::new(
        FunnelStage::QuizStart,
        Some(&session_id),
        serde_json::json!({}),
    ));

    let view = state
        .sessions
        .with_session(&session_id, |session| {
            Ok(SessionView::from_session(&session_id, session))
        })
        .map_err(|e| reject(e, start))?;

    Ok(Json(ApiResponse::success(view, elapsed_ms(start))))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, HandlerError> {
    let start = Instant::now();

    let view = state
        .sessions
        .with_session(&session_id, |session| {
            Ok(SessionView::from_session(&session_id, session))
        })
        .map_err(|e| reject(e, start))?;

    Ok(Json(ApiResponse::success(view, elapsed_ms(start))))
}

pub async fn select_answer(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<ApiResponse<SessionView>>, HandlerError> {
    let start = Instant::now();

    let view = state
        .sessions
        .with_session(&session_id, |session| {
            session.select_answer(req.question_id, &req.option_id)?;
            Ok(SessionView::from_session(&session_id, session))
        })
        .map_err(|e| reject(e, start))?;

    state.track(AnalyticsEvent::new(
        FunnelStage::AnswerSelect,
        Some(&session_id),
        serde_json::json!({ "question": req.question_id.as_str() }),
    ));

    Ok(Json(ApiResponse::success(view, elapsed_ms(start))))
}

pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<AdvanceData>>, HandlerError> {
    let start = Instant::now();

    let (view, final_answers) = state
        .sessions
        .with_session(&session_id, |session| {
            let outcome = session.advance();
            let final_answers = match outcome {
                AdvanceOutcome::Complete(answers) => Some(answers),
                _ => None,
            };
            Ok((SessionView::from_session(&session_id, session), final_answers))
        })
        .map_err(|e| reject(e, start))?;

    let result = final_answers.map(|answers| {
        let classification = classifier::classify(&answers);
        info!(
            "Quiz {} complete: {}",
            session_id,
            classification.tier.as_str()
        );
        state.track(AnalyticsEvent::completion(&session_id, &classification));
        ClassificationView::from(classification)
    });

    let data = AdvanceData { view, result };
    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

pub async fn retreat(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, HandlerError> {
    let start = Instant::now();

    let view = state
        .sessions
        .with_session(&session_id, |session| {
            session.retreat();
            Ok(SessionView::from_session(&session_id, session))
        })
        .map_err(|e| reject(e, start))?;

    Ok(Json(ApiResponse::success(view, elapsed_ms(start))))
}

// ============================================
// Classification Preview
// ============================================

/// Stateless preview; tolerates a partial answer map by design
pub async fn classify_preview(
    Json(req): Json<ClassifyRequest>,
) -> Json<ApiResponse<ClassificationView>> {
    let start = Instant::now();
    let classification = classifier::classify(&req.answers);
    Json(ApiResponse::success(
        ClassificationView::from(classification),
        elapsed_ms(start),
    ))
}

// ============================================
// Lead Capture
// ============================================

pub async fn waitlist_signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<ApiResponse<SignupData>>, HandlerError> {
    let start = Instant::now();

    let email = req.email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(reject(AppError::invalid_email(&email), start));
    }

    // Attach the derived tier when a completed session is referenced;
    // a missing or expired session is not a signup failure.
    let risk_tier = req
        .session_id
        .as_deref()
        .and_then(|id| classification_for(&state, id).ok())
        .map(|classification| classification.tier.slug().to_string());

    let stage = if req.selected_tier.is_some() {
        FunnelStage::WaitlistSignup
    } else {
        FunnelStage::EmailCapture
    };

    let signup = WaitlistSignup {
        email: email.clone(),
        first_name: req.first_name.map(|name| name.trim().to_string()).filter(|name| !name.is_empty()),
        selected_tier: req.selected_tier.unwrap_or_else(|| PENDING_TIER.to_string()),
        selected_price: req.selected_price.unwrap_or(0),
        willingness_to_pay: req.willingness_to_pay,
        subscription_preference: req.subscription_preference,
        risk_tier,
        utm_source: req.utm_source,
        utm_campaign: req.utm_campaign,
    };

    let mut already_registered = false;
    if let Some(backend) = &state.backend {
        match backend.insert_signup(&signup).await {
            Ok(()) => {}
            Err(err) if err.code == crate::models::errors::ErrorCode::LeadDuplicateSignup => {
                // Duplicate email is fine - the visitor is already in.
                already_registered = true;
            }
            Err(err) => {
                warn!("Signup persistence failed: {}", err);
                return Err(reject(err, start));
            }
        }
    }

    state.track(AnalyticsEvent::new(
        stage,
        req.session_id.as_deref(),
        serde_json::json!({
            "tier": signup.selected_tier.as_str(),
            "tier_label": tier_label(&signup.selected_tier),
            "already_registered": already_registered,
        }),
    ));

    let data = SignupData {
        email,
        already_registered,
    };
    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

/// Classify a completed session's answers
fn classification_for(state: &AppState, session_id: &str) -> AppResult<Classification> {
    let answers: AnswerMap = state
        .sessions
        .with_session(session_id, |session| Ok(session.answers().clone()))?;
    Ok(classifier::classify(&answers))
}

// ============================================
// Survey
// ============================================

pub async fn submit_survey(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SurveyRequest>,
) -> Result<Json<ApiResponse<SurveyData>>, HandlerError> {
    let start = Instant::now();

    if req.willingness_to_pay.trim().is_empty() || req.screening_barrier.trim().is_empty() {
        return Err(reject(
            AppError::bad_request("Both survey answers are required"),
            start,
        ));
    }

    let survey = SurveyResponse {
        willingness_to_pay: req.willingness_to_pay.clone(),
        screening_barrier: req.screening_barrier.clone(),
    };

    // Persist only when an email ties the answers to a signup row; a
    // backend failure is logged, not surfaced - feedback must never 500.
    let mut persisted = false;
    if let (Some(backend), Some(email)) = (&state.backend, req.email.as_deref()) {
        match backend.update_survey(email, &survey).await {
            Ok(()) => persisted = true,
            Err(err) => warn!("Survey update failed: {}", err),
        }
    }

    state.track(AnalyticsEvent::new(
        FunnelStage::SurveySubmit,
        None,
        serde_json::json!({
            "willingness_to_pay": survey.willingness_to_pay,
            "screening_barrier": survey.screening_barrier,
        }),
    ));

    Ok(Json(ApiResponse::success(
        SurveyData { persisted },
        elapsed_ms(start),
    )))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();

    let data = StatsData {
        funnel: state.analytics.get_stats(),
        sessions: state.sessions.stats(),
        uptime_seconds: state.uptime_seconds(),
        api_version: APP_VERSION.to_string(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}
