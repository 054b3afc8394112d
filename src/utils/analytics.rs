//! Funnel Analytics Module
//!
//! Collects anonymous funnel statistics for:
//! - Conversion reporting (quiz starts -> completions -> signups)
//! - Tier distribution across completed assessments
//! - Product decisions on drop-off points
//!
//! Privacy-first: no emails or names are stored in events. Analytics are
//! fire-and-forget; every failure path is swallowed so the quiz flow can
//! never be blocked by reporting.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::models::types::Classification;
use crate::utils::constants::{DEFAULT_ANALYTICS_BUFFER, DEFAULT_ANALYTICS_DIR};

/// Funnel stages tracked through the product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FunnelStage {
    QuizStart,
    AnswerSelect,
    QuizComplete,
    EmailCapture,
    WaitlistSignup,
    SurveySubmit,
    PageView,
}

impl FunnelStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStage::QuizStart => "quiz_start",
            FunnelStage::AnswerSelect => "answer_select",
            FunnelStage::QuizComplete => "quiz_complete",
            FunnelStage::EmailCapture => "email_capture",
            FunnelStage::WaitlistSignup => "waitlist_signup",
            FunnelStage::SurveySubmit => "survey_submit",
            FunnelStage::PageView => "page_view",
        }
    }
}

/// Single analytics event (anonymized)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Event id
    pub id: String,
    /// Unix timestamp
    pub timestamp: u64,
    /// Funnel stage
    pub stage: FunnelStage,
    /// Quiz session the event belongs to, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Additional context (no PII)
    pub properties: serde_json::Value,
}

impl AnalyticsEvent {
    pub fn new(stage: FunnelStage, session_id: Option<&str>, properties: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: current_timestamp(),
            stage,
            session_id: session_id.map(|s| s.to_string()),
            properties,
        }
    }

    /// Completion event carrying the full classifier output
    pub fn completion(session_id: &str, classification: &Classification) -> Self {
        let high: Vec<String> = classification
            .high_priority_factors
            .iter()
            .map(|factor| factor.description())
            .collect();
        let additional: Vec<String> = classification
            .additional_factors
            .iter()
            .map(|factor| factor.description())
            .collect();

        Self::new(
            FunnelStage::QuizComplete,
            Some(session_id),
            serde_json::json!({
                "tier": classification.tier.slug(),
                "high_priority_factors": high,
                "additional_factors": additional,
            }),
        )
    }
}

/// Aggregated funnel statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FunnelStats {
    pub quizzes_started: u64,
    pub answers_recorded: u64,
    pub quizzes_completed: u64,
    pub emails_captured: u64,
    pub waitlist_signups: u64,
    pub surveys_submitted: u64,
    /// Completed quizzes per started quiz
    pub completion_rate: f64,
    /// Signups per completed quiz
    pub signup_rate: f64,
    /// Completed assessments per tier slug
    pub tiers: HashMap<String, u64>,
    pub period_start: u64,
    pub period_end: u64,
}

impl FunnelStats {
    /// Human-readable funnel report
    pub fn report(&self) -> String {
        let period_hours = (self.period_end.saturating_sub(self.period_start)) / 3600;
        let mut tiers: Vec<(&String, &u64)> = self.tiers.iter().collect();
        tiers.sort();
        let tier_lines: String = tiers
            .iter()
            .map(|(slug, count)| format!("   {:<16} {:>8}\n", slug, count))
            .collect();

        format!(
            "\n=== ARTEMIS QUIZ - FUNNEL REPORT ===\n\
             Period: {} hours\n\
             Quizzes started:    {:>8}\n\
             Answers recorded:   {:>8}\n\
             Quizzes completed:  {:>8} ({:.1}%)\n\
             Emails captured:    {:>8}\n\
             Waitlist signups:   {:>8} ({:.1}% of completions)\n\
             Surveys submitted:  {:>8}\n\
             Tier distribution:\n{}",
            period_hours,
            self.quizzes_started,
            self.answers_recorded,
            self.quizzes_completed,
            self.completion_rate * 100.0,
            self.emails_captured,
            self.waitlist_signups,
            self.signup_rate * 100.0,
            self.surveys_submitted,
            tier_lines,
        )
    }

    /// Export as JSON for the stats endpoint
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Main analytics collector
pub struct AnalyticsCollector {
    /// Event buffer (in-memory)
    events: Arc<RwLock<Vec<AnalyticsEvent>>>,
    /// Atomic counters for fast updates
    quizzes_started: AtomicU64,
    answers_recorded: AtomicU64,
    quizzes_completed: AtomicU64,
    emails_captured: AtomicU64,
    waitlist_signups: AtomicU64,
    surveys_submitted: AtomicU64,
    /// Completed assessments per tier slug
    tier_counts: Arc<RwLock<HashMap<String, u64>>>,
    /// Session start time
    session_start: u64,
    /// Export directory
    export_dir: PathBuf,
    /// Max events in memory before flush
    max_buffer_size: usize,
}

impl AnalyticsCollector {
    /// Create new collector with default settings
    pub fn new() -> Self {
        Self::with_config(PathBuf::from(DEFAULT_ANALYTICS_DIR), DEFAULT_ANALYTICS_BUFFER)
    }

    /// Create collector with custom config
    pub fn with_config(export_dir: PathBuf, max_buffer_size: usize) -> Self {
        // Ensure export directory exists
        let _ = fs::create_dir_all(&export_dir);

        Self {
            events: Arc::new(RwLock::new(Vec::with_capacity(max_buffer_size))),
            quizzes_started: AtomicU64::new(0),
            answers_recorded: AtomicU64::new(0),
            quizzes_completed: AtomicU64::new(0),
            emails_captured: AtomicU64::new(0),
            waitlist_signups: AtomicU64::new(0),
            surveys_submitted: AtomicU64::new(0),
            tier_counts: Arc::new(RwLock::new(HashMap::new())),
            session_start: current_timestamp(),
            export_dir,
            max_buffer_size,
        }
    }

    /// Record an event; never fails, never blocks the caller meaningfully
    pub fn record(&self, event: AnalyticsEvent) {
        match event.stage {
            FunnelStage::QuizStart => {
                self.quizzes_started.fetch_add(1, Ordering::Relaxed);
            }
            FunnelStage::AnswerSelect => {
                self.answers_recorded.fetch_add(1, Ordering::Relaxed);
            }
            FunnelStage::QuizComplete => {
                self.quizzes_completed.fetch_add(1, Ordering::Relaxed);
            }
            FunnelStage::EmailCapture => {
                self.emails_captured.fetch_add(1, Ordering::Relaxed);
            }
            FunnelStage::WaitlistSignup => {
                self.waitlist_signups.fetch_add(1, Ordering::Relaxed);
            }
            FunnelStage::SurveySubmit => {
                self.surveys_submitted.fetch_add(1, Ordering::Relaxed);
            }
            FunnelStage::PageView => {}
        }

        // Track tier distribution from completion events
        if let Some(tier) = event.properties.get("tier").and_then(|v| v.as_str()) {
            if let Ok(mut counts) = self.tier_counts.write() {
                *counts.entry(tier.to_string()).or_insert(0) += 1;
            }
        }

        // Buffer event
        if let Ok(mut events) = self.events.write() {
            events.push(event);

            // Auto-flush if buffer full
            if events.len() >= self.max_buffer_size {
                let events_to_flush = std::mem::take(&mut *events);
                drop(events); // Release lock before I/O
                let _ = self.flush_events(&events_to_flush);
            }
        }
    }

    /// Get current statistics
    pub fn get_stats(&self) -> FunnelStats {
        let started = self.quizzes_started.load(Ordering::Relaxed);
        let completed = self.quizzes_completed.load(Ordering::Relaxed);
        let signups = self.waitlist_signups.load(Ordering::Relaxed);

        let completion_rate = if started > 0 {
            completed as f64 / started as f64
        } else {
            0.0
        };
        let signup_rate = if completed > 0 {
            signups as f64 / completed as f64
        } else {
            0.0
        };

        let tiers = self
            .tier_counts
            .read()
            .map(|counts| counts.clone())
            .unwrap_or_default();

        FunnelStats {
            quizzes_started: started,
            answers_recorded: self.answers_recorded.load(Ordering::Relaxed),
            quizzes_completed: completed,
            emails_captured: self.emails_captured.load(Ordering::Relaxed),
            waitlist_signups: signups,
            surveys_submitted: self.surveys_submitted.load(Ordering::Relaxed),
            completion_rate,
            signup_rate,
            tiers,
            period_start: self.session_start,
            period_end: current_timestamp(),
        }
    }

    /// Export current stats to JSON file
    pub fn export_stats_json(&self) -> Result<PathBuf, std::io::Error> {
        let stats = self.get_stats();
        let filename = format!("funnel_{}.json", current_timestamp());
        let path = self.export_dir.join(filename);

        let json = serde_json::to_string_pretty(&stats)?;
        fs::write(&path, json)?;

        Ok(path)
    }

    /// Flush any buffered events to disk (called on shutdown)
    pub fn flush(&self) {
        if let Ok(mut events) = self.events.write() {
            let events_to_flush = std::mem::take(&mut *events);
            drop(events);
            let _ = self.flush_events(&events_to_flush);
        }
    }

    /// Flush buffered events to disk
    fn flush_events(&self, events: &[AnalyticsEvent]) -> Result<(), std::io::Error> {
        if events.is_empty() {
            return Ok(());
        }

        let filename = format!("events_{}.jsonl", current_timestamp());
        let path = self.export_dir.join(filename);

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        for event in events {
            if let Ok(json) = serde_json::to_string(event) {
                writeln!(file, "{}", json)?;
            }
        }

        Ok(())
    }

    /// Generate the funnel report
    pub fn funnel_report(&self) -> String {
        self.get_stats().report()
    }
}

impl Default for AnalyticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{RiskFactor, RiskTier};

    fn test_collector() -> AnalyticsCollector {
        AnalyticsCollector::with_config(std::env::temp_dir().join("artemis_analytics_test"), 1000)
    }

    fn classification(tier: RiskTier) -> Classification {
        Classification {
            tier,
            high_priority_factors: vec![RiskFactor::KnownMutation],
            additional_factors: vec![],
        }
    }

    #[test]
    fn test_event_creation() {
        let event = AnalyticsEvent::new(
            FunnelStage::QuizStart,
            Some("abc"),
            serde_json::json!({ "source": "landing" }),
        );

        assert_eq!(event.stage, FunnelStage::QuizStart);
        assert_eq!(event.session_id.as_deref(), Some("abc"));
        assert!(!event.id.is_empty());
    }

    #[test]
    fn test_counters_accumulate() {
        let collector = test_collector();

        collector.record(AnalyticsEvent::new(FunnelStage::QuizStart, Some("a"), serde_json::json!({})));
        collector.record(AnalyticsEvent::new(FunnelStage::QuizStart, Some("b"), serde_json::json!({})));
        collector.record(AnalyticsEvent::completion("a", &classification(RiskTier::ElevatedNeed)));

        let stats = collector.get_stats();
        assert_eq!(stats.quizzes_started, 2);
        assert_eq!(stats.quizzes_completed, 1);
        assert_eq!(stats.completion_rate, 0.5);
        assert_eq!(stats.tiers.get("elevated-need"), Some(&1));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(FunnelStage::WaitlistSignup.as_str(), "waitlist_signup");
        assert_eq!(FunnelStage::QuizComplete.as_str(), "quiz_complete");
    }

    #[test]
    fn test_report_contains_counts() {
        let collector = test_collector();
        collector.record(AnalyticsEvent::new(FunnelStage::QuizStart, None, serde_json::json!({})));
        collector.record(AnalyticsEvent::completion("a", &classification(RiskTier::Standard)));

        let report = collector.funnel_report();
        assert!(report.contains("FUNNEL REPORT"));
        assert!(report.contains("standard"));
    }

    #[test]
    fn test_stats_json_export() {
        let stats = FunnelStats {
            quizzes_started: 100,
            quizzes_completed: 40,
            waitlist_signups: 10,
            ..Default::default()
        };

        let json = stats.to_json();
        assert!(json.contains("100"));
        assert!(json.contains("waitlist_signups"));
    }
}
