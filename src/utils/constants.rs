//! Constants Module - Single Source of Truth
//!
//! Every constant, default and table name used across the application is
//! defined here. No hardcoded values in other modules.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "ArtemisQuiz";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for HTTP requests to the hosted backend
pub const USER_AGENT: &str = "ArtemisQuiz/0.1.0";

// ============================================
// SESSION CONSTANTS
// ============================================

/// Idle quiz sessions expire after 30 minutes
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Session and rate-limiter sweeps run on this cadence
pub const SWEEP_INTERVAL_SECS: u64 = 60;

// ============================================
// ANALYTICS CONSTANTS
// ============================================

/// Default export directory for funnel analytics
pub const DEFAULT_ANALYTICS_DIR: &str = "./analytics";

/// Buffered events are flushed to disk past this count
pub const DEFAULT_ANALYTICS_BUFFER: usize = 1000;

// ============================================
// API CONSTANTS
// ============================================

/// Default per-client request budget per minute
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 120;

// ============================================
// BACKEND CONSTANTS
// ============================================

/// Timeout for hosted-backend writes
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 5;

/// Waitlist signup table
pub const WAITLIST_TABLE: &str = "waitlist_signups";

/// Analytics event table
pub const ANALYTICS_TABLE: &str = "analytics_events";

/// Tier recorded at email capture, before a plan is chosen
pub const PENDING_TIER: &str = "pending";

// ============================================
// PRICING TIERS
// ============================================

/// Human label for a pricing tier slug shown on the waitlist page
pub fn tier_label(slug: &str) -> &'static str {
    match slug {
        "basic" => "Basic Report",
        "guided" => "Guided Analysis",
        "expert" => "Expert Consultation",
        "pending" => "Pending",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_labels() {
        assert_eq!(tier_label("guided"), "Guided Analysis");
        assert_eq!(tier_label("nope"), "Unknown");
    }
}
