//! Hosted Backend Client
//!
//! REST client for the managed Postgres backend that stores waitlist
//! signups and analytics events. Signup writes surface typed errors (a
//! unique violation means "already on the waitlist", which callers treat
//! as success); analytics writes are best-effort and never propagate.
//!
//! Disabled cleanly when BACKEND_URL / BACKEND_API_KEY are unset - the
//! quiz flow itself never depends on persistence being up.

use reqwest::StatusCode;
use std::time::Duration;
use tracing::{info, warn};

use crate::models::config::AppConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{SurveyResponse, WaitlistSignup};
use crate::utils::analytics::AnalyticsEvent;
use crate::utils::constants::{
    ANALYTICS_TABLE, DEFAULT_BACKEND_TIMEOUT_SECS, USER_AGENT, WAITLIST_TABLE,
};

/// Client for the hosted backend's REST surface
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BackendClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Build a client when the config carries both URL and key
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        match (&config.backend_url, &config.backend_api_key) {
            (Some(url), Some(key)) => {
                info!("Backend persistence enabled: {}", url);
                Some(Self::new(url, key))
            }
            _ => {
                info!("Backend persistence disabled (BACKEND_URL / BACKEND_API_KEY unset)");
                None
            }
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Insert a waitlist signup row
    ///
    /// A unique violation on the email column comes back as
    /// `LEAD_DUPLICATE_SIGNUP` so the caller can treat it as a friendly
    /// "already registered" rather than a failure.
    pub async fn insert_signup(&self, signup: &WaitlistSignup) -> AppResult<()> {
        let response = self
            .client
            .post(self.table_url(WAITLIST_TABLE))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(signup)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                info!("Waitlist signup stored for {}", signup.email);
                Ok(())
            }
            StatusCode::CONFLICT => Err(AppError::duplicate_signup(&signup.email)),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::backend_rejected(format!(
                    "Signup insert failed ({}): {}",
                    status, body
                )))
            }
        }
    }

    /// Attach survey answers to an existing signup row, matched by email
    pub async fn update_survey(&self, email: &str, survey: &SurveyResponse) -> AppResult<()> {
        let url = format!("{}?email=eq.{}", self.table_url(WAITLIST_TABLE), email);
        let response = self
            .client
            .patch(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(survey)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(AppError::backend_rejected(format!(
                "Survey update failed ({}): {}",
                status, body
            )))
        }
    }

    /// Insert an analytics event row; best-effort, errors are swallowed
    pub async fn insert_event(&self, event: &AnalyticsEvent) {
        let result = self
            .client
            .post(self.table_url(ANALYTICS_TABLE))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(event)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                warn!("Analytics event rejected by backend: {}", response.status());
            }
            Err(e) => {
                warn!("Analytics event not delivered: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(url: Option<&str>, key: Option<&str>) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            backend_url: url.map(|s| s.to_string()),
            backend_api_key: key.map(|s| s.to_string()),
            analytics_dir: PathBuf::from("./analytics"),
            session_ttl_secs: 1800,
        }
    }

    #[test]
    fn test_disabled_without_credentials() {
        assert!(BackendClient::from_config(&config(None, None)).is_none());
        assert!(BackendClient::from_config(&config(Some("https://x.supabase.co"), None)).is_none());
    }

    #[test]
    fn test_enabled_with_credentials() {
        let client = BackendClient::from_config(&config(Some("https://x.supabase.co/"), Some("key")));
        let client = client.expect("client");
        assert_eq!(
            client.table_url(WAITLIST_TABLE),
            "https://x.supabase.co/rest/v1/waitlist_signups"
        );
    }
}
