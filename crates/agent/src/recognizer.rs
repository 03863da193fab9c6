use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use statusbot_core::config::RecognizerConfig;
use statusbot_core::{ApplicationError, ExtractedEntities, Intent, RecognizedUtterance};

/// The external language service that labels an utterance with an intent and
/// extracts entity strings. Implementations must be cheap to call once per
/// idle-turn utterance; failures are not retried.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// An unconfigured recognizer must never be invoked; the router checks
    /// this before calling [`Recognizer::recognize`].
    fn is_configured(&self) -> bool {
        true
    }

    async fn recognize(&self, utterance: &str) -> Result<RecognizedUtterance, ApplicationError>;
}

/// Stand-in used when no recognizer credentials are present. The router sees
/// `is_configured() == false` and skips extraction entirely.
#[derive(Default)]
pub struct UnconfiguredRecognizer;

#[async_trait]
impl Recognizer for UnconfiguredRecognizer {
    fn is_configured(&self) -> bool {
        false
    }

    async fn recognize(&self, _utterance: &str) -> Result<RecognizedUtterance, ApplicationError> {
        Err(ApplicationError::Recognizer("recognizer is not configured".to_string()))
    }
}

/// Fixed-result recognizer for tests and local simulation.
pub struct StaticRecognizer {
    result: RecognizedUtterance,
}

impl StaticRecognizer {
    pub fn new(result: RecognizedUtterance) -> Self {
        Self { result }
    }
}

#[async_trait]
impl Recognizer for StaticRecognizer {
    async fn recognize(&self, _utterance: &str) -> Result<RecognizedUtterance, ApplicationError> {
        Ok(self.result.clone())
    }
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    query: &'a str,
    project_name: &'a str,
    deployment_name: &'a str,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    top_intent: String,
    #[serde(default)]
    entities: ExtractedEntities,
}

/// HTTP client for the hosted conversational-language service.
pub struct HttpRecognizer {
    client: reqwest::Client,
    analyze_url: String,
    api_key: String,
    project_name: String,
    deployment_name: String,
}

impl HttpRecognizer {
    /// Build from a fully-populated [`RecognizerConfig`]. Callers are
    /// expected to check `is_configured()` on the config first and fall back
    /// to [`UnconfiguredRecognizer`] otherwise.
    pub fn from_config(config: &RecognizerConfig) -> Result<Self, ApplicationError> {
        if !config.is_configured() {
            return Err(ApplicationError::Configuration(
                "recognizer credentials are incomplete".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| ApplicationError::Recognizer(error.to_string()))?;

        let api_host = config.api_host.clone().unwrap_or_default();
        Ok(Self {
            client,
            analyze_url: format!("{}/language/conversations/analyze", api_host.trim_end_matches('/')),
            api_key: config
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().to_string())
                .unwrap_or_default(),
            project_name: config.project_name.clone().unwrap_or_default(),
            deployment_name: config.deployment_name.clone().unwrap_or_default(),
        })
    }
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, utterance: &str) -> Result<RecognizedUtterance, ApplicationError> {
        let request = AnalyzeRequest {
            query: utterance,
            project_name: &self.project_name,
            deployment_name: &self.deployment_name,
        };

        let response = self
            .client
            .post(&self.analyze_url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|error| ApplicationError::Recognizer(error.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|error| ApplicationError::Recognizer(error.to_string()))?;

        let analysis: AnalyzeResponse = response
            .json()
            .await
            .map_err(|error| ApplicationError::Recognizer(error.to_string()))?;

        Ok(RecognizedUtterance {
            intent: Intent::from_label(&analysis.top_intent),
            entities: analysis.entities,
        })
    }
}

#[cfg(test)]
mod tests {
    use statusbot_core::config::RecognizerConfig;

    use super::{HttpRecognizer, Recognizer, UnconfiguredRecognizer};

    #[test]
    fn unconfigured_recognizer_reports_itself() {
        assert!(!UnconfiguredRecognizer.is_configured());
    }

    #[test]
    fn http_recognizer_rejects_incomplete_credentials() {
        let config = RecognizerConfig {
            project_name: Some("status-bot".to_string()),
            timeout_secs: 30,
            ..RecognizerConfig::default()
        };

        assert!(HttpRecognizer::from_config(&config).is_err());
    }

    #[test]
    fn http_recognizer_builds_the_analyze_url_from_the_host() {
        let config = RecognizerConfig {
            project_name: Some("status-bot".to_string()),
            deployment_name: Some("production".to_string()),
            api_key: Some("rk-test".to_string().into()),
            api_host: Some("https://language.example.net/".to_string()),
            timeout_secs: 30,
        };

        let recognizer =
            HttpRecognizer::from_config(&config).expect("complete config should build");
        assert_eq!(
            recognizer.analyze_url,
            "https://language.example.net/language/conversations/analyze"
        );
    }
}
