use std::sync::Arc;

use statusbot_core::{Intent, StatusQuery};
use tracing::{debug, warn};

use crate::recognizer::Recognizer;

/// Sent once per conversation when no recognizer credentials are present.
pub const UNCONFIGURED_NOTE: &str = "NOTE: the language recognizer is not configured. To enable \
     all capabilities, set recognizer.project_name, recognizer.deployment_name, \
     recognizer.api_key and recognizer.api_host in statusbot.toml.";

/// Where one idle-turn utterance goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoutedTurn {
    /// Start the slot-filling flow with this seed. `notices` are sent before
    /// the flow's own first prompt.
    Flow { seed: StatusQuery, notices: Vec<String> },
    /// The utterance did not map to a known intent; one message, no flow.
    NotUnderstood { message: String },
}

pub struct IntentRouter {
    recognizer: Arc<dyn Recognizer>,
}

impl IntentRouter {
    pub fn new(recognizer: Arc<dyn Recognizer>) -> Self {
        Self { recognizer }
    }

    pub fn recognizer_configured(&self) -> bool {
        self.recognizer.is_configured()
    }

    /// Route one utterance. The recognizer is invoked at most once and never
    /// retried; a failed invocation degrades to an empty-seed flow instead of
    /// failing the turn.
    pub async fn route(&self, utterance: &str, correlation_id: &str) -> RoutedTurn {
        if !self.recognizer.is_configured() {
            return RoutedTurn::Flow {
                seed: StatusQuery::default(),
                notices: vec![UNCONFIGURED_NOTE.to_string()],
            };
        }

        match self.recognizer.recognize(utterance).await {
            Ok(recognized) => match recognized.intent {
                Intent::ProjectStatus => {
                    let seed = recognized.seed_query();
                    debug!(
                        event_name = "router.intent_recognized",
                        correlation_id = %correlation_id,
                        intent = recognized.intent.label(),
                        seeded_slots = 5 - seed.missing_slots().len(),
                        "routing utterance into the status flow"
                    );
                    RoutedTurn::Flow { seed, notices: Vec::new() }
                }
                Intent::Other(label) => RoutedTurn::NotUnderstood {
                    message: format!(
                        "Sorry, I didn't get that. Please try asking in a different way \
                         (intent was {label})"
                    ),
                },
            },
            Err(error) => {
                warn!(
                    event_name = "router.recognizer_unavailable",
                    correlation_id = %correlation_id,
                    error = %error,
                    "recognizer invocation failed; continuing with an empty query"
                );
                RoutedTurn::Flow { seed: StatusQuery::default(), notices: Vec::new() }
            }
        }
    }
}
