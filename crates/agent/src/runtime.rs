use std::sync::Arc;

use chrono::Utc;
use statusbot_core::dialog::prompts;
use statusbot_core::search::report;
use statusbot_core::{
    ApplicationError, DialogOutcome, DialogTurn, DomainError, ExecutionTally, QueryDialog,
    QueryExpression, StatusQuery,
};
use tracing::{debug, error, info};

use crate::recognizer::Recognizer;
use crate::router::{IntentRouter, RoutedTurn};
use crate::search::SearchIndex;
use crate::session::SessionStore;

/// One runtime per hosting process. Handles every conversation's turns;
/// per-conversation state lives in the session store, so concurrent
/// conversations never share mutable flow state.
pub struct AgentRuntime {
    router: IntentRouter,
    search: Arc<dyn SearchIndex>,
    sessions: SessionStore,
}

impl AgentRuntime {
    pub fn new(recognizer: Arc<dyn Recognizer>, search: Arc<dyn SearchIndex>) -> Self {
        Self { router: IntentRouter::new(recognizer), search, sessions: SessionStore::default() }
    }

    pub fn recognizer_configured(&self) -> bool {
        self.router.recognizer_configured()
    }

    /// Messages for a freshly started conversation.
    pub fn greeting(&self) -> Vec<String> {
        vec![prompts::GREETING.to_string()]
    }

    /// Handle one user message within a conversation and return the outbound
    /// messages, in order. A suspended dialog consumes the message as its
    /// next reply; otherwise the message is routed as a fresh utterance.
    pub async fn handle_message(
        &self,
        conversation_id: &str,
        text: &str,
        correlation_id: &str,
    ) -> Result<Vec<String>, ApplicationError> {
        if let Some(mut dialog) = self.sessions.take(conversation_id).await {
            let turn = dialog.resume(text).map_err(DomainError::from)?;
            return self.apply_turn(conversation_id, dialog, turn, correlation_id).await;
        }

        match self.router.route(text, correlation_id).await {
            RoutedTurn::NotUnderstood { message } => Ok(vec![message]),
            RoutedTurn::Flow { seed, notices } => {
                let (dialog, turn) = QueryDialog::begin(seed, Utc::now().date_naive());
                let mut replies = notices;
                replies
                    .extend(self.apply_turn(conversation_id, dialog, turn, correlation_id).await?);
                Ok(replies)
            }
        }
    }

    async fn apply_turn(
        &self,
        conversation_id: &str,
        dialog: QueryDialog,
        turn: DialogTurn,
        correlation_id: &str,
    ) -> Result<Vec<String>, ApplicationError> {
        match turn {
            DialogTurn::Prompt(text) => {
                self.sessions.put(conversation_id, dialog).await;
                Ok(vec![text])
            }
            DialogTurn::Finished(DialogOutcome::Cancelled) => {
                info!(
                    event_name = "flow.cancelled",
                    correlation_id = %correlation_id,
                    conversation_id = %conversation_id,
                    "user declined the confirmation; no search executed"
                );
                Ok(vec![prompts::RESTART_PROMPT.to_string()])
            }
            DialogTurn::Finished(DialogOutcome::Confirmed(query)) => {
                self.run_search(&query, conversation_id, correlation_id).await
            }
        }
    }

    /// Execute the confirmed query against the index and render the report.
    /// Search failures degrade to a user-safe message rather than killing the
    /// conversation; the flow restarts either way.
    async fn run_search(
        &self,
        query: &StatusQuery,
        conversation_id: &str,
        correlation_id: &str,
    ) -> Result<Vec<String>, ApplicationError> {
        let expression = QueryExpression::for_query(query);
        info!(
            event_name = "search.query_issued",
            correlation_id = %correlation_id,
            conversation_id = %conversation_id,
            query = %expression,
            "issuing execution index query"
        );

        match self.search.search(&expression).await {
            Ok(records) => {
                let tally = ExecutionTally::from_records(&records);
                if tally.unrecognized_count > 0 {
                    debug!(
                        event_name = "search.unrecognized_statuses",
                        correlation_id = %correlation_id,
                        unrecognized_count = tally.unrecognized_count,
                        "records carried statuses other than Pass/Fail"
                    );
                }

                let mut messages = report::render(query, &tally);
                messages.push(prompts::RESTART_PROMPT.to_string());
                Ok(messages)
            }
            Err(application_error) => {
                error!(
                    event_name = "search.query_failed",
                    correlation_id = %correlation_id,
                    conversation_id = %conversation_id,
                    error = %application_error,
                    "execution index query failed"
                );
                let interface = application_error.into_interface(correlation_id);
                Ok(vec![
                    interface.user_message().to_string(),
                    prompts::RESTART_PROMPT.to_string(),
                ])
            }
        }
    }
}
