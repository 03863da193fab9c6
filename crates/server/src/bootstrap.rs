use std::sync::Arc;

use async_trait::async_trait;
use statusbot_agent::recognizer::{HttpRecognizer, Recognizer, UnconfiguredRecognizer};
use statusbot_agent::search::HttpSearchIndex;
use statusbot_agent::AgentRuntime;
use statusbot_channel::runner::{ChannelRunner, TurnHandler};
use statusbot_channel::transport::{NoopChannelTransport, ReconnectPolicy};
use statusbot_core::config::{AppConfig, ConfigError, LoadOptions};
use statusbot_core::ApplicationError;
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub runtime: Arc<AgentRuntime>,
    pub channel_runner: ChannelRunner,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("collaborator construction failed: {0}")]
    Collaborator(#[from] ApplicationError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        conversation_id = "unknown",
        "starting application bootstrap"
    );
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let recognizer: Arc<dyn Recognizer> = if config.recognizer.is_configured() {
        Arc::new(HttpRecognizer::from_config(&config.recognizer)?)
    } else {
        Arc::new(UnconfiguredRecognizer)
    };
    info!(
        event_name = "system.bootstrap.recognizer_mode",
        correlation_id = "bootstrap",
        conversation_id = "unknown",
        recognizer_mode = if recognizer.is_configured() { "http" } else { "unconfigured" },
        "recognizer collaborator initialized"
    );

    let search = Arc::new(HttpSearchIndex::from_config(&config.search)?);
    info!(
        event_name = "system.bootstrap.search_connected",
        correlation_id = "bootstrap",
        conversation_id = "unknown",
        endpoint = %config.search.endpoint,
        index_name = %config.search.index_name,
        "execution index client initialized"
    );

    let runtime = Arc::new(AgentRuntime::new(recognizer, search));

    // The concrete channel binding is supplied by the hosting environment;
    // without one the runner stays inert on the noop transport.
    let channel_runner = ChannelRunner::new(
        Arc::new(NoopChannelTransport),
        Arc::new(RuntimeTurnHandler { runtime: runtime.clone() }),
        ReconnectPolicy::default(),
    );

    Ok(Application { config, runtime, channel_runner })
}

/// Bridges channel activities onto the agent runtime.
struct RuntimeTurnHandler {
    runtime: Arc<AgentRuntime>,
}

#[async_trait]
impl TurnHandler for RuntimeTurnHandler {
    async fn on_conversation_started(
        &self,
        _conversation_id: &str,
        _correlation_id: &str,
    ) -> Result<Vec<String>, ApplicationError> {
        Ok(self.runtime.greeting())
    }

    async fn on_message(
        &self,
        conversation_id: &str,
        text: &str,
        correlation_id: &str,
    ) -> Result<Vec<String>, ApplicationError> {
        self.runtime.handle_message(conversation_id, text, correlation_id).await
    }
}
