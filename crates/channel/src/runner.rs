use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use statusbot_core::ApplicationError;
use tracing::{error, info, warn};

use crate::events::{Activity, ChannelEnvelope};
use crate::transport::{ChannelTransport, ReconnectPolicy, TransportError};

/// What the pump calls for each activity. Returned strings are sent back into
/// the activity's conversation, in order.
#[async_trait]
pub trait TurnHandler: Send + Sync {
    async fn on_conversation_started(
        &self,
        conversation_id: &str,
        correlation_id: &str,
    ) -> Result<Vec<String>, ApplicationError>;

    async fn on_message(
        &self,
        conversation_id: &str,
        text: &str,
        correlation_id: &str,
    ) -> Result<Vec<String>, ApplicationError>;
}

pub struct ChannelRunner {
    transport: Arc<dyn ChannelTransport>,
    handler: Arc<dyn TurnHandler>,
    reconnect_policy: ReconnectPolicy,
}

impl ChannelRunner {
    pub fn new(
        transport: Arc<dyn ChannelTransport>,
        handler: Arc<dyn TurnHandler>,
        reconnect_policy: ReconnectPolicy,
    ) -> Self {
        Self { transport, handler, reconnect_policy }
    }

    pub async fn start(&self) -> Result<()> {
        for attempt in 0..=self.reconnect_policy.max_retries {
            match self.connect_and_pump(attempt).await {
                Ok(()) => return Ok(()),
                Err(transport_error) => {
                    warn!(
                        attempt,
                        max_retries = self.reconnect_policy.max_retries,
                        error = %transport_error,
                        "channel transport failed"
                    );

                    if attempt >= self.reconnect_policy.max_retries {
                        warn!(
                            max_retries = self.reconnect_policy.max_retries,
                            "channel retries exhausted; continuing process without crash"
                        );
                        return Ok(());
                    }

                    let delay = self.reconnect_policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn connect_and_pump(&self, attempt: u32) -> Result<(), TransportError> {
        info!(attempt, "opening channel transport connection");
        self.transport.connect().await?;
        info!(attempt, "channel transport connected");

        loop {
            let Some(envelope) = self.transport.next_envelope().await? else {
                info!(attempt, "channel transport stream closed");
                self.transport.disconnect().await?;
                return Ok(());
            };

            info!(
                event_name = "ingress.channel.envelope_received",
                envelope_id = %envelope.envelope_id,
                activity_type = envelope.activity.activity_type(),
                correlation_id = %envelope.envelope_id,
                conversation_id = envelope.activity.conversation_id().unwrap_or("unknown"),
                "received channel envelope"
            );

            self.transport.acknowledge(&envelope.envelope_id).await?;
            self.dispatch(envelope).await?;
        }
    }

    /// One turn per envelope. Handler failures are reported into the
    /// conversation as a user-safe message and never stop the pump.
    async fn dispatch(&self, envelope: ChannelEnvelope) -> Result<(), TransportError> {
        let correlation_id = envelope.envelope_id.clone();

        let (conversation_id, outcome) = match envelope.activity {
            Activity::Message(message) => {
                let outcome = self
                    .handler
                    .on_message(&message.conversation_id, &message.text, &correlation_id)
                    .await;
                (message.conversation_id, outcome)
            }
            Activity::ConversationStarted { conversation_id } => {
                let outcome =
                    self.handler.on_conversation_started(&conversation_id, &correlation_id).await;
                (conversation_id, outcome)
            }
            Activity::Unsupported { activity_type } => {
                info!(
                    event_name = "ingress.channel.activity_ignored",
                    correlation_id = %correlation_id,
                    activity_type = %activity_type,
                    "ignoring unsupported activity"
                );
                return Ok(());
            }
        };

        let replies = match outcome {
            Ok(replies) => replies,
            Err(application_error) => {
                error!(
                    event_name = "ingress.channel.turn_failed",
                    correlation_id = %correlation_id,
                    conversation_id = %conversation_id,
                    error = %application_error,
                    "turn handler failed"
                );
                let interface = application_error.into_interface(correlation_id.clone());
                vec![interface.user_message().to_string()]
            }
        };

        for reply in replies {
            self.transport.send(&conversation_id, &reply).await?;
        }

        Ok(())
    }
}
