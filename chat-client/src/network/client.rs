use std::sync::Arc;

use tokio::sync::mpsc;

use crate::common::{ApiCommand, ApiEvent};

use super::api::ApiClient;

/// Background half of the client: turns UI commands into HTTP calls.
///
/// Every command runs as its own task; nothing is cancelled, deduplicated or
/// ordered, so answers reach the UI in completion order.
pub struct ApiWorker {
    client: Arc<ApiClient>,
    event_sender: mpsc::Sender<ApiEvent>,
    command_receiver: mpsc::Receiver<ApiCommand>,
}

impl ApiWorker {
    pub fn new(
        client: ApiClient,
        event_sender: mpsc::Sender<ApiEvent>,
        command_receiver: mpsc::Receiver<ApiCommand>,
    ) -> Self {
        Self {
            client: Arc::new(client),
            event_sender,
            command_receiver,
        }
    }

    pub async fn run(mut self) {
        log::info!(
            "API worker started for {} at {}",
            self.client.role(),
            self.client.base_url()
        );

        while let Some(command) = self.command_receiver.recv().await {
            let client = Arc::clone(&self.client);
            let event_sender = self.event_sender.clone();
            tokio::spawn(async move {
                let event = execute(&client, command).await;
                if let Err(err) = event_sender.send(event).await {
                    log::warn!("Failed to deliver API event to UI: {err}");
                }
            });
        }

        log::info!("Command channel closed, API worker stopping");
    }
}

/// Run one command against the API and describe the outcome.
pub async fn execute(client: &ApiClient, command: ApiCommand) -> ApiEvent {
    let outcome = match &command {
        ApiCommand::LoadProfile => client.profile().await.map(ApiEvent::ProfileLoaded),
        ApiCommand::LoadPatients => client.patients().await.map(ApiEvent::PatientsLoaded),
        ApiCommand::FetchConversation {
            self_id,
            peer_id,
            request_id,
        } => client
            .conversation(self_id, peer_id)
            .await
            .map(|messages| ApiEvent::ConversationLoaded {
                peer_id: peer_id.clone(),
                request_id: *request_id,
                messages,
            }),
        ApiCommand::SendMessage {
            sender_id,
            receiver_id,
            text,
        } => client
            .send_message(sender_id, receiver_id, text)
            .await
            .map(ApiEvent::MessageSent),
        ApiCommand::MarkRead { peer_id } => {
            client
                .mark_read(peer_id)
                .await
                .map(|updated| ApiEvent::MarkedRead {
                    peer_id: peer_id.clone(),
                    updated,
                })
        }
        ApiCommand::LoadUnreadCounts => client
            .unread_counts()
            .await
            .map(ApiEvent::UnreadCountsLoaded),
    };

    match outcome {
        Ok(event) => event,
        Err(err) => {
            log::warn!("Error {}: {err}", command.describe());
            ApiEvent::RequestFailed {
                message: err.to_string(),
                command,
            }
        }
    }
}
