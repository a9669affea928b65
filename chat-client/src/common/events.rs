use std::collections::HashMap;

use hms_chat::{Message, Participant};

use super::commands::ApiCommand;
use super::types::RequestId;

/// Sự kiện từ tầng mạng gửi lên UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEvent {
    ProfileLoaded(Participant),
    PatientsLoaded(Vec<Participant>),
    ConversationLoaded {
        peer_id: String,
        request_id: RequestId,
        messages: Vec<Message>,
    },
    MessageSent(Message),
    MarkedRead {
        peer_id: String,
        updated: usize,
    },
    UnreadCountsLoaded(HashMap<String, usize>),
    /// The command that failed and the server or transport message.
    RequestFailed {
        command: ApiCommand,
        message: String,
    },
}
