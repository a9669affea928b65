use super::types::RequestId;

/// Lệnh UI gửi xuống tầng mạng.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCommand {
    /// Resolve the caller's own identity from its token.
    LoadProfile,
    /// Patient directory, doctor side only.
    LoadPatients,
    /// Load the whole conversation between `self_id` and `peer_id`.
    FetchConversation {
        self_id: String,
        peer_id: String,
        request_id: RequestId,
    },
    SendMessage {
        sender_id: String,
        receiver_id: String,
        text: String,
    },
    /// Flag everything `peer_id` sent to the caller as read.
    MarkRead { peer_id: String },
    LoadUnreadCounts,
}

impl ApiCommand {
    pub fn describe(&self) -> &'static str {
        match self {
            ApiCommand::LoadProfile => "loading profile",
            ApiCommand::LoadPatients => "loading patients",
            ApiCommand::FetchConversation { .. } => "fetching messages",
            ApiCommand::SendMessage { .. } => "sending message",
            ApiCommand::MarkRead { .. } => "marking messages read",
            ApiCommand::LoadUnreadCounts => "loading unread counts",
        }
    }
}
