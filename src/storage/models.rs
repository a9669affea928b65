/// Insert payload for a message; id and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub text: String,
}

impl NewMessage {
    pub fn new(
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            text: text.into(),
        }
    }
}
