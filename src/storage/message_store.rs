use std::collections::HashMap;

use crate::common::Message;
use crate::error::Result;

use super::models::NewMessage;

/// Persistence contract of the chat messages.
///
/// Conversations are addressed only by the unordered pair of participant
/// ids; there is no conversation record.
pub trait MessageStore: Send + Sync {
    /// Persist a message, assigning its id, timestamps and `is_read = false`.
    fn insert_message(&self, message: &NewMessage) -> Result<Message>;

    /// All messages between `a` and `b` in both directions, in creation order.
    fn conversation(&self, a: &str, b: &str) -> Result<Vec<Message>>;

    /// Flag every unread message sent by `peer` to `reader` as read.
    /// Returns the number of messages that changed.
    fn mark_read(&self, reader: &str, peer: &str) -> Result<usize>;

    /// Unread incoming messages of `reader`, keyed by sender.
    fn unread_counts(&self, reader: &str) -> Result<HashMap<String, usize>>;

    fn message_count(&self) -> Result<usize>;
}
