//! Transport-free messaging operations: validation on top of a [`MessageStore`].

use std::collections::HashMap;

use crate::common::Message;
use crate::error::{ChatError, Result};
use crate::storage::{MessageStore, NewMessage};

pub struct MessagingService<S> {
    store: S,
}

impl<S: MessageStore> MessagingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and persist one message. The text is stored as given.
    pub fn send(&self, sender_id: &str, receiver_id: &str, text: &str) -> Result<Message> {
        let sender_id = require_identity(sender_id, "senderId")?;
        let receiver_id = require_identity(receiver_id, "receiverId")?;
        if text.trim().is_empty() {
            return Err(ChatError::validation("Message cannot be empty"));
        }
        if sender_id == receiver_id {
            return Err(ChatError::validation(
                "senderId and receiverId must be different participants",
            ));
        }

        let message = self
            .store
            .insert_message(&NewMessage::new(sender_id, receiver_id, text))?;
        log::debug!(
            "Stored message {} from {} to {}",
            message.id,
            message.sender_id,
            message.receiver_id
        );
        Ok(message)
    }

    /// Every message of the conversation `{a, b}`, in creation order.
    pub fn fetch(&self, a: &str, b: &str) -> Result<Vec<Message>> {
        let a = require_identity(a, "participant id")?;
        let b = require_identity(b, "participant id")?;
        self.store.conversation(a, b)
    }

    pub fn mark_read(&self, reader: &str, peer: &str) -> Result<usize> {
        let reader = require_identity(reader, "reader id")?;
        let peer = require_identity(peer, "userId")?;
        let updated = self.store.mark_read(reader, peer)?;
        if updated > 0 {
            log::debug!("Marked {updated} messages from {peer} to {reader} as read");
        }
        Ok(updated)
    }

    pub fn unread_counts(&self, reader: &str) -> Result<HashMap<String, usize>> {
        let reader = require_identity(reader, "reader id")?;
        self.store.unread_counts(reader)
    }
}

fn require_identity<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ChatError::validation(format!("{field} is required")))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteMessageStore;

    fn service() -> MessagingService<SqliteMessageStore> {
        MessagingService::new(SqliteMessageStore::in_memory().unwrap())
    }

    #[test]
    fn send_then_fetch_returns_the_message() {
        let service = service();
        let sent = service.send("doc1", "pat1", "Hello").unwrap();

        let thread = service.fetch("doc1", "pat1").unwrap();
        assert_eq!(thread, vec![sent.clone()]);
        assert_eq!(sent.sender_id, "doc1");
        assert_eq!(sent.receiver_id, "pat1");
        assert_eq!(sent.text, "Hello");
    }

    #[test]
    fn whitespace_only_text_is_rejected_and_not_persisted() {
        let service = service();
        let err = service.send("doc1", "pat1", "   ").unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
        assert!(service.fetch("doc1", "pat1").unwrap().is_empty());
        assert_eq!(service.store().message_count().unwrap(), 0);
    }

    #[test]
    fn missing_participants_are_rejected() {
        let service = service();
        assert!(matches!(
            service.send("", "pat1", "hi"),
            Err(ChatError::Validation(_))
        ));
        assert!(matches!(
            service.send("doc1", " ", "hi"),
            Err(ChatError::Validation(_))
        ));
        assert!(matches!(
            service.send("doc1", "doc1", "hi"),
            Err(ChatError::Validation(_))
        ));
        assert!(matches!(service.fetch("doc1", ""), Err(ChatError::Validation(_))));
        assert_eq!(service.store().message_count().unwrap(), 0);
    }

    #[test]
    fn text_is_stored_verbatim() {
        let service = service();
        let sent = service.send("pat1", "doc1", "  spaced  ").unwrap();
        assert_eq!(sent.text, "  spaced  ");
    }

    #[test]
    fn n_sends_yield_n_messages_in_order_from_either_side() {
        let service = service();
        let inputs = [
            ("doc1", "pat1", "a"),
            ("pat1", "doc1", "b"),
            ("pat1", "doc1", "c"),
            ("doc1", "pat1", "d"),
            ("doc1", "pat1", "e"),
        ];
        for (sender, receiver, text) in inputs {
            service.send(sender, receiver, text).unwrap();
        }

        let forward = service.fetch("doc1", "pat1").unwrap();
        assert_eq!(forward.len(), inputs.len());
        for (message, (sender, receiver, text)) in forward.iter().zip(inputs) {
            assert_eq!(message.sender_id, sender);
            assert_eq!(message.receiver_id, receiver);
            assert_eq!(message.text, text);
        }
        assert_eq!(forward, service.fetch("pat1", "doc1").unwrap());
        assert!(forward.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn unread_counts_follow_mark_read() {
        let service = service();
        service.send("pat1", "doc1", "one").unwrap();
        service.send("pat1", "doc1", "two").unwrap();
        service.send("pat2", "doc1", "three").unwrap();
        service.send("doc1", "pat1", "reply").unwrap();

        let counts = service.unread_counts("doc1").unwrap();
        assert_eq!(counts.get("pat1"), Some(&2));
        assert_eq!(counts.get("pat2"), Some(&1));

        assert_eq!(service.mark_read("doc1", "pat1").unwrap(), 2);
        let counts = service.unread_counts("doc1").unwrap();
        assert_eq!(counts.get("pat1"), None);
        assert_eq!(counts.get("pat2"), Some(&1));
    }
}
