use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Result as SqlResult, Row, params};
use uuid::Uuid;

use crate::common::Message;
use crate::error::{ChatError, Result};

use super::database::Database;
use super::message_store::MessageStore;
use super::models::NewMessage;

const MESSAGE_COLUMNS: &str =
    "id, sender_id, receiver_id, message, timestamp, created_at, updated_at, is_read";

/// SQLite-backed message store
pub struct SqliteMessageStore {
    db: Mutex<Database>,
}

impl SqliteMessageStore {
    /// Open (or create) the message store at `path`, creating missing directories.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        super::ensure_parent_dir(path).map_err(|err| ChatError::Storage(err.to_string()))?;
        Self::from_database(Database::new(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_database(Database::in_memory()?)
    }

    fn from_database(db: Database) -> Result<Self> {
        Ok(Self { db: Mutex::new(db) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| ChatError::Storage("message store lock poisoned".to_string()))
    }
}

fn message_from_row(row: &Row<'_>) -> SqlResult<Message> {
    Ok(Message {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        receiver_id: row.get(2)?,
        text: row.get(3)?,
        timestamp: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
        is_read: row.get::<_, i64>(7)? != 0,
    })
}

impl MessageStore for SqliteMessageStore {
    fn insert_message(&self, message: &NewMessage) -> Result<Message> {
        let now = Utc::now();
        let stored = Message {
            id: Uuid::new_v4().to_string(),
            sender_id: message.sender_id.clone(),
            receiver_id: message.receiver_id.clone(),
            text: message.text.clone(),
            timestamp: now,
            created_at: now,
            updated_at: now,
            is_read: false,
        };

        let db = self.lock()?;
        db.connection().execute(
            "INSERT INTO messages (id, sender_id, receiver_id, message, timestamp, created_at, updated_at, is_read)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0)",
            params![
                stored.id,
                stored.sender_id,
                stored.receiver_id,
                stored.text,
                stored.timestamp,
                stored.created_at,
                stored.updated_at
            ],
        )?;

        Ok(stored)
    }

    fn conversation(&self, a: &str, b: &str) -> Result<Vec<Message>> {
        let db = self.lock()?;
        let mut stmt = db.connection().prepare(&format!(
            "SELECT {MESSAGE_COLUMNS}
             FROM messages
             WHERE (sender_id = ?1 AND receiver_id = ?2)
                OR (sender_id = ?2 AND receiver_id = ?1)
             ORDER BY seq ASC"
        ))?;

        let messages = stmt
            .query_map(params![a, b], message_from_row)?
            .collect::<SqlResult<Vec<_>>>()?;

        Ok(messages)
    }

    fn mark_read(&self, reader: &str, peer: &str) -> Result<usize> {
        let db = self.lock()?;
        let updated = db.connection().execute(
            "UPDATE messages SET is_read = 1, updated_at = ?3
             WHERE receiver_id = ?1 AND sender_id = ?2 AND is_read = 0",
            params![reader, peer, Utc::now()],
        )?;
        Ok(updated)
    }

    fn unread_counts(&self, reader: &str) -> Result<HashMap<String, usize>> {
        let db = self.lock()?;
        let mut stmt = db.connection().prepare(
            "SELECT sender_id, COUNT(*)
             FROM messages
             WHERE receiver_id = ?1 AND is_read = 0
             GROUP BY sender_id",
        )?;

        let counts = stmt
            .query_map(params![reader], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
            })?
            .collect::<SqlResult<HashMap<_, _>>>()?;

        Ok(counts)
    }

    fn message_count(&self) -> Result<usize> {
        let db = self.lock()?;
        let count: i64 =
            db.connection()
                .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteMessageStore {
        SqliteMessageStore::in_memory().expect("in-memory store")
    }

    #[test]
    fn insert_assigns_id_and_timestamps() {
        let store = store();
        let message = store
            .insert_message(&NewMessage::new("doc1", "pat1", "Hello"))
            .unwrap();

        assert!(!message.id.is_empty());
        assert_eq!(message.timestamp, message.created_at);
        assert_eq!(message.created_at, message.updated_at);
        assert!(!message.is_read);
        assert_eq!(store.message_count().unwrap(), 1);
    }

    #[test]
    fn conversation_covers_both_directions_in_insert_order() {
        let store = store();
        store.insert_message(&NewMessage::new("doc1", "pat1", "one")).unwrap();
        store.insert_message(&NewMessage::new("pat1", "doc1", "two")).unwrap();
        store.insert_message(&NewMessage::new("doc1", "pat2", "other")).unwrap();
        store.insert_message(&NewMessage::new("doc1", "pat1", "three")).unwrap();

        let forward = store.conversation("doc1", "pat1").unwrap();
        let backward = store.conversation("pat1", "doc1").unwrap();

        let texts: Vec<_> = forward.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["one", "two", "three"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn stored_timestamps_survive_the_round_trip() {
        let store = store();
        let sent = store.insert_message(&NewMessage::new("a", "b", "x")).unwrap();
        let loaded = store.conversation("a", "b").unwrap();
        assert_eq!(loaded, vec![sent]);
    }

    #[test]
    fn mark_read_only_touches_incoming_from_peer() {
        let store = store();
        store.insert_message(&NewMessage::new("pat1", "doc1", "hi")).unwrap();
        store.insert_message(&NewMessage::new("pat1", "doc1", "there")).unwrap();
        store.insert_message(&NewMessage::new("doc1", "pat1", "hello")).unwrap();
        store.insert_message(&NewMessage::new("pat2", "doc1", "ping")).unwrap();

        assert_eq!(store.mark_read("doc1", "pat1").unwrap(), 2);
        assert_eq!(store.mark_read("doc1", "pat1").unwrap(), 0);

        let thread = store.conversation("doc1", "pat1").unwrap();
        assert!(thread.iter().filter(|m| m.sender_id == "pat1").all(|m| m.is_read));
        assert!(thread.iter().filter(|m| m.sender_id == "doc1").all(|m| !m.is_read));

        let counts = store.unread_counts("doc1").unwrap();
        assert_eq!(counts.get("pat2"), Some(&1));
        assert_eq!(counts.get("pat1"), None);
    }

    #[test]
    fn sender_equal_to_receiver_is_rejected_by_schema() {
        let store = store();
        let result = store.insert_message(&NewMessage::new("doc1", "doc1", "self"));
        assert!(matches!(result, Err(ChatError::Storage(_))));
        assert_eq!(store.message_count().unwrap(), 0);
    }

    #[test]
    fn file_backed_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.db");

        {
            let store = SqliteMessageStore::with_path(&path).unwrap();
            store.insert_message(&NewMessage::new("doc1", "pat1", "kept")).unwrap();
        }

        let reopened = SqliteMessageStore::with_path(&path).unwrap();
        let thread = reopened.conversation("pat1", "doc1").unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].text, "kept");
    }

    #[test]
    fn missing_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("nested").join("chat.db");

        let store = SqliteMessageStore::with_path(&path).unwrap();
        assert_eq!(store.message_count().unwrap(), 0);
        assert!(path.exists());
    }
}
