//! Shared core of the hospital chat: message model, wire envelopes,
//! the SQLite message store and the messaging service.

pub mod common;
pub mod error;
pub mod messaging;
pub mod storage;

pub use common::{Message, Participant, Role};
pub use error::{ChatError, Result};
pub use messaging::MessagingService;
pub use storage::{MessageStore, NewMessage, SqliteMessageStore};
