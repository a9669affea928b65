pub mod database;
pub mod message_db;
pub mod message_store;
pub mod models;

pub use message_db::SqliteMessageStore;
pub use message_store::MessageStore;
pub use models::NewMessage;

use std::fs;
use std::path::Path;

pub const DEFAULT_DB_PATH: &str = "data/messages.db";

/// Create the directory a database file lives in, if it has one.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
