use rusqlite::{Connection, Result as SqlResult};
use std::path::Path;
use std::time::Duration;

/// Schema steps, applied in order; `PRAGMA user_version` records how many ran.
const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS messages (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        sender_id TEXT NOT NULL,
        receiver_id TEXT NOT NULL,
        message TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        is_read INTEGER NOT NULL DEFAULT 0,

        CHECK (is_read IN (0, 1)),
        CHECK (sender_id <> receiver_id)
    );
    CREATE INDEX IF NOT EXISTS idx_messages_pair ON messages(sender_id, receiver_id);
    CREATE INDEX IF NOT EXISTS idx_messages_unread ON messages(receiver_id, is_read);",
];

/// SQLite connection with the chat schema applied.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Self::migrated(conn)
    }

    pub fn in_memory() -> SqlResult<Self> {
        Self::migrated(Connection::open_in_memory()?)
    }

    fn migrated(mut conn: Connection) -> SqlResult<Self> {
        let applied = user_version(&conn)?;

        if applied < MIGRATIONS.len() {
            let tx = conn.transaction()?;
            for (version, step) in MIGRATIONS.iter().enumerate().skip(applied) {
                tx.execute_batch(step)?;
                tx.execute_batch(&format!("PRAGMA user_version = {}", version + 1))?;
            }
            tx.commit()?;
            log::info!("Message database migrated to schema v{}", MIGRATIONS.len());
        }

        Ok(Self { conn })
    }

    pub fn schema_version(&self) -> SqlResult<usize> {
        user_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn user_version(conn: &Connection) -> SqlResult<usize> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version as usize)
}
