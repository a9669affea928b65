use std::error::Error;
use std::net::SocketAddr;

use hms_chat::{ChatError, MessageStore, SqliteMessageStore};
use tokio::net::TcpListener;

use crate::api::{self, ServerState, SharedState};
use crate::auth::{AccountDirectory, StaticAccounts};
use crate::config::ServerConfig;

pub struct ChatServer {
    state: SharedState,
    listen_addr: SocketAddr,
}

impl ChatServer {
    pub fn new(config: &ServerConfig) -> Result<Self, ChatError> {
        let listen_addr: SocketAddr = config.listen_addr.parse().map_err(|err| {
            ChatError::Config(format!("invalid listen address {}: {err}", config.listen_addr))
        })?;

        let store = open_store(&config.database_path)?;
        let accounts = StaticAccounts::new(&config.accounts);
        if accounts.is_empty() {
            log::warn!("No accounts configured; every request will be rejected as unauthorized");
        } else {
            log::info!("Loaded {} accounts", accounts.len());
        }

        Ok(Self::with_state(
            ServerState::new(store, Box::new(accounts) as Box<dyn AccountDirectory>),
            listen_addr,
        ))
    }

    pub fn with_state(state: SharedState, listen_addr: SocketAddr) -> Self {
        Self { state, listen_addr }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error>> {
        let listener = TcpListener::bind(self.listen_addr).await?;
        log::info!("Chat API listening on http://{}", listener.local_addr()?);
        serve(listener, self.state.clone()).await?;
        Ok(())
    }

    pub fn stored_messages(&self) -> usize {
        match self.state.messaging.store().message_count() {
            Ok(count) => count,
            Err(err) => {
                log::warn!("Failed to count stored messages: {err}");
                0
            }
        }
    }
}

/// Serve the API on an already bound listener until the future is dropped.
pub async fn serve(listener: TcpListener, state: SharedState) -> std::io::Result<()> {
    axum::serve(listener, api::router(state).into_make_service()).await
}

fn open_store(path: &str) -> Result<SqliteMessageStore, ChatError> {
    if path == ":memory:" {
        log::info!("Using in-memory message store");
        return SqliteMessageStore::in_memory();
    }
    log::info!("Opening message store at {path}");
    SqliteMessageStore::with_path(path)
}
