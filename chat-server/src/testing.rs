//! Fixtures for integration tests: a three-account directory and a server on
//! an ephemeral port.

use std::error::Error;

use hms_chat::{Role, SqliteMessageStore};
use tokio::net::TcpListener;

use crate::auth::StaticAccounts;
use crate::config::AccountConfig;
use crate::{ServerState, serve};

pub const DOCTOR_TOKEN: &str = "doc-token";
pub const PATIENT_TOKEN: &str = "pat1-token";
pub const OTHER_PATIENT_TOKEN: &str = "pat2-token";

fn account(id: &str, name: &str, role: Role, token: &str) -> AccountConfig {
    AccountConfig {
        id: id.into(),
        name: name.into(),
        role,
        token: token.into(),
    }
}

/// `doc1` (Dr. Grey), `pat1` (Adam) and `pat2` (Zoe).
pub fn accounts() -> Vec<AccountConfig> {
    vec![
        account("doc1", "Dr. Grey", Role::Doctor, DOCTOR_TOKEN),
        account("pat1", "Adam", Role::Patient, PATIENT_TOKEN),
        account("pat2", "Zoe", Role::Patient, OTHER_PATIENT_TOKEN),
    ]
}

/// Start the API with an in-memory store; returns its base URL.
pub async fn spawn_server() -> Result<String, Box<dyn Error + Send + Sync>> {
    let store = SqliteMessageStore::in_memory()?;
    let state = ServerState::new(store, Box::new(StaticAccounts::new(&accounts())));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = serve(listener, state).await {
            log::error!("Test server stopped: {err}");
        }
    });

    Ok(format!("http://{addr}"))
}
