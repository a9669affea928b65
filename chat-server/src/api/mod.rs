pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use hms_chat::common::wire;
use hms_chat::{ChatError, MessagingService, SqliteMessageStore};

use crate::auth::AccountDirectory;
use error::ApiError;

/// Everything a request handler needs.
pub struct ServerState {
    pub messaging: MessagingService<SqliteMessageStore>,
    pub directory: Box<dyn AccountDirectory>,
}

pub type SharedState = Arc<ServerState>;

impl ServerState {
    pub fn new(store: SqliteMessageStore, directory: Box<dyn AccountDirectory>) -> SharedState {
        Arc::new(Self {
            messaging: MessagingService::new(store),
            directory,
        })
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route(wire::DOCTOR_GET_MESSAGES, post(handlers::doctor_get_messages))
        .route(wire::DOCTOR_SEND_MESSAGE, post(handlers::doctor_send_message))
        .route(wire::DOCTOR_MARK_READ, post(handlers::doctor_mark_read))
        .route(wire::DOCTOR_UNREAD_COUNTS, get(handlers::doctor_unread_counts))
        .route(wire::DOCTOR_PATIENTS, get(handlers::doctor_patients))
        .route(wire::DOCTOR_PROFILE, get(handlers::doctor_profile))
        .route(wire::USER_GET_MESSAGES, post(handlers::user_get_messages))
        .route(wire::USER_SEND_MESSAGE, post(handlers::user_send_message))
        .route(wire::USER_PROFILE, get(handlers::user_profile))
        .route(wire::HEALTH, get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Run a store operation off the async runtime.
pub(crate) async fn run_blocking<T, F>(state: &SharedState, operation: F) -> Result<T, ApiError>
where
    F: FnOnce(&MessagingService<SqliteMessageStore>) -> hms_chat::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    let result = tokio::task::spawn_blocking(move || operation(&state.messaging))
        .await
        .map_err(|err| ApiError(ChatError::Storage(format!("store task failed: {err}"))))?;
    Ok(result?)
}
