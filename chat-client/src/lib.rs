pub mod common;
pub mod config;
pub mod network;
pub mod ui;

pub use common::{ApiCommand, ApiEvent};
pub use network::{ApiClient, ApiWorker, ClientError};
