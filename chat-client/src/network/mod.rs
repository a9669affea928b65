pub mod api;
pub mod client;

pub use api::{ApiClient, ClientError};
pub use client::ApiWorker;
