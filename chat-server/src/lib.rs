pub mod api;
pub mod auth;
pub mod config;
pub mod server;
#[doc(hidden)]
pub mod testing;

pub use api::{ServerState, SharedState, router};
pub use server::{ChatServer, serve};
