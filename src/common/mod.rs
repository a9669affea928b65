pub mod types;
pub mod wire;

pub use types::{Message, Participant, Role};
