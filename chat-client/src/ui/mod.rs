pub mod app;
pub mod components;
pub mod state;

pub use app::{DoctorChatApp, PatientChatApp};
pub use state::{ConversationState, ConversationStates, DoctorChatState, PatientChatState};
