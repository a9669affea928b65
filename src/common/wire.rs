//! Request bodies and response envelopes of the messaging endpoints.
//!
//! Every response carries `success`; failures add a human readable `message`.
//! Request fields default to empty so a missing field reaches validation
//! instead of failing deserialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::{Message, Participant};

pub const DOCTOR_GET_MESSAGES: &str = "/api/doctor/getMessage";
pub const DOCTOR_SEND_MESSAGE: &str = "/api/doctor/sendMessage";
pub const DOCTOR_MARK_READ: &str = "/api/doctor/markRead";
pub const DOCTOR_UNREAD_COUNTS: &str = "/api/doctor/unreadCounts";
pub const DOCTOR_PATIENTS: &str = "/api/doctor/patients";
pub const DOCTOR_PROFILE: &str = "/api/doctor/profile";
pub const USER_GET_MESSAGES: &str = "/api/user/get-messages";
pub const USER_SEND_MESSAGE: &str = "/api/user/send-message";
pub const USER_PROFILE: &str = "/api/user/get-profile";
pub const HEALTH: &str = "/health";

/// Body of the doctor's fetch and mark-read calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRef {
    #[serde(default)]
    pub user_id: String,
}

/// Body of the patient's fetch call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientMessagesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub doctor_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub receiver_id: String,
    #[serde(default)]
    pub message: String,
}

/// Common accessors of every response envelope.
pub trait Envelope {
    fn success(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

macro_rules! envelope {
    ($name:ident { $($(#[$meta:meta])* pub $field:ident: $ty:ty,)* }) => {
        #[derive(Debug, Clone, Default, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub success: bool,
            $(
                $(#[$meta])*
                #[serde(default)]
                pub $field: $ty,
            )*
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub message: Option<String>,
        }

        impl Envelope for $name {
            fn success(&self) -> bool {
                self.success
            }

            fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }
        }
    };
}

envelope!(StatusResponse {});

envelope!(MessagesResponse {
    pub messages: Vec<Message>,
});

envelope!(ChatResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat: Option<Message>,
});

envelope!(MarkReadResponse {
    pub updated: usize,
});

envelope!(UnreadCountsResponse {
    pub counts: HashMap<String, usize>,
});

envelope!(PatientsResponse {
    pub users: Vec<Participant>,
});

envelope!(DoctorProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_data: Option<Participant>,
});

envelope!(UserProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Participant>,
});

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
