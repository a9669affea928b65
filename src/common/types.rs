use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single chat message between two participants.
///
/// Serialized in the document shape the views consume:
/// `{ _id, senderId, receiverId, message, timestamp, createdAt, updatedAt, isRead }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(rename = "message")]
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl Message {
    pub fn is_from(&self, participant_id: &str) -> bool {
        self.sender_id == participant_id
    }

    /// True when the message belongs to the conversation `{a, b}`, in either direction.
    pub fn belongs_to(&self, a: &str, b: &str) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }
}

/// Which side of the conversation a caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
}

impl Role {
    /// Request header carrying this role's bearer token.
    pub fn token_header(&self) -> &'static str {
        match self {
            Role::Doctor => "dtoken",
            Role::Patient => "token",
        }
    }

    /// The role on the other side of a conversation.
    pub fn counterpart(&self) -> Role {
        match self {
            Role::Doctor => Role::Patient,
            Role::Patient => Role::Doctor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directory entry for a doctor or a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}
