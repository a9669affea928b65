use std::collections::HashMap;

use hms_chat::common::wire::{
    self, ChatResponse, DoctorProfileResponse, Envelope, MarkReadResponse, MessagesResponse,
    PatientMessagesRequest, PatientRef, PatientsResponse, SendMessageRequest,
    UnreadCountsResponse, UserProfileResponse,
};
use hms_chat::{Message, Participant, Role};
use reqwest::{Client as HttpClient, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or HTTP-level failure
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with `success: false`
    #[error("{0}")]
    Api(String),

    /// Body was not the expected envelope
    #[error("unexpected response (HTTP {status}): {reason}")]
    Decode { status: u16, reason: String },

    /// Operation not offered to this role
    #[error("{0} is not available to a {1}")]
    WrongRole(&'static str, Role),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// HTTP client for the messaging endpoints of one authenticated caller.
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    token: String,
    role: Role,
}

impl ApiClient {
    pub fn new(base_url: &str, token: impl Into<String>, role: Role) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            role,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_auth(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(self.role.token_header(), &self.token)
    }

    fn require(&self, role: Role, operation: &'static str) -> ClientResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(ClientError::WrongRole(operation, self.role))
        }
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned + Envelope,
    {
        let req = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        self.execute(self.with_auth(req)).await
    }

    async fn get<R>(&self, path: &str) -> ClientResult<R>
    where
        R: DeserializeOwned + Envelope,
    {
        let req = self.http.get(format!("{}{}", self.base_url, path));
        self.execute(self.with_auth(req)).await
    }

    /// Failures still carry an envelope, so the body is decoded whatever the status.
    async fn execute<R>(&self, req: RequestBuilder) -> ClientResult<R>
    where
        R: DeserializeOwned + Envelope,
    {
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        let envelope: R = serde_json::from_str(&text).map_err(|err| ClientError::Decode {
            status: status.as_u16(),
            reason: err.to_string(),
        })?;

        if envelope.success() {
            Ok(envelope)
        } else {
            Err(ClientError::Api(
                envelope
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {status}")),
            ))
        }
    }

    /// Own identity as seen by the server.
    pub async fn profile(&self) -> ClientResult<Participant> {
        let profile = match self.role {
            Role::Doctor => {
                self.get::<DoctorProfileResponse>(wire::DOCTOR_PROFILE)
                    .await?
                    .profile_data
            }
            Role::Patient => {
                self.get::<UserProfileResponse>(wire::USER_PROFILE)
                    .await?
                    .user_data
            }
        };
        profile.ok_or_else(|| ClientError::Api("Profile missing in response".to_string()))
    }

    pub async fn patients(&self) -> ClientResult<Vec<Participant>> {
        self.require(Role::Doctor, "listing patients")?;
        let resp: PatientsResponse = self.get(wire::DOCTOR_PATIENTS).await?;
        Ok(resp.users)
    }

    /// Conversation between the caller (`self_id`) and `peer_id`.
    pub async fn conversation(&self, self_id: &str, peer_id: &str) -> ClientResult<Vec<Message>> {
        let resp: MessagesResponse = match self.role {
            Role::Doctor => {
                let body = PatientRef {
                    user_id: peer_id.to_string(),
                };
                self.post(wire::DOCTOR_GET_MESSAGES, &body).await?
            }
            Role::Patient => {
                let body = PatientMessagesRequest {
                    user_id: Some(self_id.to_string()),
                    doctor_id: peer_id.to_string(),
                };
                self.post(wire::USER_GET_MESSAGES, &body).await?
            }
        };
        Ok(resp.messages)
    }

    pub async fn send_message(
        &self,
        sender_id: &str,
        receiver_id: &str,
        text: &str,
    ) -> ClientResult<Message> {
        let body = SendMessageRequest {
            sender_id: Some(sender_id.to_string()),
            receiver_id: receiver_id.to_string(),
            message: text.to_string(),
        };
        let path = match self.role {
            Role::Doctor => wire::DOCTOR_SEND_MESSAGE,
            Role::Patient => wire::USER_SEND_MESSAGE,
        };
        let resp: ChatResponse = self.post(path, &body).await?;
        resp.chat
            .ok_or_else(|| ClientError::Api("Message missing in response".to_string()))
    }

    pub async fn mark_read(&self, peer_id: &str) -> ClientResult<usize> {
        self.require(Role::Doctor, "marking messages read")?;
        let body = PatientRef {
            user_id: peer_id.to_string(),
        };
        let resp: MarkReadResponse = self.post(wire::DOCTOR_MARK_READ, &body).await?;
        Ok(resp.updated)
    }

    pub async fn unread_counts(&self) -> ClientResult<HashMap<String, usize>> {
        self.require(Role::Doctor, "loading unread counts")?;
        let resp: UnreadCountsResponse = self.get(wire::DOCTOR_UNREAD_COUNTS).await?;
        Ok(resp.counts)
    }
}
