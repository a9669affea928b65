use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use hms_chat::common::wire::{
    ChatResponse, DoctorProfileResponse, MarkReadResponse, MessagesResponse, PatientMessagesRequest,
    PatientRef, PatientsResponse, SendMessageRequest, StatusResponse, UnreadCountsResponse,
    UserProfileResponse,
};
use hms_chat::{ChatError, Role};

use super::error::ApiResult;
use super::{SharedState, run_blocking};
use crate::auth::Account;

type Body<T> = Result<Json<T>, JsonRejection>;

fn authenticate(state: &SharedState, headers: &HeaderMap, role: Role) -> ApiResult<Account> {
    let token = headers
        .get(role.token_header())
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    Ok(state.directory.authenticate(role, token)?)
}

/// A body may repeat the caller's own id; it must never name someone else.
fn check_claim(claimed: Option<&str>, caller: &Account, field: &str) -> ApiResult<()> {
    match claimed.map(str::trim) {
        Some(claimed) if !claimed.is_empty() && claimed != caller.id => {
            Err(ChatError::forbidden(format!(
                "{field} does not match the authenticated {}",
                caller.role
            ))
            .into())
        }
        _ => Ok(()),
    }
}

// ========== Doctor ==========

pub async fn doctor_get_messages(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Body<PatientRef>,
) -> ApiResult<Json<MessagesResponse>> {
    let doctor = authenticate(&state, &headers, Role::Doctor)?;
    let Json(request) = body?;

    let messages = run_blocking(&state, move |messaging| {
        messaging.fetch(&doctor.id, &request.user_id)
    })
    .await?;

    Ok(Json(MessagesResponse {
        success: true,
        messages,
        message: None,
    }))
}

pub async fn doctor_send_message(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Body<SendMessageRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let doctor = authenticate(&state, &headers, Role::Doctor)?;
    let Json(request) = body?;
    send(&state, doctor, request).await
}

pub async fn doctor_mark_read(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Body<PatientRef>,
) -> ApiResult<Json<MarkReadResponse>> {
    let doctor = authenticate(&state, &headers, Role::Doctor)?;
    let Json(request) = body?;

    let updated = run_blocking(&state, move |messaging| {
        messaging.mark_read(&doctor.id, &request.user_id)
    })
    .await?;

    Ok(Json(MarkReadResponse {
        success: true,
        updated,
        message: None,
    }))
}

pub async fn doctor_unread_counts(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<UnreadCountsResponse>> {
    let doctor = authenticate(&state, &headers, Role::Doctor)?;
    let counts = run_blocking(&state, move |messaging| messaging.unread_counts(&doctor.id)).await?;

    Ok(Json(UnreadCountsResponse {
        success: true,
        counts,
        message: None,
    }))
}

pub async fn doctor_patients(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<PatientsResponse>> {
    authenticate(&state, &headers, Role::Doctor)?;
    Ok(Json(PatientsResponse {
        success: true,
        users: state.directory.list(Role::Patient),
        message: None,
    }))
}

pub async fn doctor_profile(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<DoctorProfileResponse>> {
    let doctor = authenticate(&state, &headers, Role::Doctor)?;
    Ok(Json(DoctorProfileResponse {
        success: true,
        profile_data: Some(doctor.participant()),
        message: None,
    }))
}

// ========== Patient ==========

pub async fn user_get_messages(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Body<PatientMessagesRequest>,
) -> ApiResult<Json<MessagesResponse>> {
    let patient = authenticate(&state, &headers, Role::Patient)?;
    let Json(request) = body?;
    check_claim(request.user_id.as_deref(), &patient, "userId")?;

    let messages = run_blocking(&state, move |messaging| {
        messaging.fetch(&patient.id, &request.doctor_id)
    })
    .await?;

    Ok(Json(MessagesResponse {
        success: true,
        messages,
        message: None,
    }))
}

pub async fn user_send_message(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Body<SendMessageRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let patient = authenticate(&state, &headers, Role::Patient)?;
    let Json(request) = body?;
    send(&state, patient, request).await
}

pub async fn user_profile(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<UserProfileResponse>> {
    let patient = authenticate(&state, &headers, Role::Patient)?;
    Ok(Json(UserProfileResponse {
        success: true,
        user_data: Some(patient.participant()),
        message: None,
    }))
}

// ========== Shared ==========

/// The sender is always the authenticated caller.
async fn send(
    state: &SharedState,
    sender: Account,
    request: SendMessageRequest,
) -> ApiResult<Json<ChatResponse>> {
    check_claim(request.sender_id.as_deref(), &sender, "senderId")?;

    let receiver_id = request.receiver_id.trim();
    let receiver_role = sender.role.counterpart();
    if !receiver_id.is_empty() && !state.directory.contains(receiver_role, receiver_id) {
        let reason = format!("Unknown {receiver_role} {receiver_id}");
        return Err(ChatError::validation(reason).into());
    }

    let chat = run_blocking(state, move |messaging| {
        messaging.send(&sender.id, &request.receiver_id, &request.message)
    })
    .await?;
    log::info!("Message {} sent to {}", chat.id, chat.receiver_id);

    Ok(Json(ChatResponse {
        success: true,
        chat: Some(chat),
        message: None,
    }))
}

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

pub async fn not_found() -> (StatusCode, Json<StatusResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(StatusResponse::failure("Endpoint not found")),
    )
}

