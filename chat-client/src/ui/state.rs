use std::collections::HashMap;

use hms_chat::{Message, Participant};

use crate::common::{ApiCommand, ApiEvent, Notifications, RequestId};

/// Client-side bookkeeping of one conversation, keyed by the other participant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    /// Incoming messages not yet seen by the doctor.
    pub unread: usize,
    /// Latest fetch issued for this conversation, if still in flight.
    pub pending_request: Option<RequestId>,
    /// Latest fetch issued, answered or not.
    pub latest_request: Option<RequestId>,
    pub loaded: bool,
}

/// Per-patient conversation states.
///
/// Reconciliation rule: selecting a patient zeroes the count eagerly; when the
/// matching fetch resolves its count replaces the eager zero.
#[derive(Debug, Default)]
pub struct ConversationStates {
    entries: HashMap<String, ConversationState>,
}

impl ConversationStates {
    pub fn get(&self, participant_id: &str) -> Option<&ConversationState> {
        self.entries.get(participant_id)
    }

    pub fn unread(&self, participant_id: &str) -> usize {
        self.get(participant_id).map_or(0, |state| state.unread)
    }

    fn entry(&mut self, participant_id: &str) -> &mut ConversationState {
        self.entries.entry(participant_id.to_string()).or_default()
    }

    pub fn set_unread(&mut self, participant_id: &str, unread: usize) {
        self.entry(participant_id).unread = unread;
    }

    pub fn begin_request(&mut self, participant_id: &str, request_id: RequestId) {
        let state = self.entry(participant_id);
        state.unread = 0;
        state.pending_request = Some(request_id);
        state.latest_request = Some(request_id);
    }

    pub fn is_latest(&self, participant_id: &str, request_id: RequestId) -> bool {
        self.get(participant_id)
            .is_some_and(|state| state.latest_request == Some(request_id))
    }

    /// Apply the authoritative count of a resolved fetch.
    pub fn finish_request(&mut self, participant_id: &str, unread: usize) {
        let state = self.entry(participant_id);
        state.unread = unread;
        state.pending_request = None;
        state.loaded = true;
    }

    pub fn fail_request(&mut self, participant_id: &str, request_id: RequestId) {
        let state = self.entry(participant_id);
        if state.pending_request == Some(request_id) {
            state.pending_request = None;
        }
    }

    /// True once a fetch for this conversation has been applied.
    pub fn is_loaded(&self, participant_id: &str) -> bool {
        self.get(participant_id).is_some_and(|state| state.loaded)
    }

    pub fn total_unread(&self) -> usize {
        self.entries.values().map(|state| state.unread).sum()
    }
}

/// A poll may already have returned a message before its send confirmation
/// arrives.
fn append_once(messages: &mut Vec<Message>, message: Message) {
    if !messages.iter().any(|existing| existing.id == message.id) {
        messages.push(message);
    }
}

fn unread_from(messages: &[Message], sender_id: &str) -> usize {
    messages
        .iter()
        .filter(|message| message.is_from(sender_id) && !message.is_read)
        .count()
}

/// Doctor dashboard: patient list, unread counts and the selected conversation.
pub struct DoctorChatState {
    pub doctor: Option<Participant>,
    pub patients: Vec<Participant>,
    pub selected_patient: Option<String>,
    pub messages: Vec<Message>,
    pub input_text: String,
    pub conversations: ConversationStates,
    pub notifications: Notifications,
    next_request_id: RequestId,
}

impl Default for DoctorChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl DoctorChatState {
    pub fn new() -> Self {
        Self {
            doctor: None,
            patients: Vec::new(),
            selected_patient: None,
            messages: Vec::new(),
            input_text: String::new(),
            conversations: ConversationStates::default(),
            notifications: Notifications::default(),
            next_request_id: 1,
        }
    }

    pub fn startup_commands(&self) -> Vec<ApiCommand> {
        vec![
            ApiCommand::LoadProfile,
            ApiCommand::LoadPatients,
            ApiCommand::LoadUnreadCounts,
        ]
    }

    pub fn doctor_id(&self) -> Option<&str> {
        self.doctor.as_ref().map(|doctor| doctor.id.as_str())
    }

    pub fn is_selected(&self, patient_id: &str) -> bool {
        self.selected_patient.as_deref() == Some(patient_id)
    }

    /// Messages of the selected conversation only.
    pub fn visible_messages(&self) -> impl Iterator<Item = &Message> {
        let pair = self.doctor_id().zip(self.selected_patient.as_deref());
        self.messages.iter().filter(move |message| {
            pair.is_some_and(|(doctor, patient)| message.belongs_to(doctor, patient))
        })
    }

    fn next_request(&mut self) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        request_id
    }

    /// Open a patient's conversation. The unread count drops to zero right
    /// away; the fetch result decides the final value.
    pub fn select_patient(&mut self, patient_id: &str) -> Option<ApiCommand> {
        let doctor_id = match self.doctor_id() {
            Some(id) => id.to_string(),
            None => {
                log::debug!("Ignoring patient selection before the profile is loaded");
                return None;
            }
        };

        self.selected_patient = Some(patient_id.to_string());
        let request_id = self.next_request();
        self.conversations.begin_request(patient_id, request_id);

        Some(ApiCommand::FetchConversation {
            self_id: doctor_id,
            peer_id: patient_id.to_string(),
            request_id,
        })
    }

    /// Periodic poll: server unread counts, plus a fresh copy of the open
    /// conversation. Start-up loads that failed are retried here.
    pub fn refresh(&mut self) -> Vec<ApiCommand> {
        let mut commands = Vec::new();
        if self.doctor.is_none() {
            commands.push(ApiCommand::LoadProfile);
        }
        if self.patients.is_empty() {
            commands.push(ApiCommand::LoadPatients);
        }
        commands.push(ApiCommand::LoadUnreadCounts);
        if let Some(patient_id) = self.selected_patient.clone() {
            commands.extend(self.select_patient(&patient_id));
        }
        commands
    }

    /// Send the input box to the selected patient; blank input is ignored.
    pub fn send_input(&self) -> Option<ApiCommand> {
        if self.input_text.trim().is_empty() {
            return None;
        }
        let sender_id = self.doctor_id()?.to_string();
        let receiver_id = self.selected_patient.clone()?;

        Some(ApiCommand::SendMessage {
            sender_id,
            receiver_id,
            text: self.input_text.clone(),
        })
    }

    /// Fold a worker event into the state; returns follow-up commands.
    pub fn handle_event(&mut self, event: ApiEvent) -> Vec<ApiCommand> {
        match event {
            ApiEvent::ProfileLoaded(doctor) => {
                log::info!("Signed in as {}", doctor.name);
                self.doctor = Some(doctor);
            }
            ApiEvent::PatientsLoaded(patients) => self.patients = patients,
            ApiEvent::ConversationLoaded {
                peer_id,
                request_id,
                messages,
            } => {
                return self
                    .apply_conversation(&peer_id, request_id, messages)
                    .into_iter()
                    .collect();
            }
            ApiEvent::MessageSent(message) => self.apply_sent(message),
            ApiEvent::MarkedRead { peer_id, .. } => self.apply_marked_read(&peer_id),
            ApiEvent::UnreadCountsLoaded(counts) => self.apply_unread_counts(&counts),
            ApiEvent::RequestFailed { command, message } => self.apply_failure(command, message),
        }
        Vec::new()
    }

    fn apply_conversation(
        &mut self,
        peer_id: &str,
        request_id: RequestId,
        messages: Vec<Message>,
    ) -> Option<ApiCommand> {
        if !self.conversations.is_latest(peer_id, request_id) {
            log::debug!("Dropping stale conversation result {request_id} for {peer_id}");
            return None;
        }

        let unread = unread_from(&messages, peer_id);
        self.conversations.finish_request(peer_id, unread);

        if !self.is_selected(peer_id) {
            return None;
        }
        self.messages = messages;

        (unread > 0).then(|| ApiCommand::MarkRead {
            peer_id: peer_id.to_string(),
        })
    }

    fn apply_sent(&mut self, message: Message) {
        let in_view = match (self.doctor_id(), self.selected_patient.as_deref()) {
            (Some(doctor), Some(patient)) => message.belongs_to(doctor, patient),
            _ => false,
        };
        if self.input_text == message.text {
            self.input_text.clear();
        }
        if in_view {
            append_once(&mut self.messages, message);
        }
    }

    fn apply_marked_read(&mut self, peer_id: &str) {
        self.conversations.set_unread(peer_id, 0);
        for message in self.messages.iter_mut().filter(|m| m.is_from(peer_id)) {
            message.is_read = true;
        }
    }

    /// Server counts for every conversation except the open one, which
    /// follows its own fetch.
    fn apply_unread_counts(&mut self, counts: &HashMap<String, usize>) {
        let patient_ids = self
            .patients
            .iter()
            .map(|patient| patient.id.clone())
            .chain(counts.keys().cloned())
            .collect::<Vec<_>>();

        for patient_id in patient_ids {
            if self.is_selected(&patient_id) {
                continue;
            }
            let unread = counts.get(&patient_id).copied().unwrap_or(0);
            self.conversations.set_unread(&patient_id, unread);
        }
    }

    fn apply_failure(&mut self, command: ApiCommand, message: String) {
        if let ApiCommand::FetchConversation {
            peer_id,
            request_id,
            ..
        } = &command
        {
            self.conversations.fail_request(peer_id, *request_id);
        }
        self.notifications.error(message);
    }
}

/// Patient side: one fixed conversation with a doctor.
pub struct PatientChatState {
    pub user: Option<Participant>,
    pub doctor_id: String,
    pub messages: Vec<Message>,
    pub input_text: String,
    pub notifications: Notifications,
    latest_request: Option<RequestId>,
    next_request_id: RequestId,
}

impl PatientChatState {
    pub fn new(doctor_id: impl Into<String>) -> Self {
        Self {
            user: None,
            doctor_id: doctor_id.into(),
            messages: Vec::new(),
            input_text: String::new(),
            notifications: Notifications::default(),
            latest_request: None,
            next_request_id: 1,
        }
    }

    /// Everything waits for the patient's identity.
    pub fn startup_commands(&self) -> Vec<ApiCommand> {
        vec![ApiCommand::LoadProfile]
    }

    pub fn is_loading(&self) -> bool {
        self.user.is_none()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }

    /// Re-fetch the conversation, or retry the profile while still loading.
    pub fn refresh(&mut self) -> Option<ApiCommand> {
        let Some(self_id) = self.user_id().map(str::to_string) else {
            return Some(ApiCommand::LoadProfile);
        };
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.latest_request = Some(request_id);

        Some(ApiCommand::FetchConversation {
            self_id,
            peer_id: self.doctor_id.clone(),
            request_id,
        })
    }

    pub fn send_input(&self) -> Option<ApiCommand> {
        if self.input_text.trim().is_empty() {
            return None;
        }
        Some(ApiCommand::SendMessage {
            sender_id: self.user_id()?.to_string(),
            receiver_id: self.doctor_id.clone(),
            text: self.input_text.clone(),
        })
    }

    pub fn handle_event(&mut self, event: ApiEvent) -> Vec<ApiCommand> {
        match event {
            ApiEvent::ProfileLoaded(user) => {
                log::info!("Signed in as {}", user.name);
                self.user = Some(user);
                return self.refresh().into_iter().collect();
            }
            ApiEvent::ConversationLoaded {
                peer_id,
                request_id,
                messages,
            } => {
                if peer_id == self.doctor_id && self.latest_request == Some(request_id) {
                    self.messages = messages;
                }
            }
            ApiEvent::MessageSent(message) => {
                if self.input_text == message.text {
                    self.input_text.clear();
                }
                let in_view = self
                    .user_id()
                    .is_some_and(|user| message.belongs_to(user, &self.doctor_id));
                if in_view {
                    append_once(&mut self.messages, message);
                }
            }
            ApiEvent::RequestFailed { message, .. } => self.notifications.error(message),
            ApiEvent::PatientsLoaded(_)
            | ApiEvent::MarkedRead { .. }
            | ApiEvent::UnreadCountsLoaded(_) => {}
        }
        Vec::new()
    }
}
