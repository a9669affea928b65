use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{ApiCommand, ApiEvent};

use super::components::{chat_area, input_bar, notifications, sidebar};
use super::state::{DoctorChatState, PatientChatState};

/// How often the open views poll the backend; there is no push transport.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Channel ends shared by both views.
struct Dispatcher {
    command_sender: mpsc::Sender<ApiCommand>,
    event_receiver: mpsc::Receiver<ApiEvent>,
    last_poll: Instant,
}

impl Dispatcher {
    fn new(
        command_sender: mpsc::Sender<ApiCommand>,
        event_receiver: mpsc::Receiver<ApiEvent>,
    ) -> Self {
        Self {
            command_sender,
            event_receiver,
            last_poll: Instant::now(),
        }
    }

    fn send(&self, command: ApiCommand) {
        let what = command.describe();
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to dispatch command ({what}): {err}");
        }
    }

    fn send_all(&self, commands: impl IntoIterator<Item = ApiCommand>) {
        for command in commands {
            self.send(command);
        }
    }

    fn poll_due(&mut self) -> bool {
        if self.last_poll.elapsed() < POLL_INTERVAL {
            return false;
        }
        self.last_poll = Instant::now();
        true
    }
}

pub struct DoctorChatApp {
    state: DoctorChatState,
    dispatcher: Dispatcher,
}

impl DoctorChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        command_sender: mpsc::Sender<ApiCommand>,
        event_receiver: mpsc::Receiver<ApiEvent>,
    ) -> Self {
        let state = DoctorChatState::new();
        let dispatcher = Dispatcher::new(command_sender, event_receiver);
        dispatcher.send_all(state.startup_commands());
        Self { state, dispatcher }
    }

    fn handle_api_events(&mut self) {
        while let Ok(event) = self.dispatcher.event_receiver.try_recv() {
            let follow_up = self.state.handle_event(event);
            self.dispatcher.send_all(follow_up);
        }
    }
}

impl eframe::App for DoctorChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_api_events();
        if self.dispatcher.poll_due() {
            let commands = self.state.refresh();
            self.dispatcher.send_all(commands);
        }

        egui::SidePanel::left("patient_sidebar")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                if let Some(patient_id) = sidebar::render(ui, &self.state) {
                    let command = self.state.select_patient(&patient_id);
                    self.dispatcher.send_all(command);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let title = self
                .state
                .selected_patient
                .as_deref()
                .and_then(|id| self.state.patients.iter().find(|p| p.id == id))
                .map(|patient| (patient.id.clone(), patient.name.clone()));

            match title {
                Some((patient_id, name)) => {
                    ui.heading(name);
                    ui.separator();

                    if !self.state.conversations.is_loaded(&patient_id) {
                        ui.label(egui::RichText::new("Loading conversation...").weak());
                    }

                    egui::TopBottomPanel::bottom("doctor_input").show_inside(ui, |ui| {
                        if input_bar::render(ui, &mut self.state.input_text) {
                            self.dispatcher.send_all(self.state.send_input());
                        }
                    });

                    let own_id = self.state.doctor_id();
                    chat_area::render(ui, self.state.visible_messages(), own_id);
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label("Select a patient to start chatting");
                    });
                }
            }
        });

        notifications::render(ctx, &mut self.state.notifications);
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

pub struct PatientChatApp {
    state: PatientChatState,
    dispatcher: Dispatcher,
}

impl PatientChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        doctor_id: String,
        command_sender: mpsc::Sender<ApiCommand>,
        event_receiver: mpsc::Receiver<ApiEvent>,
    ) -> Self {
        let state = PatientChatState::new(doctor_id);
        let dispatcher = Dispatcher::new(command_sender, event_receiver);
        dispatcher.send_all(state.startup_commands());
        Self { state, dispatcher }
    }

    fn handle_api_events(&mut self) {
        while let Ok(event) = self.dispatcher.event_receiver.try_recv() {
            let follow_up = self.state.handle_event(event);
            self.dispatcher.send_all(follow_up);
        }
    }
}

impl eframe::App for PatientChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_api_events();
        if self.dispatcher.poll_due() {
            let command = self.state.refresh();
            self.dispatcher.send_all(command);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.is_loading() {
                ui.centered_and_justified(|ui| {
                    ui.label("Loading...");
                });
                return;
            }

            ui.heading("Chat with your doctor");
            ui.separator();

            egui::TopBottomPanel::bottom("patient_input").show_inside(ui, |ui| {
                if input_bar::render(ui, &mut self.state.input_text) {
                    self.dispatcher.send_all(self.state.send_input());
                }
            });

            chat_area::render(ui, self.state.messages.iter(), self.state.user_id());
        });

        notifications::render(ctx, &mut self.state.notifications);
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
