use eframe::egui;

use crate::ui::state::DoctorChatState;

/// Patient list with unread badges. Returns the patient the user clicked.
pub fn render(ui: &mut egui::Ui, state: &DoctorChatState) -> Option<String> {
    let mut clicked = None;

    let total_unread = state.conversations.total_unread();
    if total_unread > 0 {
        ui.heading(format!("Patients ({total_unread} unread)"));
    } else {
        ui.heading("Patients");
    }
    ui.separator();

    if state.patients.is_empty() {
        ui.label("No patients available");
        return None;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for patient in &state.patients {
            ui.horizontal(|ui| {
                let selected = state.is_selected(&patient.id);
                if ui.selectable_label(selected, &patient.name).clicked() {
                    clicked = Some(patient.id.clone());
                }

                let unread = state.conversations.unread(&patient.id);
                if unread > 0 {
                    ui.colored_label(egui::Color32::RED, format!("({unread})"));
                }
            });
        }
    });

    clicked
}
