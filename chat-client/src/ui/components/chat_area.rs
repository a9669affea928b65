use eframe::egui;
use hms_chat::Message;

/// Conversation transcript; messages sent by `own_id` are right-aligned.
pub fn render<'a>(
    ui: &mut egui::Ui,
    messages: impl Iterator<Item = &'a Message>,
    own_id: Option<&str>,
) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in messages {
                let own = own_id.is_some_and(|id| message.is_from(id));
                let layout = if own {
                    egui::Layout::right_to_left(egui::Align::TOP)
                } else {
                    egui::Layout::left_to_right(egui::Align::TOP)
                };

                ui.with_layout(layout, |ui| {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.vertical(|ui| {
                            ui.label(&message.text);
                            // Hiển thị giờ gửi theo giờ địa phương
                            let time = message.timestamp.with_timezone(&chrono::Local);
                            ui.label(
                                egui::RichText::new(time.format("%H:%M").to_string())
                                    .weak()
                                    .small(),
                            );
                        });
                    });
                });
            }
        });
}
