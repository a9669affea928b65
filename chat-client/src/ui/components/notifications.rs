use chrono::Utc;
use eframe::egui;

use crate::common::Notifications;

const NOTIFICATION_TTL_SECS: i64 = 8;

pub fn render(ctx: &egui::Context, notifications: &mut Notifications) {
    notifications.expire(Utc::now(), NOTIFICATION_TTL_SECS);
    if notifications.is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .show(ctx, |ui| {
            for (index, notification) in notifications.iter().enumerate() {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(egui::Color32::LIGHT_RED, &notification.text);
                        if ui.small_button("x").clicked() {
                            dismissed = Some(index);
                        }
                    });
                });
            }
        });

    if let Some(index) = dismissed {
        notifications.dismiss(index);
    }
}
