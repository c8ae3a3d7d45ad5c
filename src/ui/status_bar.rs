use eframe::egui;
use crate::app::LauncherApp;

pub fn show_status_bar(app: &mut LauncherApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            match &app.config.target.executable {
                Some(path) => ui.label(format!("Executor: {}", path.display())),
                None => ui.colored_label(
                    egui::Color32::from_rgb(255, 200, 100),
                    "No executor configured",
                ),
            };

            ui.separator();
            ui.label(&app.config.target.component);
        });
    });
}

/// Toast messages, newest at the bottom.
pub fn show_toasts(app: &mut LauncherApp, ctx: &egui::Context) {
    app.flow.platform_mut().prune_toasts();
    let messages: Vec<String> = app.flow.platform().toasts().map(|t| t.message.clone()).collect();
    if messages.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("toast_overlay"))
    .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -40.0))
    .order(egui::Order::Foreground)
    .show(ctx, |ui| {
        egui::Frame::popup(ui.style())
        .inner_margin(10.0)
        .show(ui, |ui| {
            for message in &messages {
                ui.label(message);
            }
        });
    });
    app.flow.platform_mut().mark_toasts_shown();

    // Keep repainting so expired toasts disappear
    ctx.request_repaint_after(std::time::Duration::from_millis(100));
}
