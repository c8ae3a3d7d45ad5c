use eframe::egui;
use crate::app::LauncherApp;

pub fn update(app: &mut LauncherApp, ctx: &egui::Context, _frame: &mut eframe::Frame) {
    // Native pickers block this frame until the user answers
    if app.flow.platform().has_pending_pick() {
        app.process_pending_pick();
    }

    super::status_bar::show_status_bar(app, ctx);
    super::dialogs::show_dialogs(app, ctx);
    super::status_bar::show_toasts(app, ctx);

    if app.ready_to_close() {
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    } else if app.flow.platform().has_pending_pick() || app.flow.is_finished() {
        ctx.request_repaint();
    }
}

impl eframe::App for LauncherApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        update(self, ctx, frame);
    }
}
