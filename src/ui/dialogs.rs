use eframe::egui;
use crate::app::LauncherApp;
use crate::flow::chooser::ActionChoice;
use crate::flow::FlowState;

pub fn show_dialogs(app: &mut LauncherApp, ctx: &egui::Context) {
    match app.flow.state().clone() {
        FlowState::ShowingInstructions => show_instructions_dialog(app, ctx),
        FlowState::ChoosingAction { suggested_label, .. } => {
            show_choose_action_dialog(app, ctx, &suggested_label)
        }
        FlowState::AwaitingFilePick | FlowState::AwaitingIconPick => show_waiting_panel(app, ctx),
        FlowState::Idle | FlowState::Finished(_) => {}
    }
}

/// First-run help. Only the "Got it" button closes it.
fn show_instructions_dialog(app: &mut LauncherApp, ctx: &egui::Context) {
    egui::Window::new("Welcome to Kenji Launcher")
    .collapsible(false)
    .resizable(false)
    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
    .show(ctx, |ui| {
        ui.label("1. Pick a Nintendo Switch game file (.nsp, .xci).");
        ui.add_space(8.0);
        ui.label("2. Choose: Start Now or Create Shortcut.");
        ui.add_space(8.0);
        ui.label("3. When creating a shortcut, you can enter a name and choose an icon (or use the default app icon).");
        ui.add_space(8.0);
        ui.label("4. Shortcuts appear on your home screen and launch directly into Kenji-NX.");
        ui.add_space(15.0);

        ui.vertical_centered(|ui| {
            if ui.button("Got it").clicked() {
                app.flow.acknowledge_instructions();
            }
        });
    });
}

fn show_choose_action_dialog(app: &mut LauncherApp, ctx: &egui::Context, suggested_label: &str) {
    let mut choice = None;

    egui::Window::new("Choose action")
    .collapsible(false)
    .resizable(false)
    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
    .show(ctx, |ui| {
        ui.label("Do you want to start the game now or create a home screen shortcut?");
        ui.add_space(10.0);

        ui.add(
            egui::TextEdit::singleline(&mut app.label_input)
            .hint_text(suggested_label)
            .desired_width(f32::INFINITY),
        );

        ui.add_space(15.0);

        ui.horizontal(|ui| {
            if ui.button("Start Now").clicked() {
                choice = Some(ActionChoice::StartNow);
            }
            if ui.button("Create Shortcut").clicked() {
                choice = Some(ActionChoice::CreateShortcut {
                    label_input: app.label_input.clone(),
                });
            }
            if ui.button("Cancel").clicked() {
                choice = Some(ActionChoice::Cancel);
            }
        });
    });

    if let Some(choice) = choice {
        app.flow.choose(choice);
    }
}

fn show_waiting_panel(app: &mut LauncherApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.spinner();
            ui.add_space(10.0);
            match app.flow.state() {
                FlowState::AwaitingIconPick => ui.label("Select icon (or cancel to use app icon)"),
                _ => ui.label("Pick a game file..."),
            };
        });
    });
}
