pub mod app_ui;
pub mod dialogs;
pub mod status_bar;
